pub mod bridge;
pub mod star;
