pub mod audio;
pub mod collision;
pub mod effects;
