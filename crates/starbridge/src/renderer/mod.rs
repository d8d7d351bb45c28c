pub mod color;
pub mod path;
pub mod traits;

// Re-export key types for convenient access
pub use color::{Hsb, Rgba};
pub use traits::{Canvas, DrawCall, RecordingCanvas};
