// extensions/mod.rs
//
// Small pure helpers that sit outside the simulation proper.

pub mod easing;

pub use easing::Easing;
