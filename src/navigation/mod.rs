//! 2D canvas navigation: zoom, pan, fit and hit-testing.

pub mod engine;
pub mod input;
pub mod transform;
