//! Depth-mapped 3D reconstruction of a document.
//!
//! The crate produces renderer-agnostic scene data (planes, materials, lights, camera) and runs
//! the parallax physics; drawing it is left to the host's GPU stack.

pub mod holo;
pub mod lighting;
pub mod material;
pub mod physics;
pub mod scene;
