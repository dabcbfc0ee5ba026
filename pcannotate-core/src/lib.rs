//! Core data structures and traits for pcannotate
//!
//! This crate provides the fundamental types shared by the annotation and
//! browsing tools: points and point cloud instances, instance identifiers,
//! labels and key bindings, and the display seam the sessions drive.

pub mod point;
pub mod point_cloud;
pub mod instance;
pub mod label;
pub mod traits;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use instance::*;
pub use label::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
