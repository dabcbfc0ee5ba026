//! Visualization for pcannotate
//!
//! This crate provides the window the interactive tools draw into, using
//! wgpu and winit:
//! - [`WindowDisplay`], the [`Display`](pcannotate_core::Display) the sessions drive
//! - Instanced point rendering with screen-space point size
//! - An orbit camera framed on each instance

pub mod camera;
pub mod device;
pub mod renderer;
pub mod shaders;
pub mod window_display;

pub use camera::*;
pub use device::GpuContext;
pub use renderer::{axis_vertices, points_to_vertices, PointRenderer, PointVertex};
pub use window_display::{ViewerConfig, WindowDisplay};
