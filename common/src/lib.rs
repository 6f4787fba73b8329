//! Host rendering surface for the physics labs
//!
//! This crate provides the window and GPU setup, the diagram camera and the
//! line renderer that draws the diagrams produced by `lab_core`.

pub mod camera;
pub mod diagram_renderer;
pub mod graphics;

pub use camera::*;
pub use diagram_renderer::*;
pub use graphics::*;
