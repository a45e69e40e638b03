//! WebGPU rendering module
//!
//! Flat triangle-list shapes over a transparent surface; the camera video
//! element sits underneath in the DOM.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::scene_vertices;
pub use vertex::Vertex;
