//! GPU resource wrappers
//!
//! Owned handles over buffer and vertex-array objects, plus the geometry
//! helper that wires them together in the canonical order.

pub mod buffer;
pub mod vertex_array;
pub mod geometry;

pub use buffer::{Buffer, BufferBinding};
pub use vertex_array::{VertexArray, VertexArrayBinding, VertexLayout};
pub use geometry::{DrawCommand, Geometry};
