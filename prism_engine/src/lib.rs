/*!
# Prism Engine

Core of a small OpenGL-style renderer: shader build/link pipeline, GPU buffer
and vertex-array wrappers, and a per-frame driver.

The crate never talks to a graphics API directly. Everything goes through the
[`GraphicsDevice`](prism::GraphicsDevice) trait, implemented by a backend crate
(`prism_renderer_opengl`) or by the mock device used in unit tests. Window
events and presentation come in through the [`Surface`](prism::Surface) trait.

## Architecture

- **GraphicsDevice**: raw call surface of the graphics API
- **Context**: binding-state model and registry of live driver objects
- **ShaderStage / ShaderProgram**: compile and link with driver logs surfaced as errors
- **Buffer / VertexArray / Geometry**: owned GPU resources, released exactly once
- **FrameDriver**: clear, draw every item, present
*/

// Internal modules
mod error;
mod engine;
mod config;
pub mod log;
pub mod graphics_device;
pub mod shader;
pub mod resource;
pub mod frame;

// Main prism namespace module
pub mod prism {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging facade and configuration
    pub use crate::engine::Engine;
    pub use crate::config::{Config, LOG_LEVEL_ENV};

    // Device seam and context
    pub use crate::graphics_device::{
        GraphicsDevice, Context, ResourceCounts, RecordedAttribute,
        ShaderKey, ProgramKey, BufferKey, VertexArrayKey,
        RawHandle, ShaderKind, BufferKind, BufferUsage, DataType, IndexType,
        PrimitiveTopology, PolygonMode, ClearFlags, UniformValue, VertexAttribute,
    };

    // Shaders
    pub use crate::shader::{ShaderSource, SourceOrigin, ShaderStage, ShaderProgram};

    // Resources
    pub use crate::resource::{
        Buffer, BufferBinding, VertexArray, VertexArrayBinding, VertexLayout,
        Geometry, DrawCommand,
    };

    // Frame loop
    pub use crate::frame::{
        Surface, FrameDriver, DriverState, FrameStats, DrawItem, UniformSource, green_pulse,
    };

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }
}

// Re-export math library at crate root
pub use glam;
