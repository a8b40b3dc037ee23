/// Shader module - source loading, stage compilation and program linking

pub mod shader_source;
pub mod shader_stage;
pub mod shader_program;

pub use shader_source::*;
pub use shader_stage::*;
pub use shader_program::*;
