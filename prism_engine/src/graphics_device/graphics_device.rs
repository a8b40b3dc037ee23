/// GraphicsDevice trait - the raw graphics-API call surface

use crate::error::Result;
use crate::graphics_device::{
    RawHandle, ShaderKind, BufferKind, BufferUsage, IndexType, PrimitiveTopology,
    PolygonMode, ClearFlags, UniformValue, VertexAttribute,
};

/// Raw graphics device
///
/// This is the capability the core calls into. It mirrors the driver API one
/// call at a time and keeps no bookkeeping of its own: binding state,
/// ownership and validation live in [`crate::prism::Context`], which is the
/// only caller.
///
/// Implemented by backend-specific devices (e.g., `OpenGlDevice`) and by the
/// mock device used in unit tests. All calls happen on the thread that owns the
/// rendering context.
pub trait GraphicsDevice {
    // ===== SHADER STAGES =====

    /// Allocate a shader stage object
    fn create_shader(&mut self, kind: ShaderKind) -> Result<RawHandle>;

    /// Submit source text and request compilation
    fn compile_shader(&mut self, shader: RawHandle, source: &str);

    /// Compile status of the last compilation
    fn shader_compile_status(&self, shader: RawHandle) -> bool;

    /// Driver diagnostic log of the last compilation
    fn shader_info_log(&self, shader: RawHandle) -> String;

    /// Release a shader stage object
    fn delete_shader(&mut self, shader: RawHandle);

    // ===== PROGRAMS =====

    /// Allocate a program object
    fn create_program(&mut self) -> Result<RawHandle>;

    /// Attach a compiled stage to a program
    fn attach_shader(&mut self, program: RawHandle, shader: RawHandle);

    /// Detach a stage from a program
    fn detach_shader(&mut self, program: RawHandle, shader: RawHandle);

    /// Link all attached stages
    fn link_program(&mut self, program: RawHandle);

    /// Link status of the last link
    fn program_link_status(&self, program: RawHandle) -> bool;

    /// Driver diagnostic log of the last link
    fn program_info_log(&self, program: RawHandle) -> String;

    /// Make a program current (`None` = no program)
    fn use_program(&mut self, program: Option<RawHandle>);

    /// Release a program object
    fn delete_program(&mut self, program: RawHandle);

    /// Location of a named uniform, `None` if the program has no such active uniform
    fn uniform_location(&self, program: RawHandle, name: &str) -> Option<RawHandle>;

    /// Upload a uniform value into the current program
    fn set_uniform(&mut self, location: RawHandle, value: UniformValue);

    // ===== BUFFERS =====

    /// Allocate a buffer object
    fn create_buffer(&mut self) -> Result<RawHandle>;

    /// Bind a buffer to the target of its kind (`None` = unbind)
    fn bind_buffer(&mut self, kind: BufferKind, buffer: Option<RawHandle>);

    /// Upload data to the buffer bound to the target of `kind`
    fn buffer_data(&mut self, kind: BufferKind, data: &[u8], usage: BufferUsage);

    /// Release a buffer object
    fn delete_buffer(&mut self, buffer: RawHandle);

    // ===== VERTEX ARRAYS =====

    /// Allocate a vertex array object
    fn create_vertex_array(&mut self) -> Result<RawHandle>;

    /// Bind a vertex array (`None` = unbind)
    fn bind_vertex_array(&mut self, vertex_array: Option<RawHandle>);

    /// Record an attribute layout against the bound vertex buffer
    fn vertex_attrib_pointer(&mut self, attribute: &VertexAttribute);

    /// Enable an attribute slot for drawing
    fn enable_vertex_attrib_array(&mut self, slot: u32);

    /// Release a vertex array object
    fn delete_vertex_array(&mut self, vertex_array: RawHandle);

    // ===== FRAME =====

    /// Set the viewport rectangle
    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Set the clear colour
    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32);

    /// Clear the selected planes of the render target
    fn clear(&mut self, flags: ClearFlags);

    /// Set the polygon rasterization mode (front and back faces)
    fn polygon_mode(&mut self, mode: PolygonMode);

    /// Draw `count` vertices starting at `first`
    fn draw_arrays(&mut self, topology: PrimitiveTopology, first: u32, count: u32);

    /// Draw `count` indices from the bound index buffer, starting at `byte_offset`
    fn draw_elements(
        &mut self,
        topology: PrimitiveTopology,
        count: u32,
        index_type: IndexType,
        byte_offset: u32,
    );
}
