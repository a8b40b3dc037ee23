/// OpenGlDevice - glow implementation of the GraphicsDevice trait

use std::num::NonZeroU32;
use glow::HasContext;
use prism_engine::prism::{
    Result,
    GraphicsDevice,
    RawHandle, ShaderKind, BufferKind, BufferUsage, DataType, IndexType,
    PrimitiveTopology, PolygonMode, ClearFlags, UniformValue, VertexAttribute,
};
use prism_engine::{engine_err, engine_warn};

const SOURCE: &str = "prism::opengl";

/// Graphics device over a loaded OpenGL function table
///
/// The GL context must be current on the calling thread for the whole life of
/// the device. Every call is a thin forward to the driver; state tracking and
/// validation happen in `prism_engine::prism::Context`.
pub struct OpenGlDevice {
    gl: glow::Context,
}

impl OpenGlDevice {
    /// Wrap a loaded glow context
    pub fn new(gl: glow::Context) -> Self {
        let version = gl.version();
        prism_engine::engine_info!(
            SOURCE,
            "OpenGL {}.{} ({})",
            version.major,
            version.minor,
            version.vendor_info
        );
        Self { gl }
    }

    /// Underlying glow context
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }
}

// ===== HANDLE CONVERSION =====

pub(crate) fn to_raw(name: NonZeroU32) -> RawHandle {
    RawHandle(name.get())
}

pub(crate) fn from_raw(handle: RawHandle) -> Option<NonZeroU32> {
    NonZeroU32::new(handle.0)
}

fn native_shader(handle: RawHandle) -> Option<glow::NativeShader> {
    from_raw(handle).map(glow::NativeShader)
}

fn native_program(handle: RawHandle) -> Option<glow::NativeProgram> {
    from_raw(handle).map(glow::NativeProgram)
}

fn native_buffer(handle: RawHandle) -> Option<glow::NativeBuffer> {
    from_raw(handle).map(glow::NativeBuffer)
}

fn native_vertex_array(handle: RawHandle) -> Option<glow::NativeVertexArray> {
    from_raw(handle).map(glow::NativeVertexArray)
}

fn null_handle(what: &str) {
    engine_warn!(SOURCE, "Ignoring call on null {} handle", what);
}

// ===== ENUM CONVERSION =====

pub(crate) fn shader_kind_to_gl(kind: ShaderKind) -> u32 {
    match kind {
        ShaderKind::Vertex => glow::VERTEX_SHADER,
        ShaderKind::Fragment => glow::FRAGMENT_SHADER,
        ShaderKind::Geometry => glow::GEOMETRY_SHADER,
    }
}

pub(crate) fn buffer_kind_to_gl(kind: BufferKind) -> u32 {
    match kind {
        BufferKind::Vertex => glow::ARRAY_BUFFER,
        BufferKind::Index => glow::ELEMENT_ARRAY_BUFFER,
    }
}

pub(crate) fn usage_to_gl(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::StaticDraw => glow::STATIC_DRAW,
        BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
        BufferUsage::StreamDraw => glow::STREAM_DRAW,
    }
}

pub(crate) fn data_type_to_gl(data_type: DataType) -> u32 {
    match data_type {
        DataType::Float => glow::FLOAT,
        DataType::Int => glow::INT,
        DataType::UnsignedInt => glow::UNSIGNED_INT,
        DataType::Short => glow::SHORT,
        DataType::UnsignedShort => glow::UNSIGNED_SHORT,
        DataType::Byte => glow::BYTE,
        DataType::UnsignedByte => glow::UNSIGNED_BYTE,
    }
}

pub(crate) fn index_type_to_gl(index_type: IndexType) -> u32 {
    match index_type {
        IndexType::U8 => glow::UNSIGNED_BYTE,
        IndexType::U16 => glow::UNSIGNED_SHORT,
        IndexType::U32 => glow::UNSIGNED_INT,
    }
}

pub(crate) fn topology_to_gl(topology: PrimitiveTopology) -> u32 {
    match topology {
        PrimitiveTopology::Triangles => glow::TRIANGLES,
        PrimitiveTopology::TriangleStrip => glow::TRIANGLE_STRIP,
        PrimitiveTopology::Lines => glow::LINES,
        PrimitiveTopology::LineStrip => glow::LINE_STRIP,
        PrimitiveTopology::Points => glow::POINTS,
    }
}

pub(crate) fn polygon_mode_to_gl(mode: PolygonMode) -> u32 {
    match mode {
        PolygonMode::Fill => glow::FILL,
        PolygonMode::Line => glow::LINE,
        PolygonMode::Point => glow::POINT,
    }
}

pub(crate) fn clear_flags_to_gl(flags: ClearFlags) -> u32 {
    let mut mask = 0;
    if flags.contains(ClearFlags::COLOR) {
        mask |= glow::COLOR_BUFFER_BIT;
    }
    if flags.contains(ClearFlags::DEPTH) {
        mask |= glow::DEPTH_BUFFER_BIT;
    }
    if flags.contains(ClearFlags::STENCIL) {
        mask |= glow::STENCIL_BUFFER_BIT;
    }
    mask
}

/// Arguments of `glVertexAttribPointer` for one attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AttribPointerArgs {
    pub index: u32,
    pub size: i32,
    pub data_type: u32,
    pub normalized: bool,
    pub stride: i32,
    pub offset: i32,
}

/// Every attribute goes through `glVertexAttribPointer`, so integer data
/// reaches the shader as floats
pub(crate) fn attrib_pointer_args(attribute: &VertexAttribute) -> AttribPointerArgs {
    AttribPointerArgs {
        index: attribute.slot,
        size: gl_int(attribute.components),
        data_type: data_type_to_gl(attribute.data_type),
        normalized: attribute.normalized,
        stride: gl_int(attribute.stride),
        offset: gl_int(attribute.offset),
    }
}

/// Clamp an unsigned count to the `GLsizei`/`GLint` range
fn gl_int(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

// ===== GRAPHICS DEVICE =====

impl GraphicsDevice for OpenGlDevice {
    fn create_shader(&mut self, kind: ShaderKind) -> Result<RawHandle> {
        let shader = unsafe { self.gl.create_shader(shader_kind_to_gl(kind)) }
            .map_err(|e| engine_err!(SOURCE, "Failed to create {} shader: {}", kind.label(), e))?;
        Ok(to_raw(shader.0))
    }

    fn compile_shader(&mut self, shader: RawHandle, source: &str) {
        let Some(shader) = native_shader(shader) else { return null_handle("shader") };
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
        }
    }

    fn shader_compile_status(&self, shader: RawHandle) -> bool {
        native_shader(shader)
            .map(|s| unsafe { self.gl.get_shader_compile_status(s) })
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: RawHandle) -> String {
        native_shader(shader)
            .map(|s| unsafe { self.gl.get_shader_info_log(s) })
            .unwrap_or_default()
    }

    fn delete_shader(&mut self, shader: RawHandle) {
        let Some(shader) = native_shader(shader) else { return null_handle("shader") };
        unsafe { self.gl.delete_shader(shader) };
    }

    fn create_program(&mut self) -> Result<RawHandle> {
        let program = unsafe { self.gl.create_program() }
            .map_err(|e| engine_err!(SOURCE, "Failed to create program: {}", e))?;
        Ok(to_raw(program.0))
    }

    fn attach_shader(&mut self, program: RawHandle, shader: RawHandle) {
        let (Some(program), Some(shader)) = (native_program(program), native_shader(shader)) else {
            return null_handle("program or shader");
        };
        unsafe { self.gl.attach_shader(program, shader) };
    }

    fn detach_shader(&mut self, program: RawHandle, shader: RawHandle) {
        let (Some(program), Some(shader)) = (native_program(program), native_shader(shader)) else {
            return null_handle("program or shader");
        };
        unsafe { self.gl.detach_shader(program, shader) };
    }

    fn link_program(&mut self, program: RawHandle) {
        let Some(program) = native_program(program) else { return null_handle("program") };
        unsafe { self.gl.link_program(program) };
    }

    fn program_link_status(&self, program: RawHandle) -> bool {
        native_program(program)
            .map(|p| unsafe { self.gl.get_program_link_status(p) })
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: RawHandle) -> String {
        native_program(program)
            .map(|p| unsafe { self.gl.get_program_info_log(p) })
            .unwrap_or_default()
    }

    fn use_program(&mut self, program: Option<RawHandle>) {
        unsafe { self.gl.use_program(program.and_then(native_program)) };
    }

    fn delete_program(&mut self, program: RawHandle) {
        let Some(program) = native_program(program) else { return null_handle("program") };
        unsafe { self.gl.delete_program(program) };
    }

    fn uniform_location(&self, program: RawHandle, name: &str) -> Option<RawHandle> {
        let program = native_program(program)?;
        unsafe { self.gl.get_uniform_location(program, name) }
            .map(|location| RawHandle(location.0))
    }

    fn set_uniform(&mut self, location: RawHandle, value: UniformValue) {
        let location = glow::NativeUniformLocation(location.0);
        let location = Some(&location);
        unsafe {
            match value {
                UniformValue::Float(v) => self.gl.uniform_1_f32(location, v),
                UniformValue::Int(v) => self.gl.uniform_1_i32(location, v),
                UniformValue::Vec2(v) => self.gl.uniform_2_f32(location, v.x, v.y),
                UniformValue::Vec3(v) => self.gl.uniform_3_f32(location, v.x, v.y, v.z),
                UniformValue::Vec4(v) => self.gl.uniform_4_f32(location, v.x, v.y, v.z, v.w),
                UniformValue::Mat4(m) => {
                    self.gl.uniform_matrix_4_f32_slice(location, false, &m.to_cols_array())
                }
            }
        }
    }

    fn create_buffer(&mut self) -> Result<RawHandle> {
        let buffer = unsafe { self.gl.create_buffer() }
            .map_err(|e| engine_err!(SOURCE, "Failed to create buffer: {}", e))?;
        Ok(to_raw(buffer.0))
    }

    fn bind_buffer(&mut self, kind: BufferKind, buffer: Option<RawHandle>) {
        unsafe { self.gl.bind_buffer(buffer_kind_to_gl(kind), buffer.and_then(native_buffer)) };
    }

    fn buffer_data(&mut self, kind: BufferKind, data: &[u8], usage: BufferUsage) {
        unsafe { self.gl.buffer_data_u8_slice(buffer_kind_to_gl(kind), data, usage_to_gl(usage)) };
    }

    fn delete_buffer(&mut self, buffer: RawHandle) {
        let Some(buffer) = native_buffer(buffer) else { return null_handle("buffer") };
        unsafe { self.gl.delete_buffer(buffer) };
    }

    fn create_vertex_array(&mut self) -> Result<RawHandle> {
        let vertex_array = unsafe { self.gl.create_vertex_array() }
            .map_err(|e| engine_err!(SOURCE, "Failed to create vertex array: {}", e))?;
        Ok(to_raw(vertex_array.0))
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<RawHandle>) {
        unsafe { self.gl.bind_vertex_array(vertex_array.and_then(native_vertex_array)) };
    }

    fn vertex_attrib_pointer(&mut self, attribute: &VertexAttribute) {
        let args = attrib_pointer_args(attribute);
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                args.index,
                args.size,
                args.data_type,
                args.normalized,
                args.stride,
                args.offset,
            );
        }
    }

    fn enable_vertex_attrib_array(&mut self, slot: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(slot) };
    }

    fn delete_vertex_array(&mut self, vertex_array: RawHandle) {
        let Some(vertex_array) = native_vertex_array(vertex_array) else {
            return null_handle("vertex array");
        };
        unsafe { self.gl.delete_vertex_array(vertex_array) };
    }

    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        unsafe { self.gl.viewport(x, y, gl_int(width), gl_int(height)) };
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.gl.clear_color(r, g, b, a) };
    }

    fn clear(&mut self, flags: ClearFlags) {
        unsafe { self.gl.clear(clear_flags_to_gl(flags)) };
    }

    fn polygon_mode(&mut self, mode: PolygonMode) {
        unsafe { self.gl.polygon_mode(glow::FRONT_AND_BACK, polygon_mode_to_gl(mode)) };
    }

    fn draw_arrays(&mut self, topology: PrimitiveTopology, first: u32, count: u32) {
        unsafe { self.gl.draw_arrays(topology_to_gl(topology), gl_int(first), gl_int(count)) };
    }

    fn draw_elements(
        &mut self,
        topology: PrimitiveTopology,
        count: u32,
        index_type: IndexType,
        byte_offset: u32,
    ) {
        unsafe {
            self.gl.draw_elements(
                topology_to_gl(topology),
                gl_int(count),
                index_type_to_gl(index_type),
                gl_int(byte_offset),
            )
        };
    }
}

#[cfg(test)]
#[path = "opengl_format_tests.rs"]
mod tests;
