/// Mock graphics device for unit tests (no GPU required)
///
/// Records every call with its arguments and tracks live driver objects so
/// tests can assert call counts, call order and resource accounting. The
/// recorded state is shared through `Rc<RefCell<_>>`, so a test keeps a handle
/// on it after the device itself has been moved into a `Context`.

use std::cell::RefCell;
use std::rc::Rc;
use rustc_hash::{FxHashMap, FxHashSet};
use crate::error::{Error, Result};
use crate::graphics_device::{
    Context, GraphicsDevice, RawHandle, ShaderKind, BufferKind, BufferUsage, IndexType,
    PrimitiveTopology, PolygonMode, ClearFlags, UniformValue, VertexAttribute,
};

// ============================================================================
// Recorded calls
// ============================================================================

/// One recorded device call
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    CreateShader(ShaderKind, RawHandle),
    CompileShader(RawHandle),
    DeleteShader(RawHandle),
    CreateProgram(RawHandle),
    AttachShader { program: RawHandle, shader: RawHandle },
    DetachShader { program: RawHandle, shader: RawHandle },
    LinkProgram(RawHandle),
    UseProgram(Option<RawHandle>),
    DeleteProgram(RawHandle),
    SetUniform { location: RawHandle, value: UniformValue },
    CreateBuffer(RawHandle),
    BindBuffer(BufferKind, Option<RawHandle>),
    BufferData { kind: BufferKind, size: usize, usage: BufferUsage },
    DeleteBuffer(RawHandle),
    CreateVertexArray(RawHandle),
    BindVertexArray(Option<RawHandle>),
    VertexAttribPointer(VertexAttribute),
    EnableVertexAttribArray(u32),
    DeleteVertexArray(RawHandle),
    Viewport { width: u32, height: u32 },
    ClearColor([f32; 4]),
    Clear(ClearFlags),
    PolygonMode(PolygonMode),
    DrawArrays { topology: PrimitiveTopology, first: u32, count: u32 },
    DrawElements { topology: PrimitiveTopology, count: u32, index_type: IndexType, byte_offset: u32 },
}

impl DeviceCall {
    /// Whether this call is a draw
    pub fn is_draw(&self) -> bool {
        matches!(self, DeviceCall::DrawArrays { .. } | DeviceCall::DrawElements { .. })
    }
}

// ============================================================================
// Driver-side objects
// ============================================================================

#[derive(Debug)]
struct MockShaderObject {
    kind: ShaderKind,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Default)]
struct MockProgramObject {
    attached: Vec<RawHandle>,
    linked: bool,
    log: String,
    uniforms: Vec<String>,
}

/// Everything the mock device has seen
#[derive(Debug, Default)]
pub struct MockDeviceState {
    /// Calls in issue order
    pub calls: Vec<DeviceCall>,
    /// Calls naming a handle that is not alive (deleted or never created)
    pub invalid_operations: u32,
    /// When set, every link fails with this log
    pub link_failure: Option<String>,
    /// When set, every `create_*` call fails
    pub fail_allocations: bool,
    /// When set, `create_*` calls fail once this many have succeeded
    pub allocations_left: Option<u32>,
    next_handle: u32,
    shaders: FxHashMap<RawHandle, MockShaderObject>,
    programs: FxHashMap<RawHandle, MockProgramObject>,
    buffers: FxHashSet<RawHandle>,
    vertex_arrays: FxHashSet<RawHandle>,
    bound_vertex_buffer: Option<RawHandle>,
}

impl MockDeviceState {
    fn allocate(&mut self) -> Result<RawHandle> {
        if self.fail_allocations || self.allocations_left == Some(0) {
            return Err(Error::BackendError("mock device: out of memory".to_string()));
        }
        if let Some(left) = self.allocations_left.as_mut() {
            *left -= 1;
        }
        self.next_handle += 1;
        Ok(RawHandle(self.next_handle))
    }

    fn check(&mut self, alive: bool) {
        if !alive {
            self.invalid_operations += 1;
        }
    }

    /// Number of recorded calls matching `predicate`
    pub fn count(&self, predicate: impl Fn(&DeviceCall) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }

    /// Recorded draw calls, in order
    pub fn draw_calls(&self) -> Vec<DeviceCall> {
        self.calls.iter().filter(|c| c.is_draw()).cloned().collect()
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.vertex_arrays.len()
    }

    /// Forget recorded calls, keep live objects
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

/// Syntax check standing in for a real GLSL compiler
///
/// Rejects sources without a `main` entry point or with unbalanced braces,
/// producing a driver-style log.
fn mock_compile(source: &str) -> std::result::Result<(), String> {
    let mut depth: i64 = 0;
    for (line_no, line) in source.lines().enumerate() {
        for c in line.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                return Err(format!("0:{}(1): error: syntax error, unexpected '}}'", line_no + 1));
            }
        }
    }
    if depth != 0 {
        return Err("0:0(0): error: syntax error, unexpected end of file".to_string());
    }
    if !source.contains("main") {
        return Err("0:0(0): error: entry point 'main' not found".to_string());
    }
    Ok(())
}

/// Names declared as `uniform <type> <name>;` in a source
fn declared_uniforms(source: &str) -> Vec<String> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("uniform "))
        .filter_map(|line| line.trim_end_matches(';').split_whitespace().last())
        .map(|name| name.trim_end_matches(';').to_string())
        .collect()
}

// ============================================================================
// Mock device
// ============================================================================

/// Mock device that records calls without a GPU
#[derive(Debug, Default)]
pub struct MockGraphicsDevice {
    pub state: Rc<RefCell<MockDeviceState>>,
}

impl MockGraphicsDevice {
    /// Create a new mock device
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle on the recorded state
    pub fn state(&self) -> Rc<RefCell<MockDeviceState>> {
        self.state.clone()
    }
}

/// Build a context over a fresh mock device, returning the recorded state too
pub fn mock_context() -> (Context, Rc<RefCell<MockDeviceState>>) {
    let device = MockGraphicsDevice::new();
    let state = device.state();
    (Context::new(device), state)
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_shader(&mut self, kind: ShaderKind) -> Result<RawHandle> {
        let mut state = self.state.borrow_mut();
        let handle = state.allocate()?;
        state.shaders.insert(handle, MockShaderObject {
            kind,
            source: String::new(),
            compiled: false,
            log: String::new(),
        });
        state.calls.push(DeviceCall::CreateShader(kind, handle));
        Ok(handle)
    }

    fn compile_shader(&mut self, shader: RawHandle, source: &str) {
        let mut state = self.state.borrow_mut();
        state.calls.push(DeviceCall::CompileShader(shader));
        match state.shaders.get_mut(&shader) {
            Some(object) => {
                object.source = source.to_string();
                match mock_compile(source) {
                    Ok(()) => {
                        object.compiled = true;
                        object.log.clear();
                    }
                    Err(log) => {
                        object.compiled = false;
                        object.log = log;
                    }
                }
            }
            None => state.invalid_operations += 1,
        }
    }

    fn shader_compile_status(&self, shader: RawHandle) -> bool {
        self.state.borrow().shaders.get(&shader).map(|s| s.compiled).unwrap_or(false)
    }

    fn shader_info_log(&self, shader: RawHandle) -> String {
        self.state.borrow().shaders.get(&shader).map(|s| s.log.clone()).unwrap_or_default()
    }

    fn delete_shader(&mut self, shader: RawHandle) {
        let mut state = self.state.borrow_mut();
        state.calls.push(DeviceCall::DeleteShader(shader));
        let alive = state.shaders.remove(&shader).is_some();
        state.check(alive);
    }

    fn create_program(&mut self) -> Result<RawHandle> {
        let mut state = self.state.borrow_mut();
        let handle = state.allocate()?;
        state.programs.insert(handle, MockProgramObject::default());
        state.calls.push(DeviceCall::CreateProgram(handle));
        Ok(handle)
    }

    fn attach_shader(&mut self, program: RawHandle, shader: RawHandle) {
        let mut state = self.state.borrow_mut();
        state.calls.push(DeviceCall::AttachShader { program, shader });
        let shader_alive = state.shaders.contains_key(&shader);
        match state.programs.get_mut(&program) {
            Some(object) if shader_alive => object.attached.push(shader),
            _ => state.invalid_operations += 1,
        }
    }

    fn detach_shader(&mut self, program: RawHandle, shader: RawHandle) {
        let mut state = self.state.borrow_mut();
        state.calls.push(DeviceCall::DetachShader { program, shader });
        match state.programs.get_mut(&program) {
            Some(object) => object.attached.retain(|s| *s != shader),
            None => state.invalid_operations += 1,
        }
    }

    fn link_program(&mut self, program: RawHandle) {
        let mut state = self.state.borrow_mut();
        state.calls.push(DeviceCall::LinkProgram(program));
        let attached = match state.programs.get(&program) {
            Some(object) => object.attached.clone(),
            None => {
                state.invalid_operations += 1;
                return;
            }
        };

        let mut kinds = Vec::new();
        let mut uniforms = Vec::new();
        let mut all_compiled = true;
        for shader in &attached {
            if let Some(object) = state.shaders.get(shader) {
                kinds.push(object.kind);
                all_compiled &= object.compiled;
                for name in declared_uniforms(&object.source) {
                    if !uniforms.contains(&name) {
                        uniforms.push(name);
                    }
                }
            }
        }

        let failure = if let Some(log) = state.link_failure.clone() {
            Some(log)
        } else if !all_compiled {
            Some("error: linking with uncompiled/unspecialized shader".to_string())
        } else if !kinds.contains(&ShaderKind::Vertex) || !kinds.contains(&ShaderKind::Fragment) {
            Some("error: program lacks a vertex or fragment shader".to_string())
        } else {
            None
        };

        if let Some(object) = state.programs.get_mut(&program) {
            match failure {
                Some(log) => {
                    object.linked = false;
                    object.log = log;
                    object.uniforms.clear();
                }
                None => {
                    object.linked = true;
                    object.log.clear();
                    object.uniforms = uniforms;
                }
            }
        }
    }

    fn program_link_status(&self, program: RawHandle) -> bool {
        self.state.borrow().programs.get(&program).map(|p| p.linked).unwrap_or(false)
    }

    fn program_info_log(&self, program: RawHandle) -> String {
        self.state.borrow().programs.get(&program).map(|p| p.log.clone()).unwrap_or_default()
    }

    fn use_program(&mut self, program: Option<RawHandle>) {
        let mut state = self.state.borrow_mut();
        state.calls.push(DeviceCall::UseProgram(program));
        if let Some(handle) = program {
            let alive = state.programs.contains_key(&handle);
            state.check(alive);
        }
    }

    fn delete_program(&mut self, program: RawHandle) {
        let mut state = self.state.borrow_mut();
        state.calls.push(DeviceCall::DeleteProgram(program));
        let alive = state.programs.remove(&program).is_some();
        state.check(alive);
    }

    fn uniform_location(&self, program: RawHandle, name: &str) -> Option<RawHandle> {
        let state = self.state.borrow();
        let object = state.programs.get(&program)?;
        object.uniforms.iter()
            .position(|u| u == name)
            .map(|index| RawHandle(index as u32))
    }

    fn set_uniform(&mut self, location: RawHandle, value: UniformValue) {
        self.state.borrow_mut().calls.push(DeviceCall::SetUniform { location, value });
    }

    fn create_buffer(&mut self) -> Result<RawHandle> {
        let mut state = self.state.borrow_mut();
        let handle = state.allocate()?;
        state.buffers.insert(handle);
        state.calls.push(DeviceCall::CreateBuffer(handle));
        Ok(handle)
    }

    fn bind_buffer(&mut self, kind: BufferKind, buffer: Option<RawHandle>) {
        let mut state = self.state.borrow_mut();
        state.calls.push(DeviceCall::BindBuffer(kind, buffer));
        if let Some(handle) = buffer {
            let alive = state.buffers.contains(&handle);
            state.check(alive);
        }
        if kind == BufferKind::Vertex {
            state.bound_vertex_buffer = buffer;
        }
    }

    fn buffer_data(&mut self, kind: BufferKind, data: &[u8], usage: BufferUsage) {
        self.state.borrow_mut().calls.push(DeviceCall::BufferData { kind, size: data.len(), usage });
    }

    fn delete_buffer(&mut self, buffer: RawHandle) {
        let mut state = self.state.borrow_mut();
        state.calls.push(DeviceCall::DeleteBuffer(buffer));
        let alive = state.buffers.remove(&buffer);
        state.check(alive);
        if state.bound_vertex_buffer == Some(buffer) {
            state.bound_vertex_buffer = None;
        }
    }

    fn create_vertex_array(&mut self) -> Result<RawHandle> {
        let mut state = self.state.borrow_mut();
        let handle = state.allocate()?;
        state.vertex_arrays.insert(handle);
        state.calls.push(DeviceCall::CreateVertexArray(handle));
        Ok(handle)
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<RawHandle>) {
        let mut state = self.state.borrow_mut();
        state.calls.push(DeviceCall::BindVertexArray(vertex_array));
        if let Some(handle) = vertex_array {
            let alive = state.vertex_arrays.contains(&handle);
            state.check(alive);
        }
    }

    fn vertex_attrib_pointer(&mut self, attribute: &VertexAttribute) {
        let mut state = self.state.borrow_mut();
        state.calls.push(DeviceCall::VertexAttribPointer(*attribute));
        // The driver rejects attribute pointers with no array buffer bound
        let bound = state.bound_vertex_buffer.is_some();
        state.check(bound);
    }

    fn enable_vertex_attrib_array(&mut self, slot: u32) {
        self.state.borrow_mut().calls.push(DeviceCall::EnableVertexAttribArray(slot));
    }

    fn delete_vertex_array(&mut self, vertex_array: RawHandle) {
        let mut state = self.state.borrow_mut();
        state.calls.push(DeviceCall::DeleteVertexArray(vertex_array));
        let alive = state.vertex_arrays.remove(&vertex_array);
        state.check(alive);
    }

    fn viewport(&mut self, _x: i32, _y: i32, width: u32, height: u32) {
        self.state.borrow_mut().calls.push(DeviceCall::Viewport { width, height });
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.state.borrow_mut().calls.push(DeviceCall::ClearColor([r, g, b, a]));
    }

    fn clear(&mut self, flags: ClearFlags) {
        self.state.borrow_mut().calls.push(DeviceCall::Clear(flags));
    }

    fn polygon_mode(&mut self, mode: PolygonMode) {
        self.state.borrow_mut().calls.push(DeviceCall::PolygonMode(mode));
    }

    fn draw_arrays(&mut self, topology: PrimitiveTopology, first: u32, count: u32) {
        self.state.borrow_mut().calls.push(DeviceCall::DrawArrays { topology, first, count });
    }

    fn draw_elements(
        &mut self,
        topology: PrimitiveTopology,
        count: u32,
        index_type: IndexType,
        byte_offset: u32,
    ) {
        self.state.borrow_mut().calls.push(DeviceCall::DrawElements { topology, count, index_type, byte_offset });
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
