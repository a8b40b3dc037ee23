/// Context - explicit model of the graphics-context state
///
/// The driver keeps "current" objects as global state: the bound vertex
/// buffer, the bound vertex array (which also holds the bound index buffer),
/// and the active program. `Context` mirrors that state so every wrapper can
/// check the call-ordering contract before talking to the device, and owns the
/// registry of live driver objects so a released object can never be
/// addressed again.

use std::cell::{RefCell, RefMut};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use glam::Vec4;
use slotmap::{new_key_type, SlotMap};
use crate::error::Result;
use crate::engine_invalid;
use crate::graphics_device::{
    GraphicsDevice, RawHandle, ShaderKind, BufferKind, BufferUsage, IndexType,
    PrimitiveTopology, PolygonMode, ClearFlags, UniformValue, VertexAttribute,
};

const SOURCE: &str = "prism::Context";

new_key_type! {
    /// Key of a live shader stage
    pub struct ShaderKey;
    /// Key of a live program
    pub struct ProgramKey;
    /// Key of a live data buffer
    pub struct BufferKey;
    /// Key of a live vertex array
    pub struct VertexArrayKey;
}

/// Number of live driver objects per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceCounts {
    pub shaders: usize,
    pub programs: usize,
    pub buffers: usize,
    pub vertex_arrays: usize,
}

impl ResourceCounts {
    /// Sum over all kinds
    pub fn total(&self) -> usize {
        self.shaders + self.programs + self.buffers + self.vertex_arrays
    }
}

/// An attribute layout as recorded by a vertex array, with the buffer it reads from
///
/// The vertex array does not own `buffer`; the association is only meaningful
/// while that buffer stays alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedAttribute {
    pub attribute: VertexAttribute,
    pub buffer: BufferKey,
}

// ===== INTERNAL STATE =====

struct ShaderRecord {
    raw: RawHandle,
    kind: ShaderKind,
}

struct ProgramRecord {
    raw: RawHandle,
    linked: bool,
}

struct BufferRecord {
    raw: RawHandle,
    kind: BufferKind,
    size: u64,
}

struct VertexArrayRecord {
    raw: RawHandle,
    /// Index buffer captured while this array was bound
    index_buffer: Option<BufferKey>,
    attributes: BTreeMap<u32, RecordedAttribute>,
}

#[derive(Default)]
struct Bindings {
    vertex_buffer: Option<BufferKey>,
    /// Index buffer binding of the default (zero) vertex array
    default_index_buffer: Option<BufferKey>,
    vertex_array: Option<VertexArrayKey>,
    program: Option<ProgramKey>,
}

#[derive(Default)]
struct ContextState {
    shaders: SlotMap<ShaderKey, ShaderRecord>,
    programs: SlotMap<ProgramKey, ProgramRecord>,
    buffers: SlotMap<BufferKey, BufferRecord>,
    vertex_arrays: SlotMap<VertexArrayKey, VertexArrayRecord>,
    bindings: Bindings,
}

impl ContextState {
    fn bound_index_buffer(&self) -> Option<BufferKey> {
        match self.bindings.vertex_array {
            Some(vao) => self.vertex_arrays.get(vao).and_then(|r| r.index_buffer),
            None => self.bindings.default_index_buffer,
        }
    }

    fn set_bound_index_buffer(&mut self, buffer: Option<BufferKey>) {
        match self.bindings.vertex_array {
            Some(vao) => {
                if let Some(record) = self.vertex_arrays.get_mut(vao) {
                    record.index_buffer = buffer;
                }
            }
            None => self.bindings.default_index_buffer = buffer,
        }
    }

    fn bound_buffer(&self, kind: BufferKind) -> Option<BufferKey> {
        match kind {
            BufferKind::Vertex => self.bindings.vertex_buffer,
            BufferKind::Index => self.bound_index_buffer(),
        }
    }
}

struct ContextInner {
    device: RefCell<Box<dyn GraphicsDevice>>,
    state: RefCell<ContextState>,
}

// ===== PUBLIC API =====

/// Shared handle to one graphics context
///
/// Cloning is cheap; every resource wrapper keeps a clone so it can release
/// its driver object when dropped. Single-threaded: the context is only ever
/// used on the thread that owns the rendering context.
#[derive(Clone)]
pub struct Context {
    inner: Rc<ContextInner>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("live", &self.live_resources())
            .finish()
    }
}

impl Context {
    /// Wrap a device
    pub fn new<D: GraphicsDevice + 'static>(device: D) -> Self {
        Self::from_boxed(Box::new(device))
    }

    /// Wrap an already boxed device
    pub fn from_boxed(device: Box<dyn GraphicsDevice>) -> Self {
        Self {
            inner: Rc::new(ContextInner {
                device: RefCell::new(device),
                state: RefCell::new(ContextState::default()),
            }),
        }
    }

    fn device(&self) -> RefMut<'_, Box<dyn GraphicsDevice>> {
        self.inner.device.borrow_mut()
    }

    fn state(&self) -> RefMut<'_, ContextState> {
        self.inner.state.borrow_mut()
    }

    /// Whether two handles refer to the same context
    pub fn same_context(&self, other: &Context) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // ===== QUERIES =====

    /// Count of live driver objects created through this context
    pub fn live_resources(&self) -> ResourceCounts {
        let state = self.inner.state.borrow();
        ResourceCounts {
            shaders: state.shaders.len(),
            programs: state.programs.len(),
            buffers: state.buffers.len(),
            vertex_arrays: state.vertex_arrays.len(),
        }
    }

    /// Currently active program
    pub fn current_program(&self) -> Option<ProgramKey> {
        self.inner.state.borrow().bindings.program
    }

    /// Currently bound vertex array
    pub fn bound_vertex_array(&self) -> Option<VertexArrayKey> {
        self.inner.state.borrow().bindings.vertex_array
    }

    /// Buffer currently bound to the target of `kind`
    ///
    /// For index data this is the buffer recorded in the bound vertex array.
    pub fn bound_buffer(&self, kind: BufferKind) -> Option<BufferKey> {
        self.inner.state.borrow().bound_buffer(kind)
    }

    // ===== SHADER STAGES =====

    pub(crate) fn create_shader(&self, kind: ShaderKind) -> Result<ShaderKey> {
        let raw = self.device().create_shader(kind)?;
        let key = self.state().shaders.insert(ShaderRecord { raw, kind });
        crate::engine_trace!(SOURCE, "create_shader {:?} -> {:?}", kind, raw);
        Ok(key)
    }

    fn shader_raw(&self, key: ShaderKey) -> Result<RawHandle> {
        self.inner.state.borrow().shaders.get(key)
            .map(|r| r.raw)
            .ok_or_else(|| engine_invalid!(SOURCE, "Shader stage has been released"))
    }

    /// Submit and compile; returns the compile status
    pub(crate) fn compile_shader(&self, key: ShaderKey, source: &str) -> Result<bool> {
        let raw = self.shader_raw(key)?;
        let mut device = self.device();
        device.compile_shader(raw, source);
        Ok(device.shader_compile_status(raw))
    }

    pub(crate) fn shader_info_log(&self, key: ShaderKey) -> Result<String> {
        let raw = self.shader_raw(key)?;
        Ok(self.device().shader_info_log(raw))
    }

    pub(crate) fn shader_kind(&self, key: ShaderKey) -> Option<ShaderKind> {
        self.inner.state.borrow().shaders.get(key).map(|r| r.kind)
    }

    /// Release a stage; returns false if it was already released
    pub(crate) fn release_shader(&self, key: ShaderKey) -> bool {
        let removed = self.state().shaders.remove(key);
        match removed {
            Some(record) => {
                self.device().delete_shader(record.raw);
                crate::engine_trace!(SOURCE, "delete_shader {:?}", record.raw);
                true
            }
            None => false,
        }
    }

    // ===== PROGRAMS =====

    pub(crate) fn create_program(&self) -> Result<ProgramKey> {
        let raw = self.device().create_program()?;
        let key = self.state().programs.insert(ProgramRecord { raw, linked: false });
        crate::engine_trace!(SOURCE, "create_program -> {:?}", raw);
        Ok(key)
    }

    fn program_raw(&self, key: ProgramKey) -> Result<RawHandle> {
        self.inner.state.borrow().programs.get(key)
            .map(|r| r.raw)
            .ok_or_else(|| engine_invalid!(SOURCE, "Program has been released"))
    }

    pub(crate) fn attach_shader(&self, program: ProgramKey, shader: ShaderKey) -> Result<()> {
        let program_raw = self.program_raw(program)?;
        let shader_raw = self.shader_raw(shader)?;
        self.device().attach_shader(program_raw, shader_raw);
        Ok(())
    }

    pub(crate) fn detach_shader(&self, program: ProgramKey, shader: ShaderKey) -> Result<()> {
        let program_raw = self.program_raw(program)?;
        let shader_raw = self.shader_raw(shader)?;
        self.device().detach_shader(program_raw, shader_raw);
        Ok(())
    }

    /// Link; returns the link status
    pub(crate) fn link_program(&self, key: ProgramKey) -> Result<bool> {
        let raw = self.program_raw(key)?;
        let linked = {
            let mut device = self.device();
            device.link_program(raw);
            device.program_link_status(raw)
        };
        if let Some(record) = self.state().programs.get_mut(key) {
            record.linked = linked;
        }
        Ok(linked)
    }

    pub(crate) fn program_info_log(&self, key: ProgramKey) -> Result<String> {
        let raw = self.program_raw(key)?;
        Ok(self.device().program_info_log(raw))
    }

    /// Make a program current; returns false when it already was (no device call)
    pub(crate) fn use_program(&self, key: ProgramKey) -> Result<bool> {
        let (raw, linked) = {
            let state = self.inner.state.borrow();
            let record = state.programs.get(key)
                .ok_or_else(|| engine_invalid!(SOURCE, "Cannot activate a released program"))?;
            (record.raw, record.linked)
        };
        if !linked {
            return Err(engine_invalid!(SOURCE, "Cannot activate a program that is not linked"));
        }
        if self.current_program() == Some(key) {
            return Ok(false);
        }
        self.device().use_program(Some(raw));
        self.state().bindings.program = Some(key);
        Ok(true)
    }

    /// Clear the current program
    pub fn clear_program(&self) {
        if self.current_program().is_some() {
            self.device().use_program(None);
            self.state().bindings.program = None;
        }
    }

    pub(crate) fn uniform_location(&self, key: ProgramKey, name: &str) -> Result<Option<RawHandle>> {
        let raw = self.program_raw(key)?;
        Ok(self.device().uniform_location(raw, name))
    }

    /// Upload a uniform; `program` must be the current program
    pub(crate) fn set_uniform(&self, program: ProgramKey, location: RawHandle, value: UniformValue) -> Result<()> {
        self.program_raw(program)?;
        if self.current_program() != Some(program) {
            return Err(engine_invalid!(SOURCE, "Uniforms can only be set on the active program"));
        }
        self.device().set_uniform(location, value);
        Ok(())
    }

    pub(crate) fn release_program(&self, key: ProgramKey) -> bool {
        let removed = {
            let mut state = self.state();
            let removed = state.programs.remove(key);
            if removed.is_some() && state.bindings.program == Some(key) {
                state.bindings.program = None;
            }
            removed
        };
        match removed {
            Some(record) => {
                self.device().delete_program(record.raw);
                crate::engine_trace!(SOURCE, "delete_program {:?}", record.raw);
                true
            }
            None => false,
        }
    }

    // ===== BUFFERS =====

    pub(crate) fn create_buffer(&self, kind: BufferKind) -> Result<BufferKey> {
        let raw = self.device().create_buffer()?;
        let key = self.state().buffers.insert(BufferRecord { raw, kind, size: 0 });
        crate::engine_trace!(SOURCE, "create_buffer {:?} -> {:?}", kind, raw);
        Ok(key)
    }

    fn buffer_record(&self, key: BufferKey) -> Result<(RawHandle, BufferKind, u64)> {
        self.inner.state.borrow().buffers.get(key)
            .map(|r| (r.raw, r.kind, r.size))
            .ok_or_else(|| engine_invalid!(SOURCE, "Buffer has been destroyed"))
    }

    /// Whether the buffer is still registered
    pub fn is_buffer_alive(&self, key: BufferKey) -> bool {
        self.inner.state.borrow().buffers.contains_key(key)
    }

    /// Byte length of the last upload
    pub fn buffer_size(&self, key: BufferKey) -> Result<u64> {
        self.buffer_record(key).map(|(_, _, size)| size)
    }

    /// Bind a buffer to the target of its kind
    ///
    /// Binding index data while a vertex array is bound records the buffer in
    /// that vertex array.
    pub(crate) fn bind_buffer(&self, key: BufferKey) -> Result<()> {
        let (raw, kind, _) = self.buffer_record(key)?;
        if self.bound_buffer(kind) == Some(key) {
            return Ok(());
        }
        self.device().bind_buffer(kind, Some(raw));
        let mut state = self.state();
        match kind {
            BufferKind::Vertex => state.bindings.vertex_buffer = Some(key),
            BufferKind::Index => state.set_bound_index_buffer(Some(key)),
        }
        Ok(())
    }

    /// Rebind a previously captured binding (`None` unbinds)
    pub(crate) fn restore_buffer_binding(&self, kind: BufferKind, previous: Option<BufferKey>) -> Result<()> {
        match previous {
            Some(key) if self.is_buffer_alive(key) => self.bind_buffer(key),
            _ => {
                self.unbind_buffer(kind);
                Ok(())
            }
        }
    }

    /// Put `previous` back as the index buffer of `owner` (`None` = default vertex array)
    ///
    /// When another vertex array is bound by now, `owner` is bound for the
    /// restore and the current array is rebound afterwards. Nothing happens if
    /// `owner` has been released.
    pub(crate) fn restore_index_buffer_binding(
        &self,
        owner: Option<VertexArrayKey>,
        previous: Option<BufferKey>,
    ) -> Result<()> {
        let current = self.bound_vertex_array();
        if current == owner {
            return self.restore_buffer_binding(BufferKind::Index, previous);
        }
        if owner.is_some_and(|vao| !self.is_vertex_array_alive(vao)) {
            return Ok(());
        }
        self.restore_vertex_array_binding(owner)?;
        let restored = self.restore_buffer_binding(BufferKind::Index, previous);
        self.restore_vertex_array_binding(current)?;
        restored
    }

    /// Unbind whatever buffer is bound to the target of `kind`
    pub(crate) fn unbind_buffer(&self, kind: BufferKind) {
        if self.bound_buffer(kind).is_none() {
            return;
        }
        if kind == BufferKind::Index && self.bound_vertex_array().is_some() {
            crate::engine_debug!(SOURCE, "Index buffer detached from the bound vertex array");
        }
        self.device().bind_buffer(kind, None);
        let mut state = self.state();
        match kind {
            BufferKind::Vertex => state.bindings.vertex_buffer = None,
            BufferKind::Index => state.set_bound_index_buffer(None),
        }
    }

    /// Upload data into a buffer; the buffer must be bound
    pub(crate) fn upload_buffer(&self, key: BufferKey, data: &[u8], usage: BufferUsage) -> Result<()> {
        let (_, kind, _) = self.buffer_record(key)?;
        if self.bound_buffer(kind) != Some(key) {
            return Err(engine_invalid!(SOURCE, "Buffer must be bound before uploading data"));
        }
        self.device().buffer_data(kind, data, usage);
        if let Some(record) = self.state().buffers.get_mut(key) {
            record.size = data.len() as u64;
        }
        Ok(())
    }

    /// Release a buffer; every binding and index-buffer record pointing at it is cleared
    pub(crate) fn release_buffer(&self, key: BufferKey) -> bool {
        let removed = {
            let mut state = self.state();
            let removed = state.buffers.remove(key);
            if removed.is_some() {
                if state.bindings.vertex_buffer == Some(key) {
                    state.bindings.vertex_buffer = None;
                }
                if state.bindings.default_index_buffer == Some(key) {
                    state.bindings.default_index_buffer = None;
                }
                for (_, vao) in state.vertex_arrays.iter_mut() {
                    if vao.index_buffer == Some(key) {
                        vao.index_buffer = None;
                    }
                }
            }
            removed
        };
        match removed {
            Some(record) => {
                self.device().delete_buffer(record.raw);
                crate::engine_trace!(SOURCE, "delete_buffer {:?}", record.raw);
                true
            }
            None => false,
        }
    }

    // ===== VERTEX ARRAYS =====

    pub(crate) fn create_vertex_array(&self) -> Result<VertexArrayKey> {
        let raw = self.device().create_vertex_array()?;
        let key = self.state().vertex_arrays.insert(VertexArrayRecord {
            raw,
            index_buffer: None,
            attributes: BTreeMap::new(),
        });
        crate::engine_trace!(SOURCE, "create_vertex_array -> {:?}", raw);
        Ok(key)
    }

    fn vertex_array_raw(&self, key: VertexArrayKey) -> Result<RawHandle> {
        self.inner.state.borrow().vertex_arrays.get(key)
            .map(|r| r.raw)
            .ok_or_else(|| engine_invalid!(SOURCE, "Vertex array has been destroyed"))
    }

    /// Whether the vertex array is still registered
    pub fn is_vertex_array_alive(&self, key: VertexArrayKey) -> bool {
        self.inner.state.borrow().vertex_arrays.contains_key(key)
    }

    pub(crate) fn bind_vertex_array(&self, key: VertexArrayKey) -> Result<()> {
        let raw = self.vertex_array_raw(key)?;
        if self.bound_vertex_array() == Some(key) {
            return Ok(());
        }
        self.device().bind_vertex_array(Some(raw));
        self.state().bindings.vertex_array = Some(key);
        Ok(())
    }

    pub(crate) fn restore_vertex_array_binding(&self, previous: Option<VertexArrayKey>) -> Result<()> {
        match previous {
            Some(key) if self.is_vertex_array_alive(key) => self.bind_vertex_array(key),
            _ => {
                self.unbind_vertex_array();
                Ok(())
            }
        }
    }

    pub(crate) fn unbind_vertex_array(&self) {
        if self.bound_vertex_array().is_none() {
            return;
        }
        self.device().bind_vertex_array(None);
        self.state().bindings.vertex_array = None;
    }

    /// Record an attribute layout for `vertex_array` against the bound vertex buffer
    pub(crate) fn set_vertex_attribute(&self, vertex_array: VertexArrayKey, attribute: VertexAttribute) -> Result<()> {
        self.vertex_array_raw(vertex_array)?;
        if self.bound_vertex_array() != Some(vertex_array) {
            return Err(engine_invalid!(SOURCE, "Vertex array must be bound before configuring attribute {}", attribute.slot));
        }
        let buffer = self.bound_buffer(BufferKind::Vertex)
            .ok_or_else(|| engine_invalid!(SOURCE, "No vertex buffer bound while configuring attribute {}", attribute.slot))?;
        if !(1..=4).contains(&attribute.components) {
            return Err(engine_invalid!(SOURCE, "Attribute {} has {} components (expected 1..=4)", attribute.slot, attribute.components));
        }
        let end = attribute.offset.checked_add(attribute.size_bytes()).ok_or_else(|| {
            engine_invalid!(SOURCE, "Attribute {} offset {} is out of range", attribute.slot, attribute.offset)
        })?;
        if attribute.stride != 0 && end > attribute.stride {
            return Err(engine_invalid!(
                SOURCE,
                "Attribute {} (offset {}, {} bytes) does not fit in stride {}",
                attribute.slot, attribute.offset, attribute.size_bytes(), attribute.stride
            ));
        }
        {
            let mut device = self.device();
            device.vertex_attrib_pointer(&attribute);
            device.enable_vertex_attrib_array(attribute.slot);
        }
        if let Some(record) = self.state().vertex_arrays.get_mut(vertex_array) {
            record.attributes.insert(attribute.slot, RecordedAttribute { attribute, buffer });
        }
        Ok(())
    }

    /// Attribute layouts recorded in a vertex array, ordered by slot
    pub fn vertex_array_attributes(&self, key: VertexArrayKey) -> Result<Vec<RecordedAttribute>> {
        let state = self.inner.state.borrow();
        let record = state.vertex_arrays.get(key)
            .ok_or_else(|| engine_invalid!(SOURCE, "Vertex array has been destroyed"))?;
        Ok(record.attributes.values().copied().collect())
    }

    /// Index buffer recorded in a vertex array
    pub fn vertex_array_index_buffer(&self, key: VertexArrayKey) -> Result<Option<BufferKey>> {
        let state = self.inner.state.borrow();
        let record = state.vertex_arrays.get(key)
            .ok_or_else(|| engine_invalid!(SOURCE, "Vertex array has been destroyed"))?;
        Ok(record.index_buffer)
    }

    pub(crate) fn release_vertex_array(&self, key: VertexArrayKey) -> bool {
        let removed = {
            let mut state = self.state();
            let removed = state.vertex_arrays.remove(key);
            if removed.is_some() && state.bindings.vertex_array == Some(key) {
                state.bindings.vertex_array = None;
            }
            removed
        };
        match removed {
            Some(record) => {
                self.device().delete_vertex_array(record.raw);
                crate::engine_trace!(SOURCE, "delete_vertex_array {:?}", record.raw);
                true
            }
            None => false,
        }
    }

    // ===== FRAME =====

    /// Set the viewport to `width` x `height` at the origin
    pub fn set_viewport(&self, width: u32, height: u32) {
        self.device().viewport(0, 0, width, height);
    }

    /// Clear the colour target to `color`
    pub fn clear(&self, color: Vec4) {
        let mut device = self.device();
        device.clear_color(color.x, color.y, color.z, color.w);
        device.clear(ClearFlags::COLOR);
    }

    /// Set the polygon rasterization mode
    pub fn set_polygon_mode(&self, mode: PolygonMode) {
        self.device().polygon_mode(mode);
    }

    /// Check the bindings a draw depends on; returns the bound vertex array
    fn validate_draw(&self) -> Result<VertexArrayKey> {
        let state = self.inner.state.borrow();
        if state.bindings.program.is_none() {
            return Err(engine_invalid!(SOURCE, "Draw issued without an active program"));
        }
        let vao = state.bindings.vertex_array
            .ok_or_else(|| engine_invalid!(SOURCE, "Draw issued without a bound vertex array"))?;
        if let Some(record) = state.vertex_arrays.get(vao) {
            for recorded in record.attributes.values() {
                if !state.buffers.contains_key(recorded.buffer) {
                    return Err(engine_invalid!(
                        SOURCE,
                        "Vertex buffer of attribute {} was destroyed",
                        recorded.attribute.slot
                    ));
                }
            }
        }
        Ok(vao)
    }

    /// Non-indexed draw from the bound vertex array
    pub fn draw_arrays(&self, topology: PrimitiveTopology, first: u32, count: u32) -> Result<()> {
        self.validate_draw()?;
        self.device().draw_arrays(topology, first, count);
        crate::engine_trace!(SOURCE, "draw_arrays {:?} first={} count={}", topology, first, count);
        Ok(())
    }

    /// Indexed draw using the index buffer recorded in the bound vertex array
    pub fn draw_elements(
        &self,
        topology: PrimitiveTopology,
        count: u32,
        index_type: IndexType,
        byte_offset: u32,
    ) -> Result<()> {
        let vao = self.validate_draw()?;
        let index_buffer = self.vertex_array_index_buffer(vao)?
            .ok_or_else(|| engine_invalid!(SOURCE, "Indexed draw without an index buffer in the bound vertex array"))?;
        let size = self.buffer_size(index_buffer)?;
        let needed = byte_offset as u64 + count as u64 * index_type.size_bytes() as u64;
        if needed > size {
            return Err(engine_invalid!(
                SOURCE,
                "Indexed draw reads {} bytes but the index buffer holds {}",
                needed, size
            ));
        }
        self.device().draw_elements(topology, count, index_type, byte_offset);
        crate::engine_trace!(SOURCE, "draw_elements {:?} count={} {:?}", topology, count, index_type);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
