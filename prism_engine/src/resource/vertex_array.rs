/// Vertex array: recorded attribute layout over bound vertex buffers
///
/// Attribute layouts are captured from the vertex buffer bound when
/// `set_attribute` is called. An index buffer bound while the array is bound is
/// recorded in the array and comes back whenever the array is bound again.

use crate::error::Result;
use crate::graphics_device::{
    BufferKey, Context, DataType, RecordedAttribute, VertexArrayKey, VertexAttribute,
};

const SOURCE: &str = "prism::VertexArray";

// ============================================================================
// VERTEX LAYOUT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VertexElement {
    components: u32,
    data_type: DataType,
    normalized: bool,
}

/// Interleaved per-vertex layout, one element per attribute slot
///
/// Slots are numbered in declaration order; offsets and stride are packed.
///
/// ```ignore
/// // position (vec3) + colour (vec3): stride 24, offsets 0 and 12
/// let layout = VertexLayout::new()
///     .with(3, DataType::Float)
///     .with(3, DataType::Float);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexLayout {
    elements: Vec<VertexElement>,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute of `components` values of `data_type`
    pub fn with(mut self, components: u32, data_type: DataType) -> Self {
        self.elements.push(VertexElement { components, data_type, normalized: false });
        self
    }

    /// Append an integer attribute read as normalized floats
    pub fn with_normalized(mut self, components: u32, data_type: DataType) -> Self {
        self.elements.push(VertexElement { components, data_type, normalized: true });
        self
    }

    /// Bytes per vertex (saturating)
    pub fn stride(&self) -> u32 {
        self.elements
            .iter()
            .map(|e| e.components.saturating_mul(e.data_type.size_bytes()))
            .fold(0, u32::saturating_add)
    }

    /// Reject an empty layout or an element outside 1..=4 components
    pub fn validate(&self) -> Result<()> {
        if self.elements.is_empty() {
            return Err(crate::engine_invalid!(SOURCE, "Vertex layout has no attributes"));
        }
        for (slot, element) in self.elements.iter().enumerate() {
            if !(1..=4).contains(&element.components) {
                return Err(crate::engine_invalid!(
                    SOURCE,
                    "Layout slot {} has {} components (expected 1..=4)",
                    slot,
                    element.components
                ));
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of attribute slots
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Concrete attribute descriptions (slot, offset, stride filled in)
    pub fn attributes(&self) -> Vec<VertexAttribute> {
        let stride = self.stride();
        let mut offset = 0;
        self.elements
            .iter()
            .enumerate()
            .map(|(slot, element)| {
                let attribute = VertexAttribute {
                    slot: slot as u32,
                    components: element.components,
                    data_type: element.data_type,
                    normalized: element.normalized,
                    stride,
                    offset,
                };
                offset = offset.saturating_add(attribute.size_bytes());
                attribute
            })
            .collect()
    }
}

// ============================================================================
// VERTEX ARRAY
// ============================================================================

/// Owned vertex array object
#[derive(Debug)]
pub struct VertexArray {
    ctx: Context,
    key: VertexArrayKey,
}

impl VertexArray {
    /// Allocate a vertex array and bind it
    pub fn new(ctx: &Context) -> Result<Self> {
        let key = ctx.create_vertex_array()?;
        let vertex_array = Self { ctx: ctx.clone(), key };
        ctx.bind_vertex_array(key)?;
        Ok(vertex_array)
    }

    /// Whether the vertex array object is still alive
    pub fn is_alive(&self) -> bool {
        self.ctx.is_vertex_array_alive(self.key)
    }

    /// Whether this array is the bound one
    pub fn is_bound(&self) -> bool {
        self.ctx.bound_vertex_array() == Some(self.key)
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.is_alive() {
            Ok(())
        } else {
            Err(crate::engine_invalid!(SOURCE, "Vertex array used after destroy"))
        }
    }

    pub fn bind(&self) -> Result<()> {
        self.ctx.bind_vertex_array(self.key)
    }

    /// Bind the default (zero) vertex array
    pub fn unbind(&self) -> Result<()> {
        self.ensure_alive()?;
        self.ctx.unbind_vertex_array();
        Ok(())
    }

    /// Bind for the lifetime of the returned guard, then restore the previous array
    pub fn bind_scoped(&self) -> Result<VertexArrayBinding<'_>> {
        self.ensure_alive()?;
        let previous = self.ctx.bound_vertex_array();
        self.bind()?;
        Ok(VertexArrayBinding {
            ctx: &self.ctx,
            previous,
        })
    }

    /// Describe attribute `slot` as `components` values of `data_type`
    ///
    /// This array must be bound, and so must the vertex buffer the attribute
    /// reads from. The slot is enabled.
    pub fn set_attribute(
        &self,
        slot: u32,
        components: u32,
        data_type: DataType,
        stride: u32,
        offset: u32,
    ) -> Result<()> {
        self.ctx.set_vertex_attribute(self.key, VertexAttribute {
            slot,
            components,
            data_type,
            normalized: false,
            stride,
            offset,
        })
    }

    /// Configure every slot of `layout` against the bound vertex buffer
    pub fn apply_layout(&self, layout: &VertexLayout) -> Result<()> {
        layout.validate()?;
        for attribute in layout.attributes() {
            self.ctx.set_vertex_attribute(self.key, attribute)?;
        }
        Ok(())
    }

    /// Recorded attribute layouts, ordered by slot
    pub fn attributes(&self) -> Result<Vec<RecordedAttribute>> {
        self.ctx.vertex_array_attributes(self.key)
    }

    /// Index buffer recorded in this array
    pub fn index_buffer(&self) -> Result<Option<BufferKey>> {
        self.ctx.vertex_array_index_buffer(self.key)
    }

    /// Release the vertex array object now
    pub fn destroy(&mut self) -> Result<()> {
        if self.ctx.release_vertex_array(self.key) {
            Ok(())
        } else {
            Err(crate::engine_invalid!(SOURCE, "Vertex array destroyed twice"))
        }
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        self.ctx.release_vertex_array(self.key);
    }
}

/// Binding guard returned by [`VertexArray::bind_scoped`]
#[must_use = "the previous binding is restored as soon as the guard is dropped"]
pub struct VertexArrayBinding<'a> {
    ctx: &'a Context,
    previous: Option<VertexArrayKey>,
}

impl Drop for VertexArrayBinding<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.ctx.restore_vertex_array_binding(self.previous) {
            crate::engine_warn!(SOURCE, "Restoring the previous vertex array failed: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "vertex_array_tests.rs"]
mod tests;
