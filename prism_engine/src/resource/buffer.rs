/// GPU data buffer (vertex data or element indices)
///
/// A Buffer owns exactly one buffer object. Creating it allocates, binds and
/// uploads in one step and leaves it bound, the way the tutorials set up
/// their VBO/EBO pairs. Binding and unbinding never reallocate.
///
/// The object is released by `destroy()` or on drop, whichever comes first.
/// After `destroy()` every operation fails with `Error::InvalidResource`.

use bytemuck::Pod;
use crate::error::Result;
use crate::graphics_device::{BufferKey, BufferKind, BufferUsage, Context, VertexArrayKey};

const SOURCE: &str = "prism::Buffer";

/// Owned GPU buffer
#[derive(Debug)]
pub struct Buffer {
    ctx: Context,
    key: BufferKey,
    kind: BufferKind,
}

impl Buffer {
    /// Allocate, bind and upload `data` with `StaticDraw`
    pub fn new(ctx: &Context, kind: BufferKind, data: &[u8]) -> Result<Self> {
        Self::with_usage(ctx, kind, data, BufferUsage::StaticDraw)
    }

    /// Same as [`Buffer::new`] for any plain-old-data slice
    pub fn from_slice<T: Pod>(ctx: &Context, kind: BufferKind, data: &[T]) -> Result<Self> {
        Self::with_usage(ctx, kind, bytemuck::cast_slice(data), BufferUsage::StaticDraw)
    }

    /// Allocate, bind and upload `data` with an explicit usage hint
    pub fn with_usage(ctx: &Context, kind: BufferKind, data: &[u8], usage: BufferUsage) -> Result<Self> {
        let key = ctx.create_buffer(kind)?;
        // Released on drop if binding or upload fails
        let buffer = Self {
            ctx: ctx.clone(),
            key,
            kind,
        };
        ctx.bind_buffer(key)?;
        ctx.upload_buffer(key, data, usage)?;
        crate::engine_debug!(SOURCE, "{:?} buffer created ({} bytes, {:?})", kind, data.len(), usage);
        Ok(buffer)
    }

    /// What the buffer holds
    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    /// Byte length of the uploaded data
    pub fn size(&self) -> Result<u64> {
        self.ctx.buffer_size(self.key)
    }

    /// Whether the buffer object is still alive
    pub fn is_alive(&self) -> bool {
        self.ctx.is_buffer_alive(self.key)
    }

    /// Whether this buffer is bound to the target of its kind
    pub fn is_bound(&self) -> bool {
        self.ctx.bound_buffer(self.kind) == Some(self.key)
    }

    pub(crate) fn key(&self) -> BufferKey {
        self.key
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.is_alive() {
            Ok(())
        } else {
            Err(crate::engine_invalid!(SOURCE, "{:?} buffer used after destroy", self.kind))
        }
    }

    /// Make this buffer the target of its kind
    pub fn bind(&self) -> Result<()> {
        self.ctx.bind_buffer(self.key)
    }

    /// Reset the target of this buffer's kind to nothing
    pub fn unbind(&self) -> Result<()> {
        self.ensure_alive()?;
        self.ctx.unbind_buffer(self.kind);
        Ok(())
    }

    /// Bind for the lifetime of the returned guard
    ///
    /// Dropping the guard restores whatever was bound to this kind's target
    /// before.
    pub fn bind_scoped(&self) -> Result<BufferBinding<'_>> {
        self.ensure_alive()?;
        let previous = self.ctx.bound_buffer(self.kind);
        let owner = self.ctx.bound_vertex_array();
        self.bind()?;
        Ok(BufferBinding {
            ctx: &self.ctx,
            kind: self.kind,
            previous,
            owner,
        })
    }

    /// Release the buffer object now
    pub fn destroy(&mut self) -> Result<()> {
        if self.ctx.release_buffer(self.key) {
            crate::engine_debug!(SOURCE, "{:?} buffer destroyed", self.kind);
            Ok(())
        } else {
            Err(crate::engine_invalid!(SOURCE, "{:?} buffer destroyed twice", self.kind))
        }
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.ctx.release_buffer(self.key);
    }
}

/// Binding guard returned by [`Buffer::bind_scoped`]
#[must_use = "the previous binding is restored as soon as the guard is dropped"]
pub struct BufferBinding<'a> {
    ctx: &'a Context,
    kind: BufferKind,
    previous: Option<BufferKey>,
    /// Vertex array that held `previous` (index kind only)
    owner: Option<VertexArrayKey>,
}

impl Drop for BufferBinding<'_> {
    fn drop(&mut self) {
        let restored = match self.kind {
            BufferKind::Vertex => self.ctx.restore_buffer_binding(self.kind, self.previous),
            BufferKind::Index => self.ctx.restore_index_buffer_binding(self.owner, self.previous),
        };
        if let Err(e) = restored {
            crate::engine_warn!(SOURCE, "Restoring the previous {:?} buffer failed: {}", self.kind, e);
        }
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
