//! Uploaded geometry: one vertex array with its vertex buffer and optional
//! index buffer.
//!
//! # Upload order
//!
//! ```text
//! VertexArray::new      (bound)
//! vertex Buffer         (bound, uploaded)
//! index Buffer          (bound while the array is bound -> recorded in it)
//! apply layout          (attributes read from the bound vertex buffer)
//! unbind vertex buffer
//! unbind vertex array
//! unbind index buffer   (default slot only, the array keeps its record)
//! ```

use bytemuck::Pod;
use crate::error::Result;
use crate::graphics_device::{BufferKind, Context, IndexType, PrimitiveTopology};
use crate::resource::{Buffer, VertexArray, VertexLayout};

const SOURCE: &str = "prism::Geometry";

/// How the geometry is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    /// Non-indexed draw of `count` vertices starting at `first`
    Arrays { first: u32, count: u32 },
    /// Indexed draw of `count` indices from the recorded index buffer
    Elements { count: u32, index_type: IndexType },
}

impl DrawCommand {
    /// Vertices (or indices) consumed by one draw
    pub fn element_count(&self) -> u32 {
        match self {
            DrawCommand::Arrays { count, .. } => *count,
            DrawCommand::Elements { count, .. } => *count,
        }
    }
}

/// Vertex array plus the buffers it reads from
///
/// Fields are declared in reverse acquisition order so an implicit drop also
/// releases the index buffer first and the vertex array last.
#[derive(Debug)]
pub struct Geometry {
    index_buffer: Option<Buffer>,
    vertex_buffer: Buffer,
    vertex_array: VertexArray,
    draw: DrawCommand,
}

impl Geometry {
    /// Upload interleaved `vertices` described by `layout`, with optional
    /// 32-bit `indices`
    pub fn upload<T: Pod>(
        ctx: &Context,
        vertices: &[T],
        layout: &VertexLayout,
        indices: Option<&[u32]>,
    ) -> Result<Self> {
        layout.validate()?;
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        let stride = layout.stride() as usize;
        if bytes.is_empty() || bytes.len() % stride != 0 {
            return Err(crate::engine_invalid!(
                SOURCE,
                "{} bytes of vertex data is not a whole number of {}-byte vertices",
                bytes.len(),
                stride
            ));
        }
        let vertex_count = (bytes.len() / stride) as u32;

        if let Some(indices) = indices {
            if indices.is_empty() {
                return Err(crate::engine_invalid!(SOURCE, "Index list is empty"));
            }
            if let Some(bad) = indices.iter().find(|&&i| i >= vertex_count) {
                return Err(crate::engine_invalid!(
                    SOURCE,
                    "Index {} out of range for {} vertices",
                    bad,
                    vertex_count
                ));
            }
        }

        let vertex_array = VertexArray::new(ctx)?;
        let vertex_buffer = Buffer::new(ctx, BufferKind::Vertex, bytes)?;
        let index_buffer = match indices {
            Some(indices) => Some(Buffer::from_slice(ctx, BufferKind::Index, indices)?),
            None => None,
        };
        vertex_array.apply_layout(layout)?;

        vertex_buffer.unbind()?;
        vertex_array.unbind()?;
        if let Some(index_buffer) = &index_buffer {
            index_buffer.unbind()?;
        }

        let draw = match indices {
            Some(indices) => DrawCommand::Elements {
                count: indices.len() as u32,
                index_type: IndexType::U32,
            },
            None => DrawCommand::Arrays { first: 0, count: vertex_count },
        };

        crate::engine_debug!(SOURCE, "Uploaded {} vertices, draw {:?}", vertex_count, draw);
        Ok(Self {
            index_buffer,
            vertex_buffer,
            vertex_array,
            draw,
        })
    }

    /// Draw command derived at upload
    pub fn draw_command(&self) -> DrawCommand {
        self.draw
    }

    pub fn vertex_array(&self) -> &VertexArray {
        &self.vertex_array
    }

    pub fn vertex_buffer(&self) -> &Buffer {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> Option<&Buffer> {
        self.index_buffer.as_ref()
    }

    /// Issue the draw; the vertex array and a program must be bound
    pub(crate) fn draw(&self, ctx: &Context, topology: PrimitiveTopology) -> Result<()> {
        match self.draw {
            DrawCommand::Arrays { first, count } => ctx.draw_arrays(topology, first, count),
            DrawCommand::Elements { count, index_type } => ctx.draw_elements(topology, count, index_type, 0),
        }
    }

    /// Release the buffers and the vertex array, in reverse order of acquisition
    ///
    /// Objects already destroyed through their own handle are skipped.
    pub fn release(mut self) -> Result<()> {
        if let Some(index_buffer) = self.index_buffer.as_mut().filter(|b| b.is_alive()) {
            index_buffer.destroy()?;
        }
        if self.vertex_buffer.is_alive() {
            self.vertex_buffer.destroy()?;
        }
        if self.vertex_array.is_alive() {
            self.vertex_array.destroy()?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
