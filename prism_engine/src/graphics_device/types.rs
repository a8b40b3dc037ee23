/// Value types exchanged with a graphics device

use bitflags::bitflags;
use glam::{Mat4, Vec2, Vec3, Vec4};

/// Opaque driver-side object name
///
/// Backends map their native handles to and from this value. The core never
/// interprets it beyond equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawHandle(pub u32);

/// Shader stage kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Vertex shader
    Vertex,
    /// Fragment shader
    Fragment,
    /// Geometry shader (optional stage)
    Geometry,
}

impl ShaderKind {
    /// Upper-case label used in diagnostics ("VERTEX", "FRAGMENT", "GEOMETRY")
    pub fn label(&self) -> &'static str {
        match self {
            ShaderKind::Vertex => "VERTEX",
            ShaderKind::Fragment => "FRAGMENT",
            ShaderKind::Geometry => "GEOMETRY",
        }
    }
}

/// What a data buffer holds, which decides the binding target it uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Per-vertex attribute data (array buffer)
    Vertex,
    /// Element indices (element array buffer)
    Index,
}

/// Upload usage hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Uploaded once, drawn many times
    StaticDraw,
    /// Updated occasionally
    DynamicDraw,
    /// Updated every frame
    StreamDraw,
}

/// Scalar type of a vertex attribute component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Float,
    Int,
    UnsignedInt,
    Short,
    UnsignedShort,
    Byte,
    UnsignedByte,
}

impl DataType {
    /// Size in bytes of one component
    pub fn size_bytes(&self) -> u32 {
        match self {
            DataType::Float | DataType::Int | DataType::UnsignedInt => 4,
            DataType::Short | DataType::UnsignedShort => 2,
            DataType::Byte | DataType::UnsignedByte => 1,
        }
    }

    /// Whether the component is read as a float in the shader
    pub fn is_float(&self) -> bool {
        matches!(self, DataType::Float)
    }
}

/// Index buffer element type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    /// 8-bit indices
    U8,
    /// 16-bit indices (max 65535 vertices)
    U16,
    /// 32-bit indices
    U32,
}

impl IndexType {
    /// Size in bytes of one index element
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U8 => 1,
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

/// Primitive assembly mode for draw calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    Triangles,
    TriangleStrip,
    Lines,
    LineStrip,
    Points,
}

impl PrimitiveTopology {
    /// Number of whole triangles produced by `count` vertices
    pub fn triangle_count(&self, count: u32) -> u32 {
        match self {
            PrimitiveTopology::Triangles => count / 3,
            PrimitiveTopology::TriangleStrip => count.saturating_sub(2),
            _ => 0,
        }
    }
}

/// Polygon rasterization mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonMode {
    /// Fill polygons
    Fill,
    /// Draw edges only (wireframe)
    Line,
    /// Draw vertices only
    Point,
}

bitflags! {
    /// Render target planes cleared by `clear`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearFlags: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

/// Value uploaded to a shader uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

/// Layout of one vertex attribute slot, as recorded in a vertex array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Attribute location in the shader (`layout (location = N)`)
    pub slot: u32,
    /// Components per vertex (1..=4)
    pub components: u32,
    /// Component scalar type
    ///
    /// Integer types are converted to floats for the shader (`vec` inputs),
    /// scaled to [0, 1] / [-1, 1] when `normalized` is set.
    pub data_type: DataType,
    /// Normalize integer data to [0, 1] / [-1, 1]
    pub normalized: bool,
    /// Bytes between consecutive vertices
    pub stride: u32,
    /// Byte offset of the first component inside a vertex
    pub offset: u32,
}

impl VertexAttribute {
    /// Bytes occupied by this attribute in one vertex (saturates)
    pub fn size_bytes(&self) -> u32 {
        self.components.saturating_mul(self.data_type.size_bytes())
    }
}
