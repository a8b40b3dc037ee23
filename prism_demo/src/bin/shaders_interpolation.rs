//! Triangle with a colour per vertex, interpolated across the face
//!
//! Positions and colours are interleaved in one vertex buffer.
//!
//! Usage: shaders_interpolation [VERTEX_SHADER] [FRAGMENT_SHADER]

use std::rc::Rc;
use prism_demo::{run_demo, shader_source_arg};
use prism_engine::prism::{
    Config, DataType, DrawItem, Geometry, Result, ShaderKind, ShaderProgram, VertexLayout,
};

const VERTEX_SHADER: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
layout (location = 1) in vec3 aColor;
out vec3 ourColor;
void main()
{
   gl_Position = vec4(aPos, 1.0);
   ourColor = aColor;
}
";

const FRAGMENT_SHADER: &str = "#version 330 core
out vec4 color;
in vec3 ourColor;
void main()
{
    color = vec4(ourColor, 1.0);
}
";

// x, y, z, r, g, b
const VERTICES: [[f32; 6]; 3] = [
    [0.5, -0.5, 0.0, 1.0, 0.0, 0.0],
    [-0.5, -0.5, 0.0, 0.0, 1.0, 0.0],
    [0.0, 0.5, 0.0, 0.0, 0.0, 1.0],
];

const INDICES: [u32; 3] = [0, 1, 2];

fn main() -> Result<()> {
    run_demo(Config::from_env(), |ctx| {
        let program = ShaderProgram::from_sources(
            ctx,
            &shader_source_arg(1, ShaderKind::Vertex, VERTEX_SHADER),
            &shader_source_arg(2, ShaderKind::Fragment, FRAGMENT_SHADER),
            None,
        )?;
        let layout = VertexLayout::new()
            .with(3, DataType::Float)
            .with(3, DataType::Float);
        let geometry = Geometry::upload(ctx, &VERTICES, &layout, Some(&INDICES[..]))?;
        Ok(vec![DrawItem::new(Rc::new(program), geometry)])
    })
}
