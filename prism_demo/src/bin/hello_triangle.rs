//! Orange triangle drawn from a vertex buffer without indices
//!
//! Usage: hello_triangle [VERTEX_SHADER] [FRAGMENT_SHADER]

use std::rc::Rc;
use prism_demo::{run_demo, shader_source_arg};
use prism_engine::prism::{
    Config, DataType, DrawItem, Geometry, Result, ShaderKind, ShaderProgram, VertexLayout,
};

const VERTEX_SHADER: &str = "#version 330 core
layout (location = 0) in vec3 position;
void main()
{
    gl_Position = vec4(position.x, position.y, position.z, 1.0);
}
";

const FRAGMENT_SHADER: &str = "#version 330 core
out vec4 color;
void main()
{
    color = vec4(1.0, 0.5, 0.2, 1.0);
}
";

const VERTICES: [[f32; 3]; 3] = [
    [-0.5, -0.5, 0.0],
    [0.5, -0.5, 0.0],
    [0.0, 0.5, 0.0],
];

fn main() -> Result<()> {
    run_demo(Config::from_env(), |ctx| {
        let program = ShaderProgram::from_sources(
            ctx,
            &shader_source_arg(1, ShaderKind::Vertex, VERTEX_SHADER),
            &shader_source_arg(2, ShaderKind::Fragment, FRAGMENT_SHADER),
            None,
        )?;
        let layout = VertexLayout::new().with(3, DataType::Float);
        let geometry = Geometry::upload(ctx, &VERTICES, &layout, None)?;
        Ok(vec![DrawItem::new(Rc::new(program), geometry)])
    })
}
