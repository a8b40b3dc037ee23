//! Two triangles sharing one vertex set, each with its own index buffer and
//! program: one orange, one yellow
//!
//! Usage: hello_triangle_two_programs [VERTEX_SHADER] [ORANGE_FRAGMENT] [YELLOW_FRAGMENT]

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

const ORANGE_SHADER: &str = "#version 330 core
out vec4 color;
void main()
{
    color = vec4(1.0, 0.5, 0.2, 1.0);
}
";

const YELLOW_SHADER: &str = "#version 330 core
out vec4 color;
void main()
{
    color = vec4(1.0, 1.0, 0.6, 1.0);
}
";

const VERTICES: [[f32; 3]; 5] = [
    [0.5, 0.5, 0.0],
    [0.5, -0.5, 0.0],
    [-0.5, -0.5, 0.0],
    [-0.5, 0.5, 0.0],
    [1.0, -0.5, 0.0],
];

const FIRST_TRIANGLE: [u32; 3] = [3, 2, 1];
const SECOND_TRIANGLE: [u32; 3] = [0, 1, 4];

fn main() -> Result<()> {
    run_demo(Config::from_env(), |ctx| {
        let vertex = shader_source_arg(1, ShaderKind::Vertex, VERTEX_SHADER);
        let orange = ShaderProgram::from_sources(
            ctx,
            &vertex,
            &shader_source_arg(2, ShaderKind::Fragment, ORANGE_SHADER),
            None,
        )?;
        let yellow = ShaderProgram::from_sources(
            ctx,
            &vertex,
            &shader_source_arg(3, ShaderKind::Fragment, YELLOW_SHADER),
            None,
        )?;

        let layout = VertexLayout::new().with(3, DataType::Float);
        let first = Geometry::upload(ctx, &VERTICES, &layout, Some(&FIRST_TRIANGLE[..]))?;
        let second = Geometry::upload(ctx, &VERTICES, &layout, Some(&SECOND_TRIANGLE[..]))?;

        Ok(vec![
            DrawItem::new(Rc::new(orange), first),
            DrawItem::new(Rc::new(yellow), second),
        ])
    })
}
