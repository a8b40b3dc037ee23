//! Triangle whose colour pulses between black and green through a uniform
//!
//! Usage: shaders_uniform [VERTEX_SHADER] [FRAGMENT_SHADER]

use std::rc::Rc;
use prism_demo::{run_demo, shader_source_arg};
use prism_engine::prism::{
    green_pulse, Config, DataType, DrawItem, Geometry, Result, ShaderKind, ShaderProgram,
    VertexLayout,
};

const VERTEX_SHADER: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
void main()
{
   gl_Position = vec4(aPos, 1.0);
}
";

const FRAGMENT_SHADER: &str = "#version 330 core
out vec4 color;
uniform vec4 ourColor;
void main()
{
    color = ourColor;
}
";

const VERTICES: [[f32; 3]; 3] = [
    [0.5, -0.5, 0.0],
    [-0.5, -0.5, 0.0],
    [0.0, 0.5, 0.0],
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
        let layout = VertexLayout::new().with(3, DataType::Float);
        let geometry = Geometry::upload(ctx, &VERTICES, &layout, Some(&INDICES[..]))?;
        let item = DrawItem::new(Rc::new(program), geometry).with_uniform("ourColor", green_pulse());
        Ok(vec![item])
    })
}
