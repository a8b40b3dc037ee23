/// Draw items - what the frame driver draws each frame

use std::fmt;
use std::rc::Rc;
use glam::Vec4;
use crate::error::Result;
use crate::graphics_device::{PrimitiveTopology, UniformValue};
use crate::resource::Geometry;
use crate::shader::ShaderProgram;

/// Value fed to a uniform every frame
pub enum UniformSource {
    /// Same value every frame
    Constant(UniformValue),
    /// Computed from the surface time in seconds
    Animated(Box<dyn Fn(f64) -> UniformValue>),
}

impl UniformSource {
    /// Wrap a closure of the surface time
    pub fn animated<F>(f: F) -> Self
    where
        F: Fn(f64) -> UniformValue + 'static,
    {
        UniformSource::Animated(Box::new(f))
    }

    /// Value for a frame drawn at `time`
    pub fn value_at(&self, time: f64) -> UniformValue {
        match self {
            UniformSource::Constant(value) => *value,
            UniformSource::Animated(f) => f(time),
        }
    }
}

impl fmt::Debug for UniformSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniformSource::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            UniformSource::Animated(_) => f.write_str("Animated(..)"),
        }
    }
}

/// Green channel pulsing between 0 and 1: `(0, sin(t) / 2 + 0.5, 0, 1)`
pub fn green_pulse() -> UniformSource {
    UniformSource::animated(|time| {
        let green = (time.sin() / 2.0 + 0.5) as f32;
        UniformValue::Vec4(Vec4::new(0.0, green, 0.0, 1.0))
    })
}

/// One program/geometry pair drawn every frame
///
/// The program is shared so several items can draw with the same one; it is
/// released when the last item holding it goes away.
#[derive(Debug)]
pub struct DrawItem {
    pub(crate) program: Rc<ShaderProgram>,
    pub(crate) geometry: Geometry,
    pub(crate) uniforms: Vec<(String, UniformSource)>,
    pub(crate) topology: PrimitiveTopology,
}

impl DrawItem {
    /// Triangles drawn from `geometry` with `program`
    pub fn new(program: Rc<ShaderProgram>, geometry: Geometry) -> Self {
        Self {
            program,
            geometry,
            uniforms: Vec::new(),
            topology: PrimitiveTopology::Triangles,
        }
    }

    /// Set `name` from `source` before every draw
    pub fn with_uniform(mut self, name: impl Into<String>, source: UniformSource) -> Self {
        self.uniforms.push((name.into(), source));
        self
    }

    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    /// Release the geometry, then this item's share of the program
    pub(crate) fn release(self) -> Result<()> {
        let Self { program, geometry, .. } = self;
        geometry.release()?;
        drop(program);
        Ok(())
    }
}
