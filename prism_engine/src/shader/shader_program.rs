/// Linked shader program
///
/// A program is built from a vertex and a fragment stage, plus an optional
/// geometry stage. Linking consumes the stages: whatever the outcome, every
/// stage object is released before `link` returns, so only the program
/// remains alive.

use std::cell::RefCell;
use rustc_hash::{FxHashMap, FxHashSet};
use crate::error::{Error, Result};
use crate::graphics_device::{Context, ProgramKey, RawHandle, ShaderKind, UniformValue};
use crate::shader::{ShaderSource, ShaderStage};

const SOURCE: &str = "prism::ShaderProgram";

/// Linked program, released when dropped
#[derive(Debug)]
pub struct ShaderProgram {
    ctx: Context,
    key: ProgramKey,
    /// name -> location (`None` = not an active uniform)
    uniform_cache: RefCell<FxHashMap<String, Option<RawHandle>>>,
    /// Unknown uniform names already reported
    warned: RefCell<FxHashSet<String>>,
}

impl ShaderProgram {
    /// Link compiled stages into a program
    ///
    /// Each stage must match its slot. On success the stages are detached and
    /// released. On failure the program is released first, then the stages,
    /// and `Error::LinkFailed` carries the driver log.
    pub fn link(
        ctx: &Context,
        vertex: ShaderStage,
        fragment: ShaderStage,
        geometry: Option<ShaderStage>,
    ) -> Result<Self> {
        let mut stages = vec![(vertex, ShaderKind::Vertex), (fragment, ShaderKind::Fragment)];
        if let Some(stage) = geometry {
            stages.push((stage, ShaderKind::Geometry));
        }

        for (stage, expected) in &stages {
            if stage.kind() != *expected {
                return Err(crate::engine_invalid!(
                    SOURCE,
                    "{} stage passed in the {} slot",
                    stage.kind().label(),
                    expected.label()
                ));
            }
            if !stage.belongs_to(ctx) {
                return Err(crate::engine_invalid!(
                    SOURCE,
                    "{} stage was compiled in another context",
                    stage.kind().label()
                ));
            }
        }

        let key = ctx.create_program()?;
        let program = Self {
            ctx: ctx.clone(),
            key,
            uniform_cache: RefCell::new(FxHashMap::default()),
            warned: RefCell::new(FxHashSet::default()),
        };

        for (stage, _) in &stages {
            ctx.attach_shader(key, stage.key())?;
        }

        if !ctx.link_program(key)? {
            let log = ctx.program_info_log(key)?;
            drop(program);
            drop(stages);
            let err = Error::LinkFailed { log };
            crate::engine_error!(SOURCE, "{}", err);
            return Err(err);
        }

        for (stage, _) in &stages {
            ctx.detach_shader(key, stage.key())?;
        }
        let stage_count = stages.len();
        drop(stages);

        crate::engine_debug!(SOURCE, "Program linked from {} stages", stage_count);
        Ok(program)
    }

    /// Compile each source and link the result
    ///
    /// A failure at any step releases everything allocated so far.
    pub fn from_sources(
        ctx: &Context,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
        geometry: Option<&ShaderSource>,
    ) -> Result<Self> {
        let vertex = ShaderStage::compile(ctx, vertex)?;
        let fragment = ShaderStage::compile(ctx, fragment)?;
        let geometry = match geometry {
            Some(source) => Some(ShaderStage::compile(ctx, source)?),
            None => None,
        };
        Self::link(ctx, vertex, fragment, geometry)
    }

    /// Make this program current
    ///
    /// Calling it again while the program is already current issues nothing.
    pub fn activate(&self) -> Result<()> {
        if self.ctx.use_program(self.key)? {
            crate::engine_trace!(SOURCE, "Program {:?} activated", self.key);
        }
        Ok(())
    }

    /// Whether this program is the current one
    pub fn is_active(&self) -> bool {
        self.ctx.current_program() == Some(self.key)
    }

    pub(crate) fn key(&self) -> ProgramKey {
        self.key
    }

    /// Location of an active uniform, looked up once per name
    pub fn uniform_location(&self, name: &str) -> Result<Option<RawHandle>> {
        if let Some(location) = self.uniform_cache.borrow().get(name) {
            return Ok(*location);
        }
        let location = self.ctx.uniform_location(self.key, name)?;
        self.uniform_cache.borrow_mut().insert(name.to_string(), location);
        Ok(location)
    }

    /// Upload a uniform by name; the program must be current
    ///
    /// A name that is not an active uniform is ignored, as the driver does
    /// for location -1, and reported once.
    pub fn set_uniform(&self, name: &str, value: UniformValue) -> Result<()> {
        if !self.is_active() {
            return Err(crate::engine_invalid!(SOURCE, "Uniform '{}' set on a program that is not active", name));
        }
        match self.uniform_location(name)? {
            Some(location) => self.ctx.set_uniform(self.key, location, value),
            None => {
                if self.warned.borrow_mut().insert(name.to_string()) {
                    crate::engine_warn!(SOURCE, "Uniform '{}' is not active in the program, ignored", name);
                }
                Ok(())
            }
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        self.ctx.release_program(self.key);
    }
}

#[cfg(test)]
#[path = "shader_program_tests.rs"]
mod tests;
