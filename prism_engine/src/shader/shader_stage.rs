/// Compiled shader stage

use crate::error::{Error, Result};
use crate::graphics_device::{Context, ShaderKey, ShaderKind};
use crate::shader::ShaderSource;

const SOURCE: &str = "prism::ShaderStage";

/// One compiled shader stage
///
/// Owns exactly one stage object and releases it when dropped. Stages are
/// consumed by [`crate::shader::ShaderProgram::link`], which releases them
/// once the program no longer needs them.
#[derive(Debug)]
pub struct ShaderStage {
    ctx: Context,
    key: ShaderKey,
    kind: ShaderKind,
}

impl ShaderStage {
    /// Compile `source` into a new stage
    ///
    /// Blank source is rejected before anything is allocated. On a compile
    /// failure the stage is released before the error is returned, so no
    /// usable handle outlives the failure.
    pub fn compile(ctx: &Context, source: &ShaderSource) -> Result<Self> {
        let kind = source.kind();
        if source.is_blank() {
            return Err(crate::engine_invalid!(SOURCE, "{} shader source is empty", kind.label()));
        }

        let key = ctx.create_shader(kind)?;
        let stage = Self {
            ctx: ctx.clone(),
            key,
            kind,
        };

        if !ctx.compile_shader(key, source.text())? {
            let log = ctx.shader_info_log(key)?;
            drop(stage);
            let err = Error::CompileFailed { stage: kind, log };
            crate::engine_error!(SOURCE, "{}", err);
            return Err(err);
        }

        crate::engine_debug!(SOURCE, "{} shader compiled", kind.label());
        Ok(stage)
    }

    /// Stage kind
    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    pub(crate) fn key(&self) -> ShaderKey {
        self.key
    }

    pub(crate) fn belongs_to(&self, ctx: &Context) -> bool {
        self.ctx.same_context(ctx)
    }

    /// Whether the stage object is still alive
    pub fn is_alive(&self) -> bool {
        self.ctx.shader_kind(self.key).is_some()
    }
}

impl Drop for ShaderStage {
    fn drop(&mut self) {
        self.ctx.release_shader(self.key);
    }
}

#[cfg(test)]
#[path = "shader_stage_tests.rs"]
mod tests;
