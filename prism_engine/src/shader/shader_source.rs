/// Shader source text and where it came from

use std::fs;
use std::path::{Path, PathBuf};
use crate::error::{Error, Result};
use crate::graphics_device::ShaderKind;

const SOURCE: &str = "prism::ShaderSource";

/// Where a shader source's text was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    /// Literal text supplied by the caller
    Inline,
    /// Read from a file
    File(PathBuf),
    /// The argument could not be read as a file and was used as literal text
    FallbackInline {
        attempted: PathBuf,
    },
}

/// Source text for one shader stage
#[derive(Debug, Clone)]
pub struct ShaderSource {
    kind: ShaderKind,
    text: String,
    origin: SourceOrigin,
}

impl ShaderSource {
    /// Literal GLSL text
    pub fn inline(kind: ShaderKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            origin: SourceOrigin::Inline,
        }
    }

    /// Read GLSL text from a file
    ///
    /// Any IO failure is reported as `Error::SourceUnavailable`.
    pub fn from_file(kind: ShaderKind, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            let err = Error::SourceUnavailable {
                path: path.display().to_string(),
                reason: e.to_string(),
            };
            crate::engine_warn!(SOURCE, "{}", err);
            err
        })?;
        crate::engine_debug!(SOURCE, "Loaded {} shader from '{}'", kind.label(), path.display());
        Ok(Self {
            kind,
            text,
            origin: SourceOrigin::File(path.to_path_buf()),
        })
    }

    /// Treat `path_or_text` as a file path, falling back to literal text when
    /// it cannot be read
    ///
    /// The fallback is recorded in [`ShaderSource::origin`] and logged at debug
    /// level, so a mistyped path shows up as a compile error on the path
    /// string itself rather than disappearing silently.
    pub fn from_file_or_inline(kind: ShaderKind, path_or_text: &str) -> Self {
        match Self::read_quiet(path_or_text) {
            Ok(text) => Self {
                kind,
                text,
                origin: SourceOrigin::File(PathBuf::from(path_or_text)),
            },
            Err(reason) => {
                crate::engine_debug!(
                    SOURCE,
                    "{} shader argument is not a readable file ({}), using it as source text",
                    kind.label(),
                    reason
                );
                Self {
                    kind,
                    text: path_or_text.to_string(),
                    origin: SourceOrigin::FallbackInline {
                        attempted: PathBuf::from(path_or_text),
                    },
                }
            }
        }
    }

    fn read_quiet(path: &str) -> std::io::Result<String> {
        // Multi-line GLSL is never a path
        if path.contains('\n') {
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, "contains a newline"));
        }
        fs::read_to_string(path)
    }

    /// Stage kind this source is for
    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    /// GLSL text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Where the text came from
    pub fn origin(&self) -> &SourceOrigin {
        &self.origin
    }

    /// True if the text is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
#[path = "shader_source_tests.rs"]
mod tests;
