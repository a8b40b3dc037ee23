//! Integration tests for loading shader sources from disk
//!
//! No GPU required.
//!
//! Run with: cargo test --test shader_source_integration_tests

use std::fs;
use prism_engine::prism::{Error, ShaderKind, ShaderSource, SourceOrigin};

const VERTEX: &str = "#version 330 core
layout (location = 0) in vec3 aPos;
layout (location = 1) in vec3 aColor;
out vec3 ourColor;
void main()
{
   gl_Position = vec4(aPos, 1.0);
   ourColor = aColor;
}
";

#[test]
fn test_integration_load_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shader.vs");
    fs::write(&path, VERTEX).unwrap();

    let source = ShaderSource::from_file(ShaderKind::Vertex, &path).unwrap();
    assert_eq!(source.kind(), ShaderKind::Vertex);
    assert_eq!(source.text(), VERTEX);
    assert_eq!(source.origin(), &SourceOrigin::File(path));
}

#[test]
fn test_integration_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shader.fs");
    let err = ShaderSource::from_file(ShaderKind::Fragment, &path).unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable { .. }));
    assert!(err.to_string().contains("shader.fs"));
}

#[test]
fn test_integration_directory_is_not_a_source() {
    let dir = tempfile::tempdir().unwrap();
    assert!(ShaderSource::from_file(ShaderKind::Vertex, dir.path()).is_err());

    let as_text = dir.path().to_str().unwrap();
    let source = ShaderSource::from_file_or_inline(ShaderKind::Vertex, as_text);
    assert!(matches!(source.origin(), SourceOrigin::FallbackInline { .. }));
}

#[test]
fn test_integration_fallback_prefers_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shader.vs");
    fs::write(&path, VERTEX).unwrap();

    let source = ShaderSource::from_file_or_inline(ShaderKind::Vertex, path.to_str().unwrap());
    assert_eq!(source.text(), VERTEX);
    assert!(matches!(source.origin(), SourceOrigin::File(_)));
}
