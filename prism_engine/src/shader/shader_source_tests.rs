/// Unit tests for shader_source.rs

use std::io::Write;
use crate::graphics_device::ShaderKind;
use crate::shader::{ShaderSource, SourceOrigin};
use crate::prism::Error;

const FRAGMENT: &str = "#version 330 core\nout vec4 color;\nvoid main()\n{\n    color = vec4(1.0, 0.5, 0.2, 1.0);\n}\n";

#[test]
fn test_inline() {
    let source = ShaderSource::inline(ShaderKind::Fragment, FRAGMENT);
    assert_eq!(source.kind(), ShaderKind::Fragment);
    assert_eq!(source.text(), FRAGMENT);
    assert_eq!(source.origin(), &SourceOrigin::Inline);
    assert!(!source.is_blank());
}

#[test]
fn test_blank() {
    assert!(ShaderSource::inline(ShaderKind::Vertex, "  \n\t").is_blank());
    assert!(ShaderSource::inline(ShaderKind::Vertex, "").is_blank());
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FRAGMENT.as_bytes()).unwrap();

    let source = ShaderSource::from_file(ShaderKind::Fragment, file.path()).unwrap();
    assert_eq!(source.text(), FRAGMENT);
    assert_eq!(source.origin(), &SourceOrigin::File(file.path().to_path_buf()));
}

#[test]
fn test_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.frag");
    match ShaderSource::from_file(ShaderKind::Fragment, &path) {
        Err(Error::SourceUnavailable { path: reported, reason }) => {
            assert!(reported.ends_with("missing.frag"));
            assert!(!reason.is_empty());
        }
        other => panic!("expected SourceUnavailable, got {:?}", other),
    }
}

#[test]
fn test_fallback_reads_existing_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FRAGMENT.as_bytes()).unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let source = ShaderSource::from_file_or_inline(ShaderKind::Fragment, &path);
    assert_eq!(source.text(), FRAGMENT);
    assert!(matches!(source.origin(), SourceOrigin::File(_)));
}

#[test]
fn test_fallback_uses_literal_text() {
    let source = ShaderSource::from_file_or_inline(ShaderKind::Fragment, FRAGMENT);
    assert_eq!(source.text(), FRAGMENT);
    assert!(matches!(source.origin(), SourceOrigin::FallbackInline { .. }));
}

#[test]
fn test_fallback_on_missing_single_line_path() {
    let source = ShaderSource::from_file_or_inline(ShaderKind::Vertex, "shaders/does_not_exist.vs");
    assert_eq!(source.text(), "shaders/does_not_exist.vs");
    assert_eq!(
        source.origin(),
        &SourceOrigin::FallbackInline { attempted: "shaders/does_not_exist.vs".into() }
    );
}
