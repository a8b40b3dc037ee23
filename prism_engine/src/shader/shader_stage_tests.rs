/// Unit tests for shader_stage.rs

use crate::graphics_device::mock_graphics_device::{mock_context, DeviceCall};
use crate::graphics_device::ShaderKind;
use crate::shader::{ShaderSource, ShaderStage};
use crate::prism::Error;

const VERTEX: &str = "#version 330 core\nlayout (location = 0) in vec3 position;\nvoid main()\n{\n    gl_Position = vec4(position.x, position.y, position.z, 1.0);\n}\n";

#[test]
fn test_compile_valid_vertex_stage() {
    let (ctx, state) = mock_context();
    let stage = ShaderStage::compile(&ctx, &ShaderSource::inline(ShaderKind::Vertex, VERTEX)).unwrap();
    assert_eq!(stage.kind(), ShaderKind::Vertex);
    assert!(stage.is_alive());
    assert_eq!(ctx.live_resources().shaders, 1);
    assert_eq!(state.borrow().count(|c| matches!(c, DeviceCall::CompileShader(_))), 1);
}

#[test]
fn test_compile_error_carries_stage_and_log() {
    let (ctx, state) = mock_context();
    let broken = ShaderSource::inline(ShaderKind::Fragment, "void main() { color = vec4(1.0);");

    match ShaderStage::compile(&ctx, &broken) {
        Err(Error::CompileFailed { stage, log }) => {
            assert_eq!(stage, ShaderKind::Fragment);
            assert!(!log.is_empty());
        }
        other => panic!("expected CompileFailed, got {:?}", other),
    }

    // The failed stage was released
    assert_eq!(ctx.live_resources().shaders, 0);
    assert_eq!(state.borrow().live_shaders(), 0);
}

#[test]
fn test_compile_error_message_format() {
    let (ctx, _state) = mock_context();
    let broken = ShaderSource::inline(ShaderKind::Vertex, "void entry() {}");
    let err = ShaderStage::compile(&ctx, &broken).unwrap_err();
    assert!(err.to_string().starts_with("ERROR::SHADER::VERTEX::COMPILATION_FAILED\n"));
}

#[test]
fn test_blank_source_allocates_nothing() {
    let (ctx, state) = mock_context();
    let result = ShaderStage::compile(&ctx, &ShaderSource::inline(ShaderKind::Vertex, "   "));
    assert!(matches!(result, Err(Error::InvalidResource(_))));
    assert!(state.borrow().calls.is_empty());
}

#[test]
fn test_allocation_failure_propagates() {
    let (ctx, state) = mock_context();
    state.borrow_mut().fail_allocations = true;
    let result = ShaderStage::compile(&ctx, &ShaderSource::inline(ShaderKind::Vertex, VERTEX));
    assert!(matches!(result, Err(Error::BackendError(_))));
    assert_eq!(ctx.live_resources().shaders, 0);
}

#[test]
fn test_drop_releases_once() {
    let (ctx, state) = mock_context();
    let stage = ShaderStage::compile(&ctx, &ShaderSource::inline(ShaderKind::Vertex, VERTEX)).unwrap();
    drop(stage);
    assert_eq!(ctx.live_resources().shaders, 0);
    assert_eq!(state.borrow().count(|c| matches!(c, DeviceCall::DeleteShader(_))), 1);
    assert_eq!(state.borrow().invalid_operations, 0);
}
