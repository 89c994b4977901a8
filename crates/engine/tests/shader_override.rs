//! Un `shader_path` invalide doit donner une erreur, pas un panic du device.
//! Les tests sont ignorés (avec un message) quand aucun adapter n'est disponible.

use engine::{EngineError, SkyConfig, SkyPass, SkyProgram, wgpu};
use tempfile::tempdir;

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

fn device() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .ok()?;
        adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .ok()
    })
}

fn pass_with_shader(device: &wgpu::Device, source: &str) -> Result<SkyPass, EngineError> {
    let dir = tempdir().unwrap();
    let path = dir.path().join("override.wgsl");
    std::fs::write(&path, source).unwrap();

    let config = SkyConfig {
        shader_path: Some(path),
        ..SkyConfig::default()
    };
    SkyPass::new(device, FORMAT, &config)
}

#[test]
fn syntax_error_is_reported() {
    let Some((device, _queue)) = device() else {
        eprintln!("no GPU adapter available, skipping");
        return;
    };

    match pass_with_shader(&device, "fn vs_main( {") {
        Err(EngineError::ShaderCompile { label, message }) => {
            assert_eq!(label, SkyProgram::LABEL);
            assert!(!message.is_empty());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("broken WGSL was accepted"),
    }
}

#[test]
fn missing_fragment_entry_is_reported() {
    let Some((device, _queue)) = device() else {
        eprintln!("no GPU adapter available, skipping");
        return;
    };

    let source = SkyProgram::SOURCE.replace("fs_main", "fs_other");
    match pass_with_shader(&device, &source) {
        Err(EngineError::ShaderCompile { label, .. }) => assert_eq!(label, "sky_pipeline"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("pipeline without fs_main was accepted"),
    }
}

#[test]
fn valid_override_builds_the_pass() {
    let Some((device, _queue)) = device() else {
        eprintln!("no GPU adapter available, skipping");
        return;
    };

    assert!(pass_with_shader(&device, SkyProgram::SOURCE).is_ok());
}
