use std::path::Path;

use egui_wgpu::wgpu;

use crate::{EngineError, EngineResult};

pub struct Shader {
    shader: wgpu::ShaderModule,
}

impl Shader {
    /// Compile une source WGSL déjà en mémoire.
    /// Les erreurs de validation sont renvoyées au lieu de passer par le handler
    /// d'erreurs non capturées du device.
    pub fn from_wgsl(device: &wgpu::Device, label: &str, source: &str) -> EngineResult<Self> {
        log::debug!("Compiling shader '{}' ({} bytes)", label, source.len());

        let shader = validation_scope(device, label, || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.to_owned().into()),
            })
        })?;

        Ok(Self { shader })
    }

    pub fn from_file(
        device: &wgpu::Device,
        label: &str,
        path: impl AsRef<Path>,
    ) -> EngineResult<Self> {
        let path = path.as_ref();
        let source = read_source(path)?;
        Self::from_wgsl(device, label, &source)
    }

    pub fn module(&self) -> &wgpu::ShaderModule {
        &self.shader
    }
}

/// Exécute `create` dans un error scope de validation et convertit une erreur
/// capturée en `EngineError::ShaderCompile`.
pub fn validation_scope<T>(
    device: &wgpu::Device,
    label: &str,
    create: impl FnOnce() -> T,
) -> EngineResult<T> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();

    match pollster::block_on(device.pop_error_scope()) {
        None => Ok(value),
        Some(error) => {
            log::error!("Validation failed for '{}': {}", label, error);
            Err(EngineError::ShaderCompile {
                label: label.to_string(),
                message: error.to_string(),
            })
        }
    }
}

/// Lit une source de shader depuis le disque.
pub fn read_source(path: &Path) -> EngineResult<String> {
    std::fs::read_to_string(path).map_err(|source| EngineError::ShaderIo {
        path: path.to_path_buf(),
        source,
    })
}
