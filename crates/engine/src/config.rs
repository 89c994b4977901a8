//! Configuration du viewer, lue depuis un fichier RON.
//!
//! Tous les champs sont optionnels : un champ absent prend sa valeur par défaut,
//! et un fichier absent donne la configuration par défaut.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{ConfigError, SkyMesh};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Sky".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Degrés
    pub fovy: f32,
    pub znear: f32,
    pub zfar: f32,
    /// Unités monde par seconde
    pub speed: f32,
    /// Radians par pixel de souris
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [-10.0, 2.0, 1.0],
            fovy: 45.0,
            znear: 0.1,
            zfar: 100.0,
            speed: 12.0,
            sensitivity: 0.001,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    pub window: WindowConfig,
    pub clear_color: [f64; 4],
    pub mesh: SkyMesh,
    /// Remplace le WGSL embarqué si présent.
    pub shader_path: Option<PathBuf>,
    pub camera: CameraConfig,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            clear_color: [0.1, 0.2, 0.3, 1.0],
            mesh: SkyMesh::default(),
            shader_path: None,
            camera: CameraConfig::default(),
        }
    }
}

impl SkyConfig {
    pub const DEFAULT_PATH: &'static str = "sky.ron";

    pub fn from_ron(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: SkyConfig = ron::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text, path)
    }

    /// Comme `load`, mais un fichier inexistant donne la configuration par défaut.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let config = Self::load(path)?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        let camera = &self.camera;
        if !camera.position.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "camera.position must be finite, got {:?}",
                camera.position
            )));
        }
        if !(camera.fovy > 0.0 && camera.fovy < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.fovy must be in (0, 180), got {}",
                camera.fovy
            )));
        }
        // Comparaisons écrites pour que NaN soit rejeté.
        if !(camera.znear > 0.0 && camera.znear.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "camera.znear must be positive and finite, got {}",
                camera.znear
            )));
        }
        if !(camera.zfar > camera.znear && camera.zfar.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "camera.zfar ({}) must be finite and greater than camera.znear ({})",
                camera.zfar, camera.znear
            )));
        }
        if !(camera.speed.is_finite() && camera.sensitivity.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "camera.speed ({}) and camera.sensitivity ({}) must be finite",
                camera.speed, camera.sensitivity
            )));
        }
        if !self.clear_color.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "clear_color must be finite, got {:?}",
                self.clear_color
            )));
        }

        Ok(())
    }
}
