// ============================================
// Config - Константы и конфиг сцены
// ============================================

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::gpu::render::lights::{default_point_lights, PointLight};
use crate::gpu::terrain::HeightmapEncoding;

pub const WINDOW_TITLE: &str = "Lakeshore - Tab: switch mode";
pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 720;

/// Путь к конфигу сцены по умолчанию
pub const SCENE_CONFIG_PATH: &str = "scene.json";

/// Минимальный зазор камеры над террейном
pub const MIN_CAMERA_CLEARANCE: f32 = 1.0;
/// Потолок высоты камеры
pub const MAX_CAMERA_HEIGHT: f32 = 100.0;

/// Источник карты высот
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightmapSource {
    pub path: PathBuf,
    pub encoding: HeightmapEncoding,
    pub amplitude: f32,
}

impl Default for HeightmapSource {
    fn default() -> Self {
        Self {
            path: PathBuf::from("heightmap.png"),
            encoding: HeightmapEncoding::RgbProduct,
            amplitude: 20.0,
        }
    }
}

/// Объект сцены, поставленный на террейн
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectPlacement {
    pub x: f32,
    pub z: f32,
    #[serde(default = "default_object_scale")]
    pub scale: f32,
}

fn default_object_scale() -> f32 {
    0.3
}

/// Параметры сцены (JSON, все поля необязательны)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub chunk_size: f32,
    pub chunks_x: u32,
    pub chunks_z: u32,
    /// Вершин на сторону для процедурных чанков
    pub vertex_count: u32,
    pub water_height: f32,

    pub seed: i32,
    pub noise_amplitude: f32,
    pub noise_octave: f32,
    /// Если задано - чанки строятся из изображения
    pub heightmap: Option<HeightmapSource>,

    pub shadow_resolution: u32,
    /// Половина стороны ортографического фрустума тени
    pub shadow_extent: f32,
    pub light_direction: [f32; 3],
    /// Используются первые MAX_POINT_LIGHTS
    pub point_lights: Vec<PointLight>,

    pub camera_start: [f32; 3],
    pub objects: Vec<ObjectPlacement>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            chunk_size: 256.0,
            chunks_x: 1,
            chunks_z: 1,
            vertex_count: 128,
            water_height: -0.7,
            seed: 21,
            noise_amplitude: 8.0,
            noise_octave: 8.0,
            heightmap: None,
            shadow_resolution: 4096,
            shadow_extent: 60.0,
            light_direction: [0.3, -0.7, 1.0],
            point_lights: default_point_lights(),
            camera_start: [0.0, 10.0, 20.0],
            objects: vec![
                ObjectPlacement { x: 0.0, z: 0.0, scale: 0.3 },
                ObjectPlacement { x: 3.0, z: -2.0, scale: 0.3 },
                ObjectPlacement { x: -4.0, z: 5.0, scale: 0.3 },
            ],
        }
    }
}

/// Ошибки чтения конфига
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config io error: {}", e),
            ConfigError::Parse(e) => write!(f, "config parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl SceneConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Нет файла -> значения по умолчанию; битый файл -> ошибка
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(text) => Self::from_json(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Как load, но ошибка логируется и заменяется значениями по умолчанию
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}: {}, using defaults", path.as_ref().display(), e);
                Self::default()
            }
        }
    }
}
