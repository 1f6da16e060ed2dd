use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use image::{ImageError, ImageFormat, ImageReader, RgbaImage};
use thiserror::Error;
use tracing::debug;

use super::keys::{validate_asset_key, AssetKeyError};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("invalid asset key '{key}': {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: AssetKeyError,
    },
    #[error("asset '{key}' is not registered")]
    Missing { key: String },
    #[error("failed to open asset '{key}' at {path}: {source}")]
    Open {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode asset '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: ImageError,
    },
    #[error("failed to encode asset '{key}' as png: {source}")]
    Encode {
        key: String,
        #[source]
        source: ImageError,
    },
}

/// Shared PNG-encoded image. Cloning is cheap; decoding happens on demand.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    png: Arc<[u8]>,
}

impl ImagePayload {
    pub fn from_png_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            png: Arc::from(bytes),
        }
    }

    pub fn from_rgba(image: &RgbaImage) -> Result<Self, ImageError> {
        encode_png(image).map(Self::from_png_bytes)
    }

    pub fn decode(&self) -> Result<RgbaImage, ImageError> {
        image::load_from_memory_with_format(&self.png, ImageFormat::Png).map(|img| img.to_rgba8())
    }
}

impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImagePayload")
            .field("png_len", &self.png.len())
            .finish()
    }
}

/// A decoded asset together with its canonical PNG encoding.
#[derive(Debug, Clone)]
pub struct LoadedAsset {
    pub payload: ImagePayload,
    pub raster: RgbaImage,
}

impl LoadedAsset {
    fn from_raster(key: &str, raster: RgbaImage) -> Result<Self, AssetError> {
        let payload = ImagePayload::from_rgba(&raster).map_err(|source| AssetError::Encode {
            key: key.to_string(),
            source,
        })?;
        Ok(Self { payload, raster })
    }
}

impl From<LoadedAsset> for ImagePayload {
    fn from(asset: LoadedAsset) -> Self {
        asset.payload
    }
}

pub trait AssetSource {
    fn load(&self, key: &str) -> Result<LoadedAsset, AssetError>;
}

/// Reads `<root>/<key>.png` from disk.
#[derive(Debug, Clone)]
pub struct FsAssets {
    root: PathBuf,
}

impl FsAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, AssetError> {
        validate_asset_key(key).map_err(|source| AssetError::InvalidKey {
            key: key.to_string(),
            source,
        })?;
        Ok(self.root.join(format!("{key}.png")))
    }
}

impl AssetSource for FsAssets {
    fn load(&self, key: &str) -> Result<LoadedAsset, AssetError> {
        let path = self.path_for(key)?;
        let reader = ImageReader::open(&path).map_err(|source| AssetError::Open {
            key: key.to_string(),
            path: path.clone(),
            source,
        })?;
        let decoded = reader.decode().map_err(|source| AssetError::Decode {
            key: key.to_string(),
            source,
        })?;
        let asset = LoadedAsset::from_raster(key, decoded.to_rgba8())?;
        debug!(
            asset_key = key,
            path = %path.display(),
            width = asset.raster.width(),
            height = asset.raster.height(),
            "asset_loaded"
        );
        Ok(asset)
    }
}

/// In-memory asset table, keyed the same way as [`FsAssets`].
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    assets: HashMap<String, LoadedAsset>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_rgba(&mut self, key: &str, raster: RgbaImage) -> Result<(), AssetError> {
        validate_key(key)?;
        let asset = LoadedAsset::from_raster(key, raster)?;
        self.assets.insert(key.to_string(), asset);
        Ok(())
    }

    pub fn insert_png(&mut self, key: &str, png: impl Into<Vec<u8>>) -> Result<(), AssetError> {
        validate_key(key)?;
        let raster = ImagePayload::from_png_bytes(png)
            .decode()
            .map_err(|source| AssetError::Decode {
                key: key.to_string(),
                source,
            })?;
        self.insert_rgba(key, raster)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetSource for MemoryAssets {
    fn load(&self, key: &str) -> Result<LoadedAsset, AssetError> {
        validate_key(key)?;
        self.assets
            .get(key)
            .cloned()
            .ok_or_else(|| AssetError::Missing {
                key: key.to_string(),
            })
    }
}

fn validate_key(key: &str) -> Result<(), AssetError> {
    validate_asset_key(key).map_err(|source| AssetError::InvalidKey {
        key: key.to_string(),
        source,
    })
}

pub(crate) fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ImageError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
