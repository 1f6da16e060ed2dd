use std::path::PathBuf;

use image::{ImageError, RgbaImage};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::atomic_io::write_bytes_atomic;
use crate::assets::encode_png;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("artifact name '{name}' must be a plain file name")]
    InvalidName { name: String },
    #[error("failed to encode artifact '{name}' as png: {source}")]
    Encode {
        name: String,
        #[source]
        source: ImageError,
    },
    #[error("failed to write artifact {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Destination for finished renders. Returns where the artifact ended up.
pub trait ArtifactSink {
    fn persist(&self, image: &RgbaImage, name: &str) -> Result<PathBuf, PersistError>;
}

/// Writes PNG artifacts into one directory. Files are never cleaned up here;
/// the caller owns them once `persist` returns.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactSink for DirectorySink {
    fn persist(&self, image: &RgbaImage, name: &str) -> Result<PathBuf, PersistError> {
        if !is_plain_file_name(name) {
            return Err(PersistError::InvalidName {
                name: name.to_string(),
            });
        }
        let bytes = encode_png(image).map_err(|source| PersistError::Encode {
            name: name.to_string(),
            source,
        })?;
        let path = self.dir.join(name);
        write_bytes_atomic(&path, &bytes).map_err(|source| PersistError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "artifact_written");
        Ok(path)
    }
}

/// `<prefix><uuid-v4>.png`
pub fn unique_artifact_name(prefix: &str) -> String {
    format!("{prefix}{}.png", Uuid::new_v4())
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    #[test]
    fn persists_decodable_png() {
        let temp = TempDir::new().expect("temp");
        let sink = DirectorySink::new(temp.path().join("tmp"));
        let image = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255]));

        let path = sink.persist(&image, "tmp_test.png").expect("persist");
        assert_eq!(path, temp.path().join("tmp").join("tmp_test.png"));
        let reloaded = image::open(&path).expect("open").to_rgba8();
        assert_eq!(reloaded, image);
    }

    #[test]
    fn rejects_names_that_escape_the_directory() {
        let temp = TempDir::new().expect("temp");
        let sink = DirectorySink::new(temp.path());
        let image = RgbaImage::new(1, 1);
        for name in ["", "../x.png", "a/b.png", r"a\b.png"] {
            assert!(
                matches!(
                    sink.persist(&image, name),
                    Err(PersistError::InvalidName { .. })
                ),
                "name={name}"
            );
        }
    }

    #[test]
    fn unwritable_directory_reports_write_error() {
        let temp = TempDir::new().expect("temp");
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, b"file").expect("write blocker");
        let sink = DirectorySink::new(blocker.join("out"));
        let err = sink
            .persist(&RgbaImage::new(1, 1), "tmp_x.png")
            .expect_err("blocked");
        assert!(matches!(err, PersistError::Write { .. }));
    }

    #[test]
    fn unique_names_differ_and_keep_prefix() {
        let first = unique_artifact_name("tmp_");
        let second = unique_artifact_name("tmp_");
        assert_ne!(first, second);
        assert!(first.starts_with("tmp_"));
        assert!(first.ends_with(".png"));
    }
}
