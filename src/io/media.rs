// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file loading (videos and thumbnails).
//!
//! Videos are not decoded: their bytes are cached in the blob store so a
//! project keeps working after the source file moves. Thumbnails are
//! decoded into RGBA pixels ready to become an egui texture.

use super::blob_store::BlobStore;
use crate::error::ReviewError;
use crate::models::project::Project;
use anyhow::{Context, Result};
use std::path::Path;

/// Video container extensions accepted for import.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "mov", "webm", "mkv", "avi", "ogv"];

/// Image extensions accepted as thumbnails.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp", "gif"];

/// A decoded image.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major.
    pub pixels: Vec<u8>,
}

pub fn is_video_file(path: &Path) -> bool {
    has_extension(path, VIDEO_EXTENSIONS)
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Copy a video file into `blobs` under a fresh key and return the key.
pub fn import_video(path: &Path, blobs: &dyn BlobStore) -> Result<String> {
    if !is_video_file(path) {
        return Err(ReviewError::UnsupportedMedia(path.display().to_string()).into());
    }

    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read video {}", path.display()))?;
    let key = uuid::Uuid::new_v4().to_string();
    blobs.put(&key, &bytes)?;

    log::info!("Imported video {} as {} ({} bytes)", path.display(), key, bytes.len());
    Ok(key)
}

/// Where a project's video is played from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    /// Bytes cached in the blob store.
    Cached { key: String, size: usize },
    /// The project's own URL.
    Url(String),
}

/// Prefer the cached copy of a project's video, falling back to its URL when
/// there is no cached copy or the blob store cannot be read.
pub fn resolve_video_source(project: &Project, blobs: &dyn BlobStore) -> VideoSource {
    if let Some(key) = &project.video_blob_key {
        match blobs.get(key) {
            Ok(Some(bytes)) => {
                return VideoSource::Cached {
                    key: key.clone(),
                    size: bytes.len(),
                }
            }
            Ok(None) => log::warn!("Cached video {} is missing, using URL", key),
            Err(e) => log::warn!("Failed to read cached video {}: {:#}", key, e),
        }
    }
    VideoSource::Url(project.video_url.clone())
}

/// Load an image file into RGBA pixels.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    if !has_extension(path, IMAGE_EXTENSIONS) {
        return Err(ReviewError::UnsupportedMedia(path.display().to_string()).into());
    }

    let img = image::open(path)
        .with_context(|| format!("Failed to decode image {}", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();

    Ok(LoadedImage {
        width,
        height,
        pixels: img.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::blob_store::MemoryBlobStore;

    #[test]
    fn test_video_extension_detection() {
        assert!(is_video_file(Path::new("cut.MP4")));
        assert!(is_video_file(Path::new("/tmp/final.webm")));
        assert!(!is_video_file(Path::new("notes.txt")));
        assert!(!is_video_file(Path::new("noext")));
    }

    #[test]
    fn test_import_video_caches_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"fake video bytes").unwrap();

        let blobs = MemoryBlobStore::default();
        let key = import_video(&path, &blobs).unwrap();
        assert_eq!(blobs.get(&key).unwrap().as_deref(), Some(&b"fake video bytes"[..]));
    }

    #[test]
    fn test_import_rejects_non_video() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.txt");
        std::fs::write(&path, b"text").unwrap();

        let err = import_video(&path, &MemoryBlobStore::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReviewError>(),
            Some(ReviewError::UnsupportedMedia(_))
        ));
    }

    #[test]
    fn test_resolve_video_source_prefers_cache() {
        let blobs = MemoryBlobStore::default();
        blobs.put("v1", b"1234").unwrap();

        let project = Project::new("p".into(), "https://cdn/p.mp4".into(), String::new());
        assert_eq!(
            resolve_video_source(&project, &blobs),
            VideoSource::Url("https://cdn/p.mp4".into())
        );

        let cached = project.clone().with_video_blob("v1".into());
        assert_eq!(
            resolve_video_source(&cached, &blobs),
            VideoSource::Cached { key: "v1".into(), size: 4 }
        );

        let missing = project.with_video_blob("v2".into());
        assert_eq!(
            resolve_video_source(&missing, &blobs),
            VideoSource::Url("https://cdn/p.mp4".into())
        );
    }

    #[test]
    fn test_load_image_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thumb.png");
        image::RgbImage::from_pixel(4, 3, image::Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!((loaded.width, loaded.height), (4, 3));
        assert_eq!(loaded.pixels.len(), 4 * 3 * 4);
        assert_eq!(&loaded.pixels[..4], &[10, 20, 30, 255]);
    }
}
