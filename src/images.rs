// 🖼️ Image Normalizer - profile photos → <email-user>.png
//
// Side-effecting step, kept out of record construction:
//   canonical exists  → reuse it (re-runs are no-ops)
//   original exists   → resize to the max dimension, write PNG, delete original
//   neither           → ImageNotFound
//
// The write-then-delete sequence is not safe to run concurrently for the same
// canonical name. Callers process rows one at a time.

use crate::error::{Result, RosterError};
use image::imageops::FilterType;
use image::ImageFormat;
use std::fs;
use std::path::{Path, PathBuf};

/// Longer side of every normalized photo
pub const MAX_DIMENSION: u32 = 720;

pub struct ImageNormalizer {
    dir: PathBuf,
    max_dimension: u32,
}

impl ImageNormalizer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ImageNormalizer {
            dir: dir.into(),
            max_dimension: MAX_DIMENSION,
        }
    }

    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension;
        self
    }

    /// Resolve `reference` for the member identified by `email` to a canonical
    /// filename inside the image directory. Empty reference → empty filename.
    pub fn normalize(&self, reference: &str, email: &str, member: &str) -> Result<String> {
        if reference.is_empty() {
            return Ok(String::new());
        }

        let canonical = canonical_filename(email).ok_or_else(|| RosterError::InvalidImageName {
            email: email.to_string(),
            member: member.to_string(),
        })?;
        let canonical_path = self.dir.join(&canonical);
        if canonical_path.exists() {
            tracing::debug!(%canonical, "reusing normalized image");
            return Ok(canonical);
        }

        let original = original_filename(reference);
        let original_path = self.dir.join(&original);
        if !is_plain_filename(&original) || !original_path.is_file() {
            return Err(RosterError::ImageNotFound {
                file: original,
                member: member.to_string(),
            });
        }

        self.convert(&original_path, &canonical_path)?;
        fs::remove_file(&original_path).map_err(|e| RosterError::io(&original_path, e))?;

        tracing::info!(%original, %canonical, "normalized image");
        Ok(canonical)
    }

    fn convert(&self, from: &Path, to: &Path) -> Result<()> {
        let img = image::open(from).map_err(|source| RosterError::Image {
            path: from.to_path_buf(),
            source,
        })?;

        let (width, height) = scaled_dimensions(img.width(), img.height(), self.max_dimension);
        img.resize_exact(width, height, FilterType::Lanczos3)
            .save_with_format(to, ImageFormat::Png)
            .map_err(|source| RosterError::Image {
                path: to.to_path_buf(),
                source,
            })
    }
}

/// "user@domain" → "user.png". None when the local part is empty or would
/// step outside the image directory.
pub fn canonical_filename(email: &str) -> Option<String> {
    let user = email.split('@').next().unwrap_or(email);
    is_plain_filename(user).then(|| format!("{}.png", user))
}

fn is_plain_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Last path segment of a path or URL path, with "%20" unescaped
pub fn original_filename(reference: &str) -> String {
    let last = reference.rsplit('/').next().unwrap_or(reference);
    last.replace("%20", " ")
}

/// Scale so the longer side equals `max`, keeping the aspect ratio.
/// The shorter side is truncated and never drops below one pixel.
pub fn scaled_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (max, max);
    }

    if width > height {
        let scaled = (height as u64 * max as u64 / width as u64) as u32;
        (max, scaled.max(1))
    } else {
        let scaled = (width as u64 * max as u64 / height as u64) as u32;
        (scaled.max(1), max)
    }
}
