// storefront/src/services/media_service.rs

//! Product image storage under `MEDIA_ROOT`.

use crate::errors::{AppError, Result};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const PRODUCT_IMAGE_DIR: &str = "products";
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Lower-cased extension of an uploaded file name, if it is an accepted image type.
pub fn image_extension(file_name: Option<&str>) -> std::result::Result<String, String> {
  let extension = file_name
    .and_then(|name| Path::new(name).extension())
    .and_then(|ext| ext.to_str())
    .map(str::to_ascii_lowercase)
    .ok_or_else(|| "Upload a valid image. The file you uploaded has no extension.".to_string())?;
  if ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
    Ok(extension)
  } else {
    Err(format!(
      "File extension \"{}\" is not allowed. Allowed extensions are: {}.",
      extension,
      ALLOWED_IMAGE_EXTENSIONS.join(", ")
    ))
  }
}

/// Resolves a stored relative path inside `media_root`, refusing anything
/// that could escape it.
fn resolve(media_root: &Path, relative_path: &str) -> Result<PathBuf> {
  let relative = Path::new(relative_path);
  if relative.components().any(|c| !matches!(c, Component::Normal(_))) {
    return Err(AppError::Validation(format!("Invalid media path '{}'.", relative_path)));
  }
  Ok(media_root.join(relative))
}

/// Copies an uploaded temp file into `<media_root>/products/<uuid>.<ext>` and
/// returns the path relative to the media root.
pub async fn save_product_image(media_root: &Path, upload: &Path, extension: &str) -> Result<String> {
  let dir = media_root.join(PRODUCT_IMAGE_DIR);
  tokio::fs::create_dir_all(&dir).await?;
  let relative = format!("{}/{}.{}", PRODUCT_IMAGE_DIR, Uuid::new_v4().simple(), extension);
  tokio::fs::copy(upload, media_root.join(&relative)).await?;
  info!(path = %relative, "Stored product image.");
  Ok(relative)
}

/// Removes a stored file; a file that is already gone is not an error.
pub async fn delete_media_file(media_root: &Path, relative_path: &str) -> Result<()> {
  let path = resolve(media_root, relative_path)?;
  match tokio::fs::remove_file(&path).await {
    Ok(()) => {
      debug!(path = %relative_path, "Deleted media file.");
      Ok(())
    }
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
      warn!(path = %relative_path, "Media file already missing.");
      Ok(())
    }
    Err(e) => Err(AppError::Io(e)),
  }
}
