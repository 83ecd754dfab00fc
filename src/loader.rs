//! ローカル画像の読み込み

use crate::error::{MatcherError, Result};
use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// 読み込んだ画像ファイル
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// 拡張子が対応画像形式か（大文字小文字を区別しない）
pub fn is_image_extension(ext: &str) -> bool {
    let ext = ext.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// 画像ファイルを読み込む
pub fn load_image(path: &Path) -> Result<ImageFile> {
    if !path.is_file() {
        return Err(MatcherError::FileNotFound(path.display().to_string()));
    }

    let supported = path
        .extension()
        .map(|ext| is_image_extension(&ext.to_string_lossy()))
        .unwrap_or(false);
    if !supported {
        return Err(MatcherError::UnsupportedImage(path.display().to_string()));
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let bytes = std::fs::read(path)?;
    log::debug!("loaded {} ({} bytes)", file_name, bytes.len());

    Ok(ImageFile { file_name, bytes })
}
