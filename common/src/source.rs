//! 入力画像の管理
//!
//! ローカルファイルとリモートURLのどちらか一方だけを保持し、
//! 表示用のプレビュー参照を派生させる。

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// ローカルファイルから読み込んだ画像
#[derive(Debug, Clone, PartialEq)]
pub struct LocalImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
    /// `data:<mime>;base64,...` 形式のプレビュー
    pub preview: String,
}

impl LocalImage {
    fn new(file_name: String, bytes: Vec<u8>) -> Self {
        let mime_type = sniff_mime_type(&bytes);
        let preview = to_data_url(&mime_type, &bytes);
        Self {
            file_name,
            bytes,
            mime_type,
            preview,
        }
    }
}

/// 現在選択中の画像ソース
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ImageSource {
    #[default]
    None,
    LocalFile(LocalImage),
    RemoteUrl(String),
}

impl ImageSource {
    pub fn is_none(&self) -> bool {
        matches!(self, ImageSource::None)
    }

    /// プレビュー参照（URLソースはURLそのもの）
    pub fn preview(&self) -> Option<&str> {
        match self {
            ImageSource::None => None,
            ImageSource::LocalFile(local) => Some(&local.preview),
            ImageSource::RemoteUrl(url) => Some(url),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ImageSource::None => "none",
            ImageSource::LocalFile(_) => "file",
            ImageSource::RemoteUrl(_) => "url",
        }
    }
}

/// 入力管理
///
/// ソースが差し替わるたびに世代番号を進める。発行済みリクエストは
/// この番号で自分の入力を識別する。
#[derive(Debug, Default)]
pub struct InputManager {
    source: ImageSource,
    generation: u64,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn preview(&self) -> Option<&str> {
        self.source.preview()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// ローカルファイルを選択
    ///
    /// 空のバイト列は無視し、`None` を返す（状態は変わらない）。
    pub fn set_local_file(&mut self, file_name: impl Into<String>, bytes: Vec<u8>) -> Option<&ImageSource> {
        if bytes.is_empty() {
            log::debug!("ignoring empty file selection");
            return None;
        }
        self.replace(ImageSource::LocalFile(LocalImage::new(file_name.into(), bytes)));
        Some(&self.source)
    }

    /// リモートURLを選択
    ///
    /// URLの検証・取得はしない。空白のみのURLは無視する。
    pub fn set_remote_url(&mut self, url: impl Into<String>) -> Option<&ImageSource> {
        let url = url.into();
        let url = url.trim();
        if url.is_empty() {
            log::debug!("ignoring blank url selection");
            return None;
        }
        self.replace(ImageSource::RemoteUrl(url.to_string()));
        Some(&self.source)
    }

    fn replace(&mut self, source: ImageSource) {
        self.source = source;
        self.generation += 1;
        log::debug!("image source #{} selected ({})", self.generation, self.source.kind());
    }
}

/// 先頭バイトから MIME タイプを判定
pub fn sniff_mime_type(bytes: &[u8]) -> String {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| "application/octet-stream".to_string())
}

/// Data URL を生成
pub fn to_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[test]
    fn test_initial_state() {
        let input = InputManager::new();
        assert!(input.source().is_none());
        assert_eq!(input.preview(), None);
        assert_eq!(input.generation(), 0);
    }

    #[test]
    fn test_set_local_file_derives_preview() {
        let mut input = InputManager::new();
        input.set_local_file("shoe.png", PNG_HEADER.to_vec()).unwrap();

        match input.source() {
            ImageSource::LocalFile(local) => {
                assert_eq!(local.file_name, "shoe.png");
                assert_eq!(local.mime_type, "image/png");
                assert!(local.preview.starts_with("data:image/png;base64,"));
            }
            other => panic!("unexpected source: {:?}", other),
        }
        assert_eq!(input.generation(), 1);
    }

    #[test]
    fn test_empty_file_is_ignored() {
        let mut input = InputManager::new();
        input.set_remote_url("http://x/a.jpg");
        assert!(input.set_local_file("empty.jpg", Vec::new()).is_none());

        assert_eq!(input.source(), &ImageSource::RemoteUrl("http://x/a.jpg".into()));
        assert_eq!(input.generation(), 1);
    }

    #[test]
    fn test_url_replaces_local_file() {
        let mut input = InputManager::new();
        input.set_local_file("shoe.png", PNG_HEADER.to_vec());
        input.set_remote_url("http://x/a.jpg");

        assert_eq!(input.source(), &ImageSource::RemoteUrl("http://x/a.jpg".into()));
        assert_eq!(input.preview(), Some("http://x/a.jpg"));
    }

    #[test]
    fn test_blank_url_is_ignored() {
        let mut input = InputManager::new();
        assert!(input.set_remote_url("   ").is_none());
        assert!(input.source().is_none());
    }

    #[test]
    fn test_unknown_format_mime() {
        assert_eq!(sniff_mime_type(b"hello"), "application/octet-stream");
    }

    #[test]
    fn test_data_url() {
        assert_eq!(to_data_url("image/jpeg", b"abc"), "data:image/jpeg;base64,YWJj");
    }
}
