use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("対応していない画像形式です: {0}（JPEG / PNG / WebP）")]
    UnsupportedImage(String),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Interactive(#[from] dialoguer::Error),

    #[error(transparent)]
    Common(#[from] visual_matcher_common::Error),
}

pub type Result<T> = std::result::Result<T, MatcherError>;
