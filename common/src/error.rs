//! エラー型定義

use thiserror::Error;

/// 共通エラー型
///
/// セッションはどのエラーでも終了しない。`Validation` と `Transport` は
/// ユーザーへ通知し、`StaleResponse` は黙って破棄する。
#[derive(Error, Debug)]
pub enum Error {
    /// 検索実行時に画像が選択されていない
    #[error("{0}")]
    Validation(String),

    /// 通信失敗・非2xx・不正なレスポンス
    #[error("{0}")]
    Transport(String),

    /// 発行時の入力が既に差し替えられているレスポンス
    #[error("Stale response: issued for source #{issued}, current is #{current}")]
    StaleResponse { issued: u64, current: u64 },

    /// 結果が空の間はスコア閾値を変更できない
    #[error("Score threshold can only be adjusted while results are shown")]
    ThresholdLocked,

    #[error("Score threshold out of range: {0}")]
    InvalidThreshold(f32),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// ユーザーに表示すべきエラーか
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Error::StaleResponse { .. })
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_validation() {
        let error = Error::Validation("Select an image first".to_string());
        assert_eq!(format!("{}", error), "Select an image first");
    }

    #[test]
    fn test_error_display_transport_is_message_only() {
        let error = Error::Transport("bad image".to_string());
        assert_eq!(format!("{}", error), "bad image");
    }

    #[test]
    fn test_error_display_stale() {
        let error = Error::StaleResponse { issued: 1, current: 3 };
        let display = format!("{}", error);
        assert!(display.contains("#1"));
        assert!(display.contains("#3"));
    }

    #[test]
    fn test_stale_is_not_user_visible() {
        assert!(!Error::StaleResponse { issued: 0, current: 1 }.is_user_visible());
        assert!(Error::Transport("x".into()).is_user_visible());
        assert!(Error::Validation("x".into()).is_user_visible());
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }
}
