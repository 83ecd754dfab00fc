//! マッチングサービスのレスポンスパーサー
//!
//! HTTPステータスと本文から MatchResponse またはユーザー向けメッセージを作る。

use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::MatchResponse;

/// 本文からメッセージを取り出せない場合の汎用メッセージ
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong while matching the image. Please try again.";

/// 成功レスポンス本文をパース
///
/// # Arguments
/// * `body` - レスポンス本文
///
/// # Returns
/// * `Ok(MatchResponse)` - パース成功
/// * `Err(Error::Transport)` - 本文が不正（汎用メッセージ）
pub fn parse_match_response(body: &str) -> Result<MatchResponse> {
    serde_json::from_str(body).map_err(|e| {
        log::debug!("malformed match response: {}", e);
        Error::Transport(GENERIC_ERROR_MESSAGE.to_string())
    })
}

/// エラー本文から `detail` を取り出す
///
/// `detail` が文字列ならそのまま、`[{ "msg": ... }]` 形式（入力検証エラー）なら
/// 各 `msg` を "; " で連結する。
pub fn extract_error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail.clone()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => None,
    }
}

/// ステータスと本文を解釈
///
/// 2xx 以外は `detail`（なければ汎用メッセージ）を持つ `Error::Transport`。
pub fn interpret_response(status: u16, body: &str) -> Result<MatchResponse> {
    if !(200..300).contains(&status) {
        let message = extract_error_detail(body).unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
        return Err(Error::Transport(message));
    }
    parse_match_response(body)
}
