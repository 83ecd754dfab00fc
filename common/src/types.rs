//! マッチング結果の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - MatchResult: 類似商品1件
//! - MatchResponse: マッチングサービスのレスポンス全体
//! - ScoreThreshold: 表示用のスコア下限

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 類似商品1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// 画像の識別子（`<base>/images/<image>` で解決）
    pub image: String,

    pub score: f32,

    /// カテゴリ（サービスは `cat` で返すこともある）
    #[serde(default, alias = "cat")]
    pub category: String,

    /// 商品名（返されない場合あり）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// `POST /match` のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(default)]
    pub predicted_category: String,

    /// サービスが返した関連度順。並べ替え禁止
    #[serde(default)]
    pub matches: Vec<MatchResult>,
}

/// スコア閾値（0.0〜10.0）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreThreshold(f32);

impl ScoreThreshold {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 10.0;

    /// 範囲外・NaN はエラー
    pub fn new(value: f32) -> Result<Self> {
        if value.is_nan() || !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(Error::InvalidThreshold(value));
        }
        Ok(Self(value))
    }

    /// 範囲内に丸める（設定ファイル由来の値用）
    pub fn clamped(value: f32) -> Self {
        if value.is_nan() {
            return Self(Self::MIN);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn accepts(self, result: &MatchResult) -> bool {
        result.score >= self.0
    }
}

impl std::fmt::Display for ScoreThreshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 閾値以上の結果を元の順序のまま返す
pub fn filter_by_score(results: &[MatchResult], threshold: ScoreThreshold) -> Vec<&MatchResult> {
    results.iter().filter(|r| threshold.accepts(r)).collect()
}

/// 画像識別子を表示用URLへ解決
///
/// 既に絶対URLならそのまま返す。
///
/// # Examples
/// ```
/// use visual_matcher_common::resolve_image_url;
///
/// assert_eq!(
///     resolve_image_url("http://127.0.0.1:5000/", "12.jpg"),
///     "http://127.0.0.1:5000/images/12.jpg"
/// );
/// ```
pub fn resolve_image_url(base_url: &str, image: &str) -> String {
    if image.starts_with("http://") || image.starts_with("https://") || image.starts_with("data:") {
        return image.to_string();
    }
    format!(
        "{}/images/{}",
        base_url.trim_end_matches('/'),
        image.trim_start_matches('/')
    )
}
