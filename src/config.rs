use crate::error::{MatcherError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use visual_matcher_common::ScoreThreshold;

/// ベースURLを上書きする環境変数
pub const BASE_URL_ENV: &str = "VISUAL_MATCHER_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    /// 0 でタイムアウトなし
    pub timeout_seconds: u64,
    pub default_min_score: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            timeout_seconds: 120,
            default_min_score: 0.0,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MatcherError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("visual-matcher").join("config.json"))
    }

    /// 実際に使うベースURL
    ///
    /// 優先順位: 引数 > 環境変数 > 設定ファイル
    pub fn resolve_base_url(&self, cli_override: Option<&str>) -> Result<String> {
        let env_value = std::env::var(BASE_URL_ENV).ok();
        let url = cli_override
            .map(str::to_string)
            .or(env_value)
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| self.base_url.clone());

        normalize_base_url(&url)
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }

    pub fn min_score(&self) -> ScoreThreshold {
        ScoreThreshold::clamped(self.default_min_score)
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        self.base_url = normalize_base_url(&url)?;
        self.save()
    }

    pub fn set_timeout(&mut self, seconds: u64) -> Result<()> {
        self.timeout_seconds = seconds;
        self.save()
    }
}

/// 末尾のスラッシュを除去し、スキームを検証
pub fn normalize_base_url(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(MatcherError::Config(format!(
            "ベースURLは http:// または https:// で始めてください: {}",
            url
        )));
    }
    Ok(url.to_string())
}
