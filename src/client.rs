//! マッチングサービスとの通信
//!
//! - ファイル: `POST <base>/match`（multipart、フィールド名 `file`）
//! - URL: `POST <base>/match?url=...&min_score=...`（本文なし）

use crate::error::Result;
use reqwest::multipart::{Form, Part};
use std::future::Future;
use std::time::Duration;
use visual_matcher_common::{
    interpret_response, resolve_image_url, Error, MatchRequest, MatchResponse,
    GENERIC_ERROR_MESSAGE,
};

/// multipart のフィールド名
pub const FILE_FIELD: &str = "file";

/// マッチングサービスへの送信口
///
/// 失敗はすべて `Error::Transport`（ユーザー向けメッセージ付き）で返す。
pub trait MatchClient: Send + Sync + 'static {
    fn submit(
        &self,
        request: MatchRequest,
    ) -> impl Future<Output = visual_matcher_common::Result<MatchResponse>> + Send;
}

/// reqwest によるクライアント
#[derive(Debug, Clone)]
pub struct HttpMatchClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMatchClient {
    /// # Arguments
    /// * `base_url` - サービスのベースURL（末尾スラッシュなし）
    /// * `timeout` - `None` ならタイムアウトなし
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let user_agent = format!("visual-matcher/{}", env!("CARGO_PKG_VERSION"));
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn match_url(&self) -> String {
        format!("{}/match", self.base_url)
    }

    /// 結果の画像識別子を表示用URLへ
    pub fn image_url(&self, image: &str) -> String {
        resolve_image_url(&self.base_url, image)
    }

    /// HTTPリクエストを組み立てる（送信はしない）
    pub fn build_request(&self, request: &MatchRequest) -> Result<reqwest::Request> {
        let builder = self.client.post(self.match_url());

        let builder = match request {
            MatchRequest::Upload {
                file_name,
                mime_type,
                bytes,
            } => {
                let part = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime_type)?;
                builder.multipart(Form::new().part(FILE_FIELD, part))
            }
            MatchRequest::Url { url, min_score } => builder
                .query(&[("url", url.as_str())])
                .query(&[("min_score", min_score)]),
        };

        Ok(builder.build()?)
    }

    /// リクエストを送信してレスポンスを解釈
    pub async fn send(&self, request: MatchRequest) -> visual_matcher_common::Result<MatchResponse> {
        let http_request = self.build_request(&request).map_err(|e| {
            log::warn!("failed to build match request: {}", e);
            transport_failure()
        })?;

        log::info!("POST {}", http_request.url());

        let response = self.client.execute(http_request).await.map_err(|e| {
            log::warn!("match request failed: {}", e);
            transport_failure()
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            log::warn!("failed to read match response: {}", e);
            transport_failure()
        })?;
        log::debug!("match response: {} ({} bytes)", status, body.len());

        interpret_response(status.as_u16(), &body)
    }

    /// 稼働確認（`GET <base>/`）
    ///
    /// サービスの `message` を返す。
    pub async fn ping(&self) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or(body);
        Ok(message)
    }
}

impl MatchClient for HttpMatchClient {
    fn submit(
        &self,
        request: MatchRequest,
    ) -> impl Future<Output = visual_matcher_common::Result<MatchResponse>> + Send {
        self.send(request)
    }
}

fn transport_failure() -> Error {
    Error::Transport(GENERIC_ERROR_MESSAGE.to_string())
}
