//! 検索オーケストレーター
//!
//! 状態遷移:
//! - Idle / Success / Failed --search--> Loading
//! - Loading --成功--> Success
//! - Loading --失敗--> Failed
//! - Loading 中の search は何もしない（同時に1リクエストまで）
//!
//! 通信そのものは行わない。`search` が返す `SearchTicket` を呼び出し側が
//! 送信し、結果を `complete` に戻す。

use crate::error::{Error, Result};
use crate::source::{ImageSource, InputManager};
use crate::types::{filter_by_score, MatchResponse, MatchResult, ScoreThreshold};

/// 画像未選択時のメッセージ
pub const NO_SOURCE_MESSAGE: &str = "Please select an image file or enter an image URL first.";

/// 検索状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Loading,
    Success,
    Failed,
}

impl SearchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchState::Idle => "idle",
            SearchState::Loading => "loading",
            SearchState::Success => "success",
            SearchState::Failed => "failed",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading)
    }
}

/// 送信するリクエスト
///
/// ファイルは multipart 本文、URL はクエリパラメータで送る（サービス側の仕様）。
#[derive(Debug, Clone, PartialEq)]
pub enum MatchRequest {
    Upload {
        file_name: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
    Url {
        url: String,
        min_score: f32,
    },
}

/// 発行済みリクエスト
///
/// `generation` は発行時の入力ソースの世代番号。
#[derive(Debug, Clone)]
pub struct SearchTicket {
    pub generation: u64,
    pub request: MatchRequest,
}

/// ユーザーへの通知
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// 入力不足（リクエストは送っていない）
    Validation(String),
    /// 検索失敗
    Failure(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Validation(msg) | Notice::Failure(msg) => msg,
        }
    }
}

/// セッション状態を所有するオーケストレーター
#[derive(Debug, Default)]
pub struct SearchOrchestrator {
    input: InputManager,
    state: SearchState,
    results: Vec<MatchResult>,
    predicted_category: String,
    threshold: ScoreThreshold,
    notice: Option<Notice>,
    in_flight: Option<u64>,
}

impl SearchOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 初期閾値を指定して作成
    pub fn with_threshold(threshold: ScoreThreshold) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn input(&self) -> &InputManager {
        &self.input
    }

    pub fn source(&self) -> &ImageSource {
        self.input.source()
    }

    pub fn preview(&self) -> Option<&str> {
        self.input.preview()
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// サービスから返された全件（フィルタ前）
    pub fn results(&self) -> &[MatchResult] {
        &self.results
    }

    pub fn predicted_category(&self) -> &str {
        &self.predicted_category
    }

    pub fn threshold(&self) -> ScoreThreshold {
        self.threshold
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// 閾値調整が可能か
    pub fn can_adjust_threshold(&self) -> bool {
        !self.results.is_empty()
    }

    /// ローカルファイルを選択し、前回の結果を破棄
    pub fn set_local_file(&mut self, file_name: impl Into<String>, bytes: Vec<u8>) -> Option<&ImageSource> {
        if self.input.set_local_file(file_name, bytes).is_none() {
            return None;
        }
        self.invalidate_results();
        Some(self.input.source())
    }

    /// リモートURLを選択し、前回の結果を破棄
    pub fn set_remote_url(&mut self, url: impl Into<String>) -> Option<&ImageSource> {
        if self.input.set_remote_url(url).is_none() {
            return None;
        }
        self.invalidate_results();
        Some(self.input.source())
    }

    /// スコア閾値を変更
    ///
    /// 結果が空の間は `Error::ThresholdLocked`。
    pub fn set_threshold(&mut self, value: f32) -> Result<ScoreThreshold> {
        if !self.can_adjust_threshold() {
            return Err(Error::ThresholdLocked);
        }
        self.threshold = ScoreThreshold::new(value)?;
        Ok(self.threshold)
    }

    /// 閾値以上の結果（サービスの順序を維持）
    pub fn filtered_results(&self) -> Vec<&MatchResult> {
        filter_by_score(&self.results, self.threshold)
    }

    /// 検索を開始
    ///
    /// # Returns
    /// * `Ok(Some(ticket))` - Loading に遷移。ticket を送信して `complete` に戻す
    /// * `Ok(None)` - 既に Loading 中（何もしない）
    /// * `Err(Error::Validation)` - 画像未選択。状態は変わらない
    pub fn search(&mut self) -> Result<Option<SearchTicket>> {
        if self.state.is_loading() {
            log::debug!("search ignored: request #{:?} still in flight", self.in_flight);
            return Ok(None);
        }

        let request = match self.input.source() {
            ImageSource::None => {
                self.notice = Some(Notice::Validation(NO_SOURCE_MESSAGE.to_string()));
                return Err(Error::Validation(NO_SOURCE_MESSAGE.to_string()));
            }
            ImageSource::LocalFile(local) => MatchRequest::Upload {
                file_name: local.file_name.clone(),
                mime_type: local.mime_type.clone(),
                bytes: local.bytes.clone(),
            },
            ImageSource::RemoteUrl(url) => MatchRequest::Url {
                url: url.clone(),
                min_score: self.threshold.value(),
            },
        };

        let generation = self.input.generation();
        self.state = SearchState::Loading;
        self.in_flight = Some(generation);
        self.notice = None;

        Ok(Some(SearchTicket { generation, request }))
    }

    /// リクエスト完了を反映
    ///
    /// 発行後に入力が差し替えられていた場合は結果を捨てて Idle に戻り、
    /// `Error::StaleResponse` を返す（通知はしない）。
    pub fn complete(&mut self, generation: u64, outcome: Result<MatchResponse>) -> Result<SearchState> {
        let current = self.input.generation();
        let expected = self.in_flight.take();

        if expected != Some(generation) || generation != current {
            log::debug!("discarding response for source #{} (current #{})", generation, current);
            if expected.is_some() {
                self.state = SearchState::Idle;
            }
            return Err(Error::StaleResponse {
                issued: generation,
                current,
            });
        }

        match outcome {
            Ok(response) => {
                log::debug!(
                    "{} matches received, predicted category {:?}",
                    response.matches.len(),
                    response.predicted_category
                );
                self.predicted_category = response.predicted_category;
                self.results = response.matches;
                self.state = SearchState::Success;
            }
            Err(e) => {
                self.results.clear();
                self.predicted_category.clear();
                self.notice = Some(Notice::Failure(e.to_string()));
                self.state = SearchState::Failed;
            }
        }

        Ok(self.state)
    }

    fn invalidate_results(&mut self) {
        self.results.clear();
        self.predicted_category.clear();
        self.notice = None;
        // 送信中なら完了まで Loading を維持する
        if !self.state.is_loading() {
            self.state = SearchState::Idle;
        }
    }
}
