//! 検索セッション
//!
//! オーケストレーターを所有し、送信をバックグラウンドタスクで行う。
//! 完了はチャネル経由で戻り、`wait_for_completion` で状態に反映する。

use crate::client::MatchClient;
use crate::error::Result;
use crate::loader::ImageFile;
use std::sync::Arc;
use tokio::sync::mpsc;
use visual_matcher_common::{
    Error, MatchResponse, Notice, ScoreThreshold, SearchOrchestrator, SearchState,
};

/// 送信タスクの結果
#[derive(Debug)]
pub struct SearchOutcome {
    /// 発行時の入力ソース世代
    pub generation: u64,
    pub result: visual_matcher_common::Result<MatchResponse>,
}

pub struct Session<C: MatchClient> {
    orchestrator: SearchOrchestrator,
    client: Arc<C>,
    tx: mpsc::UnboundedSender<SearchOutcome>,
    rx: mpsc::UnboundedReceiver<SearchOutcome>,
}

impl<C: MatchClient> Session<C> {
    pub fn new(client: C, threshold: ScoreThreshold) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            orchestrator: SearchOrchestrator::with_threshold(threshold),
            client: Arc::new(client),
            tx,
            rx,
        }
    }

    pub fn orchestrator(&self) -> &SearchOrchestrator {
        &self.orchestrator
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.orchestrator.take_notice()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// ファイルを選択。空ファイルなら何もせず false
    pub fn select_file(&mut self, image: ImageFile) -> bool {
        self.orchestrator
            .set_local_file(image.file_name, image.bytes)
            .is_some()
    }

    /// URLを選択。空白なら何もせず false
    pub fn select_url(&mut self, url: &str) -> bool {
        self.orchestrator.set_remote_url(url).is_some()
    }

    pub fn set_threshold(&mut self, value: f32) -> Result<ScoreThreshold> {
        Ok(self.orchestrator.set_threshold(value)?)
    }

    /// 検索を発行
    ///
    /// # Returns
    /// * `Ok(true)` - 送信タスクを起動した（状態は Loading）
    /// * `Ok(false)` - 既に送信中のため何もしなかった
    /// * `Err` - 画像未選択
    pub fn search(&mut self) -> Result<bool> {
        let Some(ticket) = self.orchestrator.search()? else {
            return Ok(false);
        };

        log::info!(
            "dispatching search for source #{} ({})",
            ticket.generation,
            self.orchestrator.source().kind()
        );

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.submit(ticket.request).await;
            // 受信側はセッションが保持しているので失敗しない
            let _ = tx.send(SearchOutcome {
                generation: ticket.generation,
                result,
            });
        });

        Ok(true)
    }

    /// 次の完了を待って反映
    ///
    /// 入力が差し替えられた後の古いレスポンスは破棄し `Ok(None)` を返す。
    /// 送信中でなければ待たずに `Ok(None)`。
    pub async fn wait_for_completion(&mut self) -> Result<Option<SearchState>> {
        if !self.orchestrator.state().is_loading() {
            return Ok(None);
        }
        let Some(outcome) = self.rx.recv().await else {
            return Ok(None);
        };

        match self.orchestrator.complete(outcome.generation, outcome.result) {
            Ok(state) => Ok(Some(state)),
            Err(e @ Error::StaleResponse { .. }) => {
                log::debug!("{}", e);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 検索を発行して完了まで待つ
    pub async fn search_and_wait(&mut self) -> Result<Option<SearchState>> {
        if !self.search()? {
            return Ok(None);
        }
        self.wait_for_completion().await
    }
}
