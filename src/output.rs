//! 検索結果の表示

use crate::client::MatchClient;
use crate::error::Result;
use crate::session::Session;
use indicatif::ProgressBar;
use serde::Serialize;
use std::time::Duration;
use visual_matcher_common::{resolve_image_url, ImageSource, SearchOrchestrator, SearchState};

/// 表示用の結果（フィルタ後）
#[derive(Debug, Serialize)]
pub struct ResultView<'a> {
    pub predicted_category: &'a str,
    pub min_score: f32,
    /// フィルタ前の件数
    pub total: usize,
    pub matches: Vec<MatchView<'a>>,
}

#[derive(Debug, Serialize)]
pub struct MatchView<'a> {
    pub rank: usize,
    pub image_url: String,
    pub score: f32,
    pub category: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}

pub fn result_view<'a>(orchestrator: &'a SearchOrchestrator, base_url: &str) -> ResultView<'a> {
    let matches = orchestrator
        .filtered_results()
        .into_iter()
        .enumerate()
        .map(|(i, m)| MatchView {
            rank: i + 1,
            image_url: resolve_image_url(base_url, &m.image),
            score: m.score,
            category: &m.category,
            name: m.name.as_deref(),
        })
        .collect();

    ResultView {
        predicted_category: orchestrator.predicted_category(),
        min_score: orchestrator.threshold().value(),
        total: orchestrator.results().len(),
        matches,
    }
}

/// 入力ソースの説明（Data URL は長いので表示しない）
pub fn describe_source(source: &ImageSource) -> String {
    match source {
        ImageSource::None => "（未選択）".to_string(),
        ImageSource::LocalFile(local) => format!(
            "{} ({}, {} bytes)",
            local.file_name,
            local.mime_type,
            local.bytes.len()
        ),
        ImageSource::RemoteUrl(url) => url.clone(),
    }
}

pub fn render_text(view: &ResultView) -> String {
    let mut out = String::new();
    out.push_str(&format!("予測カテゴリ: {}\n", view.predicted_category));
    out.push_str(&format!(
        "類似商品: {}件（スコア {:.2} 以上 / 全{}件）\n",
        view.matches.len(),
        view.min_score,
        view.total
    ));

    for m in &view.matches {
        out.push_str(&format!(
            "{:>3}  {:>6.2}  {:<16}  {}",
            m.rank, m.score, m.category, m.image_url
        ));
        if let Some(name) = m.name {
            out.push_str(&format!("  {}", name));
        }
        out.push('\n');
    }

    out
}

pub fn render_json(view: &ResultView) -> Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}

/// 送信中はスピナーを表示して完了を待つ
pub async fn search_with_spinner<C: MatchClient>(session: &mut Session<C>) -> Result<Option<SearchState>> {
    if !session.search()? {
        return Ok(None);
    }

    let spinner = create_spinner("Processing...");
    let state = session.wait_for_completion().await;
    spinner.finish_and_clear();
    state
}

/// 通知があれば表示
pub fn print_notice<C: MatchClient>(session: &mut Session<C>) {
    if let Some(notice) = session.take_notice() {
        println!("⚠ {}", notice.message());
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message.to_string());
    spinner
}
