//! 対話式検索モジュール
//!
//! 1つのセッション内で画像の選択・検索・閾値調整を繰り返す。

use crate::client::HttpMatchClient;
use crate::error::Result;
use crate::loader;
use crate::output::{describe_source, print_notice, render_text, result_view, search_with_spinner};
use crate::session::Session;
use dialoguer::Input;
use std::path::PathBuf;
use visual_matcher_common::SearchState;

/// 対話アクション
#[derive(Debug, PartialEq)]
pub enum SessionAction {
    /// ローカルファイルを選択
    File(PathBuf),
    /// URLを選択
    Url(String),
    /// 検索を実行
    Search,
    /// スコア閾値を変更
    Threshold(f32),
    /// 結果を再表示
    Show,
    Help,
    Quit,
    /// 解釈できない入力
    Unknown(String),
}

const HELP: &str = "操作: f <パス> ファイル選択 / u <URL> URL選択 / s 検索 / t <スコア> 閾値変更 / r 結果表示 / q 終了";

/// 入力行をアクションに変換
pub fn parse_action(input: &str) -> SessionAction {
    let trimmed = input.trim();
    let (command, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (trimmed, ""),
    };

    match (command, arg) {
        ("f" | "file", path) if !path.is_empty() => SessionAction::File(PathBuf::from(path)),
        ("u" | "url", url) if !url.is_empty() => SessionAction::Url(url.to_string()),
        ("s" | "search", "") => SessionAction::Search,
        ("t" | "threshold", value) => match value.parse::<f32>() {
            Ok(v) => SessionAction::Threshold(v),
            Err(_) => SessionAction::Unknown(trimmed.to_string()),
        },
        ("r" | "results", "") => SessionAction::Show,
        ("h" | "help" | "?", "") => SessionAction::Help,
        ("q" | "Q" | "quit", "") => SessionAction::Quit,
        _ => SessionAction::Unknown(trimmed.to_string()),
    }
}

/// 対話式で検索
pub async fn run_interactive(mut session: Session<HttpMatchClient>) -> Result<()> {
    let base_url = session.client().base_url().to_string();

    println!("🔎 接続先: {}", base_url);
    println!("{}\n", HELP);

    loop {
        let input: String = Input::new()
            .with_prompt(prompt_for(session.orchestrator().state()))
            .allow_empty(true)
            .interact_text()?;

        match parse_action(&input) {
            SessionAction::File(path) => match loader::load_image(&path) {
                Ok(image) => {
                    if session.select_file(image) {
                        println!("  → {}", describe_source(session.orchestrator().source()));
                    } else {
                        println!("  → 空のファイルです、無視しました");
                    }
                }
                Err(e) => println!("  ⚠ {}", e),
            },
            SessionAction::Url(url) => {
                session.select_url(&url);
                println!("  → {}", describe_source(session.orchestrator().source()));
            }
            SessionAction::Search => {
                match search_with_spinner(&mut session).await {
                    Ok(Some(SearchState::Success)) => {
                        print!("{}", render_text(&result_view(session.orchestrator(), &base_url)));
                    }
                    Ok(_) => {}
                    Err(e) => log::debug!("search rejected: {}", e),
                }
                print_notice(&mut session);
            }
            SessionAction::Threshold(value) => match session.set_threshold(value) {
                Ok(threshold) => {
                    println!("  → 閾値 {:.2}", threshold.value());
                    print!("{}", render_text(&result_view(session.orchestrator(), &base_url)));
                }
                Err(e) => println!("  ⚠ {}", e),
            },
            SessionAction::Show => {
                if session.orchestrator().results().is_empty() {
                    println!("  → 結果はありません");
                } else {
                    print!("{}", render_text(&result_view(session.orchestrator(), &base_url)));
                }
            }
            SessionAction::Help => println!("{}", HELP),
            SessionAction::Quit => break,
            SessionAction::Unknown(text) if text.is_empty() => {}
            SessionAction::Unknown(text) => println!("  ⚠ 不明な操作: {}\n{}", text, HELP),
        }
    }

    Ok(())
}

fn prompt_for(state: SearchState) -> String {
    format!("[{}]", state.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_and_url() {
        assert_eq!(parse_action("f ./shoe.jpg"), SessionAction::File(PathBuf::from("./shoe.jpg")));
        assert_eq!(
            parse_action("u   http://x/a.jpg "),
            SessionAction::Url("http://x/a.jpg".to_string())
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_action("s"), SessionAction::Search);
        assert_eq!(parse_action("r"), SessionAction::Show);
        assert_eq!(parse_action("q"), SessionAction::Quit);
        assert_eq!(parse_action("?"), SessionAction::Help);
        assert_eq!(parse_action("t 2.5"), SessionAction::Threshold(2.5));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_action("t abc"), SessionAction::Unknown("t abc".to_string()));
        assert_eq!(parse_action("f"), SessionAction::Unknown("f".to_string()));
        assert_eq!(parse_action(""), SessionAction::Unknown(String::new()));
    }
}
