use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "visual-matcher")]
#[command(about = "画像から類似商品を検索", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// マッチングサービスのベースURL（設定・環境変数より優先）
    #[arg(long, global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像1枚で類似商品を検索
    Search {
        /// 画像ファイル
        #[arg(short, long, conflicts_with = "url")]
        file: Option<PathBuf>,

        /// 画像URL
        #[arg(short, long)]
        url: Option<String>,

        /// スコア下限（0.0-10.0）。URL検索ではサービスにも送る
        #[arg(short, long)]
        min_score: Option<f32>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 対話的に検索
    Interactive {
        /// 初期スコア下限（0.0-10.0）
        #[arg(short, long)]
        min_score: Option<f32>,
    },

    /// サービスの稼働確認
    Ping,

    /// 設定を表示/編集
    Config {
        /// ベースURLを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// タイムアウト秒数を設定（0で無効）
        #[arg(long)]
        set_timeout: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
