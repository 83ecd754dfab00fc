//! Visual Product Matcher client
//!
//! 画像（ファイルまたはURL）をマッチングサービスへ送り、類似商品を表示する。

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod interactive;
pub mod loader;
pub mod output;
pub mod session;
