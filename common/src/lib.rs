//! Visual Product Matcher Common Library
//!
//! CLIとWeb(WASM)で共有されるセッション状態と型。
//! 通信は行わない（送信は呼び出し側の責務）。

pub mod error;
pub mod orchestrator;
pub mod parser;
pub mod source;
pub mod types;

pub use error::{Error, Result};
pub use orchestrator::{MatchRequest, Notice, SearchOrchestrator, SearchState, SearchTicket, NO_SOURCE_MESSAGE};
pub use parser::{extract_error_detail, interpret_response, parse_match_response, GENERIC_ERROR_MESSAGE};
pub use source::{ImageSource, InputManager, LocalImage};
pub use types::{filter_by_score, resolve_image_url, MatchResponse, MatchResult, ScoreThreshold};
