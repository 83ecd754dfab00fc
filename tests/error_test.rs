//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use std::path::Path;
use tempfile::tempdir;
use visual_matcher::error::MatcherError;
use visual_matcher::loader;

/// 存在しないファイルを読み込んだ場合
#[test]
fn test_load_nonexistent_file() {
    let result = loader::load_image(Path::new("/nonexistent/path/12345.jpg"));
    assert!(matches!(result, Err(MatcherError::FileNotFound(_))));
}

/// 画像以外の拡張子
#[test]
fn test_load_unsupported_extension() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "hello").unwrap();

    let result = loader::load_image(&path);
    assert!(matches!(result, Err(MatcherError::UnsupportedImage(_))));
}

/// フォルダを指定した場合
#[test]
fn test_load_directory() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = loader::load_image(dir.path());
    assert!(matches!(result, Err(MatcherError::FileNotFound(_))));
}

/// 画像ファイルの読み込み
#[test]
fn test_load_image_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("Query.JPG");
    std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();

    let image = loader::load_image(&path).unwrap();
    assert_eq!(image.file_name, "Query.JPG");
    assert_eq!(image.bytes.len(), 4);
}

/// MatcherErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        MatcherError::Config("テスト設定エラー".to_string()),
        MatcherError::FileNotFound("test.jpg".to_string()),
        MatcherError::UnsupportedImage("test.gif".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: MatcherError = io_err.into();

    assert!(matches!(err, MatcherError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: MatcherError = json_err.into();

    assert!(matches!(err, MatcherError::JsonParse(_)));
}

/// common::Errorは透過的に表示される
#[test]
fn test_common_error_transparent() {
    let common_err = visual_matcher_common::Error::Transport("bad image".to_string());
    let err: MatcherError = common_err.into();

    assert!(matches!(err, MatcherError::Common(_)));
    assert_eq!(format!("{}", err), "bad image");
}
