//! HTTPクライアントテスト
//!
//! 送信せずにリクエストの形だけを検証する

use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use visual_matcher::client::HttpMatchClient;
use visual_matcher_common::MatchRequest;

fn client() -> HttpMatchClient {
    HttpMatchClient::new("http://127.0.0.1:5000/", Some(Duration::from_secs(5))).unwrap()
}

/// ファイルは multipart 本文、クエリなし
#[test]
fn test_upload_request_shape() {
    let request = client()
        .build_request(&MatchRequest::Upload {
            file_name: "query.jpg".into(),
            mime_type: "image/jpeg".into(),
            bytes: vec![0xFF, 0xD8, 0xFF],
        })
        .unwrap();

    assert_eq!(request.method(), reqwest::Method::POST);
    assert_eq!(request.url().as_str(), "http://127.0.0.1:5000/match");
    assert_eq!(request.url().query(), None);

    let content_type = request.headers()[CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    assert!(request.body().is_some());
}

/// URLはクエリパラメータ、本文なし
#[test]
fn test_url_request_shape() {
    let request = client()
        .build_request(&MatchRequest::Url {
            url: "http://x/a b.jpg?size=large".into(),
            min_score: 2.0,
        })
        .unwrap();

    assert_eq!(request.method(), reqwest::Method::POST);
    assert_eq!(request.url().path(), "/match");
    assert!(request.body().is_none());
    assert!(request.headers().get(CONTENT_TYPE).is_none());

    let pairs: Vec<(String, String)> = request
        .url()
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0], ("url".to_string(), "http://x/a b.jpg?size=large".to_string()));
    assert_eq!(pairs[1].0, "min_score");
    assert_eq!(pairs[1].1.parse::<f32>().unwrap(), 2.0);
}

#[test]
fn test_invalid_mime_type() {
    let result = client().build_request(&MatchRequest::Upload {
        file_name: "query.jpg".into(),
        mime_type: "not a mime".into(),
        bytes: vec![1],
    });
    assert!(result.is_err());
}

#[test]
fn test_image_url() {
    let client = client();
    assert_eq!(client.base_url(), "http://127.0.0.1:5000");
    assert_eq!(client.image_url("42.jpg"), "http://127.0.0.1:5000/images/42.jpg");
}

/// 接続できない場合は汎用メッセージの Transport エラー
#[tokio::test]
async fn test_unreachable_service() {
    // 予約済みポート 9（discard）には通常何も待ち受けていない
    let client = HttpMatchClient::new("http://127.0.0.1:9", Some(Duration::from_secs(2))).unwrap();
    let err = client
        .send(MatchRequest::Url {
            url: "http://x/a.jpg".into(),
            min_score: 0.0,
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), visual_matcher_common::GENERIC_ERROR_MESSAGE);
}
