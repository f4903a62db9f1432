//! Integration tests for `TextProcessingClient` using wiremock HTTP mocks.

use tweetsent_core::LexiconScores;
use tweetsent_sentiment::{LexiconScorer, SentimentError, TextProcessingClient};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> TextProcessingClient {
    TextProcessingClient::new(&format!("{}/api/sentiment/", server.uri()), 5, "tweetsent-test")
        .expect("client construction should not fail")
        .with_retries(2, 1)
}

fn probability_body(pos: f64, neutral: f64, neg: f64) -> serde_json::Value {
    serde_json::json!({
        "probability": { "neg": neg, "neutral": neutral, "pos": pos },
        "label": "neutral"
    })
}

#[tokio::test]
async fn score_posts_form_text_and_parses_probabilities() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sentiment/"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("text=bob+great+win"))
        .respond_with(ResponseTemplate::new(200).set_body_json(probability_body(0.69, 0.85, 0.31)))
        .expect(1)
        .mount(&server)
        .await;

    let scores = test_client(&server).score("bob great win").await.unwrap();
    assert_eq!(
        scores,
        LexiconScores {
            positive: 0.69,
            neutral: 0.85,
            negative: 0.31
        }
    );
}

#[tokio::test]
async fn server_error_is_retried_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sentiment/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/sentiment/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(probability_body(0.2, 0.5, 0.8)))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    let scores = test_client(&server).score("bad").await.unwrap();
    assert!((scores.negative - 0.8).abs() < f64::EPSILON);
}

#[tokio::test]
async fn server_error_fails_once_retries_run_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sentiment/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let err = test_client(&server).score("anything").await.unwrap_err();
    assert!(matches!(err, SentimentError::LexiconStatus { status: 503 }));
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sentiment/"))
        .respond_with(ResponseTemplate::new(400).set_body_string("text too long"))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server).score("anything").await.unwrap_err();
    assert!(matches!(err, SentimentError::LexiconStatus { status: 400 }));
}

#[tokio::test]
async fn unusable_body_is_an_error_not_a_default_score() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sentiment/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server).score("anything").await.unwrap_err();
    assert!(matches!(err, SentimentError::LexiconResponse(_)));
}

#[tokio::test]
async fn empty_text_is_still_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sentiment/"))
        .and(body_string_contains("text="))
        .respond_with(ResponseTemplate::new(200).set_body_json(probability_body(0.5, 0.5, 0.5)))
        .expect(1)
        .mount(&server)
        .await;

    assert!(test_client(&server).score("").await.is_ok());
}
