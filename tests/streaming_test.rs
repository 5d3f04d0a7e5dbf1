use anyhow::Result;
use fit_coach::api::{ApiError, ApiKey, ChatClient};
use fit_coach::config::Config;
use fit_coach::models::UserProfile;
use fit_coach::prompt;
use fit_coach::session::{self, BufferSink, SessionRunner, COMPLETION_MARKER};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;

fn sse_body(fragments: &[&str]) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        "data: {}\n\n",
        json!({"choices": [{"index": 0, "delta": {"role": "assistant", "content": ""}}]})
    ));
    for fragment in fragments {
        body.push_str(&format!(
            "data: {}\n\n",
            json!({"choices": [{"index": 0, "delta": {"content": fragment}}]})
        ));
    }
    body.push_str(&format!(
        "data: {}\n\n",
        json!({"choices": [{"index": 0, "delta": {}, "finish_reason": "stop"}]})
    ));
    body.push_str("data: [DONE]\n\n");
    body
}

fn config_for(server: &ServerGuard) -> Config {
    let mut config = Config::default();
    config.openai.base_url = server.url();
    config
}

fn test_key() -> ApiKey {
    ApiKey::resolve(Some("sk-test"), None).unwrap()
}

#[tokio::test]
async fn test_streams_fragments_into_sink() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(sse_body(&["Here", " is", " your plan"]))
        .create_async()
        .await;

    let config = config_for(&server);
    let mut sink = BufferSink::new();
    let stats = session::run_session(
        &config,
        test_key(),
        &UserProfile::sample(),
        "Make it easier today",
        &mut sink,
    )
    .await?;

    mock.assert_async().await;
    assert_eq!(sink.contents(), format!("Here is your plan\n{}", COMPLETION_MARKER));
    assert_eq!(stats.fragments, 3);
    assert_eq!(stats.skipped, 1);
    Ok(())
}

#[tokio::test]
async fn test_request_body_carries_system_then_user() -> Result<()> {
    let profile = UserProfile::sample();
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "system", "content": prompt::system_prompt(&profile)},
                {"role": "user", "content": "I only have 5 minutes"}
            ],
            "temperature": 0.3,
            "stream": true
        })))
        .with_status(200)
        .with_body(sse_body(&["ok"]))
        .create_async()
        .await;

    let config = config_for(&server);
    let client = ChatClient::new(&config.openai, test_key())?;
    let mut sink = BufferSink::new();

    SessionRunner::new(&profile, &config.openai, &client)
        .run("I only have 5 minutes", &mut sink)
        .await?;

    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_unauthorized_status_is_mapped() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#)
        .create_async()
        .await;

    let config = config_for(&server);
    let mut sink = BufferSink::new();
    let err = session::run_session(&config, test_key(), &UserProfile::sample(), "hi", &mut sink)
        .await
        .unwrap_err();

    mock.assert_async().await;
    match err.downcast_ref::<ApiError>() {
        Some(ApiError::Unauthorized(message)) => assert_eq!(message, "Incorrect API key provided"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(sink.contents().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_rate_limit_is_not_retried() -> Result<()> {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .expect(1)
        .create_async()
        .await;

    let config = config_for(&server);
    let mut sink = BufferSink::new();
    let err = session::run_session(&config, test_key(), &UserProfile::sample(), "hi", &mut sink)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::RateLimited(_))));
    Ok(())
}

#[tokio::test]
async fn test_provider_error_mid_stream() -> Result<()> {
    let body = format!(
        "data: {}\n\ndata: {}\n\n",
        json!({"choices": [{"delta": {"content": "Jump"}}]}),
        json!({"error": {"message": "The server had an error while processing your request"}})
    );

    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let config = config_for(&server);
    let mut sink = BufferSink::new();
    let err = session::run_session(&config, test_key(), &UserProfile::sample(), "hi", &mut sink)
        .await
        .unwrap_err();

    assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Provider(_))));
    assert_eq!(sink.contents(), "Jump");
    assert!(!sink.is_finished());
    Ok(())
}

#[test]
fn test_missing_credential_is_rejected() {
    let err = ApiKey::resolve(Some(""), None).unwrap_err();
    assert!(matches!(err, ApiError::MissingCredential(_)));
}
