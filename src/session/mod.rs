//! The prompt session: build the request from a profile, stream the answer
//! into a sink.

use anyhow::Result;
use futures::{Stream, StreamExt};

use crate::api::{ApiError, ApiKey, ChatClient, ChatRequest};
use crate::config::{Config, OpenAiConfig};
use crate::models::UserProfile;
use crate::prompt;

mod sink;

pub use sink::{BufferSink, ConsoleSink, ResponseSink, COMPLETION_MARKER};

/// Progress of a single exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    AwaitingFirstFragment,
    Streaming,
    Done,
}

impl SessionState {
    fn advance(&mut self, next: SessionState) {
        tracing::debug!("Session state {:?} -> {:?}", self, next);
        *self = next;
    }
}

/// Summary of a relayed response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    /// Fragments written to the sink
    pub fragments: usize,
    /// Empty fragments that were dropped
    pub skipped: usize,
    pub chars: usize,
}

/// Write every non-empty fragment to the sink in arrival order, then finish it.
///
/// A transport error ends the relay immediately; `finish` is not called.
pub async fn relay<S>(mut stream: S, sink: &mut dyn ResponseSink) -> Result<RelayStats>
where
    S: Stream<Item = Result<String, ApiError>> + Unpin,
{
    let mut state = SessionState::NotStarted;
    let mut stats = RelayStats::default();

    sink.begin()?;
    state.advance(SessionState::AwaitingFirstFragment);

    while let Some(fragment) = stream.next().await {
        let fragment = fragment?;

        if fragment.is_empty() {
            stats.skipped += 1;
            continue;
        }

        if state == SessionState::AwaitingFirstFragment {
            state.advance(SessionState::Streaming);
        }

        sink.write_fragment(&fragment)?;
        stats.fragments += 1;
        stats.chars += fragment.chars().count();
    }

    state.advance(SessionState::Done);
    sink.finish()?;

    tracing::info!(
        "Relayed {} fragments ({} chars, {} empty skipped)",
        stats.fragments,
        stats.chars,
        stats.skipped
    );
    Ok(stats)
}

/// Runs one stateless exchange for a profile against a chat client
pub struct SessionRunner<'a> {
    profile: &'a UserProfile,
    settings: &'a OpenAiConfig,
    client: &'a ChatClient,
}

impl<'a> SessionRunner<'a> {
    pub fn new(profile: &'a UserProfile, settings: &'a OpenAiConfig, client: &'a ChatClient) -> Self {
        Self {
            profile,
            settings,
            client,
        }
    }

    pub fn request(&self, message: &str) -> ChatRequest {
        build_request(self.profile, self.settings, message)
    }

    pub async fn run(&self, message: &str, sink: &mut dyn ResponseSink) -> Result<RelayStats> {
        let request = self.request(message);
        let stream = self.client.stream_chat(&request).await?;
        relay(stream, sink).await
    }
}

/// Pure request construction, independent of any network state
pub fn build_request(profile: &UserProfile, settings: &OpenAiConfig, message: &str) -> ChatRequest {
    ChatRequest::new(settings, prompt::system_prompt(profile), message.to_string())
}

/// Run one exchange.
///
/// Taking an `ApiKey` means the credential check has already passed, so a
/// missing key can never reach the network.
pub async fn run_session(
    config: &Config,
    api_key: ApiKey,
    profile: &UserProfile,
    message: &str,
    sink: &mut dyn ResponseSink,
) -> Result<RelayStats> {
    let client = ChatClient::new(&config.openai, api_key)?;

    SessionRunner::new(profile, &config.openai, &client)
        .run(message, sink)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn fragments(parts: &[&str]) -> impl Stream<Item = Result<String, ApiError>> + Unpin {
        stream::iter(
            parts
                .iter()
                .map(|p| Ok(p.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn test_relay_concatenates_fragments() {
        let mut sink = BufferSink::new();
        let stats = relay(fragments(&["Here", " is", " your plan"]), &mut sink)
            .await
            .unwrap();

        assert_eq!(sink.contents(), format!("Here is your plan\n{}", COMPLETION_MARKER));
        assert_eq!(stats.fragments, 3);
        assert_eq!(stats.chars, "Here is your plan".len());
    }

    #[tokio::test]
    async fn test_relay_skips_empty_fragments() {
        let mut sink = BufferSink::new();
        let stats = relay(fragments(&["", "Plank", "", " 30s"]), &mut sink)
            .await
            .unwrap();

        assert_eq!(sink.fragment_count(), 2);
        assert_eq!(stats.skipped, 2);
        assert_eq!(sink.contents(), format!("Plank 30s\n{}", COMPLETION_MARKER));
    }

    #[tokio::test]
    async fn test_relay_empty_stream_still_finishes() {
        let mut sink = BufferSink::new();
        let stats = relay(fragments(&[]), &mut sink).await.unwrap();

        assert!(sink.is_finished());
        assert_eq!(stats, RelayStats::default());
        assert_eq!(sink.contents(), format!("\n{}", COMPLETION_MARKER));
    }

    #[tokio::test]
    async fn test_relay_propagates_transport_error() {
        let parts: Vec<Result<String, ApiError>> = vec![
            Ok("Squats".to_string()),
            Err(ApiError::Network("connection reset".to_string())),
            Ok("never".to_string()),
        ];
        let mut sink = BufferSink::new();
        let err = relay(stream::iter(parts), &mut sink).await.unwrap_err();

        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Network(_))));
        assert_eq!(sink.contents(), "Squats");
        assert!(!sink.is_finished());
    }

    #[test]
    fn test_build_request_is_deterministic() {
        let profile = UserProfile::sample();
        let settings = OpenAiConfig::default();

        let first = serde_json::to_string(&build_request(&profile, &settings, "shorter please")).unwrap();
        let second = serde_json::to_string(&build_request(&profile, &settings, "shorter please")).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_transport_error() {
        let mut config = Config::default();
        config.openai.base_url = "http://127.0.0.1:9".to_string();
        config.openai.connect_timeout_seconds = 1;
        let key = ApiKey::resolve(Some("sk-test"), None).unwrap();
        let mut sink = BufferSink::new();

        let err = run_session(&config, key, &UserProfile::sample(), "hi", &mut sink)
            .await
            .unwrap_err();

        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Network(_))));
        assert!(sink.contents().is_empty());
    }
}
