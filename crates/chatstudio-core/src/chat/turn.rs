//! Turn controller: one user submission, end to end.
//!
//! A turn walks Start -> SystemPersisted? -> UserPersisted ->
//! (SendSkipped | Sent). Messages written before a failed send stay in the
//! log; a failed send writes nothing.

use std::sync::Arc;
use std::time::Instant;

use chatstudio_types::chat::{
    ChatMessage, MessageMetadata, MessageRole, TurnOutcome, TurnRequest, TurnStatus,
};
use chatstudio_types::error::StudioError;
use chatstudio_types::llm::InferenceRequest;
use serde_json::json;
use tracing::{info, warn};

use crate::chat::repository::ChatRepository;
use crate::llm::provider::{InferenceProvider, ProviderFactory};
use crate::llm::retry::{with_retry, RetryPolicy};
use crate::redact;
use crate::repository::project::ProjectRepository;
use crate::service::store::StoreService;

/// Orchestrates persistence, redaction and the inference call for a turn.
pub struct TurnController<P: ProjectRepository, C: ChatRepository, F: ProviderFactory> {
    store: Arc<StoreService<P, C>>,
    factory: F,
    retry: RetryPolicy,
}

impl<P: ProjectRepository, C: ChatRepository, F: ProviderFactory> TurnController<P, C, F> {
    pub fn new(store: Arc<StoreService<P, C>>, factory: F) -> Self {
        Self {
            store,
            factory,
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Run one turn against `session_id`.
    ///
    /// `api_key` is only consulted when the turn actually sends; a blank key
    /// counts as missing.
    pub async fn run_turn(
        &self,
        session_id: i64,
        request: &TurnRequest,
        api_key: Option<&str>,
    ) -> Result<TurnOutcome, StudioError> {
        if !(0.0..=1.0).contains(&request.temperature) {
            return Err(StudioError::Validation(format!(
                "temperature must be within [0, 1], got {}",
                request.temperature
            )));
        }

        let system = request
            .system
            .as_deref()
            .filter(|text| !text.trim().is_empty());

        let system_message = match system {
            Some(text) => Some(
                self.store
                    .add_message(session_id, MessageRole::System, text, role_metadata())
                    .await?,
            ),
            None => None,
        };

        let user_text = if request.anonymize {
            redact::sanitize(&request.prompt)
        } else {
            request.prompt.clone()
        };

        let user_message = self
            .store
            .add_message(
                session_id,
                MessageRole::User,
                &user_text,
                user_metadata(request),
            )
            .await?;

        if request.save_only {
            info!(session_id, "Turn saved without sending");
            return Ok(TurnOutcome {
                status: TurnStatus::SendSkipped,
                system_message,
                user_message,
                assistant_message: None,
            });
        }

        let api_key = api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                StudioError::Configuration(
                    "missing API key: pass one explicitly or set OPENAI_API_KEY".to_string(),
                )
            })?;

        let assistant_message = self
            .send(session_id, system, &user_text, request, api_key)
            .await?;

        Ok(TurnOutcome {
            status: TurnStatus::Sent,
            system_message,
            user_message,
            assistant_message: Some(assistant_message),
        })
    }

    async fn send(
        &self,
        session_id: i64,
        system: Option<&str>,
        user_text: &str,
        request: &TurnRequest,
        api_key: &str,
    ) -> Result<ChatMessage, StudioError> {
        let provider = self.factory.build(api_key)?;
        let inference = InferenceRequest {
            model: request.model.clone(),
            input: compose_input(system, user_text),
            temperature: request.temperature,
            reasoning_effort: request.reasoning_effort,
        };

        let started = Instant::now();
        let response = with_retry(self.retry, || provider.respond(&inference))
            .await
            .map_err(|e| {
                warn!(session_id, provider = provider.name(), error = %e, "Inference call failed");
                StudioError::from(e)
            })?;
        let latency_ms = started.elapsed().as_millis() as u64;

        let mut metadata = MessageMetadata::new();
        metadata.insert("model".to_string(), json!(request.model));
        metadata.insert("latency_ms".to_string(), json!(latency_ms));

        let message = self
            .store
            .add_message(
                session_id,
                MessageRole::Assistant,
                &response.output_text,
                metadata,
            )
            .await?;
        info!(session_id, model = %request.model, latency_ms, "Reply received and saved");
        Ok(message)
    }
}

/// Prompt sent to the model: the user text, prefixed by the system text when
/// one was given.
pub fn compose_input(system: Option<&str>, user_text: &str) -> String {
    match system {
        Some(system) => format!("SYSTEM:\n{system}\n\nUSER:\n{user_text}"),
        None => user_text.to_string(),
    }
}

fn role_metadata() -> MessageMetadata {
    let mut metadata = MessageMetadata::new();
    metadata.insert("kind".to_string(), json!("role"));
    metadata
}

fn user_metadata(request: &TurnRequest) -> MessageMetadata {
    let mut metadata = MessageMetadata::new();
    metadata.insert("temperature".to_string(), json!(request.temperature));
    metadata.insert(
        "reasoning_effort".to_string(),
        json!(request.reasoning_effort.to_string()),
    );
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use chatstudio_types::chat::ReasoningEffort;
    use chatstudio_types::llm::{InferenceResponse, LlmError};

    use crate::service::store::tests::{memory_store, MemoryStore};

    // --- Mock provider ---

    #[derive(Clone)]
    enum MockReply {
        Text(String),
        Auth,
        /// Fail with a transient error this many times, then answer.
        FlakyThen(u32, String),
    }

    #[derive(Default)]
    struct Calls {
        count: AtomicU32,
        inputs: Mutex<Vec<InferenceRequest>>,
        keys: Mutex<Vec<String>>,
    }

    struct MockFactory {
        reply: MockReply,
        calls: Arc<Calls>,
    }

    struct MockProvider {
        reply: MockReply,
        calls: Arc<Calls>,
    }

    impl ProviderFactory for MockFactory {
        type Provider = MockProvider;

        fn build(&self, api_key: &str) -> Result<MockProvider, LlmError> {
            self.calls.keys.lock().unwrap().push(api_key.to_string());
            Ok(MockProvider {
                reply: self.reply.clone(),
                calls: self.calls.clone(),
            })
        }
    }

    impl InferenceProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        async fn respond(&self, request: &InferenceRequest) -> Result<InferenceResponse, LlmError> {
            let n = self.calls.count.fetch_add(1, Ordering::SeqCst);
            self.calls.inputs.lock().unwrap().push(request.clone());
            match &self.reply {
                MockReply::Text(text) => Ok(InferenceResponse {
                    output_text: text.clone(),
                }),
                MockReply::Auth => Err(LlmError::AuthenticationFailed),
                MockReply::FlakyThen(failures, text) => {
                    if n < *failures {
                        Err(LlmError::RateLimited {
                            retry_after_ms: None,
                        })
                    } else {
                        Ok(InferenceResponse {
                            output_text: text.clone(),
                        })
                    }
                }
            }
        }
    }

    type TestController = TurnController<
        Arc<crate::service::store::tests::MemoryRepo>,
        Arc<crate::service::store::tests::MemoryRepo>,
        MockFactory,
    >;

    async fn setup(reply: MockReply) -> (TestController, Arc<MemoryStore>, Arc<Calls>, i64) {
        let store = Arc::new(memory_store());
        let project = store.create_project("Studio", "").await.unwrap();
        let session = store.create_session(project.id, "Chat").await.unwrap();
        let calls = Arc::new(Calls::default());
        let controller = TurnController::new(
            store.clone(),
            MockFactory {
                reply,
                calls: calls.clone(),
            },
        );
        (controller, store, calls, session.id)
    }

    fn request(prompt: &str) -> TurnRequest {
        TurnRequest {
            system: None,
            prompt: prompt.to_string(),
            model: "gpt-5".to_string(),
            temperature: 0.2,
            reasoning_effort: ReasoningEffort::Medium,
            anonymize: true,
            save_only: false,
        }
    }

    #[tokio::test]
    async fn test_save_only_never_calls_provider() {
        let (controller, store, calls, session_id) =
            setup(MockReply::Text("unused".into())).await;

        let mut req = request("Draft a greeting");
        req.system = Some("You are terse.".to_string());
        req.save_only = true;

        let outcome = controller.run_turn(session_id, &req, None).await.unwrap();
        assert_eq!(outcome.status, TurnStatus::SendSkipped);
        assert!(outcome.assistant_message.is_none());
        assert_eq!(calls.count.load(Ordering::SeqCst), 0);
        assert!(calls.keys.lock().unwrap().is_empty());

        let roles: Vec<MessageRole> = store
            .get_messages(session_id)
            .await
            .unwrap()
            .iter()
            .map(|m| m.role)
            .collect();
        assert_eq!(roles, vec![MessageRole::System, MessageRole::User]);
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let (controller, store, calls, session_id) =
            setup(MockReply::Text("unused".into())).await;

        let err = controller
            .run_turn(session_id, &request("hello"), Some("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::Configuration(_)));
        assert_eq!(calls.count.load(Ordering::SeqCst), 0);

        let messages = store.get_messages(session_id).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, MessageRole::User);
    }

    #[tokio::test]
    async fn test_sent_turn_persists_reply_with_metadata() {
        let (controller, store, calls, session_id) =
            setup(MockReply::Text("Hi there!".into())).await;

        let mut req = request("Say hi to jane@doe.com");
        req.system = Some("Be warm.".to_string());

        let outcome = controller
            .run_turn(session_id, &req, Some("sk-test"))
            .await
            .unwrap();
        assert_eq!(outcome.status, TurnStatus::Sent);
        assert_eq!(outcome.user_message.content, "Say hi to [REDACTED_EMAIL]");
        assert_eq!(
            outcome.system_message.as_ref().unwrap().metadata["kind"],
            json!("role")
        );

        let assistant = outcome.assistant_message.unwrap();
        assert_eq!(assistant.content, "Hi there!");
        assert_eq!(assistant.metadata["model"], json!("gpt-5"));
        assert!(assistant.metadata["latency_ms"].is_u64());

        let user_meta = &outcome.user_message.metadata;
        assert_eq!(user_meta["temperature"], json!(0.2));
        assert_eq!(user_meta["reasoning_effort"], json!("medium"));

        let sent = calls.inputs.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].input,
            "SYSTEM:\nBe warm.\n\nUSER:\nSay hi to [REDACTED_EMAIL]"
        );
        assert_eq!(*calls.keys.lock().unwrap(), vec!["sk-test".to_string()]);

        assert_eq!(store.get_messages(session_id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_anonymize_off_keeps_raw_prompt() {
        let (controller, _store, calls, session_id) = setup(MockReply::Text("ok".into())).await;

        let mut req = request("mail me at a@b.co");
        req.anonymize = false;

        let outcome = controller
            .run_turn(session_id, &req, Some("sk-test"))
            .await
            .unwrap();
        assert_eq!(outcome.user_message.content, "mail me at a@b.co");
        assert_eq!(calls.inputs.lock().unwrap()[0].input, "mail me at a@b.co");
    }

    #[tokio::test]
    async fn test_failed_send_keeps_prior_messages_only() {
        let (controller, store, _calls, session_id) = setup(MockReply::Auth).await;

        let err = controller
            .run_turn(session_id, &request("hello"), Some("sk-bad"))
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::ExternalService(_)));

        let messages = store.get_messages(session_id).await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, MessageRole::User);
    }

    #[tokio::test]
    async fn test_retry_never_duplicates_reply() {
        let (controller, store, calls, session_id) =
            setup(MockReply::FlakyThen(2, "finally".into())).await;
        let controller = controller.with_retry(RetryPolicy {
            max_retries: 3,
            backoff: Duration::from_millis(1),
        });

        controller
            .run_turn(session_id, &request("hello"), Some("sk-test"))
            .await
            .unwrap();
        assert_eq!(calls.count.load(Ordering::SeqCst), 3);

        let assistants = store
            .get_messages(session_id)
            .await
            .unwrap()
            .into_iter()
            .filter(|m| m.role == MessageRole::Assistant)
            .count();
        assert_eq!(assistants, 1);
    }

    #[tokio::test]
    async fn test_blank_system_text_is_ignored() {
        let (controller, store, _calls, session_id) = setup(MockReply::Text("ok".into())).await;

        let mut req = request("hello");
        req.system = Some("  \n ".to_string());
        req.save_only = true;

        let outcome = controller.run_turn(session_id, &req, None).await.unwrap();
        assert!(outcome.system_message.is_none());
        assert_eq!(store.get_messages(session_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_temperature_writes_nothing() {
        let (controller, store, _calls, session_id) = setup(MockReply::Text("ok".into())).await;

        let mut req = request("hello");
        req.temperature = 1.5;

        let err = controller.run_turn(session_id, &req, Some("sk")).await.unwrap_err();
        assert!(matches!(err, StudioError::Validation(_)));
        assert!(store.get_messages(session_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let (controller, _store, _calls, _session_id) = setup(MockReply::Text("ok".into())).await;

        let err = controller
            .run_turn(404, &request("hello"), Some("sk"))
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::NotFound { entity: "session", .. }));
    }

    #[test]
    fn test_compose_input() {
        assert_eq!(compose_input(None, "hi"), "hi");
        assert_eq!(
            compose_input(Some("rules"), "hi"),
            "SYSTEM:\nrules\n\nUSER:\nhi"
        );
    }
}
