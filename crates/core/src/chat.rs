//! Patient-data assistant.
//!
//! Every question is answered against a fresh snapshot of the whole patient database: all
//! patients joined with their child rows are serialised into the system prompt, and the user's
//! message is forwarded to an OpenAI-compatible chat-completion endpoint. No conversation
//! history is kept between calls.

use crate::config::{ChatConfig, CoreConfig};
use crate::model::PatientBundle;
use crate::store::RecordStore;
use crate::{HospitalError, HospitalResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Thin client for an OpenAI-compatible `chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl CompletionClient {
    pub fn new(cfg: &ChatConfig, timeout: Duration) -> HospitalResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(HospitalError::ClientBuild)?;

        Ok(Self {
            client,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send one system + user exchange and return the assistant's text verbatim.
    pub async fn complete(&self, system: &str, user: &str) -> HospitalResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(HospitalError::ChatNotConfigured)?;

        let body = CompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "sending completion request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(HospitalError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %text, "completion endpoint error");
            return Err(HospitalError::Completion {
                status: status.as_u16(),
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(HospitalError::Deserialization)?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(HospitalError::EmptyCompletion)
    }
}

/// Pretty-printed JSON of every patient with its records, as embedded in the prompt.
pub fn build_patient_context(bundles: &[PatientBundle]) -> HospitalResult<String> {
    serde_json::to_string_pretty(bundles).map_err(HospitalError::Serialization)
}

/// System instructions for the assistant with the database snapshot embedded.
pub fn system_prompt(context: &str) -> String {
    format!(
        "You are an assistant for a hospital patient management system.\n\
         You can see the full patient database, covering:\n\
         - personal details such as name, date of birth and contact information\n\
         - medical records with illness, symptoms, diagnosis and prescription\n\
         - admission status with floor, room and dates\n\
         - billing amounts and payment status\n\
         \n\
         Current patient database:\n\
         {context}\n\
         \n\
         Guidelines:\n\
         1. Keep answers professional and brief.\n\
         2. Only disclose patient information that the question asks for.\n\
         3. Lay out information clearly.\n\
         4. Use correct medical terms where they fit.\n\
         5. When asked about a patient, give all of their relevant details in order.\n\
         6. If a patient cannot be found, say so politely.\n\
         7. You may answer about individual patients, admissions, billing, or give summaries."
    )
}

/// Answers free-text questions about the stored patients.
#[derive(Debug, Clone)]
pub struct ChatRelay {
    store: RecordStore,
    client: CompletionClient,
}

impl ChatRelay {
    pub fn new(store: RecordStore, cfg: &CoreConfig) -> HospitalResult<Self> {
        Ok(Self {
            store,
            client: CompletionClient::new(cfg.chat(), cfg.http_timeout())?,
        })
    }

    /// Answer `message` using the current patient database as context.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a blank message and `ChatNotConfigured` when no API key is
    /// set; neither touches the backend. Backend and completion failures are passed through.
    pub async fn ask(&self, message: &str) -> HospitalResult<String> {
        if message.trim().is_empty() {
            return Err(HospitalError::InvalidInput("message must not be empty".into()));
        }
        if !self.client.is_configured() {
            return Err(HospitalError::ChatNotConfigured);
        }

        let bundles = self.store.list_patient_bundles().await?;
        let prompt = system_prompt(&build_patient_context(&bundles)?);

        let answer = self.client.complete(&prompt, message).await?;
        info!(patients = bundles.len(), "chat answered");
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use crate::model::PatientForm;
    use crate::patient::PatientService;
    use crate::store::MemoryStore;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    type Captured = Arc<Mutex<Option<Value>>>;

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1/chat/completions")
    }

    async fn fake_completions(reply: &'static str, captured: Captured) -> String {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap, Json(body): Json<Value>| async move {
                let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
                if bearer != Some("Bearer chat-key") {
                    return (StatusCode::UNAUTHORIZED, Json(json!({"error": "no"})));
                }
                *captured.lock().unwrap() = Some(body);
                (
                    StatusCode::OK,
                    Json(json!({"choices": [{"message": {"role": "assistant", "content": reply}}]})),
                )
            }),
        );
        spawn(app).await
    }

    async fn failing_completions() -> String {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream down") }),
        );
        spawn(app).await
    }

    fn config(endpoint: String, api_key: Option<&str>) -> CoreConfig {
        CoreConfig::new(
            BackendConfig::Memory,
            ChatConfig {
                endpoint,
                model: "test-model".into(),
                api_key: api_key.map(Into::into),
            },
            Duration::from_secs(5),
        )
    }

    async fn seeded_store() -> RecordStore {
        let store = RecordStore::Memory(MemoryStore::new());
        PatientService::new(store.clone())
            .create_patient(PatientForm {
                full_name: "Jane Doe".into(),
                date_of_birth: "1990-02-14".into(),
                gender: "Female".into(),
                contact_number: "555-0142".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn returns_completion_text_verbatim() {
        let captured = Captured::default();
        let reply = "  Jane Doe is **not** admitted.\n";
        let endpoint = fake_completions(reply, captured.clone()).await;
        let relay = ChatRelay::new(seeded_store().await, &config(endpoint, Some("chat-key"))).unwrap();

        let answer = relay.ask("Is Jane admitted?").await.unwrap();
        assert_eq!(answer, reply);

        let body = captured.lock().unwrap().take().expect("request body");
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Is Jane admitted?");
        let system = body["messages"][0]["content"].as_str().unwrap();
        assert!(system.contains("\"full_name\": \"Jane Doe\""));
        assert!(system.contains("\"medical_records\": []"));
    }

    #[tokio::test]
    async fn upstream_failure_is_an_error() {
        let endpoint = failing_completions().await;
        let relay = ChatRelay::new(seeded_store().await, &config(endpoint, Some("chat-key"))).unwrap();

        let err = relay.ask("Who is admitted?").await.unwrap_err();
        assert!(matches!(err, HospitalError::Completion { status: 500 }));
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_call() {
        // Unroutable endpoint: reaching it would surface as a transport error instead.
        let relay = ChatRelay::new(
            seeded_store().await,
            &config("http://127.0.0.1:9/v1/chat/completions".into(), None),
        )
        .unwrap();

        let err = relay.ask("hello").await.unwrap_err();
        assert!(matches!(err, HospitalError::ChatNotConfigured));
        assert_eq!(err.to_string(), "chat API key is not configured");
    }

    #[tokio::test]
    async fn blank_message_is_rejected() {
        let relay = ChatRelay::new(
            RecordStore::Memory(MemoryStore::new()),
            &config("http://127.0.0.1:9/v1/chat/completions".into(), Some("chat-key")),
        )
        .unwrap();

        let err = relay.ask(" \n ").await.unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn prompt_embeds_context() {
        let prompt = system_prompt("[{\"full_name\": \"X\"}]");
        assert!(prompt.contains("[{\"full_name\": \"X\"}]"));
        assert!(prompt.contains("patient database"));
        assert_eq!(build_patient_context(&[]).unwrap(), "[]");
    }
}
