use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use ai_llm_service::{AiLlmError, ChatCompletion, ChatMessage, ToolCallingModel, ToolDefinition};
use async_trait::async_trait;
use faq_agent::{FunctionCatalog, OUT_OF_SCOPE_ANSWER, Orchestrator};
use faq_knowledge::KnowledgeStore;
use line_bridge::{
    FALLBACK_REPLY, LineConfig, LineError, ReplySender, WebhookBridge, WebhookPayload, signature,
};
use organism_db::OrganismTable;
use pretty_assertions::assert_eq;
use tokio::runtime::Handle;

/// Model that never answers. Flags when its future is dropped.
struct HangingModel {
    dropped: Arc<AtomicBool>,
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ToolCallingModel for HangingModel {
    fn model_name(&self) -> &str {
        "hanging"
    }

    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _tools: &[ToolDefinition],
    ) -> Result<ChatCompletion, AiLlmError> {
        let _flag = DropFlag(self.dropped.clone());
        std::future::pending().await
    }
}

/// Model that never selects a function.
struct DecliningModel;

#[async_trait]
impl ToolCallingModel for DecliningModel {
    fn model_name(&self) -> &str {
        "declining"
    }

    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _tools: &[ToolDefinition],
    ) -> Result<ChatCompletion, AiLlmError> {
        Ok(ChatCompletion::default())
    }
}

#[derive(Default)]
struct RecordingSender {
    sent: Mutex<Vec<(String, String)>>,
    attempts: AtomicUsize,
    fail: bool,
}

impl RecordingSender {
    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplySender for RecordingSender {
    async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), LineError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LineError::Config("delivery disabled".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((reply_token.to_string(), text.to_string()));
        Ok(())
    }
}

const SECRET: &str = "channel-secret";

fn config(timeout: Duration) -> LineConfig {
    LineConfig {
        reply_timeout: timeout,
        ..LineConfig::new("token", SECRET)
    }
}

fn bridge(
    model: Arc<dyn ToolCallingModel>,
    sender: Arc<RecordingSender>,
    timeout: Duration,
) -> Arc<WebhookBridge> {
    let orchestrator = Orchestrator::new(
        model,
        Arc::new(KnowledgeStore::from_entries([("sales", "x")], HashMap::new())),
        Arc::new(OrganismTable::default()),
        FunctionCatalog::default(),
    );
    Arc::new(WebhookBridge::new(
        Arc::new(orchestrator),
        sender,
        Handle::current(),
        &config(timeout),
    ))
}

const TEXT_EVENT: &str = r#"{"destination":"Ubot","events":[{
    "type":"message","replyToken":"reply-1",
    "source":{"type":"group","groupId":"G1","userId":"U1"},
    "message":{"type":"text","id":"1","text":"天氣如何?"}
}]}"#;

fn payload() -> WebhookPayload {
    serde_json::from_str(TEXT_EVENT).unwrap()
}

async fn dispatch(bridge: Arc<WebhookBridge>, payload: WebhookPayload) {
    tokio::task::spawn_blocking(move || bridge.dispatch(payload))
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn answer_is_replied() {
    let sender = Arc::new(RecordingSender::default());
    let b = bridge(Arc::new(DecliningModel), sender.clone(), Duration::from_secs(5));

    dispatch(b, payload()).await;

    assert_eq!(
        sender.sent(),
        vec![("reply-1".to_string(), OUT_OF_SCOPE_ANSWER.to_string())]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn timeout_sends_fallback_once_and_cancels_worker() {
    let dropped = Arc::new(AtomicBool::new(false));
    let sender = Arc::new(RecordingSender::default());
    let b = bridge(
        Arc::new(HangingModel {
            dropped: dropped.clone(),
        }),
        sender.clone(),
        Duration::from_millis(200),
    );

    dispatch(b, payload()).await;

    assert_eq!(
        sender.sent(),
        vec![("reply-1".to_string(), FALLBACK_REPLY.to_string())]
    );

    for _ in 0..50 {
        if dropped.load(Ordering::SeqCst) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(dropped.load(Ordering::SeqCst), "worker future was not dropped");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn delivery_failures_are_swallowed() {
    let sender = Arc::new(RecordingSender {
        fail: true,
        ..Default::default()
    });
    let b = bridge(Arc::new(DecliningModel), sender.clone(), Duration::from_secs(5));

    dispatch(b, payload()).await;

    // answer attempt, then one fallback attempt
    assert_eq!(sender.attempts.load(Ordering::SeqCst), 2);
    assert!(sender.sent().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn non_text_events_are_ignored() {
    let sender = Arc::new(RecordingSender::default());
    let b = bridge(Arc::new(DecliningModel), sender.clone(), Duration::from_secs(5));
    let payload: WebhookPayload = serde_json::from_str(
        r#"{"events":[{"type":"follow","replyToken":"t","source":{"type":"user","userId":"U"}}]}"#,
    )
    .unwrap();

    dispatch(b, payload).await;
    assert_eq!(sender.attempts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn signature_gate() {
    let sender = Arc::new(RecordingSender::default());
    let b = bridge(Arc::new(DecliningModel), sender, Duration::from_secs(5));
    let body = TEXT_EVENT.as_bytes();

    let good = signature::sign(SECRET, body);
    let parsed = b.parse_verified(body, Some(&good)).unwrap();
    assert_eq!(parsed.events.len(), 1);

    assert!(matches!(
        b.parse_verified(body, Some("AAAA")),
        Err(LineError::InvalidSignature)
    ));
    assert!(matches!(
        b.parse_verified(body, None),
        Err(LineError::InvalidSignature)
    ));

    let garbage = b"not json";
    let sig = signature::sign(SECRET, garbage);
    assert!(matches!(
        b.parse_verified(garbage, Some(&sig)),
        Err(LineError::Payload(_))
    ));
}
