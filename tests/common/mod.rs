// shared test helpers - a scripted completion provider and an in-memory app

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use studyhub::{
    AppState, CompletionProvider, CompletionRequest, Store, Tutor, TutorConfig, TutorError,
};

pub const TEST_KEY: &str = "gsk_test_key";

pub struct FakeProvider {
    reply: Result<serde_json::Value, TutorError>,
    calls: AtomicUsize,
    last: Mutex<Option<(String, CompletionRequest)>>,
}

impl FakeProvider {
    pub fn returning(body: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(body),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn answering(text: &str) -> Arc<Self> {
        Self::returning(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": text } }]
        }))
    }

    pub fn failing(err: TutorError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(err),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(String, CompletionRequest)> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for FakeProvider {
    async fn complete(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<serde_json::Value, TutorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((api_key.to_string(), request.clone()));
        self.reply.clone()
    }
}

pub fn tutor_with(api_key: Option<&str>, provider: Arc<FakeProvider>) -> Tutor {
    Tutor::with_provider(TutorConfig::new(api_key.map(str::to_string)), provider)
}

pub async fn memory_store() -> Store {
    Store::connect("sqlite::memory:").await.unwrap()
}

pub async fn app_state(provider: Arc<FakeProvider>) -> Arc<AppState> {
    AppState::new(memory_store().await, tutor_with(Some(TEST_KEY), provider))
}
