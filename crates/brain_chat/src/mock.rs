//! Mock answering service for testing.
//!
//! Provides a configurable implementation of [`BrandBrainApi`] that records
//! every call and replays predefined answers, so conversations can be
//! exercised without a running backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::api::{BrandBrainApi, BrandListing, GENERIC_FAILURE};
use crate::error::{ChatError, ChatResult};
use crate::types::{AskResponse, Brand};

/// Predefined outcome for a `submit_question` call.
#[derive(Debug, Clone)]
pub enum MockAnswer {
    Answer(AskResponse),
    Unauthorized,
    /// Non-2xx status with an optional `detail`.
    Failure { status: u16, detail: Option<String> },
    /// Connection-level failure.
    Network(String),
}

impl MockAnswer {
    pub fn answer(text: impl Into<String>) -> Self {
        Self::Answer(AskResponse::new(text))
    }

    fn into_result(self) -> ChatResult<AskResponse> {
        match self {
            Self::Answer(response) => Ok(response),
            Self::Unauthorized => Err(ChatError::Unauthorized),
            Self::Failure { status, detail } => Err(ChatError::Server {
                status,
                message: detail.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            }),
            Self::Network(msg) => Err(ChatError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                msg,
            ))),
        }
    }
}

/// Captured call information for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedCall {
    pub method: String,
    pub brand_id: Option<String>,
    pub question: Option<String>,
}

/// Mock Brand Brain service.
#[derive(Clone)]
pub struct MockApi {
    /// Brands returned by the server side of `list_brands`.
    brands: Arc<RwLock<Vec<Brand>>>,
    /// When set, `list_brands` behaves as a failed fetch.
    brand_failure: Arc<RwLock<Option<String>>>,
    fallback: Arc<RwLock<Option<Brand>>>,
    answers: Arc<RwLock<Vec<MockAnswer>>>,
    answer_index: Arc<AtomicUsize>,
    /// Simulated round-trip time.
    latency: Arc<RwLock<Duration>>,
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    /// Create a mock with no brands, the Havells fallback and a canned answer.
    pub fn new() -> Self {
        Self {
            brands: Arc::new(RwLock::new(Vec::new())),
            brand_failure: Arc::new(RwLock::new(None)),
            fallback: Arc::new(RwLock::new(Some(Brand::new("havells", "Havells")))),
            answers: Arc::new(RwLock::new(Vec::new())),
            answer_index: Arc::new(AtomicUsize::new(0)),
            latency: Arc::new(RwLock::new(Duration::ZERO)),
            captured_calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn with_brands(self, brands: Vec<Brand>) -> Self {
        *self.brands.write() = brands;
        self
    }

    pub fn with_fallback(self, fallback: Option<Brand>) -> Self {
        *self.fallback.write() = fallback;
        self
    }

    /// Make `list_brands` report a failed fetch.
    pub fn fail_brands(self, reason: impl Into<String>) -> Self {
        *self.brand_failure.write() = Some(reason.into());
        self
    }

    /// Queue an outcome for the next `submit_question` call.
    pub fn add_answer(self, answer: MockAnswer) -> Self {
        self.answers.write().push(answer);
        self
    }

    /// Replace all queued outcomes. They are replayed in order and cycle.
    pub fn with_answers(self, answers: Vec<MockAnswer>) -> Self {
        *self.answers.write() = answers;
        self.answer_index.store(0, Ordering::SeqCst);
        self
    }

    pub fn with_latency(self, latency: Duration) -> Self {
        *self.latency.write() = latency;
        self
    }

    pub fn get_calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    pub fn get_method_calls(&self, method: &str) -> Vec<CapturedCall> {
        self.captured_calls
            .read()
            .iter()
            .filter(|c| c.method == method)
            .cloned()
            .collect()
    }

    /// Questions submitted so far, in order.
    pub fn questions(&self) -> Vec<String> {
        self.get_method_calls("submit_question")
            .into_iter()
            .filter_map(|c| c.question)
            .collect()
    }

    pub fn clear_calls(&self) {
        self.captured_calls.write().clear();
    }

    fn record_call(&self, call: CapturedCall) {
        self.captured_calls.write().push(call);
    }

    fn next_answer(&self) -> MockAnswer {
        let answers = self.answers.read();
        if answers.is_empty() {
            return MockAnswer::answer("mock answer");
        }
        let index = self.answer_index.fetch_add(1, Ordering::SeqCst);
        answers
            .get(index % answers.len())
            .cloned()
            .unwrap_or_else(|| MockAnswer::answer("mock answer"))
    }

    async fn simulate_latency(&self) {
        let latency = *self.latency.read();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl BrandBrainApi for MockApi {
    async fn list_brands(&self) -> BrandListing {
        self.record_call(CapturedCall {
            method: "list_brands".to_string(),
            brand_id: None,
            question: None,
        });
        self.simulate_latency().await;

        let fallback = self.fallback.read().clone();
        let failure = self.brand_failure.read().clone();
        match failure {
            Some(reason) => BrandListing::degraded(reason, fallback.as_ref()),
            None => BrandListing::fetched(self.brands.read().clone(), fallback.as_ref()),
        }
    }

    async fn submit_question(&self, brand_id: &str, question: &str) -> ChatResult<AskResponse> {
        self.record_call(CapturedCall {
            method: "submit_question".to_string(),
            brand_id: Some(brand_id.to_string()),
            question: Some(question.to_string()),
        });
        self.simulate_latency().await;
        self.next_answer().into_result()
    }
}
