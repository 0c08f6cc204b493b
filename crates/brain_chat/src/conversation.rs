//! Conversation state machine.
//!
//! Owns the message log, the input field, the in-flight flag and the last
//! error. A send is split in two halves so the state between "question
//! appended" and "answer arrived" is observable:
//!
//! 1. [`Conversation::begin_send`] checks the guard, appends the user turn
//!    and marks the conversation as awaiting a response.
//! 2. [`Conversation::complete`] applies the service's answer or failure.
//!
//! [`Conversation::send`] runs both around a call to the API.

use tracing::{debug, warn};

use crate::api::BrandBrainApi;
use crate::error::ChatResult;
use crate::types::{AskResponse, Brand, Message};

/// Shown in place of an answer whenever submission fails.
pub const ANSWER_FAILED_MESSAGE: &str =
    "Brand Brain couldn't answer this right now. Please try again.";

/// Input placeholder when no brand is selected.
pub const SELECT_BRAND_PLACEHOLDER: &str = "Select a brand above to start...";

/// Where the text of a send came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOrigin {
    /// The input field; the field is cleared on send.
    Input,
    /// A starter prompt from the empty state.
    Suggestion,
    /// Resend of the last user message; no new user turn is appended.
    Regenerate,
}

/// Coarse state of the conversation. A last error can coexist with `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    AwaitingResponse,
}

/// A question accepted by the guard and waiting to be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuestion {
    pub brand_id: String,
    pub question: String,
    pub origin: SendOrigin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Char(char),
}

/// A keypress in the input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn enter() -> Self {
        Self {
            key: Key::Enter,
            shift: false,
        }
    }

    pub fn shift_enter() -> Self {
        Self {
            key: Key::Enter,
            shift: true,
        }
    }

    pub fn char(c: char) -> Self {
        Self {
            key: Key::Char(c),
            shift: false,
        }
    }

    pub fn backspace() -> Self {
        Self {
            key: Key::Backspace,
            shift: false,
        }
    }

    /// Enter without Shift submits; Shift+Enter is a line break.
    pub fn submits(&self) -> bool {
        self.key == Key::Enter && !self.shift
    }
}

/// In-memory conversation for one session.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    pending_input: String,
    awaiting_response: bool,
    last_error: Option<String>,
    selected_brand: Option<Brand>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    pub fn is_awaiting(&self) -> bool {
        self.awaiting_response
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn selected_brand(&self) -> Option<&Brand> {
        self.selected_brand.as_ref()
    }

    pub fn state(&self) -> ConversationState {
        if self.awaiting_response {
            ConversationState::AwaitingResponse
        } else {
            ConversationState::Idle
        }
    }

    /// Replace the selected brand. The log and flags are untouched.
    pub fn select_brand(&mut self, brand: Brand) {
        debug!("Selected brand: {}", brand.id);
        self.selected_brand = Some(brand);
    }

    /// Whether `text` would pass the send guard right now.
    pub fn can_send(&self, text: &str) -> bool {
        !text.trim().is_empty() && !self.awaiting_response && self.selected_brand.is_some()
    }

    /// Whether the submit action is available for the input field.
    pub fn can_submit(&self) -> bool {
        self.can_send(&self.pending_input)
    }

    pub fn input_enabled(&self) -> bool {
        self.selected_brand.is_some() && !self.awaiting_response
    }

    pub fn placeholder(&self) -> String {
        match &self.selected_brand {
            Some(brand) => format!("Ask {}...", brand.display_name()),
            None => SELECT_BRAND_PLACEHOLDER.to_string(),
        }
    }

    /// True when the last entry of the log is an assistant turn.
    pub fn ends_with_assistant(&self) -> bool {
        self.messages.last().map_or(false, Message::is_assistant)
    }

    /// Most recent user turn, scanning from the end.
    pub fn last_user_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_user())
    }

    /// First half of a send. Returns `None`, leaving every field as it was,
    /// when the text is blank, a request is in flight, or no brand is selected.
    pub fn begin_send(&mut self, text: &str, origin: SendOrigin) -> Option<PendingQuestion> {
        if !self.can_send(text) {
            return None;
        }
        let brand_id = self.selected_brand.as_ref()?.id.clone();
        let question = text.trim().to_string();

        if origin != SendOrigin::Regenerate {
            self.messages.push(Message::user(question.clone()));
        }
        if origin == SendOrigin::Input {
            self.pending_input.clear();
        }
        self.last_error = None;
        self.awaiting_response = true;

        Some(PendingQuestion {
            brand_id,
            question,
            origin,
        })
    }

    /// Begin a send from the input field.
    pub fn submit_input(&mut self) -> Option<PendingQuestion> {
        let text = self.pending_input.clone();
        self.begin_send(&text, SendOrigin::Input)
    }

    /// First half of a regenerate: drop the trailing assistant turn and
    /// resend the most recent user message.
    pub fn begin_regenerate(&mut self) -> Option<PendingQuestion> {
        let content = self.last_user_message()?.content.clone();
        if !self.can_send(&content) {
            return None;
        }
        if self.ends_with_assistant() {
            self.messages.pop();
        }
        self.begin_send(&content, SendOrigin::Regenerate)
    }

    /// Second half of a send: record the answer, or the failure message.
    pub fn complete(&mut self, result: ChatResult<AskResponse>) {
        if !self.awaiting_response {
            warn!("Ignoring a response with no request in flight");
            return;
        }
        self.awaiting_response = false;

        match result {
            Ok(response) => {
                self.messages.push(Message::from_answer(response));
            }
            Err(e) => {
                warn!(kind = e.kind(), "Answer failed: {}", e);
                self.last_error = Some(ANSWER_FAILED_MESSAGE.to_string());
            }
        }
    }

    /// Apply a keypress to the input field. Enter (without Shift) begins a
    /// send; edits are ignored while the field is disabled.
    pub fn handle_key(&mut self, key: KeyPress) -> Option<PendingQuestion> {
        if key.submits() {
            return self.submit_input();
        }
        if !self.input_enabled() {
            return None;
        }
        match key.key {
            Key::Enter => self.pending_input.push('\n'),
            Key::Char(c) => self.pending_input.push(c),
            Key::Backspace => {
                self.pending_input.pop();
            }
        }
        None
    }

    /// Submit an accepted question and apply the outcome.
    pub async fn dispatch(&mut self, api: &dyn BrandBrainApi, pending: PendingQuestion) {
        debug!(origin = ?pending.origin, "Submitting question for {}", pending.brand_id);
        let result = api
            .submit_question(&pending.brand_id, &pending.question)
            .await;
        self.complete(result);
    }

    /// Full send transition. Returns whether a request was made.
    pub async fn send(&mut self, api: &dyn BrandBrainApi, text: &str, origin: SendOrigin) -> bool {
        match self.begin_send(text, origin) {
            Some(pending) => {
                self.dispatch(api, pending).await;
                true
            }
            None => false,
        }
    }

    /// Send whatever is in the input field.
    pub async fn submit(&mut self, api: &dyn BrandBrainApi) -> bool {
        match self.submit_input() {
            Some(pending) => {
                self.dispatch(api, pending).await;
                true
            }
            None => false,
        }
    }

    /// Full regenerate transition. Returns whether a request was made.
    pub async fn regenerate(&mut self, api: &dyn BrandBrainApi) -> bool {
        match self.begin_regenerate() {
            Some(pending) => {
                self.dispatch(api, pending).await;
                true
            }
            None => false,
        }
    }

    /// Keypress that may trigger a send. Returns whether a request was made.
    pub async fn press(&mut self, api: &dyn BrandBrainApi, key: KeyPress) -> bool {
        match self.handle_key(key) {
            Some(pending) => {
                self.dispatch(api, pending).await;
                true
            }
            None => false,
        }
    }
}
