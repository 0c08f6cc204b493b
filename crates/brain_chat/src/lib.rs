//! # brain_chat - Brand Brain chat client
//!
//! Client-side logic for asking a brand-knowledge assistant questions:
//! - an HTTP client for the two service endpoints (`/brands`, `/ask`)
//! - brand selection with a default-selection heuristic
//! - the conversation state machine (send, regenerate, select brand)
//! - plain-text rendering of the conversation
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │  Front end      │────▶│   ChatSession   │────▶│  BrandBrainApi  │
//! │  (render)       │     └────────┬────────┘     │  Http / Mock    │
//! └─────────────────┘              │              └─────────────────┘
//!                       ┌──────────┴──────────┐
//!                       ▼                     ▼
//!               ┌───────────────┐     ┌───────────────┐
//!               │ BrandSelector │     │ Conversation  │
//!               └───────────────┘     └───────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use brain_chat::{render, ChatSession, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::load(&std::env::current_dir()?)?;
//!     let mut session = ChatSession::from_config(config);
//!
//!     session.load_brands().await;
//!     session.ask("What is the brand voice overview?").await;
//!     println!("{}", render::render_conversation(session.conversation()));
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod conversation;
pub mod error;
pub mod mock;
pub mod render;
pub mod selector;
pub mod session;
pub mod types;

pub use api::{BrandBrainApi, BrandListing, FetchStatus, HttpApiClient};
pub use config::{ClientConfig, DefaultSelection};
pub use conversation::{
    Conversation, ConversationState, Key, KeyPress, PendingQuestion, SendOrigin,
    ANSWER_FAILED_MESSAGE,
};
pub use error::{ChatError, ChatResult};
pub use mock::{CapturedCall, MockAnswer, MockApi};
pub use selector::BrandSelector;
pub use session::ChatSession;
pub use types::*;
