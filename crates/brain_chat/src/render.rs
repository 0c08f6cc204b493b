//! Plain-text rendering of conversation state.
//!
//! Nothing here mutates state; front ends call these to draw the current
//! conversation, brand menu and empty state.

use crate::conversation::Conversation;
use crate::selector::BrandSelector;
use crate::types::{Brand, Message, MessageRole};

pub const TITLE: &str = "Brand Brain";

pub const TAGLINE: &str =
    "Your intelligent brand guardian. Select a starter below or type your own query.";

pub const DISCLAIMER: &str = "Brand Brain can make mistakes. Check important info.";

pub const THINKING: &str = "Brand Brain is thinking...";

/// A canned question offered while the conversation is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarterPrompt {
    pub title: &'static str,
    pub description: &'static str,
    pub query: &'static str,
}

pub const STARTER_PROMPTS: [StarterPrompt; 4] = [
    StarterPrompt {
        title: "Brand Assets",
        description: "Find colors, logos, or fonts.",
        query: "What are the primary brand colors?",
    },
    StarterPrompt {
        title: "Marketing Copy",
        description: "Write taglines or social posts.",
        query: "Write a catchy tagline for a summer campaign.",
    },
    StarterPrompt {
        title: "Strategy",
        description: "Understand retrieval & guidelines.",
        query: "What is the brand voice overview?",
    },
    StarterPrompt {
        title: "General Q&A",
        description: "Ask anything about the brand.",
        query: "Who is the target audience?",
    },
];

/// Render one message. Assistant turns get a badge line when the service
/// reported a confidence or intent.
pub fn render_message(message: &Message) -> String {
    match message.role {
        MessageRole::User => format!("You: {}", message.content),
        MessageRole::Assistant => {
            let mut out = format!("{}: {}", TITLE, message.content);
            let mut badges = Vec::new();
            if let (Some(label), Some(level)) = (&message.confidence, message.confidence_level()) {
                // Non-standard labels keep their text and show the level they count as.
                if label.trim().eq_ignore_ascii_case(level.as_str()) {
                    badges.push(format!("[{}]", level.as_str().to_uppercase()));
                } else {
                    badges.push(format!(
                        "[{}/{}]",
                        label.to_uppercase(),
                        level.as_str().to_uppercase()
                    ));
                }
            }
            if let Some(ref intent) = message.intent {
                badges.push(format!("({})", intent));
            }
            if !badges.is_empty() {
                out.push('\n');
                out.push_str("  ");
                out.push_str(&badges.join(" "));
            }
            out
        }
    }
}

/// Title, tagline and numbered starter prompts.
pub fn render_empty_state() -> String {
    let mut lines = vec![TITLE.to_string(), TAGLINE.to_string(), String::new()];
    for (i, prompt) in STARTER_PROMPTS.iter().enumerate() {
        lines.push(format!(
            "  {}. {} - {}",
            i + 1,
            prompt.title,
            prompt.description
        ));
    }
    lines.join("\n")
}

/// The whole conversation pane: log (or empty state), thinking indicator
/// and error banner.
pub fn render_conversation(conversation: &Conversation) -> String {
    let mut blocks = Vec::new();

    if conversation.is_empty() {
        blocks.push(render_empty_state());
    } else {
        blocks.extend(conversation.messages().iter().map(render_message));
    }

    if conversation.is_awaiting() {
        blocks.push(THINKING.to_string());
    }

    if let Some(error) = conversation.last_error() {
        blocks.push(format!("! {}", error));
    }

    blocks.join("\n\n")
}

/// Brand menu in its loading, empty or populated form.
pub fn render_brand_menu(selector: &BrandSelector, selected: Option<&Brand>) -> String {
    if selector.is_loading() {
        return "Loading brands...".to_string();
    }
    if selector.brands().is_empty() {
        return "No brands found".to_string();
    }

    selector
        .brands()
        .iter()
        .map(|brand| {
            let marker = if selected.map_or(false, |s| s.id == brand.id) {
                '*'
            } else {
                ' '
            };
            format!("{} {} ({})", marker, brand.display_name(), brand.id)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
