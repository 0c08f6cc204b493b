//! Chat session.
//!
//! Ties the brand selector, the conversation and the API client together.
//! The selected brand is shared: the selector proposes brands, the
//! conversation owns the choice.

use std::sync::Arc;

use tracing::info;

use crate::api::{BrandBrainApi, HttpApiClient};
use crate::config::{ClientConfig, DefaultSelection};
use crate::conversation::{Conversation, KeyPress, SendOrigin};
use crate::render::STARTER_PROMPTS;
use crate::selector::BrandSelector;
use crate::types::Brand;

/// One user's chat session. Lives in memory only.
pub struct ChatSession {
    api: Arc<dyn BrandBrainApi>,
    selector: BrandSelector,
    conversation: Conversation,
}

impl ChatSession {
    pub fn new(api: Arc<dyn BrandBrainApi>, default_selection: DefaultSelection) -> Self {
        Self {
            api,
            selector: BrandSelector::new(default_selection),
            conversation: Conversation::new(),
        }
    }

    /// Session backed by the HTTP client.
    pub fn from_config(config: ClientConfig) -> Self {
        let default_selection = config.default_selection.clone();
        Self::new(Arc::new(HttpApiClient::new(config)), default_selection)
    }

    pub fn selector(&self) -> &BrandSelector {
        &self.selector
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }

    pub fn selected_brand(&self) -> Option<&Brand> {
        self.conversation.selected_brand()
    }

    /// Fetch the brand list and apply any default selection. Returns the
    /// brand that was auto-selected.
    pub async fn load_brands(&mut self) -> Option<Brand> {
        let picked = self
            .selector
            .load(self.api.as_ref(), self.conversation.selected_brand())
            .await;
        if let Some(ref brand) = picked {
            self.conversation.select_brand(brand.clone());
        }
        picked
    }

    /// Manual selection by id. Returns false when the id is not in the list.
    pub fn select_brand(&mut self, id: &str) -> bool {
        match self.selector.choose(id) {
            Some(brand) => {
                info!("Brand selected: {}", brand.id);
                self.conversation.select_brand(brand);
                true
            }
            None => false,
        }
    }

    /// Send text typed directly, as if entered in the input field.
    pub async fn ask(&mut self, text: &str) -> bool {
        self.conversation.set_input(text);
        self.conversation.submit(self.api.as_ref()).await
    }

    /// Send the input field's current content.
    pub async fn submit(&mut self) -> bool {
        self.conversation.submit(self.api.as_ref()).await
    }

    /// Send the starter prompt at `index` (zero-based).
    pub async fn use_starter(&mut self, index: usize) -> bool {
        match STARTER_PROMPTS.get(index) {
            Some(prompt) => {
                self.conversation
                    .send(self.api.as_ref(), prompt.query, SendOrigin::Suggestion)
                    .await
            }
            None => false,
        }
    }

    pub async fn regenerate(&mut self) -> bool {
        self.conversation.regenerate(self.api.as_ref()).await
    }

    pub async fn press(&mut self, key: KeyPress) -> bool {
        self.conversation.press(self.api.as_ref(), key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockAnswer, MockApi};

    fn session(api: &MockApi) -> ChatSession {
        ChatSession::new(Arc::new(api.clone()), DefaultSelection::default())
    }

    #[tokio::test]
    async fn test_load_auto_selects_preferred_brand() {
        let api = MockApi::new().with_brands(vec![
            Brand::new("a", "Alpha"),
            Brand::new("westinghouse_in", "Westinghouse"),
        ]);
        let mut session = session(&api);

        let picked = session.load_brands().await;
        assert_eq!(picked.unwrap().id, "westinghouse_in");
        assert_eq!(session.selected_brand().unwrap().id, "westinghouse_in");
        assert_eq!(session.selector().brands().len(), 3);
    }

    #[tokio::test]
    async fn test_fallback_only_listing_leaves_choice_to_user() {
        let api = MockApi::new().with_brands(vec![Brand::new("a", "Alpha")]);
        let mut session = session(&api);

        // "a" plus the injected fallback: two brands, no default.
        assert!(session.load_brands().await.is_none());
        assert!(session.select_brand("havells"));
        assert!(!session.select_brand("missing"));
        assert_eq!(session.selected_brand().unwrap().id, "havells");
    }

    #[tokio::test]
    async fn test_starter_prompt_sends_canned_question() {
        let api = MockApi::new()
            .with_brands(vec![Brand::new("x", "X")])
            .with_fallback(None)
            .add_answer(MockAnswer::answer("Navy and gold."));
        let mut session = session(&api);
        session.load_brands().await;

        assert!(session.use_starter(0).await);
        assert!(!session.use_starter(9).await);
        assert_eq!(api.questions(), vec!["What are the primary brand colors?".to_string()]);
        assert_eq!(session.conversation().messages().len(), 2);
    }

    #[tokio::test]
    async fn test_enter_key_submits() {
        let api = MockApi::new().with_brands(vec![Brand::new("x", "X")]).with_fallback(None);
        let mut session = session(&api);
        session.load_brands().await;

        for c in "hey".chars() {
            assert!(!session.press(KeyPress::char(c)).await);
        }
        assert!(!session.press(KeyPress::shift_enter()).await);
        assert!(session.press(KeyPress::enter()).await);
        assert_eq!(api.questions(), vec!["hey".to_string()]);
    }
}
