//! Integration tests for conversation flows.
//!
//! These run the conversation state machine and chat session against the
//! recording mock service.

use std::sync::Arc;

use brain_chat::{
    Brand, BrandBrainApi, ChatSession, Conversation, DefaultSelection, Message, MessageRole,
    MockAnswer, MockApi, SendOrigin, ANSWER_FAILED_MESSAGE,
};
use brain_chat::types::AskResponse;

fn conversation_with(brand: Brand) -> Conversation {
    let mut conversation = Conversation::new();
    conversation.select_brand(brand);
    conversation
}

fn turns(conversation: &Conversation) -> Vec<(MessageRole, String)> {
    conversation
        .messages()
        .iter()
        .map(|m| (m.role, m.content.clone()))
        .collect()
}

/// Select, send, receive: the full happy path.
#[tokio::test]
async fn test_end_to_end_answer() {
    let api = MockApi::new().add_answer(MockAnswer::Answer(
        AskResponse::new("hi").with_confidence("High").with_intent("greeting"),
    ));
    let mut conversation = conversation_with(Brand::new("x", "X"));
    conversation.set_input("hello");

    assert!(conversation.submit(&api).await);

    let mut expected_answer = Message::assistant("hi");
    expected_answer.confidence = Some("High".to_string());
    expected_answer.intent = Some("greeting".to_string());
    let expected = [Message::user("hello"), expected_answer];

    assert_eq!(conversation.messages().len(), expected.len());
    for (actual, expected) in conversation.messages().iter().zip(expected.iter()) {
        assert!(actual.same_turn(expected), "{:?} != {:?}", actual, expected);
    }
    assert!(!conversation.is_awaiting());
    assert_eq!(conversation.last_error(), None);
    assert_eq!(conversation.pending_input(), "");

    let calls = api.get_method_calls("submit_question");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].brand_id.as_deref(), Some("x"));
}

/// Exactly one user turn before resolution, one assistant turn after.
#[tokio::test]
async fn test_send_appends_one_turn_each_side() {
    let api = MockApi::new();
    let mut conversation = conversation_with(Brand::new("x", "X"));

    let pending = conversation.begin_send("what colours?", SendOrigin::Input).unwrap();
    assert_eq!(conversation.messages().len(), 1);
    assert_eq!(api.call_count(), 0);

    conversation.dispatch(&api, pending).await;
    assert_eq!(conversation.messages().len(), 2);
    assert_eq!(conversation.messages()[1].role, MessageRole::Assistant);
}

/// A 401 surfaces the fixed message and leaves the question in place.
#[tokio::test]
async fn test_unauthorized_keeps_question() {
    let api = MockApi::new().add_answer(MockAnswer::Unauthorized);
    let mut conversation = conversation_with(Brand::new("x", "X"));

    assert!(conversation.send(&api, "hello", SendOrigin::Input).await);

    assert_eq!(turns(&conversation), vec![(MessageRole::User, "hello".to_string())]);
    assert_eq!(conversation.last_error(), Some(ANSWER_FAILED_MESSAGE));
    assert!(!conversation.is_awaiting());
}

/// Network and server failures collapse to the same user-facing message.
#[tokio::test]
async fn test_failure_kinds_share_one_message() {
    let api = MockApi::new().with_answers(vec![
        MockAnswer::Network("connection reset".to_string()),
        MockAnswer::Failure {
            status: 502,
            detail: None,
        },
    ]);
    let mut conversation = conversation_with(Brand::new("x", "X"));

    conversation.send(&api, "one", SendOrigin::Input).await;
    assert_eq!(conversation.last_error(), Some(ANSWER_FAILED_MESSAGE));
    conversation.send(&api, "two", SendOrigin::Input).await;
    assert_eq!(conversation.last_error(), Some(ANSWER_FAILED_MESSAGE));
    assert_eq!(conversation.messages().len(), 2);
}

/// Regenerate drops the old answer instead of stacking a new one beside it.
#[tokio::test]
async fn test_regenerate_replaces_answer() {
    let api = MockApi::new().with_answers(vec![MockAnswer::answer("B"), MockAnswer::answer("B2")]);
    let mut conversation = conversation_with(Brand::new("x", "X"));
    conversation.send(&api, "A", SendOrigin::Input).await;

    assert!(conversation.regenerate(&api).await);

    assert_eq!(
        turns(&conversation),
        vec![
            (MessageRole::User, "A".to_string()),
            (MessageRole::Assistant, "B2".to_string()),
        ]
    );
    assert_eq!(api.questions(), vec!["A".to_string(), "A".to_string()]);
}

/// Regenerate after a failed answer resends without removing anything.
#[tokio::test]
async fn test_regenerate_unanswered_question() {
    let api = MockApi::new().with_answers(vec![MockAnswer::Unauthorized, MockAnswer::answer("B")]);
    let mut conversation = conversation_with(Brand::new("x", "X"));
    conversation.send(&api, "A", SendOrigin::Input).await;
    assert_eq!(turns(&conversation), vec![(MessageRole::User, "A".to_string())]);

    conversation.set_input("draft");
    assert!(conversation.regenerate(&api).await);

    assert_eq!(
        turns(&conversation),
        vec![
            (MessageRole::User, "A".to_string()),
            (MessageRole::Assistant, "B".to_string()),
        ]
    );
    assert_eq!(conversation.last_error(), None);
    assert_eq!(conversation.pending_input(), "draft");
}

/// Regenerate picks the most recent user turn in a longer log.
#[tokio::test]
async fn test_regenerate_uses_latest_question() {
    let api = MockApi::new();
    let mut conversation = conversation_with(Brand::new("x", "X"));
    conversation.send(&api, "first", SendOrigin::Input).await;
    conversation.send(&api, "second", SendOrigin::Input).await;
    api.clear_calls();

    conversation.regenerate(&api).await;
    assert_eq!(api.questions(), vec!["second".to_string()]);
    assert_eq!(conversation.messages().len(), 4);
}

#[tokio::test]
async fn test_regenerate_empty_log_is_noop() {
    let api = MockApi::new();
    let mut conversation = conversation_with(Brand::new("x", "X"));

    assert!(!conversation.regenerate(&api).await);
    assert!(conversation.is_empty());
    assert_eq!(api.call_count(), 0);
}

/// Guard failures change nothing and never reach the service.
#[tokio::test]
async fn test_guarded_sends_are_noops() {
    let api = MockApi::new();

    let mut no_brand = Conversation::new();
    assert!(!no_brand.send(&api, "hello", SendOrigin::Input).await);
    assert!(no_brand.is_empty());

    let mut blank = conversation_with(Brand::new("x", "X"));
    assert!(!blank.send(&api, "   ", SendOrigin::Input).await);
    assert!(blank.is_empty());

    let mut busy = conversation_with(Brand::new("x", "X"));
    busy.begin_send("first", SendOrigin::Input).unwrap();
    assert!(!busy.send(&api, "second", SendOrigin::Input).await);
    assert_eq!(busy.messages().len(), 1);

    assert_eq!(api.call_count(), 0);
}

/// Switching brands mid-conversation keeps the log and targets the new brand.
#[tokio::test]
async fn test_select_brand_between_questions() {
    let api = MockApi::new();
    let mut conversation = conversation_with(Brand::new("x", "X"));
    conversation.send(&api, "one", SendOrigin::Input).await;

    conversation.select_brand(Brand::new("y", "Y"));
    assert_eq!(conversation.messages().len(), 2);
    conversation.send(&api, "two", SendOrigin::Input).await;

    let brands: Vec<_> = api
        .get_method_calls("submit_question")
        .into_iter()
        .filter_map(|c| c.brand_id)
        .collect();
    assert_eq!(brands, vec!["x".to_string(), "y".to_string()]);
}

/// The fallback brand is always listed, exactly once.
#[tokio::test]
async fn test_listing_always_has_fallback_once() {
    let without = MockApi::new().with_brands(vec![Brand::new("a", "A")]);
    let listing = without.list_brands().await;
    assert_eq!(listing.brands.iter().filter(|b| b.id == "havells").count(), 1);

    let with = MockApi::new().with_brands(vec![Brand::new("havells", "Havells Server")]);
    let listing = with.list_brands().await;
    assert_eq!(listing.brands, vec![Brand::new("havells", "Havells Server")]);

    let failing = MockApi::new().fail_brands("offline");
    let listing = failing.list_brands().await;
    assert!(listing.is_degraded());
    assert_eq!(listing.brands.iter().filter(|b| b.id == "havells").count(), 1);
}

/// Default selection cases for a session without a prior choice.
#[tokio::test]
async fn test_session_default_selection() {
    let cases: Vec<(Vec<Brand>, Option<&str>)> = vec![
        (vec![Brand::new("a", "A"), Brand::new("westinghouse_in", "W")], Some("westinghouse_in")),
        (vec![Brand::new("a", "A")], Some("a")),
        (vec![Brand::new("a", "A"), Brand::new("b", "B")], None),
    ];

    for (brands, expected) in cases {
        let api = MockApi::new().with_brands(brands).with_fallback(None);
        let mut session = ChatSession::new(Arc::new(api), DefaultSelection::default());
        session.load_brands().await;
        assert_eq!(session.selected_brand().map(|b| b.id.as_str()), expected);
    }
}

/// A manual pick made before a reload is never overridden.
#[tokio::test]
async fn test_session_manual_pick_survives_reload() {
    let api = MockApi::new()
        .with_brands(vec![Brand::new("a", "A"), Brand::new("westinghouse_in", "W")])
        .fail_brands("cold start");
    let mut session = ChatSession::new(Arc::new(api.clone()), DefaultSelection::default());

    session.load_brands().await;
    assert!(session.selector().last_failure().is_some());
    assert!(session.select_brand("havells"));

    let healthy = MockApi::new()
        .with_brands(vec![Brand::new("a", "A"), Brand::new("westinghouse_in", "W")]);
    let mut session = ChatSession::new(Arc::new(healthy), DefaultSelection::default());
    session.load_brands().await;
    assert!(session.select_brand("a"));
    session.load_brands().await;
    assert_eq!(session.selected_brand().unwrap().id, "a");
}

/// While the service is slow the turn stays pending: the user message is
/// shown and the conversation reports it is awaiting an answer.
#[tokio::test]
async fn test_slow_answer_keeps_conversation_awaiting() {
    let api = MockApi::new().with_latency(std::time::Duration::from_secs(5));
    let mut conversation = conversation_with(Brand::new("x", "X"));

    let timed_out = tokio::time::timeout(
        std::time::Duration::from_millis(50),
        conversation.send(&api, "slow question", SendOrigin::Input),
    )
    .await
    .is_err();

    assert!(timed_out);
    assert!(conversation.is_awaiting());
    assert!(!conversation.can_send("follow-up"));
    assert_eq!(
        turns(&conversation),
        vec![(MessageRole::User, "slow question".to_string())]
    );
    assert_eq!(api.call_count(), 1);
}
