use crate::models::Role;

use super::*;

#[test]
fn test_derive_title() {
    assert_eq!(
        derive_title("Explain quantum computing simply"),
        "Explain quantum comp..."
    );
    assert_eq!(derive_title("Hello"), "Hello...");
    assert_eq!(derive_title(""), "...");

    // Counted in characters, not bytes
    let title = derive_title("日本語のテキストを二十文字以上入力してみましょう");
    assert_eq!(title.chars().count(), TITLE_LENGTH + TITLE_ELLIPSIS.len());
}

#[test]
fn test_conversation_from_messages() {
    assert!(Conversation::from_messages(vec![]).is_none());

    let convo = Conversation::from_messages(vec![
        Message::new_user("Explain quantum computing simply"),
        Message::new_assistant("Sure."),
    ])
    .expect("conversation should be created");

    assert_eq!(convo.title(), "Explain quantum comp...");
    assert_eq!(convo.len(), 2);
    assert_eq!(convo.messages()[1].role(), Role::Assistant);
}

#[test]
fn test_conversation_serialization() {
    let convo = Conversation::from_messages(vec![
        Message::new_user("Hello"),
        Message::new_assistant("Hi there"),
    ])
    .unwrap();

    let raw = serde_json::to_string(&convo).unwrap();
    assert_eq!(
        raw,
        r#"{"title":"Hello...","messages":[{"role":"user","content":"Hello"},{"role":"assistant","content":"Hi there"}]}"#
    );
}
