use std::sync::Arc;

use crate::{
    backend::{BackendError, MockBackend},
    config::constants::FALLBACK_RESPONSE,
    models::{ChatListItem, Message},
    storage::{ArcStorage, Memory},
};

use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Rendered {
    Message(Message),
    ChatList(Vec<ChatListItem>),
    Selected(usize),
    Cleared,
    Notice(String),
}

#[derive(Default)]
struct RecordingRenderer {
    events: Vec<Rendered>,
}

impl Renderer for RecordingRenderer {
    fn on_message_appended(&mut self, message: &crate::models::Message) {
        self.events.push(Rendered::Message(message.clone()));
    }

    fn on_chat_list_changed(&mut self, chats: &[ChatListItem]) {
        self.events.push(Rendered::ChatList(chats.to_vec()));
    }

    fn on_chat_selected(&mut self, index: usize) {
        self.events.push(Rendered::Selected(index));
    }

    fn on_chat_cleared(&mut self) {
        self.events.push(Rendered::Cleared);
    }

    fn on_notice(&mut self, text: &str) {
        self.events.push(Rendered::Notice(text.to_string()));
    }
}

fn echo_backend() -> MockBackend {
    let mut backend = MockBackend::new();
    backend.expect_get_completion().returning(|_, text| {
        let reply = if text == "Hello" {
            "Hi there".to_string()
        } else {
            format!("echo: {}", text)
        };
        Box::pin(async move { Ok(reply) })
    });
    backend
}

fn failing_backend() -> MockBackend {
    let mut backend = MockBackend::new();
    backend.expect_get_completion().returning(|_, _| {
        Box::pin(async {
            Err(BackendError::Remote {
                status: 500,
                message: Some("quota".to_string()),
            })
        })
    });
    backend
}

fn new_app(storage: ArcStorage, backend: MockBackend, strict: bool) -> App<RecordingRenderer> {
    let store = ConversationStore::new(storage);
    let client = ResponseClient::new(Arc::new(backend)).with_strict(strict);
    App::new(store, client, RecordingRenderer::default()).with_hello_message("Hi!")
}

#[tokio::test]
async fn test_submit_appends_user_and_reply() {
    let mut app = new_app(Arc::new(Memory::default()), echo_backend(), false);

    assert!(app.handle_input("  Hello  ").await);

    assert_eq!(
        app.store().active(),
        &[Message::new_user("Hello"), Message::new_assistant("Hi there")]
    );
    assert_eq!(
        app.renderer().events,
        vec![
            Rendered::Message(Message::new_user("Hello")),
            Rendered::Notice(THINKING_NOTICE.to_string()),
            Rendered::Message(Message::new_assistant("Hi there")),
        ]
    );
}

#[tokio::test]
async fn test_submit_with_failing_backend() {
    let mut app = new_app(Arc::new(Memory::default()), failing_backend(), false);
    app.handle_input("Hello").await;
    assert_eq!(
        app.store().active().last(),
        Some(&Message::new_assistant(FALLBACK_RESPONSE))
    );

    let mut app = new_app(Arc::new(Memory::default()), failing_backend(), true);
    app.handle_input("Hello").await;
    assert_eq!(app.store().active(), &[Message::new_user("Hello")]);
    assert_eq!(
        app.renderer().events.last(),
        Some(&Rendered::Notice(FAILURE_NOTICE.to_string()))
    );
}

#[tokio::test]
async fn test_empty_input_is_ignored() {
    let mut app = new_app(Arc::new(Memory::default()), MockBackend::new(), false);
    assert!(app.handle_input("   ").await);
    assert!(app.store().active().is_empty());
    assert!(app.renderer().events.is_empty());
}

#[tokio::test]
async fn test_new_load_and_delete_commands() {
    let mut app = new_app(Arc::new(Memory::default()), echo_backend(), false);

    app.handle_input("Explain quantum computing simply").await;
    app.handle_input("/new").await;
    app.handle_input("Hello").await;
    app.handle_input("/new").await;

    let titles = app
        .store()
        .chat_list()
        .into_iter()
        .map(|c| c.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["Explain quantum comp...", "Hello..."]);

    app.handle_input("/load 2").await;
    assert_eq!(app.store().active_index(), Some(1));
    assert_eq!(
        &app.renderer().events[app.renderer().events.len() - 4..],
        &[
            Rendered::Cleared,
            Rendered::Selected(1),
            Rendered::Message(Message::new_user("Hello")),
            Rendered::Message(Message::new_assistant("Hi there")),
        ]
    );

    app.handle_input("/delete 2").await;
    assert_eq!(app.store().history().len(), 1);
    assert!(app.store().is_new_chat());
    assert_eq!(
        &app.renderer().events[app.renderer().events.len() - 3..],
        &[
            Rendered::ChatList(vec![ChatListItem {
                title: "Explain quantum comp...".to_string(),
                index: 0,
            }]),
            Rendered::Cleared,
            Rendered::Notice("Hi!".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_invalid_chat_number() {
    let mut app = new_app(Arc::new(Memory::default()), MockBackend::new(), false);
    app.handle_input("/load 3").await;

    assert!(app.store().is_new_chat());
    match app.renderer().events.last() {
        Some(Rendered::Notice(text)) => assert!(text.contains("out of range")),
        other => panic!("unexpected render: {:?}", other),
    }
}

#[tokio::test]
async fn test_quit_command() {
    let mut app = new_app(Arc::new(Memory::default()), MockBackend::new(), false);
    assert!(!app.handle_input("/quit").await);
}

#[tokio::test]
async fn test_run_restores_previous_session() {
    let storage: ArcStorage = Arc::new(Memory::default());

    let mut app = new_app(storage.clone(), echo_backend(), false);
    app.run(&b"Hello\n/new\nSecond question\n"[..])
        .await
        .expect("run failed");

    let store = ConversationStore::restore(storage).await;
    let client = ResponseClient::new(Arc::new(MockBackend::new()));
    let mut app = App::new(store, client, RecordingRenderer::default());
    app.startup();

    assert_eq!(app.store().history().len(), 1);
    assert_eq!(
        app.renderer().events,
        vec![
            Rendered::ChatList(vec![ChatListItem {
                title: "Hello...".to_string(),
                index: 0,
            }]),
            Rendered::Message(Message::new_user("Second question")),
            Rendered::Message(Message::new_assistant("echo: Second question")),
        ]
    );
}

#[tokio::test]
async fn test_startup_shows_greeting() {
    let mut app = new_app(Arc::new(Memory::default()), MockBackend::new(), false);
    app.startup();
    assert_eq!(
        app.renderer().events,
        vec![Rendered::Notice("Hi!".to_string())]
    );
}

#[tokio::test]
async fn test_run_skips_invalid_utf8_line() {
    let storage: ArcStorage = Arc::new(Memory::default());
    let mut app = new_app(storage.clone(), echo_backend(), false);

    app.run(&b"\xff\xfe bad\nHello\r\n/quit\nnever read\n"[..])
        .await
        .expect("run failed");

    assert_eq!(
        app.store().active(),
        &[Message::new_user("Hello"), Message::new_assistant("Hi there")]
    );
    assert_eq!(
        app.renderer().events[0],
        Rendered::Notice(INVALID_INPUT_NOTICE.to_string())
    );

    let restored = ConversationStore::restore(storage).await;
    assert_eq!(restored.active().len(), 2);
}

#[test]
fn test_decode_line() {
    assert_eq!(decode_line(b"Hello\r\n"), Some("Hello"));
    assert_eq!(decode_line(b"last line"), Some("last line"));
    assert_eq!(decode_line(b"\xff\n"), None);
}

struct BrokenReader;

impl tokio::io::AsyncRead for BrokenReader {
    fn poll_read(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        _buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::task::Poll::Ready(Err(std::io::Error::other("connection reset")))
    }
}

#[tokio::test]
async fn test_run_saves_when_reader_fails() {
    use tokio::io::AsyncReadExt;

    let storage: ArcStorage = Arc::new(Memory::default());
    let mut app = new_app(storage.clone(), echo_backend(), false);

    let input = tokio::io::BufReader::new((&b"Hello\n"[..]).chain(BrokenReader));
    app.run(input).await.expect("run failed");

    let restored = ConversationStore::restore(storage).await;
    assert_eq!(
        restored.active(),
        &[Message::new_user("Hello"), Message::new_assistant("Hi there")]
    );
}
