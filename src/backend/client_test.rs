use std::sync::Arc;

use crate::backend::MockBackend;

use super::*;

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

#[tokio::test]
async fn test_get_response_passes_reply_through() {
    let mut backend = MockBackend::new();
    backend
        .expect_get_completion()
        .withf(|history, text| history.len() == 1 && text == "Hello")
        .times(1)
        .returning(|_, _| Box::pin(async { Ok("Hi there".to_string()) }));

    let client = ResponseClient::new(Arc::new(backend));
    let reply = client
        .get_response(&[Message::new_user("Hello")], "Hello")
        .await
        .unwrap();
    assert_eq!(reply, "Hi there");
}

#[tokio::test]
async fn test_get_response_falls_back() {
    let client = ResponseClient::new(Arc::new(failing_backend()));
    assert!(!client.strict());

    let reply = client.get_response(&[], "Hello").await.unwrap();
    assert_eq!(reply, FALLBACK_RESPONSE);
}

#[tokio::test]
async fn test_get_response_strict() {
    let client = ResponseClient::new(Arc::new(failing_backend())).with_strict(true);

    let err = client.get_response(&[], "Hello").await.unwrap_err();
    assert!(matches!(err, BackendError::Remote { status: 500, .. }));
}

#[tokio::test]
async fn test_get_response_falls_back_on_remote_status() {
    let mut server = mockito::Server::new_async().await;
    let _handler = server
        .mock("POST", "/models/gemini-2.0-flash:generateContent")
        .match_query(mockito::Matcher::Any)
        .with_status(500)
        .with_body(r#"{"error":{"message":"quota"}}"#)
        .create_async()
        .await;

    let backend = crate::backend::Gemini::default()
        .with_endpoint(&server.url())
        .with_model("gemini-2.0-flash");
    let client = ResponseClient::new(Arc::new(backend));

    let reply = client
        .get_response(&[Message::new_user("Hello")], "Hello")
        .await
        .unwrap();
    assert_eq!(reply, FALLBACK_RESPONSE);
}
