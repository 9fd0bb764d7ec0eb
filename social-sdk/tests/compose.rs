mod common;

use httpmock::prelude::*;
use serde_json::json;

use common::{feed_page, publication_json, signed_in};
use social::{ComposeOutcome, Error, ImageUpload, Severity, errors::ValidationError};

fn created(id: &str, text: &str) -> serde_json::Value {
    json!({
        "status": "success",
        "message": "Publication saved",
        "publication": publication_json(id, text),
    })
}

#[tokio::test]
async fn exactly_280_characters_are_published() {
    let h = signed_in().await;
    let text = "a".repeat(280);
    let save = h
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/publication/save")
                .json_body(json!({ "text": text }));
            then.status(200).json_body(created("p1", &text));
        })
        .await;

    let mut composer = h.social.composer(&h.session);
    composer.set_text(text.clone());
    let outcome = composer.submit(|_| async {}).await.unwrap();

    assert!(matches!(outcome, ComposeOutcome::Published(ref p) if p.id == "p1"));
    assert_eq!(composer.text(), "");
    save.assert_hits_async(1).await;
}

#[tokio::test]
async fn invalid_text_never_reaches_the_server() {
    let h = signed_in().await;
    let save = h
        .server
        .mock_async(|when, then| {
            when.method(POST).path("/api/publication/save");
            then.status(200).json_body(created("p1", "x"));
        })
        .await;

    let mut composer = h.social.composer(&h.session);

    composer.set_text("a".repeat(281));
    assert!(matches!(
        composer.submit(|_| async {}).await,
        Err(Error::Validation(ValidationError::TextTooLong(281)))
    ));

    composer.set_text("  \n  ");
    assert!(matches!(
        composer.submit(|_| async {}).await,
        Err(Error::Validation(ValidationError::EmptyText))
    ));

    save.assert_hits_async(0).await;
    assert_eq!(h.toasts.len(), 2);
}

#[tokio::test]
async fn rejected_reply_keeps_the_draft() {
    let h = signed_in().await;
    h.server
        .mock_async(|when, then| {
            when.method(POST).path("/api/publication/save");
            then.status(200)
                .json_body(json!({ "status": "error", "message": "Text is required" }));
        })
        .await;

    let mut composer = h.social.composer(&h.session);
    composer.set_text("hello");
    let mut refreshed = false;
    let result = composer
        .submit(|_| {
            refreshed = true;
            async {}
        })
        .await;

    assert!(result.is_err());
    assert!(!refreshed);
    assert_eq!(composer.text(), "hello");
    assert_eq!(h.toasts.drain()[0].description, "Text is required");
}

#[tokio::test]
async fn failed_image_upload_leaves_text_publication_visible() {
    let h = signed_in().await;
    h.server
        .mock_async(|when, then| {
            when.method(POST).path("/api/publication/save");
            then.status(200).json_body(created("p1", "hello"));
        })
        .await;
    let mut upload = h
        .server
        .mock_async(|when, then| {
            when.method(POST).path("/api/publication/upload/p1");
            then.status(500)
                .json_body(json!({ "status": "error", "message": "Storage unavailable" }));
        })
        .await;
    h.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/publication/feed/1");
            then.status(200).json_body(json!({
                "publications": [publication_json("p1", "hello")],
                "total": 1,
                "pages": 1,
                "page": 1,
            }));
        })
        .await;

    let feed = h.social.feed(&h.session);
    let mut composer = h.social.composer(&h.session);
    composer.set_text("hello");
    composer.attach(ImageUpload::new("cat.png", vec![0x89, 0x50, 0x4e, 0x47]).unwrap());

    let refreshed = feed.clone();
    let outcome = composer
        .submit(move |_| async move {
            refreshed.refresh().await.unwrap();
        })
        .await
        .unwrap();

    let ComposeOutcome::ImagePending { publication, error } = outcome else {
        panic!("expected the image to be pending");
    };
    assert_eq!(publication.id, "p1");
    assert_eq!(error.user_message(), "Storage unavailable");

    assert_eq!(composer.text(), "");
    assert!(composer.attachment().is_none());
    assert_eq!(composer.pending_image().map(|p| p.id.as_str()), Some("p1"));

    let items = feed.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].text, "hello");
    assert!(!items[0].has_image());

    let toasts = h.toasts.drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].severity, Severity::Error);

    // The server recovers; the kept image can be sent again.
    upload.delete_async().await;
    let mut with_image = publication_json("p1", "hello");
    with_image["file"] = json!("p1.png");
    h.server
        .mock_async(|when, then| {
            when.method(POST).path("/api/publication/upload/p1");
            then.status(200)
                .json_body(json!({ "status": "success", "publication": with_image }));
        })
        .await;

    let published = composer.retry_image().await.unwrap();
    assert!(published.has_image());
    assert!(composer.pending_image().is_none());
}

#[tokio::test]
async fn publishing_with_image_uploads_after_create() {
    let h = signed_in().await;
    h.server
        .mock_async(|when, then| {
            when.method(POST).path("/api/publication/save");
            then.status(200).json_body(created("p2", "look"));
        })
        .await;
    let upload = h
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/publication/upload/p2")
                .body_contains("name=\"file0\"");
            then.status(200).json_body(json!({ "status": "success" }));
        })
        .await;
    let feed_mock = h
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/publication/feed/1");
            then.status(200).json_body(feed_page(&["p2"], 1, 1, 1));
        })
        .await;

    let feed = h.social.feed(&h.session);
    let mut composer = h.social.composer(&h.session);
    composer.set_text("look");
    composer.attach(ImageUpload::new("photo.jpg", b"jpeg-bytes".to_vec()).unwrap());

    let refreshed = feed.clone();
    let outcome = composer
        .submit(move |_| async move {
            refreshed.refresh().await.unwrap();
        })
        .await
        .unwrap();

    assert_eq!(outcome.publication().id, "p2");
    assert!(matches!(outcome, ComposeOutcome::Published(_)));
    upload.assert_hits_async(1).await;
    feed_mock.assert_hits_async(1).await;
    assert_eq!(h.toasts.drain()[0].severity, Severity::Info);
}

#[tokio::test]
async fn images_from_two_failed_uploads_both_stay_pending() {
    let h = signed_in().await;
    for (id, text) in [("p1", "one"), ("p2", "two")] {
        h.server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/publication/save")
                    .json_body(json!({ "text": text }));
                then.status(200).json_body(created(id, text));
            })
            .await;
    }
    let mut first_upload = h
        .server
        .mock_async(|when, then| {
            when.method(POST).path("/api/publication/upload/p1");
            then.status(500).body("Storage unavailable");
        })
        .await;
    h.server
        .mock_async(|when, then| {
            when.method(POST).path("/api/publication/upload/p2");
            then.status(500).body("Storage unavailable");
        })
        .await;

    let mut composer = h.social.composer(&h.session);
    for text in ["one", "two"] {
        composer.set_text(text);
        composer.attach(ImageUpload::new("cat.png", b"png".to_vec()).unwrap());
        let outcome = composer.submit(|_| async {}).await.unwrap();
        assert!(matches!(outcome, ComposeOutcome::ImagePending { .. }));
    }

    let pending: Vec<_> = composer.pending_images().map(|p| p.id.as_str()).collect();
    assert_eq!(pending, ["p1", "p2"]);

    first_upload.delete_async().await;
    h.server
        .mock_async(|when, then| {
            when.method(POST).path("/api/publication/upload/p1");
            then.status(200).json_body(json!({ "status": "success" }));
        })
        .await;

    assert_eq!(composer.retry_image().await.unwrap().id, "p1");
    assert_eq!(composer.pending_image().map(|p| p.id.as_str()), Some("p2"));
}
