mod common;

use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use common::{BEARER, feed_page, signed_in, user_json};
use social::{ListView, LoadOutcome, Severity};

#[tokio::test]
async fn pages_through_feed_two_at_a_time() {
    let h = signed_in().await;
    let first = h
        .server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/publication/feed/1")
                .header("authorization", BEARER);
            then.status(200).json_body(feed_page(&["A", "B"], 1, 2, 3));
        })
        .await;
    let second = h
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/publication/feed/2");
            then.status(200).json_body(feed_page(&["C"], 2, 2, 3));
        })
        .await;

    let feed = h.social.feed(&h.session);

    feed.load(1).await.unwrap();
    let ids: Vec<_> = feed.items().into_iter().map(|p| p.id).collect();
    assert_eq!(ids, ["A", "B"]);
    assert_eq!((feed.current_page(), feed.total_pages()), (1, 2));

    let outcome = feed.load_more().await.unwrap();
    assert_eq!(outcome, LoadOutcome::Applied { page: 2, received: 1 });
    let ids: Vec<_> = feed.items().into_iter().map(|p| p.id).collect();
    assert_eq!(ids, ["A", "B", "C"]);
    assert_eq!((feed.current_page(), feed.total_pages()), (2, 2));

    assert_eq!(feed.load_more().await.unwrap(), LoadOutcome::Skipped);
    first.assert_hits_async(1).await;
    second.assert_hits_async(1).await;
}

#[tokio::test]
async fn load_more_while_in_flight_is_dropped() {
    let h = signed_in().await;
    h.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/publication/feed/1");
            then.status(200).json_body(feed_page(&["A", "B"], 1, 3, 6));
        })
        .await;
    let second = h
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/publication/feed/2");
            then.status(200)
                .delay(Duration::from_millis(300))
                .json_body(feed_page(&["C", "D"], 2, 3, 6));
        })
        .await;

    let feed = h.social.feed(&h.session);
    feed.load(1).await.unwrap();

    let background = feed.clone();
    let pending = tokio::spawn(async move { background.load_more().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert!(!feed.can_load_more());
    assert!(matches!(
        feed.view(),
        ListView::Items {
            loading_more: true,
            ..
        }
    ));
    assert_eq!(feed.load_more().await.unwrap(), LoadOutcome::Skipped);

    let outcome = pending.await.unwrap().unwrap();
    assert_eq!(outcome, LoadOutcome::Applied { page: 2, received: 2 });
    assert_eq!(feed.len(), 4);
    second.assert_hits_async(1).await;
}

#[tokio::test]
async fn newer_refresh_supersedes_outstanding_load() {
    let h = signed_in().await;
    let first = h
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/publication/feed/1");
            then.status(200)
                .delay(Duration::from_millis(200))
                .json_body(feed_page(&["A"], 1, 1, 1));
        })
        .await;

    let feed = h.social.feed(&h.session);
    let background = feed.clone();
    let stale = tokio::spawn(async move { background.load(1).await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let fresh = feed.refresh().await.unwrap();
    assert_eq!(stale.await.unwrap().unwrap(), LoadOutcome::Discarded);
    assert_eq!(fresh, LoadOutcome::Applied { page: 1, received: 1 });
    assert_eq!(feed.len(), 1);
    first.assert_hits_async(2).await;
}

#[tokio::test]
async fn detached_list_discards_late_page() {
    let h = signed_in().await;
    h.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/publication/feed/1");
            then.status(200)
                .delay(Duration::from_millis(200))
                .json_body(feed_page(&["A", "B"], 1, 1, 2));
        })
        .await;

    let feed = h.social.feed(&h.session);
    let background = feed.clone();
    let late = tokio::spawn(async move { background.load(1).await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    feed.detach();

    assert_eq!(late.await.unwrap().unwrap(), LoadOutcome::Discarded);
    assert!(feed.is_empty());
    assert!(feed.is_detached());
}

#[tokio::test]
async fn failed_first_load_blocks_empty_feed() {
    let h = signed_in().await;
    h.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/publication/feed/1");
            then.status(500)
                .json_body(json!({ "status": "error", "message": "Database down" }));
        })
        .await;

    let feed = h.social.feed(&h.session);
    assert!(feed.load(1).await.is_err());

    assert_eq!(
        feed.view(),
        ListView::Blocking {
            message: "Database down".into()
        }
    );
    assert!(h.toasts.is_empty());
}

#[tokio::test]
async fn failed_load_more_keeps_items_and_notifies() {
    let h = signed_in().await;
    h.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/publication/feed/1");
            then.status(200).json_body(feed_page(&["A", "B"], 1, 2, 3));
        })
        .await;
    h.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/publication/feed/2");
            then.status(502).body("Bad Gateway");
        })
        .await;

    let feed = h.social.feed(&h.session);
    feed.load(1).await.unwrap();
    assert!(feed.load_more().await.is_err());

    assert_eq!(feed.len(), 2);
    assert_eq!(feed.current_page(), 1);
    assert!(matches!(feed.view(), ListView::Items { .. }));

    let toasts = h.toasts.drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].severity, Severity::Error);
    assert_eq!(toasts[0].description, "Bad Gateway");
}

#[tokio::test]
async fn failed_refresh_keeps_items_and_notifies() {
    let h = signed_in().await;
    let mut first = h
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/publication/feed/1");
            then.status(200).json_body(feed_page(&["A", "B"], 1, 2, 3));
        })
        .await;

    let feed = h.social.feed(&h.session);
    feed.load(1).await.unwrap();

    first.delete_async().await;
    h.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/publication/feed/1");
            then.status(503)
                .json_body(json!({ "status": "error", "message": "Down" }));
        })
        .await;

    assert!(feed.refresh().await.is_err());

    assert_eq!(feed.len(), 2);
    assert_eq!(feed.error(), None);
    assert!(matches!(
        feed.view(),
        ListView::Items {
            refreshing: false,
            ..
        }
    ));
    let toasts = h.toasts.drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].severity, Severity::Error);
    assert_eq!(toasts[0].description, "Down");
}

#[tokio::test]
async fn delete_removes_locally_and_calls_once() {
    let h = signed_in().await;
    h.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/publication/feed/1");
            then.status(200).json_body(feed_page(&["A", "B"], 1, 2, 3));
        })
        .await;
    let remove = h
        .server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/publication/remove/A");
            then.status(200)
                .json_body(json!({ "status": "success", "message": "Removed" }));
        })
        .await;

    let feed = h.social.feed(&h.session);
    feed.load(1).await.unwrap();

    let removed = feed.delete("A").await.unwrap();
    assert_eq!(removed.map(|p| p.id).as_deref(), Some("A"));
    let ids: Vec<_> = feed.items().into_iter().map(|p| p.id).collect();
    assert_eq!(ids, ["B"]);
    assert_eq!(feed.total_count(), 3);
    remove.assert_hits_async(1).await;
}

#[tokio::test]
async fn failed_delete_is_not_rolled_back() {
    let h = signed_in().await;
    h.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/publication/feed/1");
            then.status(200).json_body(feed_page(&["A"], 1, 1, 1));
        })
        .await;
    h.server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/publication/remove/A");
            then.status(404)
                .json_body(json!({ "status": "error", "message": "Publication not found" }));
        })
        .await;

    let feed = h.social.feed(&h.session);
    feed.load(1).await.unwrap();

    assert!(feed.delete("A").await.is_err());
    assert!(feed.is_empty());
    assert_eq!(feed.view(), ListView::Empty);
    assert_eq!(h.toasts.drain()[0].description, "Publication not found");
}

#[tokio::test]
async fn directory_accepts_numeric_strings() {
    let h = signed_in().await;
    h.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/user/list/1");
            then.status(200).json_body(json!({
                "users": [user_json("u2"), user_json("u3")],
                "total": "2",
                "pages": "1",
                "page": "1",
            }));
        })
        .await;

    let users = h.social.users(&h.session);
    users.load(1).await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users.total_count(), 2);
    assert!(!users.can_load_more());
}

#[tokio::test]
async fn empty_collection_with_zero_pages_renders_empty() {
    let h = signed_in().await;
    let listing = h
        .server
        .mock_async(|when, then| {
            when.method(GET).path("/api/publication/user/u2/1");
            then.status(200)
                .json_body(json!({ "publications": [], "total": 0, "pages": 0 }));
        })
        .await;

    let posts = h.social.user_publications(&h.session, "u2");
    posts.load(1).await.unwrap();

    assert_eq!(posts.view(), ListView::Empty);
    assert_eq!(posts.total_pages(), 1);
    assert_eq!(posts.load_more().await.unwrap(), LoadOutcome::Skipped);
    listing.assert_hits_async(1).await;
}

#[tokio::test]
async fn follow_listings_unwrap_their_edges() {
    let h = signed_in().await;
    h.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/follow/following/u2/1");
            then.status(200).json_body(json!({
                "follows": [{ "user": "u2", "followed": user_json("u3") }],
                "total": 1,
                "pages": 1,
            }));
        })
        .await;
    h.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/follow/followers/1");
            then.status(200).json_body(json!({
                "follows": [{ "user": user_json("u4"), "followed": "me" }],
                "total": 1,
                "pages": 1,
            }));
        })
        .await;

    let following = h.social.following(&h.session, Some("u2"));
    following.load(1).await.unwrap();
    assert_eq!(following.items()[0].id, "u3");

    let followers = h.social.followers(&h.session, None);
    followers.load(1).await.unwrap();
    assert_eq!(followers.items()[0].id, "u4");
}
