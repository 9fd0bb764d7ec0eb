#![allow(dead_code, reason = "each test binary uses a different subset")]

use httpmock::MockServer;
use serde_json::{Value, json};

use social::{MemorySessionStore, Session, SessionContext, Social, ToastQueue, User};

pub const TOKEN: &str = "test-token";
pub const BEARER: &str = "Bearer test-token";
pub const VIEWER: &str = "me";

pub fn user_json(id: &str) -> Value {
    json!({
        "_id": id,
        "name": "Ada",
        "surname": "Lovelace",
        "nick": id,
        "email": format!("{id}@example.com"),
    })
}

pub fn user(id: &str) -> User {
    serde_json::from_value(user_json(id)).unwrap()
}

pub fn publication_json(id: &str, text: &str) -> Value {
    json!({
        "_id": id,
        "text": text,
        "user": user_json(VIEWER),
        "created_at": "1700000000",
    })
}

/// A feed envelope holding one publication per id.
pub fn feed_page(ids: &[&str], page: u32, pages: u32, total: u64) -> Value {
    let publications: Vec<Value> = ids.iter().map(|id| publication_json(id, id)).collect();
    json!({ "publications": publications, "total": total, "pages": pages, "page": page })
}

pub struct Harness {
    pub server: MockServer,
    pub social: Social,
    pub session: SessionContext,
    pub toasts: ToastQueue,
}

async fn harness(store: MemorySessionStore) -> Harness {
    let server = MockServer::start_async().await;
    let toasts = ToastQueue::default();
    let social = Social::new(&server.url("/api/"))
        .unwrap()
        .with_notifier(toasts.clone());
    let session = social.session(store);
    session.rehydrate();
    Harness {
        server,
        social,
        session,
        toasts,
    }
}

/// A mock server and a session already logged in as [`VIEWER`].
pub async fn signed_in() -> Harness {
    harness(MemorySessionStore::with_session(Session::new(user(VIEWER), TOKEN))).await
}

/// A mock server and a settled, anonymous session.
pub async fn anonymous() -> Harness {
    harness(MemorySessionStore::default()).await
}
