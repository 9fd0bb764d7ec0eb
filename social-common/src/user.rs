//! Users as the remote service describes them.

use serde::{Deserialize, Serialize};

use crate::Identified;

/// A registered user.
///
/// Immutable from the client's point of view; changes go through the
/// profile update endpoint and come back as a fresh `User`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server id.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Given name.
    pub name: String,
    /// Family name.
    #[serde(default)]
    pub surname: String,
    /// Public handle, shown as `@handle`.
    #[serde(rename = "nick")]
    pub handle: String,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Free-form biography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Avatar location as returned by the server.
    #[serde(rename = "image", default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Server-side role, e.g. `role_user`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Registration time, verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl User {
    /// `"Name Surname"`.
    pub fn display_name(&self) -> String {
        display_name(&self.name, &self.surname)
    }

    /// Avatar fallback letters, e.g. `"AL"` for Ada Lovelace.
    pub fn initials(&self) -> String {
        initials(&self.name, &self.surname)
    }
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Author information embedded in a publication.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Server id of the author.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Given name.
    pub name: String,
    /// Family name.
    #[serde(default)]
    pub surname: String,
    /// Public handle.
    #[serde(rename = "nick")]
    pub handle: String,
    /// Avatar location.
    #[serde(rename = "image", default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl UserSummary {
    /// `"Name Surname"`.
    pub fn display_name(&self) -> String {
        display_name(&self.name, &self.surname)
    }

    /// Avatar fallback letters.
    pub fn initials(&self) -> String {
        initials(&self.name, &self.surname)
    }
}

/// Social counters of a user profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCounters {
    /// Users this user follows.
    #[serde(default)]
    pub following: u64,
    /// Users following this user.
    #[serde(default)]
    pub followed: u64,
    /// Publications authored.
    #[serde(default)]
    pub publications: u64,
}

fn display_name(name: &str, surname: &str) -> String {
    format!("{name} {surname}").trim().to_string()
}

fn initials(name: &str, surname: &str) -> String {
    [name, surname]
        .iter()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_wire_names() {
        let raw = r#"{
            "_id": "u1",
            "name": "ada",
            "surname": "lovelace",
            "nick": "ada",
            "email": "ada@example.com",
            "image": "avatar.png",
            "role": "role_user",
            "password": "never-sent-but-ignored"
        }"#;
        let user: User = serde_json::from_str(raw).unwrap();

        assert_eq!(user.id, "u1");
        assert_eq!(user.handle, "ada");
        assert_eq!(user.avatar_url.as_deref(), Some("avatar.png"));
        assert_eq!(user.bio, None);
        assert_eq!(user.display_name(), "ada lovelace");
        assert_eq!(user.initials(), "AL");
    }

    #[test]
    fn initials_skip_missing_parts() {
        assert_eq!(initials("ñandú", ""), "Ñ");
        assert_eq!(initials("", ""), "");
    }

    #[test]
    fn counters_default_missing_fields() {
        let counters: UserCounters =
            serde_json::from_str(r#"{"user": "u1", "following": 3}"#).unwrap();
        assert_eq!(
            counters,
            UserCounters {
                following: 3,
                followed: 0,
                publications: 0
            }
        );
    }
}
