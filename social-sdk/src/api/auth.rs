//! Login and registration, the two calls made without a token.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use social_common::{User, constants::STATUS_SUCCESS};

use crate::{
    SocialHttpClient, cross_log,
    errors::{AuthError, Result},
    util::{StatusReply, read_json},
};

/// Login form.
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Plain password, sent once over TLS.
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration form.
#[derive(Clone, Serialize)]
pub struct Registration {
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Public handle.
    pub nick: String,
    /// Account email.
    pub email: String,
    /// Chosen password.
    pub password: String,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("nick", &self.nick)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct LoginReply {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    token: Option<String>,
}

#[derive(Deserialize)]
struct RegisterReply {
    #[serde(flatten)]
    reply: StatusReply,
    #[serde(default)]
    user: Option<User>,
}

impl SocialHttpClient {
    /// `POST /user/login`.
    ///
    /// Succeeds only when the reply is `"success"` and carries both the user
    /// and the token; otherwise the server's message is returned as
    /// [`AuthError::LoginFailed`].
    pub async fn login(&self, credentials: &Credentials) -> Result<(User, String)> {
        cross_log!(debug, "Logging in as {}", credentials.email);
        let response = self
            .request(Method::POST, &["user", "login"])?
            .json(credentials)
            .send()
            .await?;
        let reply: LoginReply = read_json(response).await?;

        match reply {
            LoginReply {
                status,
                user: Some(user),
                token: Some(token),
                ..
            } if status == STATUS_SUCCESS => Ok((user, token)),
            LoginReply { message, .. } => {
                let message = if message.is_empty() {
                    "Login was not accepted".to_string()
                } else {
                    message
                };
                Err(AuthError::LoginFailed(message).into())
            }
        }
    }

    /// `POST /user/register`. Returns the created user when the server echoes it.
    ///
    /// Registration does not log in.
    pub async fn register(&self, registration: &Registration) -> Result<Option<User>> {
        cross_log!(debug, "Registering @{}", registration.nick);
        let response = self
            .request(Method::POST, &["user", "register"])?
            .json(registration)
            .send()
            .await?;
        let reply: RegisterReply = read_json(response).await?;
        reply.reply.ensure_success()?;
        Ok(reply.user)
    }
}
