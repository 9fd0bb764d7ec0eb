//! A user entry with its optimistic follow toggle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use social_common::User;

use crate::{
    Error, Result, SessionContext, SocialApi, cross_log,
    errors::ValidationError,
    notify::{SharedNotifier, Toast},
};

/// How a call to [`UserCard::toggle_follow`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FollowToggle {
    /// The viewer now follows the user.
    Followed,
    /// The viewer no longer follows the user.
    Unfollowed,
    /// Another toggle was still in flight; nothing was sent.
    Dropped,
}

#[derive(Debug)]
struct FollowState {
    following: bool,
    in_flight: bool,
}

/// One user as shown in the directory or a follow listing, with a follow
/// toggle.
///
/// The toggle is optimistic: the displayed state flips at once and flips back
/// if the server refuses. It is hidden, and refused, on the viewer's own card.
///
/// Cheap to clone; clones share the follow state.
#[derive(Clone, Debug)]
pub struct UserCard {
    user: Arc<User>,
    session: SessionContext,
    notifier: SharedNotifier,
    state: Arc<Mutex<FollowState>>,
}

impl UserCard {
    /// A card for `user`, initially displayed as `following` or not.
    pub fn new(
        user: User,
        following: bool,
        session: SessionContext,
        notifier: SharedNotifier,
    ) -> Self {
        Self {
            user: Arc::new(user),
            session,
            notifier,
            state: Arc::new(Mutex::new(FollowState {
                following,
                in_flight: false,
            })),
        }
    }

    /// The user shown.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Whether this is the viewer's own card.
    pub fn is_own(&self) -> bool {
        self.session.viewer_id().as_deref() == Some(self.user.id.as_str())
    }

    /// Whether the follow control should be displayed.
    pub fn shows_follow_control(&self) -> bool {
        !self.is_own()
    }

    /// Displayed follow state, including an unconfirmed toggle.
    pub fn is_following(&self) -> bool {
        self.lock().following
    }

    /// Whether a toggle awaits the server's answer.
    pub fn is_pending(&self) -> bool {
        self.lock().in_flight
    }

    /// Link target of the user's profile.
    pub fn profile_path(&self) -> String {
        format!("/profile/{}", self.user.id)
    }

    /// Follow or unfollow, depending on the displayed state.
    pub async fn toggle_follow(&self) -> Result<FollowToggle> {
        if self.is_own() {
            return Err(ValidationError::SelfFollow.into());
        }

        let follow = {
            let mut state = self.lock();
            if state.in_flight {
                cross_log!(debug, "Dropping follow toggle for {}", self.user.id);
                return Ok(FollowToggle::Dropped);
            }
            state.in_flight = true;
            state.following = !state.following;
            state.following
        };

        let api = self.session.api();
        let result = if follow {
            api.follow(&self.user.id).await
        } else {
            api.unfollow(&self.user.id).await
        };

        {
            let mut state = self.lock();
            state.in_flight = false;
            if result.is_err() {
                state.following = !follow;
            }
        }

        match result {
            Ok(()) => {
                let name = self.user.display_name();
                let toast = if follow {
                    Toast::info("Following", format!("You now follow {name}"))
                } else {
                    Toast::info("Unfollowed", format!("You no longer follow {name}"))
                };
                self.notifier.notify(toast);
                Ok(if follow {
                    FollowToggle::Followed
                } else {
                    FollowToggle::Unfollowed
                })
            }
            Err(error) => Err(self.report(&api, error)),
        }
    }

    fn report(&self, api: &SocialApi, error: Error) -> Error {
        self.session.expire_if_unauthorized(api, &error);
        self.notifier.notify(Toast::error(&error));
        error
    }

    fn lock(&self) -> MutexGuard<'_, FollowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
