//! Auth-gated navigation.
//!
//! [`AuthGate`] is a pure decision: given a requested [`Route`] and the
//! current [`AuthState`], may the view mount? [`Router`] applies those
//! decisions against a live [`SessionContext`], following redirects and
//! remembering where the viewer is.

use std::fmt;

use crate::{AuthState, SessionContext, cross_log};

/// Every view of the client.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/welcome`, the public entry page.
    Welcome,
    /// `/login`.
    Login,
    /// `/register`.
    Register,
    /// `/`, the viewer's feed.
    Home,
    /// `/home`, kept as a permanent redirect to `/`.
    HomeAlias,
    /// `/users`, the user directory.
    Users,
    /// `/profile/:id`.
    Profile(String),
    /// Anything else; carries the requested path.
    NotFound(String),
}

impl Route {
    /// Map a location path to its route. Query strings and fragments are ignored.
    pub fn parse(path: &str) -> Route {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" => Route::Home,
            "/home" => Route::HomeAlias,
            "/welcome" => Route::Welcome,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/users" => Route::Users,
            _ => match trimmed.strip_prefix("/profile/") {
                Some(id) if !id.is_empty() && !id.contains('/') => Route::Profile(id.to_string()),
                _ => Route::NotFound(path.to_string()),
            },
        }
    }

    /// The canonical path of this route.
    pub fn path(&self) -> String {
        match self {
            Route::Welcome => "/welcome".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Home => "/".to_string(),
            Route::HomeAlias => "/home".to_string(),
            Route::Users => "/users".to_string(),
            Route::Profile(id) => format!("/profile/{id}"),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Whether the view needs a session.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Home | Route::Users | Route::Profile(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of asking the gate about one route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    /// Mount the view.
    Render(Route),
    /// Navigate elsewhere without mounting anything.
    Redirect(Route),
    /// Session still settling: show a placeholder, neither the view nor a redirect.
    Pending(Route),
}

/// Admission rules. Session presence is the only criterion.
#[derive(Clone, Copy, Debug, Default)]
pub struct AuthGate;

impl AuthGate {
    /// Decide whether `route` may mount in `state`.
    pub fn admit(route: &Route, state: &AuthState) -> Admission {
        if *route == Route::HomeAlias {
            return Admission::Redirect(Route::Home);
        }
        if !route.is_protected() {
            return Admission::Render(route.clone());
        }

        match state {
            AuthState::Authenticated(_) => Admission::Render(route.clone()),
            AuthState::Uninitialized | AuthState::Rehydrating => {
                Admission::Pending(route.clone())
            }
            AuthState::Anonymous if *route == Route::Home => Admission::Redirect(Route::Welcome),
            AuthState::Anonymous => Admission::Redirect(Route::Login),
        }
    }
}

/// What activating a header entry does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavAction {
    /// Navigate to the route.
    Go(Route),
    /// Run [`Router::logout`].
    Logout,
}

/// A header navigation entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavLink {
    /// Visible label.
    pub label: &'static str,
    /// Effect of activating it.
    pub action: NavAction,
}

/// Header entries for `state`.
pub fn nav_links(state: &AuthState) -> Vec<NavLink> {
    let link = |label, route| NavLink {
        label,
        action: NavAction::Go(route),
    };
    match state.session() {
        Some(session) => vec![
            link("Feed", Route::Home),
            link("Users", Route::Users),
            link("Profile", Route::Profile(session.user().id.clone())),
            NavLink {
                label: "Log out",
                action: NavAction::Logout,
            },
        ],
        None => vec![link("Log in", Route::Login), link("Register", Route::Register)],
    }
}

// Redirect chains are at most two hops (`/home` → `/` → `/welcome`).
const MAX_REDIRECTS: usize = 4;

/// Navigation state of one client instance.
#[derive(Debug)]
pub struct Router {
    session: SessionContext,
    current: Option<Route>,
    history: Vec<Route>,
}

impl Router {
    /// A router with nothing mounted yet.
    pub fn new(session: SessionContext) -> Self {
        Self {
            session,
            current: None,
            history: Vec::new(),
        }
    }

    /// The route last rendered or pending, if any.
    pub fn current(&self) -> Option<&Route> {
        self.current.as_ref()
    }

    /// Routes mounted so far, oldest first.
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Navigate to `path`, following redirects.
    ///
    /// Returns the final admission: `Render` or `Pending`, never `Redirect`.
    pub fn navigate(&mut self, path: &str) -> Admission {
        self.go(Route::parse(path))
    }

    /// Navigate to `route`, following redirects.
    pub fn go(&mut self, route: Route) -> Admission {
        let state = self.session.state();
        let mut route = route;

        for _ in 0..MAX_REDIRECTS {
            match AuthGate::admit(&route, &state) {
                Admission::Redirect(next) => {
                    cross_log!(debug, "Redirecting {route} to {next}");
                    route = next;
                }
                settled => return self.mount(settled),
            }
        }

        // Unreachable with the rules above; stay on the public entry page.
        self.mount(Admission::Render(Route::Welcome))
    }

    /// Re-run the gate for the current route, e.g. once rehydration finished.
    pub fn resume(&mut self) -> Option<Admission> {
        let route = self.current.clone()?;
        Some(self.go(route))
    }

    /// Log out, then land on the login view.
    pub fn logout(&mut self) -> Admission {
        self.session.logout();
        self.go(Route::Login)
    }

    /// Header entries for the current session.
    pub fn nav_links(&self) -> Vec<NavLink> {
        nav_links(&self.session.state())
    }

    fn mount(&mut self, admission: Admission) -> Admission {
        let route = match &admission {
            Admission::Render(route) | Admission::Pending(route) | Admission::Redirect(route) => {
                route.clone()
            }
        };
        if let Route::NotFound(path) = &route {
            cross_log!(warn, "No view for {path}");
        }
        if matches!(admission, Admission::Render(_)) {
            self.history.push(route.clone());
        }
        self.current = Some(route);
        admission
    }
}

#[cfg(test)]
mod tests {
    use social_common::User;

    use super::*;
    use crate::{MemorySessionStore, Session, SocialHttpClient};

    fn session() -> Session {
        let user: User = serde_json::from_value(serde_json::json!({
            "_id": "u1", "name": "Ada", "surname": "L", "nick": "ada", "email": "a@b.c"
        }))
        .unwrap();
        Session::new(user, "tok")
    }

    fn context(store: MemorySessionStore) -> SessionContext {
        SessionContext::new(SocialHttpClient::builder().build().unwrap(), store)
    }

    #[test]
    fn parses_paths() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/home"), Route::HomeAlias);
        assert_eq!(Route::parse("/users/"), Route::Users);
        assert_eq!(Route::parse("/login?next=/users"), Route::Login);
        assert_eq!(Route::parse("/profile/u1"), Route::Profile("u1".into()));
        assert_eq!(
            Route::parse("/profile/"),
            Route::NotFound("/profile/".into())
        );
        assert_eq!(Route::parse("/explore"), Route::NotFound("/explore".into()));
        assert_eq!(Route::Profile("u1".into()).path(), "/profile/u1");
    }

    #[test]
    fn anonymous_root_goes_to_welcome() {
        assert_eq!(
            AuthGate::admit(&Route::Home, &AuthState::Anonymous),
            Admission::Redirect(Route::Welcome)
        );
        assert_eq!(
            AuthGate::admit(&Route::Users, &AuthState::Anonymous),
            Admission::Redirect(Route::Login)
        );
        assert_eq!(
            AuthGate::admit(&Route::Login, &AuthState::Anonymous),
            Admission::Render(Route::Login)
        );
    }

    #[test]
    fn settling_session_never_redirects() {
        for state in [AuthState::Uninitialized, AuthState::Rehydrating] {
            assert_eq!(
                AuthGate::admit(&Route::Home, &state),
                Admission::Pending(Route::Home)
            );
        }
    }

    #[test]
    fn router_without_session_never_renders_protected_view() {
        let ctx = context(MemorySessionStore::default());
        ctx.rehydrate();
        let mut router = Router::new(ctx);

        assert_eq!(router.navigate("/"), Admission::Render(Route::Welcome));
        assert_eq!(router.navigate("/home"), Admission::Render(Route::Welcome));
        assert!(router.history().iter().all(|r| !r.is_protected()));
    }

    #[test]
    fn router_with_session_renders_home_directly() {
        let ctx = context(MemorySessionStore::with_session(session()));
        ctx.rehydrate();
        let mut router = Router::new(ctx);

        assert_eq!(router.navigate("/"), Admission::Render(Route::Home));
        assert_eq!(router.history(), &[Route::Home]);
    }

    #[test]
    fn pending_route_resumes_after_rehydration() {
        let ctx = context(MemorySessionStore::with_session(session()));
        let mut router = Router::new(ctx.clone());

        assert_eq!(router.navigate("/users"), Admission::Pending(Route::Users));
        assert!(router.history().is_empty());

        ctx.rehydrate();
        assert_eq!(router.resume(), Some(Admission::Render(Route::Users)));
    }

    #[test]
    fn logout_lands_on_login() {
        let ctx = context(MemorySessionStore::with_session(session()));
        ctx.rehydrate();
        let mut router = Router::new(ctx.clone());
        router.navigate("/");

        assert_eq!(router.logout(), Admission::Render(Route::Login));
        assert!(!ctx.is_authenticated());
        assert_eq!(router.navigate("/"), Admission::Render(Route::Welcome));
    }

    #[test]
    fn nav_links_follow_session() {
        let anonymous = nav_links(&AuthState::Anonymous);
        assert_eq!(anonymous.len(), 2);

        let signed_in = nav_links(&AuthState::Authenticated(session()));
        assert_eq!(
            signed_in[2].action,
            NavAction::Go(Route::Profile("u1".into()))
        );
        assert_eq!(signed_in[3].action, NavAction::Logout);
    }
}
