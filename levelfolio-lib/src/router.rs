//! Path based routing between the public portfolio and the admin panel.

use strum::Display;
use tracing::debug;

use crate::session::SessionState;

pub const ADMIN_PATH: &str = "/admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Route {
    Portfolio,
    Admin,
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        let is_admin = path == ADMIN_PATH
            || path
                .strip_prefix(ADMIN_PATH)
                .is_some_and(|rest| rest.starts_with('/'));

        if is_admin { Route::Admin } else { Route::Portfolio }
    }
}

/// What the application shows for a route given the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Portfolio,
    Login,
    Dashboard,
}

pub fn gate(route: Route, session: &SessionState) -> Screen {
    match (session, route) {
        (SessionState::Loading, _) => Screen::Loading,
        (_, Route::Portfolio) => Screen::Portfolio,
        (SessionState::Unauthenticated, Route::Admin) => Screen::Login,
        (SessionState::Authenticated(_), Route::Admin) => Screen::Dashboard,
    }
}

/// Navigation history. The route is recomputed on every path change.
#[derive(Debug, Clone)]
pub struct Router {
    path: String,
    route: Route,
    back: Vec<String>,
    forward: Vec<String>,
}

impl Router {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            route: Route::from_path(&path),
            path,
            back: Vec::new(),
            forward: Vec::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn navigate(&mut self, path: impl Into<String>) -> Route {
        let path = path.into();
        if path != self.path {
            let previous = std::mem::replace(&mut self.path, path);
            self.back.push(previous);
            self.forward.clear();
        }
        self.recompute()
    }

    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }

    pub fn back(&mut self) -> Route {
        if let Some(previous) = self.back.pop() {
            let current = std::mem::replace(&mut self.path, previous);
            self.forward.push(current);
        }
        self.recompute()
    }

    pub fn forward(&mut self) -> Route {
        if let Some(next) = self.forward.pop() {
            let current = std::mem::replace(&mut self.path, next);
            self.back.push(current);
        }
        self.recompute()
    }

    fn recompute(&mut self) -> Route {
        self.route = Route::from_path(&self.path);
        debug!("Routed {} to {}", self.path, self.route);
        self.route
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new("/")
    }
}

#[cfg(test)]
mod test {
    use crate::session::{Session, User};

    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(Route::from_path("/admin"), Route::Admin);
        assert_eq!(Route::from_path("/admin/skills"), Route::Admin);
        assert_eq!(Route::from_path("/administrator"), Route::Portfolio);
        assert_eq!(Route::from_path("/"), Route::Portfolio);
        assert_eq!(Route::from_path("/projects"), Route::Portfolio);
    }

    #[test]
    fn test_history() {
        let mut router = Router::default();

        assert_eq!(router.navigate("/admin"), Route::Admin);
        assert_eq!(router.back(), Route::Portfolio);
        assert_eq!(router.path(), "/");
        assert!(router.can_go_forward());

        assert_eq!(router.forward(), Route::Admin);
        assert!(!router.can_go_forward());

        router.back();
        router.navigate("/about");
        assert!(!router.can_go_forward());
    }

    #[test]
    fn test_back_without_history() {
        let mut router = Router::new("/admin/profile");

        assert_eq!(router.back(), Route::Admin);
        assert_eq!(router.path(), "/admin/profile");
    }

    #[test]
    fn test_gate() {
        let signed_in = SessionState::Authenticated(Session {
            access_token: "t".into(),
            refresh_token: String::new(),
            expires_at: i64::MAX,
            user: User {
                id: "u".into(),
                email: "admin@example.com".into(),
            },
        });

        assert_eq!(gate(Route::Admin, &SessionState::Loading), Screen::Loading);
        assert_eq!(gate(Route::Portfolio, &SessionState::Loading), Screen::Loading);
        assert_eq!(gate(Route::Portfolio, &signed_in), Screen::Portfolio);
        assert_eq!(
            gate(Route::Admin, &SessionState::Unauthenticated),
            Screen::Login
        );
        assert_eq!(gate(Route::Admin, &signed_in), Screen::Dashboard);
    }
}
