//! Screen routing and the authentication guard.
//!
//! | path class | session valid | result                  |
//! |------------|---------------|-------------------------|
//! | public     | no            | allow                   |
//! | public     | yes           | redirect to `/dashboard` |
//! | protected  | no            | redirect to `/login`    |
//! | protected  | yes           | allow                   |

pub const LANDING_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Screens of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Landing,
    Login,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => LANDING_PATH,
            Route::Login => LOGIN_PATH,
            Route::Dashboard => DASHBOARD_PATH,
        }
    }

    /// Map a path to a screen. Anything under `/dashboard` is the dashboard.
    pub fn from_path(path: &str) -> Option<Route> {
        match path {
            LANDING_PATH => Some(Route::Landing),
            LOGIN_PATH => Some(Route::Login),
            p if p == DASHBOARD_PATH || p.starts_with("/dashboard/") => Some(Route::Dashboard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Public,
    Protected,
}

/// Guard decision for one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(&'static str),
}

pub fn classify(path: &str) -> PathClass {
    if path == LANDING_PATH || path == LOGIN_PATH {
        PathClass::Public
    } else {
        PathClass::Protected
    }
}

pub fn guard(path: &str, authenticated: bool) -> Navigation {
    match (classify(path), authenticated) {
        (PathClass::Public, false) | (PathClass::Protected, true) => Navigation::Allow,
        (PathClass::Public, true) => Navigation::Redirect(DASHBOARD_PATH),
        (PathClass::Protected, false) => Navigation::Redirect(LOGIN_PATH),
    }
}

/// Current screen, changed only through the guard.
#[derive(Debug, Default)]
pub struct Router {
    current: Route,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Route {
        self.current
    }

    /// Navigate to `path`, following the guard's redirect if any.
    ///
    /// Unknown protected paths resolve to the dashboard once allowed.
    pub fn navigate(&mut self, path: &str, authenticated: bool) -> Route {
        let target = match guard(path, authenticated) {
            Navigation::Allow => path,
            Navigation::Redirect(to) => {
                tracing::debug!("Route guard redirected {} to {}", path, to);
                to
            }
        };
        self.current = Route::from_path(target).unwrap_or(Route::Dashboard);
        self.current
    }

    /// Re-run the guard on the current screen, e.g. after the session changed.
    pub fn revalidate(&mut self, authenticated: bool) -> Route {
        let path = self.current.path();
        self.navigate(path, authenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_table() {
        assert_eq!(guard("/", false), Navigation::Allow);
        assert_eq!(guard("/login", false), Navigation::Allow);
        assert_eq!(guard("/login", true), Navigation::Redirect(DASHBOARD_PATH));
        assert_eq!(guard("/", true), Navigation::Redirect(DASHBOARD_PATH));
        assert_eq!(guard("/dashboard", false), Navigation::Redirect(LOGIN_PATH));
        assert_eq!(guard("/dashboard/settings", false), Navigation::Redirect(LOGIN_PATH));
        assert_eq!(guard("/dashboard", true), Navigation::Allow);
    }

    #[test]
    fn test_unknown_paths_are_protected() {
        assert_eq!(classify("/reports"), PathClass::Protected);
        assert_eq!(classify("/login/"), PathClass::Protected);
    }

    #[test]
    fn test_router_follows_redirects() {
        let mut router = Router::new();
        assert_eq!(router.navigate(DASHBOARD_PATH, false), Route::Login);
        assert_eq!(router.navigate(LOGIN_PATH, true), Route::Dashboard);
        assert_eq!(router.navigate("/dashboard/nested", true), Route::Dashboard);
    }

    #[test]
    fn test_revalidate_after_logout() {
        let mut router = Router::new();
        router.navigate(DASHBOARD_PATH, true);
        assert_eq!(router.revalidate(false), Route::Login);
    }

    #[test]
    fn test_route_paths_round_trip() {
        for route in [Route::Landing, Route::Login, Route::Dashboard] {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
    }
}
