/// Routes reachable without a session.
pub const PUBLIC_ROUTES: [&str; 3] = ["/login", "/signup", "/reset-password"];

pub const LOGIN_ROUTE: &str = "/login";
pub const HOME_ROUTE: &str = "/";

/// Where a navigation should end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Allow,
    /// No session and the route is protected.
    Login,
    /// Signed in and the route is a public (sign-in) page.
    Home,
}

impl Redirect {
    /// Decides from the route and whether a session exists.
    pub fn decide(route: &str, authenticated: bool) -> Self {
        match (is_public(route), authenticated) {
            (false, false) => Redirect::Login,
            (true, true) => Redirect::Home,
            _ => Redirect::Allow,
        }
    }

    /// The route to go to instead, if any.
    pub fn target(&self) -> Option<&'static str> {
        match self {
            Redirect::Allow => None,
            Redirect::Login => Some(LOGIN_ROUTE),
            Redirect::Home => Some(HOME_ROUTE),
        }
    }
}

pub fn is_public(route: &str) -> bool {
    PUBLIC_ROUTES.contains(&route)
}
