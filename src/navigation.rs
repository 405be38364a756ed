//! Client-side route guarding.
//!
//! Decides, per navigation, whether the single-page frontend may show a
//! route based only on whether a token is stored locally. No server call is
//! made and token validity is not checked: a stored but expired token still
//! satisfies `RequiresAuth` here. The auth gate on the API is what actually
//! protects data.

use serde::Serialize;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// What a route demands of the local auth state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteRequirement {
    None,
    RequiresAuth,
    RequiresGuest,
}

/// Outcome of a navigation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "to", rename_all = "snake_case")]
pub enum Navigation {
    Allow,
    Redirect(&'static str),
}

/// A frontend route and its requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Route {
    pub path: &'static str,
    pub view: &'static str,
    pub requirement: RouteRequirement,
}

/// The frontend's route table
pub const ROUTES: &[Route] = &[
    Route {
        path: "/",
        view: "home",
        requirement: RouteRequirement::None,
    },
    Route {
        path: LOGIN_PATH,
        view: "login",
        requirement: RouteRequirement::RequiresGuest,
    },
    Route {
        path: DASHBOARD_PATH,
        view: "dashboard",
        requirement: RouteRequirement::RequiresAuth,
    },
];

/// Look up a route by exact path
pub fn find_route(path: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.path == path)
}

/// Decide a navigation from the target's requirement and local token presence
pub fn guard(requirement: RouteRequirement, token_present: bool) -> Navigation {
    match requirement {
        RouteRequirement::RequiresAuth if !token_present => Navigation::Redirect(LOGIN_PATH),
        RouteRequirement::RequiresGuest if token_present => Navigation::Redirect(DASHBOARD_PATH),
        _ => Navigation::Allow,
    }
}

/// Resolve a path through the route table and guard it
///
/// Paths outside the table carry no requirement.
pub fn navigate(path: &str, token_present: bool) -> Navigation {
    let requirement = find_route(path)
        .map(|route| route.requirement)
        .unwrap_or(RouteRequirement::None);
    guard(requirement, token_present)
}
