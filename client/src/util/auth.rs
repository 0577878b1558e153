//! Route guard shared by every page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages call [`install_route_guard`] with their own [`Route`]. The decision
//! itself is the pure [`guard`] function; [`RouteWatch`] adds the one piece of
//! memory a page needs: the sign-out epoch it was entered under, so a
//! sign-out followed quickly by another sign-in still bounces the page.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::net::types::Session;
use crate::state::session::SessionStore;

/// Client-side routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    SignUp,
    Dashboard,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::SignUp => "/signup",
            Self::Dashboard => "/dashboard",
        }
    }

    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Self::Landing),
            "/login" => Some(Self::Login),
            "/signup" => Some(Self::SignUp),
            "/dashboard" => Some(Self::Dashboard),
            _ => None,
        }
    }

    /// Whether the route needs a signed-in user.
    #[must_use]
    pub fn is_protected(self) -> bool {
        matches!(self, Self::Dashboard)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

/// Decide whether `route` may render for `session`.
#[must_use]
pub fn guard(session: Option<&Session>, route: Route) -> GuardDecision {
    if route.is_protected() && session.is_none() {
        GuardDecision::Redirect(Route::Login)
    } else {
        GuardDecision::Allow
    }
}

/// What a page should do after a store change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchDecision {
    /// The session has not been reported yet.
    Pending,
    Allow,
    Redirect(Route),
}

/// Per-page guard memory.
#[derive(Clone, Debug)]
pub struct RouteWatch {
    route: Route,
    entered_epoch: Option<u64>,
}

impl RouteWatch {
    #[must_use]
    pub fn new(route: Route) -> Self {
        Self { route, entered_epoch: None }
    }

    /// Re-evaluate the guard against the latest store snapshot.
    pub fn observe(&mut self, store: &SessionStore) -> WatchDecision {
        if !store.is_resolved() {
            return WatchDecision::Pending;
        }
        let entered = *self.entered_epoch.get_or_insert(store.sign_out_epoch());
        if self.route.is_protected() && store.sign_out_epoch() > entered {
            return WatchDecision::Redirect(Route::Login);
        }
        match guard(store.session(), self.route) {
            GuardDecision::Allow => WatchDecision::Allow,
            GuardDecision::Redirect(to) => WatchDecision::Redirect(to),
        }
    }
}

/// Navigate away from `route` whenever the guard rejects it.
pub fn install_route_guard<F>(store: RwSignal<SessionStore>, route: Route, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    let mut watch = RouteWatch::new(route);
    Effect::new(move |_| {
        let decision = store.with(|s| watch.observe(s));
        if let WatchDecision::Redirect(to) = decision {
            log::info!("route guard: {} -> {}", route.path(), to.path());
            navigate(to.path(), NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
