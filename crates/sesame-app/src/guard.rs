//! Route guard and navigation.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::state::AuthState;

/// Application routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Home,
    Users,
    UserDetail(u64),
}

impl Route {
    /// Public routes are reachable without a session.
    pub fn is_public(self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }

    pub fn path(self) -> String {
        match self {
            Route::Login => "/(auth)/login".to_string(),
            Route::Register => "/(auth)/register".to_string(),
            Route::Home => "/(app)".to_string(),
            Route::Users => "/(app)/users".to_string(),
            Route::UserDetail(id) => format!("/(app)/users/{}", id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Session phase as seen by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Session reads have not settled.
    Indeterminate,
    Unauthenticated,
    Authenticated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Indeterminate => f.write_str("loading"),
            Phase::Unauthenticated => f.write_str("unauthenticated"),
            Phase::Authenticated => f.write_str("authenticated"),
        }
    }
}

/// Navigation host.
pub trait Navigator: Send + Sync {
    fn current(&self) -> Route;

    /// Replace the current route without adding a history entry.
    fn replace(&self, route: Route);
}

/// In-memory navigator that remembers every replacement.
#[derive(Debug)]
pub struct MemoryNavigator {
    state: Mutex<(Route, Vec<Route>)>,
}

impl MemoryNavigator {
    pub fn new(start: Route) -> Self {
        Self {
            state: Mutex::new((start, Vec::new())),
        }
    }

    /// Move to `route` as the user would, without recording a replacement.
    pub fn visit(&self, route: Route) {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).0 = route;
    }

    /// Every route passed to [`Navigator::replace`], oldest first.
    pub fn replacements(&self) -> Vec<Route> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .1
            .clone()
    }
}

impl Navigator for MemoryNavigator {
    fn current(&self) -> Route {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).0
    }

    fn replace(&self, route: Route) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.0 = route;
        state.1.push(route);
    }
}

/// What to put on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render {
    Loading,
    /// Render nothing; a redirect is pending or the route is off limits.
    Nothing,
    Screen(Route),
}

/// Result of one guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardOutcome {
    pub phase: Phase,
    pub render: Render,
    /// Route to `replace` to, issued at most once per transition.
    pub redirect: Option<Route>,
}

/// Decides what the current route renders for a session state.
///
/// The guard only remembers the last redirect it issued, so a state that
/// keeps asking for the same redirect produces it once.
#[derive(Debug, Default)]
pub struct RouteGuard {
    last_redirect: Option<Route>,
}

impl RouteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&mut self, state: &AuthState, current: Route) -> GuardOutcome {
        let phase = state.phase();
        let (render, target) = match phase {
            Phase::Indeterminate => {
                return GuardOutcome {
                    phase,
                    render: Render::Loading,
                    redirect: None,
                };
            }
            Phase::Unauthenticated if current.is_public() => (Render::Screen(current), None),
            Phase::Unauthenticated => (Render::Nothing, Some(Route::Login)),
            Phase::Authenticated if current.is_public() => (Render::Nothing, Some(Route::Home)),
            Phase::Authenticated => (Render::Screen(current), None),
        };

        let redirect = match target {
            Some(route) if self.last_redirect == Some(route) => None,
            Some(route) => {
                debug!(%phase, from = %current, to = %route, "Redirecting");
                self.last_redirect = Some(route);
                Some(route)
            }
            None => {
                self.last_redirect = None;
                None
            }
        };

        GuardOutcome {
            phase,
            render,
            redirect,
        }
    }
}
