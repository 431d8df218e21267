//! Named-route navigation requested by the session store.
//!
//! The store never owns a router. It asks a `Navigator` to move to one of
//! the routes below; the front-end decides what that means.

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use tracing::info;

use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    UserDashboard,
    AgencyDashboard,
}

impl Route {
    /// Route name as registered in the front-end's route table
    pub fn name(&self) -> &'static str {
        match self {
            Route::Login => "login",
            Route::UserDashboard => "user-dashboard",
            Route::AgencyDashboard => "agency-dashboard",
        }
    }

    /// Landing page after a successful login
    pub fn dashboard_for(role: Role) -> Self {
        match role {
            Role::Agency => Route::AgencyDashboard,
            Role::User => Route::UserDashboard,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Receives route requests from the session store.
///
/// Called while the store holds its state lock, so implementations must not
/// call back into the store.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that records every request in order.
///
/// Front-ends without a router read `current()` to decide what to show.
#[derive(Debug, Default)]
pub struct RouteHistory {
    routes: Mutex<Vec<Route>>,
}

impl RouteHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Route> {
        self.lock().last().copied()
    }

    pub fn history(&self) -> Vec<Route> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Route>> {
        self.routes.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Navigator for RouteHistory {
    fn navigate(&self, route: Route) {
        info!(route = %route, "Navigating");
        self.lock().push(route);
    }
}
