//! Route gate
//!
//! Pages behind the sign-in wall redirect signed-out visitors to the landing
//! page; the sign-in, sign-up and forgot-password pages send a visitor who is
//! already signed in straight to the dashboard.

use super::AuthState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    Home,
    SignIn,
    SignUp,
    ForgotPassword,
    Dashboard,
    Customers,
    Projects,
    Agreements,
    Tickets,
}

impl Route {
    pub const ALL: [Route; 9] = [
        Route::Home,
        Route::SignIn,
        Route::SignUp,
        Route::ForgotPassword,
        Route::Dashboard,
        Route::Customers,
        Route::Projects,
        Route::Agreements,
        Route::Tickets,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::SignIn => "/signin",
            Route::SignUp => "/signup",
            Route::ForgotPassword => "/forgot-password",
            Route::Dashboard => "/dashboard",
            Route::Customers => "/dashboard/customers",
            Route::Projects => "/dashboard/projects",
            Route::Agreements => "/dashboard/maintenance-agreements",
            Route::Tickets => "/dashboard/support-tickets",
        }
    }

    /// Route for `path`, ignoring one trailing slash
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = match path.strip_suffix('/') {
            Some(rest) if !rest.is_empty() => rest,
            _ => path,
        };
        Route::ALL.into_iter().find(|r| r.path() == trimmed)
    }

    /// Requires a signed-in user
    pub fn is_private(&self) -> bool {
        matches!(
            self,
            Route::Dashboard | Route::Customers | Route::Projects | Route::Agreements | Route::Tickets
        )
    }

    /// Only meaningful while signed out
    pub fn is_auth_page(&self) -> bool {
        matches!(self, Route::SignIn | Route::SignUp | Route::ForgotPassword)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session state unknown; show a loading placeholder
    Loading,
    Render,
    Redirect(Route),
}

/// Decides what to show for `route` given the current session
pub fn gate(route: Route, state: &AuthState) -> RouteDecision {
    match state {
        AuthState::Loading if route.is_private() || route.is_auth_page() => RouteDecision::Loading,
        AuthState::SignedOut if route.is_private() => RouteDecision::Redirect(Route::Home),
        AuthState::SignedIn(_) if route.is_auth_page() => RouteDecision::Redirect(Route::Dashboard),
        _ => RouteDecision::Render,
    }
}
