//! Authentication context, the API handle and error reporting for the UI.

use api::{should_logout, ApiError, ApiResult, HttpClient, HttpTransport};
use dioxus::prelude::*;
use model::{LoginSession, LogoutLatch, PortalConfig, UserProfile};

use crate::components::{use_toast, ToastOptions, Toasts};
use crate::platform::{load_token, store_token};

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    /// True until the stored token has been checked against `auth/me`.
    pub loading: bool,
    pub latch: LogoutLatch,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            token: None,
            loading: true,
            latch: LogoutLatch::new(),
        }
    }
}

impl AuthState {
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(UserProfile::is_admin)
    }

    /// Adopt a fresh login. The logout latch is re-armed so the next expired
    /// session logs out again.
    pub fn begin_session(&mut self, session: LoginSession) {
        self.user = Some(session.user);
        self.token = Some(session.token);
        self.loading = false;
        self.latch.rearm();
    }
}

/// Get the current authentication state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

pub fn use_config() -> PortalConfig {
    use_context::<PortalConfig>()
}

/// Handle for building API clients carrying the current token.
#[derive(Clone, Copy, PartialEq)]
pub struct Api {
    base: Signal<HttpClient>,
    auth: Signal<AuthState>,
}

impl Api {
    pub fn client(&self) -> HttpClient {
        let token = self.auth.peek().token.clone();
        self.base.peek().clone().with_token(token)
    }
}

pub fn use_api() -> Api {
    use_context::<Api>()
}

/// Routes API failures to the user: field errors stay with the form, an
/// expired session logs out once, everything else becomes a toast.
#[derive(Clone, Copy)]
pub struct ErrorReporter {
    toasts: Toasts,
    auth: Signal<AuthState>,
    api: Api,
}

impl ErrorReporter {
    pub fn report(&mut self, error: &ApiError) {
        if error.is_unauthenticated() {
            let first = should_logout(&mut self.auth.write().latch, error);
            if first {
                self.toasts.error(
                    "Your session has expired. Please log in again.".to_string(),
                    ToastOptions::new(),
                );
                end_session(self.auth, self.api);
            }
            return;
        }
        self.toasts.error(error.user_message(), ToastOptions::new());
    }
}

pub fn use_error_reporter() -> ErrorReporter {
    ErrorReporter {
        toasts: use_toast(),
        auth: use_auth(),
        api: use_api(),
    }
}

fn transport_for(config: &PortalConfig) -> HttpTransport {
    HttpTransport::new(&config.api.base_url, config.api.timeout_secs).unwrap_or_else(|e| {
        tracing::error!("failed to build HTTP client, using defaults: {e}");
        HttpTransport::with_defaults(&config.api.base_url)
    })
}

/// Clear local auth state and tell the server, at most once per login.
fn end_session(mut auth: Signal<AuthState>, api: Api) {
    let client = api.client();
    auth.with_mut(|state| {
        state.user = None;
        state.token = None;
        state.loading = false;
    });
    store_token(None);

    if client.token().is_some() {
        let _ = spawn_forever(async move {
            if let Err(e) = client.logout().await {
                tracing::debug!("server-side logout failed: {e}");
            }
        });
    }
}

async fn restore_session(mut auth: Signal<AuthState>, api: Api) {
    let Some(token) = load_token() else {
        auth.write().loading = false;
        return;
    };
    auth.write().token = Some(token);

    match api.client().current_user().await {
        Ok(user) => {
            tracing::info!(username = %user.username, "session restored");
            auth.with_mut(|state| {
                state.user = Some(user);
                state.loading = false;
            });
        }
        Err(e) => {
            tracing::warn!("could not restore session: {e}");
            if e.is_unauthenticated() {
                store_token(None);
            }
            auth.with_mut(|state| {
                state.user = None;
                state.token = None;
                state.loading = false;
            });
        }
    }
}

/// Exchange credentials for a token and start a fresh session.
pub async fn log_in(
    mut auth: Signal<AuthState>,
    api: Api,
    username: &str,
    password: &str,
) -> ApiResult<()> {
    let client = api.client().with_token(None);
    let session = client.login(username, password).await?;
    tracing::info!(username = %session.user.username, "logged in");
    store_token(Some(&session.token));
    auth.write().begin_session(session);
    Ok(())
}

/// Provider component that manages authentication state.
/// Wrap your app with this component (inside a `ToastProvider`).
#[component]
pub fn AuthProvider(config: PortalConfig, children: Element) -> Element {
    let transport = use_hook(|| transport_for(&config));
    use_context_provider(|| config.clone());
    let auth = use_context_provider(|| Signal::new(AuthState::default()));
    let base = use_signal(|| HttpClient::new(transport));
    let api = use_context_provider(|| Api { base, auth });

    use_effect(move || {
        spawn(restore_session(auth, api));
    });

    rsx! {
        {children}
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let mut auth = use_auth();
    let api = use_api();

    let onclick = move |_| {
        if auth.write().latch.trip() {
            tracing::info!("logging out");
            end_session(auth, api);
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn login(username: &str) -> LoginSession {
        serde_json::from_value(json!({
            "token": format!("token-{username}"),
            "user": {"id": 1, "username": username, "role": "admin"}
        }))
        .unwrap()
    }

    #[test]
    fn starts_loading_without_a_user() {
        let state = AuthState::default();
        assert!(state.loading);
        assert!(state.user.is_none());
        assert!(!state.is_admin());
    }

    #[test]
    fn a_new_login_rearms_the_logout_latch() {
        let mut state = AuthState::default();
        assert!(state.latch.trip());
        assert!(!state.latch.trip());

        state.begin_session(login("ada"));
        assert_eq!(state.token.as_deref(), Some("token-ada"));
        assert!(!state.loading);
        assert!(state.is_admin());
        assert!(state.latch.trip());
    }
}
