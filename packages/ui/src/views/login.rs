use api::ApiError;
use dioxus::prelude::*;
use model::FieldErrors;

use crate::auth::{log_in, use_api, use_auth};
use crate::components::{use_toast, Button, Field, ToastOptions};

#[component]
pub fn LoginView(on_success: EventHandler<()>) -> Element {
    let auth = use_auth();
    let api = use_api();
    let toasts = use_toast();

    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut errors = use_signal(FieldErrors::new);
    let mut submitting = use_signal(|| false);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let mut check = FieldErrors::new();
        check.required("username", &username(), "Username");
        check.required("password", &password(), "Password");
        if !check.is_empty() {
            errors.set(check);
            return;
        }
        errors.set(FieldErrors::new());
        submitting.set(true);

        spawn(async move {
            match log_in(auth, api, username().trim(), &password()).await {
                Ok(()) => {
                    password.set(String::new());
                    on_success.call(());
                }
                Err(ApiError::Validation(e)) => errors.set(e),
                Err(e) => toasts.error(e.user_message(), ToastOptions::new()),
            }
            submitting.set(false);
        });
    };

    let error_for = move |field: &str| errors.read().get(field).map(str::to_string);

    rsx! {
        div { class: "login-page",
            form { class: "login-card", onsubmit,
                h1 { "Sign in" }
                p { class: "muted", "Use your member username and password." }
                Field { label: "Username", html_for: "login-username", error: error_for("username"),
                    input {
                        id: "login-username",
                        class: "input",
                        r#type: "text",
                        autocomplete: "username",
                        value: "{username}",
                        oninput: move |evt| username.set(evt.value()),
                    }
                }
                Field { label: "Password", html_for: "login-password", error: error_for("password"),
                    input {
                        id: "login-password",
                        class: "input",
                        r#type: "password",
                        autocomplete: "current-password",
                        value: "{password}",
                        oninput: move |evt| password.set(evt.value()),
                    }
                }
                Button { submit: true, disabled: submitting(), class: "button-block",
                    if submitting() { "Signing in..." } else { "Sign in" }
                }
            }
        }
    }
}
