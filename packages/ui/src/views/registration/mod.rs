//! # Registration wizard
//!
//! One [`RegistrationSession`] per mounted wizard, held in a signal and shared
//! with the step views through context. Leaving the page drops the wizard
//! and with it the session and any in-flight submission.
//!
//! Step views own their form state and hand a finished payload to
//! [`Wizard::run`], which submits it against a copy of the session and writes
//! the copy back. Field errors come back to the form, everything else goes
//! through the error reporter.

use std::future::Future;

use api::{ApiError, ApiResult, HttpClient, PaymentInstructions, StepOutcome};
use dioxus::prelude::*;
use model::{FieldErrors, RegistrationSession, Step};

use crate::auth::{use_api, use_error_reporter, Api, ErrorReporter};
use crate::components::{use_toast, Button, ButtonVariant, ToastOptions, Toasts};

mod account;
mod completion;
mod payment;
mod payout;
mod placement;
mod products;

use account::AccountStepView;
use completion::CompletionStepView;
use payment::PaymentStepView;
use payout::PayoutStepView;
use placement::PlacementStepView;
use products::ProductsStepView;

#[derive(Clone, Copy)]
pub struct Wizard {
    pub session: Signal<RegistrationSession>,
    /// Set by the payment step, shown on the completion step.
    pub instructions: Signal<Option<PaymentInstructions>>,
    /// Welcome message after a successful completion.
    pub completed: Signal<Option<String>>,
    pub busy: Signal<bool>,
    api: Api,
    reporter: ErrorReporter,
    toasts: Toasts,
}

impl Wizard {
    pub fn api(&self) -> Api {
        self.api
    }

    pub fn reporter(&self) -> ErrorReporter {
        self.reporter
    }

    /// Submit through `submit` and keep the session it hands back.
    ///
    /// Returns the outcome when the server accepted the step.
    pub async fn run<F, Fut>(mut self, mut errors: Signal<FieldErrors>, submit: F) -> Option<StepOutcome>
    where
        F: FnOnce(HttpClient, RegistrationSession) -> Fut,
        Fut: Future<Output = (RegistrationSession, ApiResult<StepOutcome>)>,
    {
        if *self.busy.peek() {
            return None;
        }
        self.busy.set(true);
        errors.set(FieldErrors::new());

        let working = self.session.peek().clone();
        let (working, result) = submit(self.api.client(), working).await;
        self.session.set(working);
        self.busy.set(false);

        match result {
            Ok(outcome) => {
                if !outcome.message.trim().is_empty() {
                    self.toasts.success(outcome.message.clone(), ToastOptions::new());
                }
                Some(outcome)
            }
            Err(ApiError::Validation(e)) => {
                errors.set(e);
                None
            }
            Err(e) => {
                self.reporter.report(&e);
                None
            }
        }
    }

    pub fn back(mut self) {
        if !*self.busy.peek() {
            self.session.write().retreat();
        }
    }
}

pub fn use_wizard() -> Wizard {
    use_context::<Wizard>()
}

/// First error for `field`, for a form's `Field { error }`.
pub fn field_error(errors: Signal<FieldErrors>, field: &str) -> Option<String> {
    errors.read().get(field).map(str::to_string)
}

#[component]
pub fn RegistrationWizard() -> Element {
    let api = use_api();
    let reporter = use_error_reporter();
    let toasts = use_toast();
    let session = use_signal(RegistrationSession::new);
    let instructions = use_signal(|| None);
    let completed = use_signal(|| None);
    let busy = use_signal(|| false);
    let wizard = use_context_provider(|| Wizard {
        session,
        instructions,
        completed,
        busy,
        api,
        reporter,
        toasts,
    });

    let mut completed = wizard.completed;
    if let Some(message) = completed() {
        return rsx! {
            section { class: "view wizard",
                div { class: "wizard-done",
                    h2 { "Registration complete" }
                    p { "{message}" }
                    Button { onclick: move |_| completed.set(None), "Register another member" }
                }
            }
        };
    }

    let step = wizard.session.read().step();
    let body = match step {
        Step::Placement => rsx! { PlacementStepView {} },
        Step::Products => rsx! { ProductsStepView {} },
        Step::Account => rsx! { AccountStepView {} },
        Step::Payout => rsx! { PayoutStepView {} },
        Step::Payment => rsx! { PaymentStepView {} },
        Step::Completion => rsx! { CompletionStepView {} },
    };

    rsx! {
        section { class: "view wizard",
            StepProgress { current: step }
            div { key: "{step.number()}", class: "wizard-step",
                h2 { {step.title()} }
                {body}
            }
        }
    }
}

#[component]
fn StepProgress(current: Step) -> Element {
    rsx! {
        ol { class: "wizard-progress",
            for step in Step::ALL {
                li {
                    key: "{step.number()}",
                    class: if step == current {
                        "progress-step progress-current"
                    } else if step < current {
                        "progress-step progress-done"
                    } else {
                        "progress-step"
                    },
                    span { class: "progress-number", "{step.number()}" }
                    span { class: "progress-title", {step.title()} }
                }
            }
        }
    }
}

/// Back / continue row shared by every step form.
#[component]
pub fn StepActions(
    #[props(default = "Continue".to_string())] submit_label: String,
    #[props(default = true)] can_go_back: bool,
) -> Element {
    let wizard = use_wizard();
    let busy = (wizard.busy)();

    rsx! {
        div { class: "wizard-actions",
            if can_go_back {
                Button {
                    variant: ButtonVariant::Ghost,
                    disabled: busy,
                    onclick: move |_| wizard.back(),
                    "Back"
                }
            }
            Button { submit: true, disabled: busy,
                if busy { "Submitting..." } else { "{submit_label}" }
            }
        }
    }
}
