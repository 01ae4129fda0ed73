use api::PaymentInstructions;
use dioxus::prelude::*;
use model::format::money_in;
use model::FieldErrors;

use super::use_wizard;
use crate::components::{Button, ButtonVariant, Spinner};

const DEFAULT_WELCOME: &str = "The new member's account is ready.";

#[component]
pub fn CompletionStepView() -> Element {
    let wizard = use_wizard();
    let mut instructions = wizard.instructions;
    let mut completed = wizard.completed;
    let errors = use_signal(FieldErrors::new);

    let finish = move || {
        spawn(async move {
            let outcome = wizard
                .run(errors, |client, mut session| async move {
                    let result = client.complete_registration(&mut session).await;
                    (session, result)
                })
                .await;
            if let Some(outcome) = outcome {
                let message = if outcome.message.trim().is_empty() {
                    DEFAULT_WELCOME.to_string()
                } else {
                    outcome.message
                };
                instructions.set(None);
                completed.set(Some(message));
            }
        });
    };

    // Completion is attempted once on arrival; after a failure only the
    // user's Retry calls it again.
    use_hook(move || {
        if !wizard.session.peek().completion_failed() {
            finish();
        }
    });

    let busy = (wizard.busy)();
    let can_retry = wizard.session.read().can_retry();

    rsx! {
        div { class: "wizard-form",
            if let Some(details) = instructions() {
                PaymentDetails { details }
            }
            if busy {
                Spinner { label: "Confirming payment..." }
            } else if can_retry {
                div { class: "error-state",
                    p { "We could not confirm this registration yet. Complete the payment, then retry." }
                }
            }
            div { class: "wizard-actions",
                Button {
                    variant: ButtonVariant::Ghost,
                    disabled: busy,
                    onclick: move |_| wizard.back(),
                    "Back"
                }
                if can_retry {
                    Button { disabled: busy, onclick: move |_| finish(), "Retry" }
                }
            }
        }
    }
}

#[component]
fn PaymentDetails(details: PaymentInstructions) -> Element {
    let amount = money_in(details.amount, details.currency.as_deref());
    rsx! {
        dl { class: "payment-details",
            if let Some(reference) = details.reference {
                dt { "Reference" }
                dd { code { "{reference}" } }
            }
            dt { "Amount" }
            dd { "{amount}" }
            if let Some(bank) = details.bank_name {
                dt { "Bank" }
                dd { "{bank}" }
            }
            if let Some(number) = details.account_number {
                dt { "Account number" }
                dd { code { "{number}" } }
            }
            if let Some(name) = details.account_name {
                dt { "Account name" }
                dd { "{name}" }
            }
        }
        if let Some(url) = details.payment_url {
            a { class: "button button-primary", href: "{url}", target: "_blank", rel: "noopener",
                "Pay now"
            }
        }
    }
}
