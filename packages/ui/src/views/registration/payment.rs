use dioxus::prelude::*;
use model::steps::PaymentMethod;
use model::{FieldErrors, PaymentStep, Step};

use super::{field_error, use_wizard, StepActions};
use crate::components::Field;

#[component]
pub fn PaymentStepView() -> Element {
    let wizard = use_wizard();
    let mut instructions = wizard.instructions;
    let mut form = use_signal(|| wizard.session.peek().prefill::<PaymentStep>(Step::Payment));
    let errors = use_signal(FieldErrors::new);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let payload = form();
        spawn(async move {
            let outcome = wizard
                .run(errors, move |client, mut session| async move {
                    let result = client.submit_payment(&mut session, &payload).await;
                    (session, result)
                })
                .await;
            if let Some(outcome) = outcome {
                instructions.set(outcome.payment_instructions());
            }
        });
    };

    let chosen = form.read().payment_method;

    rsx! {
        form { class: "wizard-form", onsubmit,
            Field { label: "Payment method", error: field_error(errors, "payment_method"),
                div { class: "choice-list", role: "radiogroup",
                    for method in PaymentMethod::ALL {
                        label { key: "{method.as_str()}", class: "choice",
                            input {
                                r#type: "radio",
                                name: "payment_method",
                                value: method.as_str(),
                                checked: chosen == Some(method),
                                onchange: move |_| form.write().payment_method = Some(method),
                            }
                            span { {method.label()} }
                        }
                    }
                }
            }
            StepActions { submit_label: "Proceed to payment" }
        }
    }
}
