use dioxus::prelude::*;
use model::steps::pays_out_to_bank;
use model::{FieldErrors, PayoutStep, Step};
use serde_json::Value;

use super::{field_error, use_wizard, StepActions};
use crate::components::{Field, Spinner};

#[component]
pub fn PayoutStepView() -> Element {
    let wizard = use_wizard();
    let api = wizard.api();
    let reporter = wizard.reporter();

    let country = use_hook(|| {
        wizard
            .session
            .peek()
            .accumulated()
            .get("country")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    });
    let by_bank = pays_out_to_bank(&country);

    let mut form = use_signal(|| wizard.session.peek().prefill::<PayoutStep>(Step::Payout));
    let errors = use_signal(FieldErrors::new);
    let mut resolving = use_signal(|| false);
    let mut lookups = use_signal(|| 0u64);

    let banks = use_resource(move || async move {
        if !by_bank {
            return Vec::new();
        }
        let mut reporter = reporter;
        match api.client().banks().await {
            Ok(banks) => banks,
            Err(e) => {
                reporter.report(&e);
                Vec::new()
            }
        }
    });

    // Look up the account holder once bank and number are complete. Only the
    // newest lookup may fill the name.
    let mut resolve = move || {
        let details = form.peek().clone();
        form.write().account_name.clear();
        let lookup = *lookups.peek() + 1;
        lookups.set(lookup);
        if !details.ready_to_resolve() {
            resolving.set(false);
            return;
        }
        resolving.set(true);
        spawn(async move {
            let mut reporter = reporter;
            let result = api
                .client()
                .resolve_bank_account(&details.bank_code, &details.account_number)
                .await;
            if *lookups.peek() != lookup {
                return;
            }
            resolving.set(false);
            match result {
                Ok(account) => form.write().account_name = account.account_name,
                Err(e) => reporter.report(&e),
            }
        });
    };

    let bank_list = banks.read().clone();
    let on_bank = move |evt: FormEvent| {
        let code = evt.value();
        let name = bank_list
            .as_ref()
            .and_then(|banks| banks.iter().find(|b| b.code == code))
            .map(|b| b.name.clone())
            .unwrap_or_default();
        form.with_mut(|f| {
            f.bank_code = code;
            f.bank_name = name;
        });
        resolve();
    };

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let payload = form();
        spawn(async move {
            wizard
                .run(errors, move |client, mut session| async move {
                    let result = client.submit_payout(&mut session, payload).await;
                    (session, result)
                })
                .await;
        });
    };

    let current = form();

    rsx! {
        form { class: "wizard-form", onsubmit,
            if by_bank {
                Field { label: "Bank", html_for: "bank", error: field_error(errors, "bank_code"),
                    {match &*banks.read() {
                        None => rsx! { Spinner { label: "Loading banks..." } },
                        Some(list) => rsx! {
                            select {
                                id: "bank",
                                class: "input",
                                value: "{current.bank_code}",
                                onchange: on_bank,
                                option { value: "", "Select a bank" }
                                for bank in list.iter() {
                                    option { key: "{bank.code}", value: "{bank.code}", "{bank.name}" }
                                }
                            }
                        },
                    }}
                }
                Field {
                    label: "Account number",
                    html_for: "account_number",
                    error: field_error(errors, "account_number"),
                    input {
                        id: "account_number",
                        class: "input",
                        inputmode: "numeric",
                        maxlength: "10",
                        value: "{current.account_number}",
                        oninput: move |evt| {
                            form.write().account_number = evt.value().trim().to_string();
                            resolve();
                        },
                    }
                }
                Field {
                    label: "Account name",
                    html_for: "account_name",
                    error: field_error(errors, "account_name"),
                    hint: Some("Filled in from your bank".to_string()),
                    if resolving() {
                        Spinner { label: "Verifying account..." }
                    } else {
                        input {
                            id: "account_name",
                            class: "input",
                            readonly: true,
                            value: "{current.account_name}",
                        }
                    }
                }
            } else {
                Field {
                    label: "USDT wallet address",
                    html_for: "usdt",
                    error: field_error(errors, "usdt_wallet_address"),
                    hint: Some(format!("Members in {country} are paid out in USDT")),
                    input {
                        id: "usdt",
                        class: "input",
                        autocomplete: "off",
                        value: "{current.usdt_wallet_address}",
                        oninput: move |evt| form.write().usdt_wallet_address = evt.value(),
                    }
                }
            }
            Field { label: "Terms", html_for: "accept_terms", error: field_error(errors, "accept_terms"),
                label { class: "checkbox",
                    input {
                        id: "accept_terms",
                        r#type: "checkbox",
                        checked: current.accept_terms,
                        onchange: move |evt| form.write().accept_terms = evt.checked(),
                    }
                    span { "I accept the terms and conditions" }
                }
            }
            StepActions {}
        }
    }
}
