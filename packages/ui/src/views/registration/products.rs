use dioxus::prelude::*;
use model::format::{money, pv};
use model::{FieldErrors, Product, ProductsStep, Step};
use serde_json::Value;

use super::{field_error, use_wizard, StepActions};
use crate::components::{EmptyState, ErrorState, Field, Spinner};

/// Order total and PV for the current selection.
pub fn selection_totals(products: &[Product], step: &ProductsStep) -> (f64, f64) {
    products.iter().fold((0.0, 0.0), |(price, points), product| {
        let quantity = f64::from(step.quantity_of(product.id));
        (price + product.price * quantity, points + product.pv * quantity)
    })
}

#[component]
pub fn ProductsStepView() -> Element {
    let wizard = use_wizard();
    let api = wizard.api();
    let reporter = wizard.reporter();

    let package_id = use_hook(|| {
        wizard
            .session
            .peek()
            .accumulated()
            .get("package_id")
            .and_then(Value::as_u64)
    });
    let mut form = use_signal(|| wizard.session.peek().prefill::<ProductsStep>(Step::Products));
    let errors = use_signal(FieldErrors::new);

    let mut catalogue = use_resource(move || async move {
        let mut reporter = reporter;
        let Some(package_id) = package_id else {
            return Ok(Vec::new());
        };
        let result = api.client().products(package_id).await;
        if let Err(e) = &result {
            reporter.report(e);
        }
        result
    });

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let payload = form();
        spawn(async move {
            wizard
                .run(errors, move |client, mut session| async move {
                    let result = client.submit_products(&mut session, &payload).await;
                    (session, result)
                })
                .await;
        });
    };

    let products = match &*catalogue.read() {
        None => return rsx! { Spinner { label: "Loading products..." } },
        Some(Err(e)) => {
            return rsx! {
                ErrorState { message: e.user_message(), on_retry: move |_| catalogue.restart() }
            }
        }
        Some(Ok(list)) => list.clone(),
    };
    let (total_price, total_pv) = selection_totals(&products, &form.read());

    rsx! {
        form { class: "wizard-form", onsubmit,
            Field { label: "Products", error: field_error(errors, "products"),
                if products.is_empty() {
                    EmptyState { message: "This package has no products to choose from." }
                }
                div { class: "product-grid",
                    for product in products {
                        div { key: "{product.id}", class: "product-card",
                            if let Some(src) = product.image_url.clone() {
                                img { src, alt: "{product.name}" }
                            }
                            p { class: "product-name", "{product.name}" }
                            p { class: "muted", {format!("{} · {}", money(product.price), pv(product.pv))} }
                            input {
                                class: "input input-compact",
                                r#type: "number",
                                min: "0",
                                aria_label: "Quantity of {product.name}",
                                value: "{form.read().quantity_of(product.id)}",
                                oninput: move |evt| {
                                    let quantity = evt.value().trim().parse::<u32>().unwrap_or(0);
                                    form.write().set_quantity(product.id, quantity);
                                },
                            }
                        }
                    }
                }
            }
            div { class: "wizard-summary",
                span { "Total" }
                strong { {format!("{} · {}", money(total_price), pv(total_pv))} }
            }
            StepActions {}
        }
    }
}
