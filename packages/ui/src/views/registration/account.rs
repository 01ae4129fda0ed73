use dioxus::prelude::*;
use model::{AccountStep, FieldErrors, Place, Step};

use super::{field_error, use_wizard, StepActions};
use crate::auth::ErrorReporter;
use crate::components::Field;

async fn load_places<F, Fut>(mut reporter: ErrorReporter, fetch: F) -> Vec<Place>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = api::ApiResult<Vec<Place>>>,
{
    match fetch().await {
        Ok(places) => places,
        Err(e) => {
            reporter.report(&e);
            Vec::new()
        }
    }
}

#[component]
pub fn AccountStepView() -> Element {
    let wizard = use_wizard();
    let api = wizard.api();
    let reporter = wizard.reporter();

    let prefill: AccountStep = use_hook(|| wizard.session.peek().prefill(Step::Account));
    let mut country_id = use_signal(|| prefill.country_id);
    let mut state_id = use_signal(|| prefill.state_id);
    let mut form = use_signal(|| prefill.clone());
    let errors = use_signal(FieldErrors::new);

    let countries = use_resource(move || async move {
        load_places(reporter, move || async move { api.client().countries().await }).await
    });
    let states = use_resource(move || async move {
        match country_id() {
            Some(id) => load_places(reporter, move || async move { api.client().states(id).await }).await,
            None => Vec::new(),
        }
    });
    let cities = use_resource(move || async move {
        match state_id() {
            Some(id) => load_places(reporter, move || async move { api.client().cities(id).await }).await,
            None => Vec::new(),
        }
    });

    let country_list = countries.read().clone().unwrap_or_default();
    let on_country = move |id: Option<u64>| {
        let name = country_list
            .iter()
            .find(|c| Some(c.id) == id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        country_id.set(id);
        state_id.set(None);
        form.with_mut(|f| {
            f.country_id = id;
            f.country = name;
            f.state_id = None;
            f.city_id = None;
        });
    };
    let on_state = move |id: Option<u64>| {
        state_id.set(id);
        form.with_mut(|f| {
            f.state_id = id;
            f.city_id = None;
        });
    };

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let payload = form();
        spawn(async move {
            wizard
                .run(errors, move |client, mut session| async move {
                    let result = client.submit_account(&mut session, &payload).await;
                    (session, result)
                })
                .await;
        });
    };

    let current = form();

    rsx! {
        form { class: "wizard-form", onsubmit,
            div { class: "form-grid",
                TextField {
                    name: "first_name",
                    label: "First name",
                    value: current.first_name,
                    error: field_error(errors, "first_name"),
                    oninput: move |v| form.write().first_name = v,
                }
                TextField {
                    name: "last_name",
                    label: "Last name",
                    value: current.last_name,
                    error: field_error(errors, "last_name"),
                    oninput: move |v| form.write().last_name = v,
                }
                TextField {
                    name: "username",
                    label: "Username",
                    value: current.username,
                    autocomplete: "username",
                    error: field_error(errors, "username"),
                    oninput: move |v| form.write().username = v,
                }
                TextField {
                    name: "email",
                    label: "Email",
                    input_type: "email",
                    value: current.email,
                    autocomplete: "email",
                    error: field_error(errors, "email"),
                    oninput: move |v| form.write().email = v,
                }
                TextField {
                    name: "phone",
                    label: "Phone number",
                    input_type: "tel",
                    value: current.phone,
                    autocomplete: "tel",
                    error: field_error(errors, "phone"),
                    oninput: move |v| form.write().phone = v,
                }
                TextField {
                    name: "password",
                    label: "Password",
                    input_type: "password",
                    value: current.password,
                    autocomplete: "new-password",
                    error: field_error(errors, "password"),
                    oninput: move |v| form.write().password = v,
                }
                TextField {
                    name: "password_confirmation",
                    label: "Confirm password",
                    input_type: "password",
                    value: current.password_confirmation,
                    autocomplete: "new-password",
                    error: field_error(errors, "password_confirmation"),
                    oninput: move |v| form.write().password_confirmation = v,
                }
                PlaceSelect {
                    name: "country_id",
                    label: "Country",
                    places: countries.read().clone().unwrap_or_default(),
                    selected: current.country_id,
                    error: field_error(errors, "country_id"),
                    onchange: on_country,
                }
                PlaceSelect {
                    name: "state_id",
                    label: "State",
                    places: states.read().clone().unwrap_or_default(),
                    selected: current.state_id,
                    disabled: current.country_id.is_none(),
                    error: field_error(errors, "state_id"),
                    onchange: on_state,
                }
                PlaceSelect {
                    name: "city_id",
                    label: "City",
                    places: cities.read().clone().unwrap_or_default(),
                    selected: current.city_id,
                    disabled: current.state_id.is_none(),
                    error: field_error(errors, "city_id"),
                    onchange: move |id| form.write().city_id = id,
                }
            }
            StepActions {}
        }
    }
}

#[component]
fn TextField(
    name: String,
    label: String,
    value: String,
    #[props(default = "text".to_string())] input_type: String,
    #[props(default = "off".to_string())] autocomplete: String,
    #[props(default)] error: Option<String>,
    oninput: EventHandler<String>,
) -> Element {
    rsx! {
        Field { label, html_for: name.clone(), error,
            input {
                id: "{name}",
                name: "{name}",
                class: "input",
                r#type: "{input_type}",
                autocomplete: "{autocomplete}",
                value: "{value}",
                oninput: move |evt| oninput.call(evt.value()),
            }
        }
    }
}

#[component]
fn PlaceSelect(
    name: String,
    label: String,
    places: Vec<Place>,
    selected: Option<u64>,
    #[props(default)] disabled: bool,
    #[props(default)] error: Option<String>,
    onchange: EventHandler<Option<u64>>,
) -> Element {
    let value = selected.map(|id| id.to_string()).unwrap_or_default();
    let placeholder = format!("Select {}", label.to_lowercase());
    rsx! {
        Field { label, html_for: name.clone(), error,
            select {
                id: "{name}",
                class: "input",
                disabled,
                value: "{value}",
                onchange: move |evt| onchange.call(evt.value().parse().ok()),
                option { value: "", "{placeholder}" }
                for place in places {
                    option { key: "{place.id}", value: "{place.id}", "{place.name}" }
                }
            }
        }
    }
}
