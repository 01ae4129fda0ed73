use dioxus::prelude::*;
use model::format::{money, pv};
use model::{
    DownlineUser, FieldErrors, Leg, PlacementSelection, PlacementStep, SearchGate, SearchTicket,
    Step,
};

use super::{field_error, use_wizard, StepActions};
use crate::auth::{use_config, Api, ErrorReporter};
use crate::components::{use_toast, Button, ButtonVariant, Field, Spinner, ToastOptions};
use crate::platform::sleep_ms;

/// Wait out the debounce window, then search if `ticket` is still the newest.
async fn search_after_pause(
    api: Api,
    mut reporter: ErrorReporter,
    gate: Signal<SearchGate>,
    ticket: SearchTicket,
    debounce_ms: u32,
    sponsor_id: Option<u64>,
) -> Option<Vec<DownlineUser>> {
    sleep_ms(debounce_ms).await;
    if !gate.peek().is_current(&ticket) {
        return None;
    }
    let result = api
        .client()
        .search_downlines(ticket.query(), sponsor_id)
        .await;
    if !gate.peek().is_current(&ticket) {
        tracing::debug!(query = ticket.query(), "dropping stale search results");
        return None;
    }
    match result {
        Ok(found) => Some(found),
        Err(e) => {
            reporter.report(&e);
            None
        }
    }
}

/// Fetch open legs for `placement_id` and, if `keep` is still open, re-select it.
async fn refresh_legs(
    api: Api,
    mut reporter: ErrorReporter,
    mut selection: Signal<PlacementSelection>,
    placement_id: u64,
    keep: Option<Leg>,
) {
    match api.client().available_legs(placement_id).await {
        Ok(availability) => {
            let mut selection = selection.write();
            if selection.apply_availability(placement_id, availability) {
                if let Some(leg) = keep {
                    let _ = selection.choose_leg(leg);
                }
            }
        }
        Err(e) => reporter.report(&e),
    }
}

#[component]
pub fn PlacementStepView() -> Element {
    let wizard = use_wizard();
    let api = wizard.api();
    let reporter = wizard.reporter();
    let config = use_config();
    let toasts = use_toast();
    let debounce_ms = config.search.debounce_ms;
    let min_len = config.search.min_query_len;

    let prefill: PlacementStep = use_hook(|| wizard.session.peek().prefill(Step::Placement));
    let mut package_id = use_signal(|| prefill.package_id);
    let mut selection = use_signal(|| PlacementSelection::restore(&prefill));
    let mut sponsor_query = use_signal(String::new);
    let mut placement_query = use_signal(String::new);
    let mut sponsor_gate = use_signal(|| SearchGate::new(min_len));
    let mut placement_gate = use_signal(|| SearchGate::new(min_len));
    let errors = use_signal(FieldErrors::new);

    use_hook(move || {
        if let Some(placement_id) = prefill.placement_id {
            spawn(refresh_legs(api, reporter, selection, placement_id, prefill.leg));
        }
    });

    let packages = use_resource(move || async move {
        let mut reporter = reporter;
        let result = api.client().packages().await;
        if let Err(e) = &result {
            reporter.report(e);
        }
        result.unwrap_or_default()
    });

    let on_sponsor_input = move |evt: FormEvent| {
        let raw = evt.value();
        sponsor_query.set(raw.clone());
        let Some(ticket) = sponsor_gate.write().begin(&raw) else {
            selection.write().set_sponsor_results(Vec::new());
            return;
        };
        spawn(async move {
            if let Some(found) =
                search_after_pause(api, reporter, sponsor_gate, ticket, debounce_ms, None).await
            {
                selection.write().set_sponsor_results(found);
            }
        });
    };

    let on_placement_input = move |evt: FormEvent| {
        let raw = evt.value();
        placement_query.set(raw.clone());
        let Some(sponsor_id) = selection.peek().sponsor().map(|s| s.id) else {
            return;
        };
        let Some(ticket) = placement_gate.write().begin(&raw) else {
            selection.write().set_placement_results(Vec::new());
            return;
        };
        spawn(async move {
            if let Some(found) = search_after_pause(
                api,
                reporter,
                placement_gate,
                ticket,
                debounce_ms,
                Some(sponsor_id),
            )
            .await
            {
                selection.write().set_placement_results(found);
            }
        });
    };

    let pick_sponsor = move |user: DownlineUser| {
        sponsor_gate.write().cancel();
        placement_gate.write().cancel();
        sponsor_query.set(String::new());
        placement_query.set(String::new());
        selection.write().select_sponsor(user);
    };

    let clear_sponsor = move |_: MouseEvent| {
        placement_gate.write().cancel();
        placement_query.set(String::new());
        selection.write().clear_sponsor();
    };

    let pick_placement = move |user: DownlineUser| {
        placement_gate.write().cancel();
        placement_query.set(String::new());
        let placement_id = user.id;
        selection.write().select_placement(user);
        spawn(refresh_legs(api, reporter, selection, placement_id, None));
    };

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let mut payload = PlacementStep {
            package_id: package_id(),
            ..Default::default()
        };
        selection.read().fill(&mut payload);
        spawn(async move {
            wizard
                .run(errors, move |client, mut session| async move {
                    let result = client.submit_placement(&mut session, &payload).await;
                    (session, result)
                })
                .await;
        });
    };

    let current = selection.read().clone();
    let package_value = package_id().map(|id| id.to_string()).unwrap_or_default();

    rsx! {
        form { class: "wizard-form", onsubmit,
            Field { label: "Package", html_for: "package", error: field_error(errors, "package_id"),
                {match &*packages.read() {
                    None => rsx! { Spinner { label: "Loading packages..." } },
                    Some(list) => rsx! {
                        select {
                            id: "package",
                            class: "input",
                            value: "{package_value}",
                            onchange: move |evt| package_id.set(evt.value().parse().ok()),
                            option { value: "", "Select a package" }
                            for package in list.iter() {
                                option { key: "{package.id}", value: "{package.id}",
                                    {format!("{} ({}, {})", package.name, money(package.price), pv(package.pv))}
                                }
                            }
                        }
                    },
                }}
            }

            Field { label: "Sponsor", html_for: "sponsor", error: field_error(errors, "sponsor_id"),
                if let Some(sponsor) = current.sponsor() {
                    SelectedMember { member: sponsor.clone(), on_clear: clear_sponsor }
                } else {
                    input {
                        id: "sponsor",
                        class: "input",
                        r#type: "search",
                        autocomplete: "off",
                        placeholder: "Search sponsor by username",
                        value: "{sponsor_query}",
                        oninput: on_sponsor_input,
                    }
                    CandidateList {
                        results: current.sponsor_results().to_vec(),
                        on_pick: pick_sponsor,
                    }
                }
            }

            Field { label: "Placement", html_for: "placement", error: field_error(errors, "placement_id"),
                if let Some(placement) = current.placement() {
                    SelectedMember {
                        member: placement.clone(),
                        on_clear: move |_| selection.write().clear_placement(),
                    }
                } else {
                    input {
                        id: "placement",
                        class: "input",
                        r#type: "search",
                        autocomplete: "off",
                        disabled: current.sponsor().is_none(),
                        placeholder: "Search placement under the sponsor",
                        value: "{placement_query}",
                        oninput: on_placement_input,
                    }
                    CandidateList {
                        results: current.placement_results().to_vec(),
                        on_pick: pick_placement,
                    }
                }
            }

            Field { label: "Leg", error: field_error(errors, "leg"),
                div { class: "leg-picker",
                    for leg in Leg::BOTH {
                        button {
                            key: "{leg}",
                            r#type: "button",
                            class: if current.leg() == Some(leg) { "leg leg-chosen" } else { "leg" },
                            disabled: !current.is_leg_open(leg),
                            onclick: move |_| {
                                if let Err(e) = selection.write().choose_leg(leg) {
                                    toasts.error(e.to_string(), ToastOptions::new());
                                }
                            },
                            {leg.label()}
                        }
                    }
                }
                if current.placement().is_some() && current.availability().is_none() {
                    Spinner { label: "Checking open legs..." }
                }
            }

            StepActions { can_go_back: false }
        }
    }
}

#[component]
fn CandidateList(results: Vec<DownlineUser>, on_pick: EventHandler<DownlineUser>) -> Element {
    if results.is_empty() {
        return rsx! {};
    }
    rsx! {
        ul { class: "candidates", role: "listbox",
            for user in results {
                li { key: "{user.id}",
                    button {
                        r#type: "button",
                        class: "candidate",
                        onclick: move |_| on_pick.call(user.clone()),
                        {user.label()}
                    }
                }
            }
        }
    }
}

#[component]
fn SelectedMember(member: DownlineUser, on_clear: EventHandler<MouseEvent>) -> Element {
    rsx! {
        div { class: "selected-member",
            span { {member.label()} }
            Button {
                variant: ButtonVariant::Ghost,
                onclick: move |evt| on_clear.call(evt),
                "Change"
            }
        }
    }
}
