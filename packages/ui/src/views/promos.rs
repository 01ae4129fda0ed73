use dioxus::prelude::*;
use model::format::{opt_timestamp, pv};
use model::{csv, ListState, Promo, PromoQualifier};

use crate::auth::{use_api, use_config, use_error_reporter};
use crate::components::{
    use_toast, Button, ButtonVariant, EmptyState, ErrorState, Pagination, Spinner, ToastOptions,
};
use crate::lists::{load_page, use_list_view};
use crate::platform::download_text;

const EXPORT_PAGE_SIZE: u32 = 100;

/// `"Easter Splash 2024!"` → `"easter-splash-2024-qualifiers.csv"`.
pub fn export_filename(title: &str) -> String {
    let mut slug = String::new();
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "promo-qualifiers.csv".to_string()
    } else {
        format!("{slug}-qualifiers.csv")
    }
}

#[component]
pub fn PromoReport() -> Element {
    let api = use_api();
    let reporter = use_error_reporter();
    let mut selected = use_signal(|| Option::<Promo>::None);

    let mut promos = use_resource(move || async move {
        let mut reporter = reporter;
        let result = api.client().promos().await;
        if let Err(e) = &result {
            reporter.report(e);
        }
        result
    });

    let promo_list = match &*promos.read() {
        None => return rsx! { Spinner {} },
        Some(Err(e)) => {
            return rsx! {
                ErrorState { message: e.user_message(), on_retry: move |_| promos.restart() }
            }
        }
        Some(Ok(list)) => list.clone(),
    };
    if promo_list.is_empty() {
        return rsx! { EmptyState { message: "No promos have been set up." } };
    }

    let selected_id = selected().map(|p| p.id.to_string()).unwrap_or_default();
    let options = promo_list.clone();

    rsx! {
        section { class: "view",
            div { class: "view-toolbar",
                select {
                    class: "input",
                    aria_label: "Promo",
                    value: "{selected_id}",
                    onchange: move |evt| {
                        let id = evt.value().parse::<u64>().ok();
                        selected.set(promo_list.iter().find(|p| Some(p.id) == id).cloned());
                    },
                    option { value: "", disabled: true, "Select a promo" }
                    for promo in options {
                        option { key: "{promo.id}", value: "{promo.id}", "{promo.title}" }
                    }
                }
            }
            {match selected() {
                Some(promo) => rsx! { QualifierTable { key: "{promo.id}", promo } },
                None => rsx! { EmptyState { message: "Choose a promo to see who qualified." } },
            }}
        }
    }
}

#[component]
fn QualifierTable(promo: Promo) -> Element {
    let api = use_api();
    let reporter = use_error_reporter();
    let toasts = use_toast();
    let config = use_config();
    let view = use_list_view::<PromoQualifier>(config.pagination.per_page);
    let mut exporting = use_signal(|| false);
    let promo_id = promo.id;

    let load = use_callback(move |page: u32| {
        let client = api.client();
        spawn(async move {
            load_page(view, page, reporter, |request| async move {
                client.promo_qualifiers(promo_id, request).await
            })
            .await;
        });
    });
    use_hook(move || load.call(1));

    let title = promo.title.clone();
    let export = move |_: MouseEvent| {
        if exporting() {
            return;
        }
        exporting.set(true);
        let client = api.client();
        let filename = export_filename(&title);
        let mut reporter = reporter;
        spawn(async move {
            match client.all_promo_qualifiers(promo_id, EXPORT_PAGE_SIZE).await {
                Ok(rows) => {
                    let text = csv::promo_qualifiers(&rows);
                    match download_text(&filename, "text/csv;charset=utf-8", &text).await {
                        Ok(()) => toasts.success(
                            format!("Exported {} qualifiers", rows.len()),
                            ToastOptions::new(),
                        ),
                        Err(e) => toasts.error(e.to_string(), ToastOptions::new()),
                    }
                }
                Err(e) => reporter.report(&e),
            }
            exporting.set(false);
        });
    };

    let period = format!(
        "{} to {}",
        opt_timestamp(promo.starts_at.as_deref()),
        opt_timestamp(promo.ends_at.as_deref())
    );
    let state = view.read().state().clone();
    let table = match state {
        ListState::Loading => rsx! { Spinner {} },
        ListState::Failed(message) => rsx! {
            ErrorState {
                message,
                on_retry: move |_| load.call(view.peek().current_request().page),
            }
        },
        ListState::Loaded(page) if page.is_empty() => rsx! {
            EmptyState { message: "Nobody has qualified yet." }
        },
        ListState::Loaded(page) => {
            let offset = (page.current_page.saturating_sub(1) * page.per_page.max(1)) as usize;
            rsx! {
                table { class: "table",
                    thead {
                        tr {
                            th { "S/N" }
                            th { "Username" }
                            th { "Name" }
                            th { class: "num", "Left PV" }
                            th { class: "num", "Right PV" }
                            th { "Qualified At" }
                        }
                    }
                    tbody {
                        for (i, row) in page.data.iter().enumerate() {
                            tr { key: "{row.id}",
                                td { {(offset + i + 1).to_string()} }
                                td { "{row.username}" }
                                td { {row.name.clone().unwrap_or_default()} }
                                td { class: "num", {pv(row.left_pv)} }
                                td { class: "num", {pv(row.right_pv)} }
                                td { {opt_timestamp(row.qualified_at.as_deref())} }
                            }
                        }
                    }
                }
                Pagination {
                    current: page.current_page,
                    last: page.last_page,
                    links: page.page_links(2),
                    total: page.total,
                    on_change: move |p| load.call(p),
                }
            }
        }
    };

    rsx! {
        div { class: "view-toolbar",
            div {
                h2 { "{promo.title}" }
                p { class: "muted", "{period}" }
            }
            Button {
                variant: ButtonVariant::Secondary,
                disabled: exporting(),
                onclick: export,
                if exporting() { "Exporting..." } else { "Export CSV" }
            }
        }
        {table}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_is_a_slug_of_the_title() {
        assert_eq!(
            export_filename("Easter Splash 2024!"),
            "easter-splash-2024-qualifiers.csv"
        );
        assert_eq!(export_filename("  Car -- Award "), "car-award-qualifiers.csv");
    }

    #[test]
    fn blank_titles_get_a_generic_name() {
        assert_eq!(export_filename("!!!"), "promo-qualifiers.csv");
    }
}
