use dioxus::prelude::*;
use model::format::opt_timestamp;
use model::{ListState, SearchGate, UserRecord};

use crate::auth::{use_api, use_config, use_error_reporter};
use crate::components::{EmptyState, ErrorState, Pagination, Spinner};
use crate::lists::{load_page, use_list_view};
use crate::platform::sleep_ms;

/// Admin users table with a debounced username filter.
#[component]
pub fn UsersView() -> Element {
    let config = use_config();
    let debounce_ms = config.search.debounce_ms;
    let mut input = use_signal(String::new);
    let mut applied = use_signal(String::new);
    let min_len = config.search.min_query_len;
    let mut gate = use_signal(|| SearchGate::new(min_len));

    let oninput = move |evt: FormEvent| {
        let value = evt.value();
        let ticket = gate.write().begin_filter(&value);
        input.set(value);
        let Some(ticket) = ticket else {
            return;
        };
        spawn(async move {
            sleep_ms(debounce_ms).await;
            if gate.peek().is_current(&ticket) {
                applied.set(ticket.query().to_string());
            }
        });
    };

    rsx! {
        section { class: "view",
            div { class: "view-toolbar",
                input {
                    class: "input",
                    r#type: "search",
                    placeholder: "Search by username",
                    value: "{input}",
                    oninput,
                }
            }
            UsersTable { key: "{applied}", search: applied() }
        }
    }
}

#[component]
fn UsersTable(search: String) -> Element {
    let api = use_api();
    let reporter = use_error_reporter();
    let config = use_config();
    let view = use_list_view::<UserRecord>(config.pagination.per_page);

    let load = use_callback(move |page: u32| {
        let client = api.client();
        let search = search.clone();
        spawn(async move {
            load_page(view, page, reporter, |request| async move {
                client.users(request, Some(search.as_str())).await
            })
            .await;
        });
    });
    use_hook(move || load.call(1));

    let state = view.read().state().clone();
    match state {
        ListState::Loading => rsx! { Spinner {} },
        ListState::Failed(message) => rsx! {
            ErrorState {
                message,
                on_retry: move |_| load.call(view.peek().current_request().page),
            }
        },
        ListState::Loaded(page) if page.is_empty() => rsx! {
            EmptyState { message: "No users match this search." }
        },
        ListState::Loaded(page) => rsx! {
            table { class: "table",
                thead {
                    tr {
                        th { "Username" }
                        th { "Name" }
                        th { "Email" }
                        th { "Phone" }
                        th { "Package" }
                        th { "Status" }
                        th { "Joined" }
                    }
                }
                tbody {
                    for user in page.data.iter() {
                        tr { key: "{user.id}",
                            td {
                                "{user.username}"
                                if user.is_stockist {
                                    span { class: "badge badge-accent", "Stockist" }
                                }
                            }
                            td { {user.name.clone().unwrap_or_default()} }
                            td { "{user.email}" }
                            td { {user.phone.clone().unwrap_or_default()} }
                            td { {user.package.clone().unwrap_or_default()} }
                            td { span { class: "badge", "{user.status}" } }
                            td { {opt_timestamp(user.created_at.as_deref())} }
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
        },
    }
}
