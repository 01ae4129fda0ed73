use dioxus::prelude::*;
use model::format::{money_in, opt_timestamp};
use model::{ListState, Transaction, WalletOverview};

use crate::auth::{use_api, use_config, use_error_reporter};
use crate::components::{EmptyState, ErrorState, Pagination, Spinner, StatCard};
use crate::lists::{load_page, use_list_view};

#[component]
pub fn WalletView() -> Element {
    let api = use_api();
    let reporter = use_error_reporter();
    let mut filter = use_signal(String::new);

    let mut overview = use_resource(move || async move {
        let mut reporter = reporter;
        let result = api.client().wallet().await;
        if let Err(e) = &result {
            reporter.report(e);
        }
        result
    });

    let (balances, currency) = match &*overview.read() {
        None => (rsx! { Spinner {} }, None),
        Some(Err(e)) => (
            rsx! { ErrorState { message: e.user_message(), on_retry: move |_| overview.restart() } },
            None,
        ),
        Some(Ok(data)) => (
            rsx! { WalletCards { overview: data.clone() } },
            data.currency.clone(),
        ),
    };
    let wallets = overview
        .read()
        .as_ref()
        .and_then(|r| r.as_ref().ok())
        .map(|o| o.wallets.clone())
        .unwrap_or_default();

    rsx! {
        section { class: "view",
            {balances}
            div { class: "view-toolbar",
                h2 { "Transactions" }
                select {
                    class: "input input-compact",
                    aria_label: "Filter by wallet",
                    value: "{filter}",
                    onchange: move |evt| filter.set(evt.value()),
                    option { value: "", "All wallets" }
                    for wallet in wallets {
                        option { key: "{wallet.slug}", value: "{wallet.slug}", "{wallet.name}" }
                    }
                }
            }
            // Keyed so a new filter remounts the table and starts from page one.
            TransactionHistory { key: "{filter}", wallet: filter(), currency }
        }
    }
}

#[component]
fn WalletCards(overview: WalletOverview) -> Element {
    let currency = overview.currency.as_deref();
    let total = money_in(overview.total(), currency);
    rsx! {
        div { class: "stat-grid",
            StatCard { title: "Total", value: total }
            for wallet in overview.wallets.iter() {
                StatCard {
                    key: "{wallet.slug}",
                    title: wallet.name.clone(),
                    value: money_in(wallet.balance, currency),
                }
            }
        }
    }
}

/// Paginated transaction table, optionally restricted to one wallet.
#[component]
pub fn TransactionHistory(
    #[props(default)] wallet: String,
    #[props(default)] currency: Option<String>,
) -> Element {
    let api = use_api();
    let reporter = use_error_reporter();
    let config = use_config();
    let view = use_list_view::<Transaction>(config.pagination.per_page);

    let load = use_callback(move |page: u32| {
        let client = api.client();
        let wallet = wallet.clone();
        spawn(async move {
            load_page(view, page, reporter, |request| async move {
                client.transactions(request, Some(wallet.as_str())).await
            })
            .await;
        });
    });
    use_hook(move || load.call(1));

    let currency = currency.as_deref();
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
            EmptyState { message: "No transactions yet." }
        },
        ListState::Loaded(page) => rsx! {
            table { class: "table",
                thead {
                    tr {
                        th { "Date" }
                        th { "Reference" }
                        th { "Description" }
                        th { "Wallet" }
                        th { class: "num", "Amount" }
                        th { "Status" }
                    }
                }
                tbody {
                    for tx in page.data.iter() {
                        tr { key: "{tx.id}",
                            td { {opt_timestamp(tx.created_at.as_deref())} }
                            td { code { "{tx.reference}" } }
                            td { "{tx.description}" }
                            td { {tx.wallet.clone().unwrap_or_default()} }
                            td { class: if tx.is_credit() { "num credit" } else { "num debit" },
                                {money_in(tx.amount, currency)}
                            }
                            td { span { class: "badge", "{tx.status}" } }
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
