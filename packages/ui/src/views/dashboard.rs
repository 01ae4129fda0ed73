use dioxus::prelude::*;
use model::format::{money, pv};
use model::DashboardSummary;

use crate::auth::{use_api, use_auth, use_error_reporter};
use crate::components::{ErrorState, Spinner, StatCard};

#[component]
pub fn DashboardView() -> Element {
    let api = use_api();
    let reporter = use_error_reporter();
    let auth = use_auth();

    let mut summary = use_resource(move || async move {
        let mut reporter = reporter;
        let result = api.client().dashboard().await;
        if let Err(e) = &result {
            reporter.report(e);
        }
        result
    });

    let greeting = auth()
        .user
        .as_ref()
        .map(|u| format!("Welcome back, {}", u.display_name()))
        .unwrap_or_default();

    let body = match &*summary.read() {
        None => rsx! { Spinner {} },
        Some(Err(e)) => rsx! {
            ErrorState { message: e.user_message(), on_retry: move |_| summary.restart() }
        },
        Some(Ok(data)) => rsx! { SummaryCards { summary: data.clone() } },
    };

    rsx! {
        section { class: "view",
            p { class: "view-lead", "{greeting}" }
            {body}
        }
    }
}

#[component]
fn SummaryCards(summary: DashboardSummary) -> Element {
    rsx! {
        div { class: "stat-grid",
            StatCard { title: "Wallet Balance", value: money(summary.wallet_balance) }
            StatCard { title: "Total Earnings", value: money(summary.total_earnings) }
            StatCard {
                title: "Left Leg",
                value: pv(summary.left_pv),
                detail: Some(format!("{} members", summary.left_count)),
            }
            StatCard {
                title: "Right Leg",
                value: pv(summary.right_pv),
                detail: Some(format!("{} members", summary.right_count)),
            }
            StatCard { title: "Direct Referrals", value: summary.direct_referrals.to_string() }
            StatCard {
                title: "Rank",
                value: summary.rank.clone().unwrap_or_else(|| "—".to_string()),
                detail: summary.package.clone(),
            }
        }
        if let Some(link) = summary.referral_link.clone() {
            div { class: "referral-link",
                span { class: "muted", "Referral link" }
                code { "{link}" }
            }
        }
    }
}
