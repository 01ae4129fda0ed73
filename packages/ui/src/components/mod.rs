//! Small shared building blocks. Views own their layout; these only keep
//! buttons, form rows and list states looking the same everywhere.

use dioxus::prelude::*;

mod toast;
pub use toast::{use_toast, ToastOptions, ToastProvider, Toasts};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Ghost,
    Danger,
}

impl ButtonVariant {
    fn class(self) -> &'static str {
        match self {
            ButtonVariant::Primary => "button button-primary",
            ButtonVariant::Secondary => "button button-secondary",
            ButtonVariant::Ghost => "button button-ghost",
            ButtonVariant::Danger => "button button-danger",
        }
    }
}

#[component]
pub fn Button(
    #[props(default)] variant: ButtonVariant,
    #[props(default)] class: String,
    /// Render as a form submit button.
    #[props(default)]
    submit: bool,
    #[props(default)] disabled: bool,
    onclick: Option<EventHandler<MouseEvent>>,
    children: Element,
) -> Element {
    rsx! {
        button {
            class: "{variant.class()} {class}",
            r#type: if submit { "submit" } else { "button" },
            disabled,
            onclick: move |evt| {
                if let Some(handler) = &onclick {
                    handler.call(evt);
                }
            },
            {children}
        }
    }
}

/// Label, control and inline error for one form field.
#[component]
pub fn Field(
    label: String,
    #[props(default)] html_for: String,
    #[props(default)] error: Option<String>,
    #[props(default)] hint: Option<String>,
    children: Element,
) -> Element {
    let class = if error.is_some() { "field field-invalid" } else { "field" };
    let hint = if error.is_some() { None } else { hint };

    rsx! {
        div { class,
            label { class: "field-label", r#for: "{html_for}", "{label}" }
            {children}
            if let Some(error) = error {
                p { class: "field-error", "{error}" }
            }
            if let Some(hint) = hint {
                p { class: "field-hint", "{hint}" }
            }
        }
    }
}

#[component]
pub fn Spinner(#[props(default = "Loading...".to_string())] label: String) -> Element {
    rsx! {
        div { class: "spinner-row",
            span { class: "spinner", aria_hidden: "true" }
            span { "{label}" }
        }
    }
}

#[component]
pub fn EmptyState(message: String) -> Element {
    rsx! {
        div { class: "empty-state", "{message}" }
    }
}

/// Error block with a retry action.
#[component]
pub fn ErrorState(message: String, on_retry: EventHandler<()>) -> Element {
    rsx! {
        div { class: "error-state",
            p { "{message}" }
            Button {
                variant: ButtonVariant::Secondary,
                onclick: move |_| on_retry.call(()),
                "Try again"
            }
        }
    }
}

#[component]
pub fn StatCard(title: String, value: String, #[props(default)] detail: Option<String>) -> Element {
    rsx! {
        div { class: "stat-card",
            p { class: "stat-title", "{title}" }
            p { class: "stat-value", "{value}" }
            if let Some(detail) = detail {
                p { class: "stat-detail", "{detail}" }
            }
        }
    }
}

/// Numbered pager. `links` comes from `Page::page_links`; `None` is a gap.
#[component]
pub fn Pagination(
    current: u32,
    last: u32,
    links: Vec<Option<u32>>,
    #[props(default)] total: Option<u64>,
    on_change: EventHandler<u32>,
) -> Element {
    if last <= 1 {
        return rsx! {
            if let Some(total) = total {
                p { class: "pager-summary", "{total} total" }
            }
        };
    }

    rsx! {
        nav { class: "pager", aria_label: "Pagination",
            button {
                class: "pager-link",
                disabled: current <= 1,
                onclick: move |_| on_change.call(current.saturating_sub(1).max(1)),
                "Previous"
            }
            for (i, link) in links.iter().copied().enumerate() {
                {page_link(i, link, current, on_change)}
            }
            button {
                class: "pager-link",
                disabled: current >= last,
                onclick: move |_| on_change.call((current + 1).min(last)),
                "Next"
            }
            if let Some(total) = total {
                span { class: "pager-summary", "Page {current} of {last} ({total} total)" }
            }
        }
    }
}

fn page_link(index: usize, link: Option<u32>, current: u32, on_change: EventHandler<u32>) -> Element {
    let Some(page) = link else {
        return rsx! {
            span { key: "{index}", class: "pager-gap", "…" }
        };
    };
    let is_current = page == current;
    rsx! {
        button {
            key: "{index}",
            class: if is_current { "pager-link pager-current" } else { "pager-link" },
            aria_current: if is_current { "page" } else { "false" },
            onclick: move |_| {
                if !is_current {
                    on_change.call(page);
                }
            },
            "{page}"
        }
    }
}
