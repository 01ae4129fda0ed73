use dioxus::prelude::*;
use dioxus_primitives::toast;

pub use dioxus_primitives::toast::{use_toast, ToastOptions, Toasts};

/// Toast region for the whole app. Toasts dismiss themselves after a few
/// seconds.
#[component]
pub fn ToastProvider(children: Element) -> Element {
    rsx! {
        toast::ToastProvider { {children} }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[component]
    fn Notifier() -> Element {
        let _toasts: Toasts = use_toast();
        rsx! { span { "ready" } }
    }

    fn app() -> Element {
        rsx! {
            ToastProvider { Notifier {} }
        }
    }

    #[test]
    fn views_inside_the_provider_get_a_toast_handle() {
        let mut dom = VirtualDom::new(app);
        dom.rebuild_in_place();
    }
}
