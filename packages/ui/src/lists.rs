use std::future::Future;

use api::ApiResult;
use dioxus::prelude::*;
use model::{ListView, Page, PageRequest};

use crate::auth::ErrorReporter;

pub fn use_list_view<T: 'static>(per_page: u32) -> Signal<ListView<T>> {
    use_signal(|| ListView::new(per_page))
}

/// Fetch `page` into `view`. A response that arrives after a newer request
/// was made is dropped without touching the view or reporting its error.
pub async fn load_page<T, F, Fut>(
    mut view: Signal<ListView<T>>,
    page: u32,
    mut reporter: ErrorReporter,
    fetch: F,
) where
    T: 'static,
    F: FnOnce(PageRequest) -> Fut,
    Fut: Future<Output = ApiResult<Page<T>>>,
{
    let ticket = view.write().request(page);
    let result = fetch(ticket.request).await;

    if !view.peek().is_current(&ticket) {
        tracing::debug!(page, "dropping superseded page response");
        return;
    }
    if let Err(e) = &result {
        reporter.report(e);
    }
    view.write().resolve(ticket, result);
}
