use dioxus::prelude::*;
use model::format::opt_timestamp;
use model::{Announcement, ListState, Page};

use crate::auth::{use_api, use_config, use_error_reporter};
use crate::components::{EmptyState, ErrorState, Pagination, Spinner};
use crate::lists::{load_page, use_list_view};
use crate::markdown::render_markdown;

pub const ALL_CAUGHT_UP: &str = "You are all caught up!.";

/// Placeholder shown instead of the board, if any.
pub fn board_placeholder(page: &Page<Announcement>) -> Option<&'static str> {
    page.is_empty().then_some(ALL_CAUGHT_UP)
}

#[component]
pub fn AnnouncementBoard() -> Element {
    let api = use_api();
    let reporter = use_error_reporter();
    let config = use_config();
    let view = use_list_view::<Announcement>(config.pagination.per_page);

    let load = use_callback(move |page: u32| {
        let client = api.client();
        spawn(async move {
            load_page(view, page, reporter, |request| async move {
                client.announcements(request).await
            })
            .await;
        });
    });
    use_hook(move || load.call(1));

    let state = view.read().state().clone();
    let body = match state {
        ListState::Loading => rsx! { Spinner {} },
        ListState::Failed(message) => rsx! {
            ErrorState {
                message,
                on_retry: move |_| load.call(view.peek().current_request().page),
            }
        },
        ListState::Loaded(page) => match board_placeholder(&page) {
            Some(message) => rsx! { EmptyState { message: message.to_string() } },
            None => rsx! {
                div { class: "announcement-list",
                    for item in page.data.iter() {
                        AnnouncementCard { key: "{item.id}", announcement: item.clone() }
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
        },
    };

    rsx! {
        section { class: "view", {body} }
    }
}

#[component]
fn AnnouncementCard(announcement: Announcement) -> Element {
    let html = render_markdown(&announcement.body);
    let posted = opt_timestamp(announcement.created_at.as_deref());
    rsx! {
        article { class: "announcement",
            header {
                h3 { "{announcement.title}" }
                time { class: "muted", "{posted}" }
            }
            div { class: "markdown", dangerous_inner_html: "{html}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(data: Vec<Announcement>) -> Page<Announcement> {
        Page {
            data,
            current_page: 1,
            last_page: 1,
            per_page: 10,
            total: None,
        }
    }

    #[test]
    fn empty_board_says_all_caught_up() {
        assert_eq!(board_placeholder(&page(Vec::new())), Some("You are all caught up!."));
    }

    #[test]
    fn board_with_items_has_no_placeholder() {
        let item = Announcement {
            id: 1,
            title: "Leadership bonus".into(),
            body: "Starts **Monday**".into(),
            created_at: None,
        };
        assert_eq!(board_placeholder(&page(vec![item])), None);
    }
}
