//! Fetch-render-paginate state shared by every report and list view.
//!
//! ```text
//!   request(page) ──► Loading ──resolve(Ok)──► Loaded(page)
//!        ▲                    └─resolve(Err)─► Failed(message)
//!        └──────────── page change / refetch ◄───────┘
//! ```
//!
//! Each [`request`](ListView::request) returns a [`ListTicket`]; a response is
//! only applied if its ticket belongs to the latest request, so clicking
//! through pages quickly never shows an older page's rows. No page is cached:
//! moving back to a page fetches it again.

use crate::pagination::{Page, PageRequest};

#[derive(Clone, Debug, PartialEq)]
pub enum ListState<T> {
    Loading,
    Loaded(Page<T>),
    Failed(String),
}

impl<T> ListState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ListState::Loading)
    }

    pub fn page(&self) -> Option<&Page<T>> {
        match self {
            ListState::Loaded(page) => Some(page),
            _ => None,
        }
    }
}

/// Identifies the request a response belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListTicket {
    generation: u64,
    pub request: PageRequest,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListView<T> {
    state: ListState<T>,
    request: PageRequest,
    generation: u64,
}

impl<T> ListView<T> {
    pub fn new(per_page: u32) -> Self {
        Self {
            state: ListState::Loading,
            request: PageRequest::first(per_page),
            generation: 0,
        }
    }

    pub fn state(&self) -> &ListState<T> {
        &self.state
    }

    pub fn current_request(&self) -> PageRequest {
        self.request
    }

    /// Start loading `page`. Any previously loaded rows are dropped.
    pub fn request(&mut self, page: u32) -> ListTicket {
        self.request = self.request.with_page(page);
        self.generation += 1;
        self.state = ListState::Loading;
        ListTicket {
            generation: self.generation,
            request: self.request,
        }
    }

    /// Reload the current page.
    pub fn refetch(&mut self) -> ListTicket {
        self.request(self.request.page)
    }

    pub fn is_current(&self, ticket: &ListTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Apply a response. Returns `false` if the ticket was superseded.
    pub fn resolve<E: ToString>(&mut self, ticket: ListTicket, result: Result<Page<T>, E>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.state = match result {
            Ok(page) => ListState::Loaded(page),
            Err(e) => ListState::Failed(e.to_string()),
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(current: u32, rows: Vec<&'static str>) -> Page<&'static str> {
        Page {
            data: rows,
            current_page: current,
            last_page: 3,
            per_page: 2,
            total: Some(6),
        }
    }

    #[test]
    fn loading_then_loaded() {
        let mut view = ListView::new(2);
        let ticket = view.request(1);
        assert!(view.state().is_loading());
        assert!(view.resolve::<String>(ticket, Ok(page(1, vec!["a", "b"]))));
        assert_eq!(view.state().page().unwrap().data, vec!["a", "b"]);
    }

    #[test]
    fn requests_exactly_the_clicked_page() {
        let mut view = ListView::<&str>::new(2);
        let ticket = view.request(3);
        assert_eq!(ticket.request.page, 3);
        assert_eq!(ticket.request.per_page, 2);
        assert_eq!(view.current_request().page, 3);
    }

    #[test]
    fn page_change_replaces_rows_without_touching_old_page() {
        let mut view = ListView::new(2);
        let first = view.request(1);
        let first_page = page(1, vec!["a", "b"]);
        view.resolve::<String>(first, Ok(first_page.clone()));
        let kept = view.state().page().cloned().unwrap();

        let second = view.request(2);
        assert!(view.state().page().is_none());
        view.resolve::<String>(second, Ok(page(2, vec!["c", "d"])));

        assert_eq!(view.state().page().unwrap().data, vec!["c", "d"]);
        assert_eq!(kept, first_page);
    }

    #[test]
    fn superseded_responses_are_ignored() {
        let mut view = ListView::new(2);
        let slow = view.request(1);
        let fast = view.request(2);
        assert!(view.resolve::<String>(fast, Ok(page(2, vec!["c"]))));
        assert!(!view.resolve::<String>(slow, Ok(page(1, vec!["a"]))));
        assert_eq!(view.state().page().unwrap().current_page, 2);
    }

    #[test]
    fn failure_then_refetch() {
        let mut view = ListView::<&str>::new(2);
        let ticket = view.request(2);
        view.resolve(ticket, Err("Server error"));
        assert_eq!(view.state(), &ListState::Failed("Server error".to_string()));

        let retry = view.refetch();
        assert_eq!(retry.request.page, 2);
        assert!(view.state().is_loading());
    }
}
