//! Staleness gate for debounced search-as-you-type.
//!
//! Every keystroke calls [`SearchGate::begin`] and gets a [`SearchTicket`].
//! After the settling delay the caller checks [`SearchGate::is_current`]
//! before firing the request, and checks it again before applying the
//! response. Only the newest ticket passes either check, so a slow response to
//! an older query can never replace the results of a newer one.

/// Proof of which keystroke started a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchGate {
    generation: u64,
    min_len: usize,
}

impl SearchGate {
    pub fn new(min_len: usize) -> Self {
        Self {
            generation: 0,
            min_len,
        }
    }

    /// Register a new query. Returns `None` when the trimmed query is too
    /// short to search; older tickets are invalidated either way.
    pub fn begin(&mut self, raw: &str) -> Option<SearchTicket> {
        self.generation += 1;
        let query = raw.trim();
        if query.chars().count() < self.min_len.max(1) {
            return None;
        }
        Some(SearchTicket {
            generation: self.generation,
            query: query.to_string(),
        })
    }

    /// Like [`begin`](Self::begin), for a filter where an empty query means
    /// "no filter": blank input yields a ticket with an empty query. Input
    /// that is present but too short still yields `None`.
    pub fn begin_filter(&mut self, raw: &str) -> Option<SearchTicket> {
        if raw.trim().is_empty() {
            self.generation += 1;
            return Some(SearchTicket {
                generation: self.generation,
                query: String::new(),
            });
        }
        self.begin(raw)
    }

    /// Invalidate every outstanding ticket, e.g. after a selection is made.
    pub fn cancel(&mut self) {
        self.generation += 1;
    }

    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        ticket.generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_newest_ticket_is_current() {
        let mut gate = SearchGate::new(2);
        let first = gate.begin("ad").unwrap();
        let second = gate.begin("ada").unwrap();
        assert!(!gate.is_current(&first));
        assert!(gate.is_current(&second));
        assert_eq!(second.query(), "ada");
    }

    #[test]
    fn short_queries_invalidate_without_searching() {
        let mut gate = SearchGate::new(3);
        let ticket = gate.begin("adaeze").unwrap();
        assert!(gate.begin(" a ").is_none());
        assert!(!gate.is_current(&ticket));
    }

    #[test]
    fn cancel_drops_in_flight_results() {
        let mut gate = SearchGate::new(1);
        let ticket = gate.begin("x").unwrap();
        gate.cancel();
        assert!(!gate.is_current(&ticket));
    }

    #[test]
    fn clearing_a_filter_is_a_query_of_its_own() {
        let mut gate = SearchGate::new(2);
        let typed = gate.begin_filter(" ada ").unwrap();
        assert_eq!(typed.query(), "ada");

        let cleared = gate.begin_filter("  ").unwrap();
        assert_eq!(cleared.query(), "");
        assert!(!gate.is_current(&typed));
        assert!(gate.is_current(&cleared));

        assert!(gate.begin_filter("a").is_none());
        assert!(!gate.is_current(&cleared));
    }

    #[test]
    fn empty_query_never_searches() {
        let mut gate = SearchGate::new(0);
        assert!(gate.begin("   ").is_none());
    }
}
