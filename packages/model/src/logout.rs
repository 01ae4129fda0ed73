//! One logout per login, however many views see "unauthenticated".
//!
//! When a token expires, every view with a request in flight gets the same
//! error back at about the same time. Each of them reports it to the latch;
//! only the first report after a login is told to perform the logout.

/// Substring (case-insensitive) the backend puts in expired-session errors.
pub const UNAUTHENTICATED_MARKER: &str = "unauthenticated";

/// True if a server message means the session is gone.
pub fn is_unauthenticated(message: &str) -> bool {
    message.to_ascii_lowercase().contains(UNAUTHENTICATED_MARKER)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogoutLatch {
    tripped: bool,
}

impl LogoutLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` exactly once until [`rearm`](Self::rearm) is called.
    pub fn trip(&mut self) -> bool {
        !std::mem::replace(&mut self.tripped, true)
    }

    /// Call after a successful login.
    pub fn rearm(&mut self) {
        self.tripped = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_matching_ignores_case() {
        assert!(is_unauthenticated("Unauthenticated."));
        assert!(is_unauthenticated("error: UNAUTHENTICATED request"));
        assert!(!is_unauthenticated("Unauthorized"));
        assert!(!is_unauthenticated("Insufficient balance"));
    }

    #[test]
    fn trips_once_per_login() {
        let mut latch = LogoutLatch::new();
        let calls = (0..5).filter(|_| latch.trip()).count();
        assert_eq!(calls, 1);
        assert_eq!(latch, LogoutLatch { tripped: true });

        latch.rearm();
        assert!(latch.trip());
        assert!(!latch.trip());
    }
}
