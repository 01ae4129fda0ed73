//! # Sponsor → placement → leg resolver
//!
//! The placement step picks three things in order, each depending on the
//! previous one:
//!
//! 1. a sponsor, found by searching the member's downline,
//! 2. a placement under that sponsor, found the same way,
//! 3. a binary-tree [`Leg`] under that placement, chosen from what the server
//!    reports as open via [`LegAvailability`].
//!
//! [`PlacementSelection`] keeps the dependents honest: changing the sponsor
//! clears the placement, the leg and the availability; changing the placement
//! clears the leg and the availability; a fresh availability response clears a
//! leg that is no longer open. Nothing about leg validity is computed locally.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::DownlineUser;
use crate::steps::PlacementStep;

/// One of the two child slots under a placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Leg {
    Left,
    Right,
}

impl Leg {
    pub const BOTH: [Leg; 2] = [Leg::Left, Leg::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Leg::Left => "left",
            Leg::Right => "right",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Leg::Left => "Left",
            Leg::Right => "Right",
        }
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-reported open legs under a placement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegAvailability {
    #[serde(default)]
    pub can_place_left: bool,
    #[serde(default)]
    pub can_place_right: bool,
    #[serde(default)]
    pub available_legs: Vec<Leg>,
}

impl LegAvailability {
    /// A leg is open only when the flag and the list agree.
    pub fn is_open(&self, leg: Leg) -> bool {
        let flag = match leg {
            Leg::Left => self.can_place_left,
            Leg::Right => self.can_place_right,
        };
        flag && self.available_legs.contains(&leg)
    }

    pub fn open_legs(&self) -> Vec<Leg> {
        Leg::BOTH.into_iter().filter(|leg| self.is_open(*leg)).collect()
    }

    /// True when the server's flags and list disagree about some leg.
    pub fn is_inconsistent(&self) -> bool {
        Leg::BOTH.into_iter().any(|leg| {
            let flag = match leg {
                Leg::Left => self.can_place_left,
                Leg::Right => self.can_place_right,
            };
            flag != self.available_legs.contains(&leg)
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("Select a placement before choosing a leg")]
    NoPlacement,
    #[error("The {0} leg is not available under this placement")]
    LegUnavailable(Leg),
}

/// Sponsor, placement and leg chosen so far, plus the search results and
/// availability they were chosen from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlacementSelection {
    sponsor: Option<DownlineUser>,
    placement: Option<DownlineUser>,
    leg: Option<Leg>,
    availability: Option<LegAvailability>,
    sponsor_results: Vec<DownlineUser>,
    placement_results: Vec<DownlineUser>,
}

impl PlacementSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sponsor(&self) -> Option<&DownlineUser> {
        self.sponsor.as_ref()
    }

    pub fn placement(&self) -> Option<&DownlineUser> {
        self.placement.as_ref()
    }

    pub fn leg(&self) -> Option<Leg> {
        self.leg
    }

    pub fn availability(&self) -> Option<&LegAvailability> {
        self.availability.as_ref()
    }

    pub fn sponsor_results(&self) -> &[DownlineUser] {
        &self.sponsor_results
    }

    pub fn placement_results(&self) -> &[DownlineUser] {
        &self.placement_results
    }

    pub fn set_sponsor_results(&mut self, results: Vec<DownlineUser>) {
        self.sponsor_results = results;
    }

    pub fn set_placement_results(&mut self, results: Vec<DownlineUser>) {
        if self.sponsor.is_some() {
            self.placement_results = results;
        }
    }

    /// Pick a sponsor. A different sponsor resets everything below it.
    pub fn select_sponsor(&mut self, sponsor: DownlineUser) {
        let changed = self.sponsor.as_ref().map(|s| s.id) != Some(sponsor.id);
        self.sponsor = Some(sponsor);
        self.sponsor_results.clear();
        if changed {
            self.reset_placement();
        }
    }

    /// Forget the sponsor and everything derived from it.
    pub fn clear_sponsor(&mut self) {
        self.sponsor = None;
        self.sponsor_results.clear();
        self.reset_placement();
    }

    /// Pick a placement. The leg must be re-derived from fresh availability.
    pub fn select_placement(&mut self, placement: DownlineUser) {
        self.placement = Some(placement);
        self.placement_results.clear();
        self.leg = None;
        self.availability = None;
    }

    pub fn clear_placement(&mut self) {
        self.reset_placement();
    }

    fn reset_placement(&mut self) {
        self.placement = None;
        self.placement_results.clear();
        self.leg = None;
        self.availability = None;
    }

    /// Apply an availability response for `placement_id`.
    ///
    /// Responses for a placement that is no longer selected are dropped and
    /// `false` is returned. A chosen leg that is no longer open is cleared.
    pub fn apply_availability(&mut self, placement_id: u64, availability: LegAvailability) -> bool {
        if self.placement.as_ref().map(|p| p.id) != Some(placement_id) {
            return false;
        }
        if availability.is_inconsistent() {
            tracing::warn!(placement_id, ?availability, "leg flags and list disagree");
        }
        if let Some(leg) = self.leg {
            if !availability.is_open(leg) {
                self.leg = None;
            }
        }
        self.availability = Some(availability);
        true
    }

    pub fn is_leg_open(&self, leg: Leg) -> bool {
        self.availability
            .as_ref()
            .is_some_and(|availability| availability.is_open(leg))
    }

    pub fn choose_leg(&mut self, leg: Leg) -> Result<(), PlacementError> {
        if self.placement.is_none() {
            return Err(PlacementError::NoPlacement);
        }
        if !self.is_leg_open(leg) {
            return Err(PlacementError::LegUnavailable(leg));
        }
        self.leg = Some(leg);
        Ok(())
    }

    /// Rebuild sponsor and placement from a step 1 payload, e.g. after the
    /// user steps back. The leg is left unset until fresh availability
    /// confirms it.
    pub fn restore(step: &PlacementStep) -> Self {
        let mut selection = Self::new();
        if let Some(id) = step.sponsor_id {
            selection.select_sponsor(DownlineUser {
                id,
                username: step.sponsor_username.clone(),
                name: None,
            });
            if let Some(id) = step.placement_id {
                selection.select_placement(DownlineUser {
                    id,
                    username: step.placement_username.clone(),
                    name: None,
                });
            }
        }
        selection
    }

    /// Copy the current choices into a step 1 payload.
    pub fn fill(&self, step: &mut PlacementStep) {
        step.sponsor_id = self.sponsor.as_ref().map(|s| s.id);
        step.sponsor_username = self
            .sponsor
            .as_ref()
            .map(|s| s.username.clone())
            .unwrap_or_default();
        step.placement_id = self.placement.as_ref().map(|p| p.id);
        step.placement_username = self
            .placement
            .as_ref()
            .map(|p| p.username.clone())
            .unwrap_or_default();
        step.leg = self.leg;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64, username: &str) -> DownlineUser {
        DownlineUser {
            id,
            username: username.to_string(),
            name: None,
        }
    }

    fn open(left: bool, right: bool) -> LegAvailability {
        let mut available_legs = Vec::new();
        if left {
            available_legs.push(Leg::Left);
        }
        if right {
            available_legs.push(Leg::Right);
        }
        LegAvailability {
            can_place_left: left,
            can_place_right: right,
            available_legs,
        }
    }

    fn placed() -> PlacementSelection {
        let mut selection = PlacementSelection::new();
        selection.select_sponsor(user(1, "sponsor"));
        selection.select_placement(user(2, "placement"));
        assert!(selection.apply_availability(2, open(true, true)));
        selection.choose_leg(Leg::Left).unwrap();
        selection
    }

    #[test]
    fn changing_sponsor_resets_dependents() {
        let mut selection = placed();
        selection.set_placement_results(vec![user(5, "x")]);

        selection.select_sponsor(user(9, "other"));
        assert_eq!(selection.sponsor().unwrap().id, 9);
        assert!(selection.placement().is_none());
        assert!(selection.leg().is_none());
        assert!(selection.availability().is_none());
        assert!(selection.placement_results().is_empty());

        // Re-applying the same sponsor is a no-op on the (already reset) state.
        let snapshot = selection.clone();
        selection.select_sponsor(user(9, "other"));
        assert_eq!(selection, snapshot);
    }

    #[test]
    fn clear_sponsor_is_idempotent() {
        let mut selection = placed();
        selection.clear_sponsor();
        let once = selection.clone();
        selection.clear_sponsor();
        assert_eq!(selection, once);
        assert_eq!(selection, PlacementSelection::new());
    }

    #[test]
    fn reselecting_same_sponsor_keeps_placement() {
        let mut selection = placed();
        selection.select_sponsor(user(1, "sponsor"));
        assert_eq!(selection.placement().unwrap().id, 2);
        assert_eq!(selection.leg(), Some(Leg::Left));
    }

    #[test]
    fn closed_legs_cannot_be_chosen() {
        let mut selection = PlacementSelection::new();
        assert_eq!(selection.choose_leg(Leg::Left), Err(PlacementError::NoPlacement));

        selection.select_sponsor(user(1, "s"));
        selection.select_placement(user(2, "p"));
        // No availability yet: nothing is open.
        assert_eq!(
            selection.choose_leg(Leg::Right),
            Err(PlacementError::LegUnavailable(Leg::Right))
        );

        selection.apply_availability(2, open(true, false));
        assert!(selection.is_leg_open(Leg::Left));
        assert!(!selection.is_leg_open(Leg::Right));
        assert!(selection.choose_leg(Leg::Right).is_err());
        assert!(selection.leg().is_none());
    }

    #[test]
    fn stale_leg_cleared_when_availability_changes() {
        let mut selection = placed();
        selection.apply_availability(2, open(false, true));
        assert!(selection.leg().is_none());

        selection.choose_leg(Leg::Right).unwrap();
        selection.apply_availability(2, open(true, true));
        assert_eq!(selection.leg(), Some(Leg::Right));
    }

    #[test]
    fn availability_for_old_placement_is_dropped() {
        let mut selection = placed();
        selection.select_placement(user(3, "newer"));
        assert!(!selection.apply_availability(2, open(true, true)));
        assert!(selection.availability().is_none());
    }

    #[test]
    fn flags_and_list_must_agree() {
        let availability = LegAvailability {
            can_place_left: true,
            can_place_right: true,
            available_legs: vec![Leg::Right],
        };
        assert!(availability.is_inconsistent());
        assert_eq!(availability.open_legs(), vec![Leg::Right]);

        let parsed: LegAvailability = serde_json::from_str(
            r#"{"can_place_left": false, "can_place_right": true, "available_legs": ["right"]}"#,
        )
        .unwrap();
        assert_eq!(parsed.open_legs(), vec![Leg::Right]);
    }

    #[test]
    fn fill_copies_choices() {
        let selection = placed();
        let mut step = PlacementStep {
            package_id: Some(4),
            ..Default::default()
        };
        selection.fill(&mut step);
        assert_eq!(step.sponsor_id, Some(1));
        assert_eq!(step.placement_username, "placement");
        assert_eq!(step.leg, Some(Leg::Left));
        assert_eq!(step.package_id, Some(4));
    }

    #[test]
    fn restore_rebuilds_people_but_not_the_leg() {
        let step = PlacementStep {
            package_id: Some(4),
            sponsor_id: Some(1),
            sponsor_username: "sponsor".into(),
            placement_id: Some(2),
            placement_username: "placement".into(),
            leg: Some(Leg::Left),
        };
        let selection = PlacementSelection::restore(&step);
        assert_eq!(selection.sponsor().map(|s| s.id), Some(1));
        assert_eq!(selection.placement().map(|p| p.username.as_str()), Some("placement"));
        assert_eq!(selection.leg(), None);
        assert!(selection.availability().is_none());

        let empty = PlacementSelection::restore(&PlacementStep::default());
        assert_eq!(empty, PlacementSelection::new());
    }
}
