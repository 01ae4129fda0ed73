//! # Registration wizard session controller
//!
//! [`RegistrationSession`] is the in-memory state behind the five-step member
//! registration wizard (plus its completion step). It owns three things:
//!
//! - the current [`Step`],
//! - the server-issued [`SessionId`] handed out by the step 1 response,
//! - the accumulated field data of every submitted step.
//!
//! ## Rules
//!
//! - A session id is stored the first time one is supplied to
//!   [`advance`](RegistrationSession::advance) and is never overwritten.
//! - Any step after step 1 must call
//!   [`require_session`](RegistrationSession::require_session) before it
//!   touches the network; a missing id is a terminal user-facing error.
//! - Field data is additive. Each key belongs to the step that first wrote it.
//!   Resubmitting that step (after [`retreat`](RegistrationSession::retreat))
//!   may update its own keys, but a later step can never overwrite them.
//!
//! Nothing here is persisted: a page reload starts a new wizard.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque token correlating the registration steps server-side.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a raw token. Blank tokens are not session ids.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wizard steps in submission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    /// Package, sponsor, placement and binary leg.
    Placement,
    /// Product bundle selection.
    Products,
    /// Personal details and credentials.
    Account,
    /// Bank or USDT payout details and terms acceptance.
    Payout,
    /// Payment method; initiates the registration payment.
    Payment,
    /// Confirms payment and finalises the member. Retriable.
    Completion,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Placement,
        Step::Products,
        Step::Account,
        Step::Payout,
        Step::Payment,
        Step::Completion,
    ];

    /// 1-based position shown in the progress header.
    pub fn number(self) -> u8 {
        match self {
            Step::Placement => 1,
            Step::Products => 2,
            Step::Account => 3,
            Step::Payout => 4,
            Step::Payment => 5,
            Step::Completion => 6,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Placement => "Placement",
            Step::Products => "Products",
            Step::Account => "Account",
            Step::Payout => "Payout",
            Step::Payment => "Payment",
            Step::Completion => "Complete",
        }
    }

    /// Endpoint path, relative to the API base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            Step::Placement => "registration/step-1",
            Step::Products => "registration/step-2",
            Step::Account => "registration/step-3",
            Step::Payout => "registration/step-4",
            Step::Payment => "registration/initiate",
            Step::Completion => "registration/initiate/pay",
        }
    }

    /// Every step but the first is correlated by the session id.
    pub fn requires_session(self) -> bool {
        self != Step::Placement
    }

    pub fn next(self) -> Step {
        match self {
            Step::Placement => Step::Products,
            Step::Products => Step::Account,
            Step::Account => Step::Payout,
            Step::Payout => Step::Payment,
            Step::Payment | Step::Completion => Step::Completion,
        }
    }

    pub fn prev(self) -> Step {
        match self {
            Step::Placement | Step::Products => Step::Placement,
            Step::Account => Step::Products,
            Step::Payout => Step::Account,
            Step::Payment => Step::Payout,
            Step::Completion => Step::Payment,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("Session ID is missing")]
    MissingSession,
    #[error("field `{field}` belongs to step {owner} and cannot be changed from step {writer}")]
    FieldOwned {
        field: String,
        owner: Step,
        writer: Step,
    },
    #[error("step {0} payload must be a JSON object")]
    NotAnObject(Step),
    #[error("the wizard is on step {expected}, not step {submitted}")]
    OutOfOrder { expected: Step, submitted: Step },
}

/// Transient state of one registration attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct RegistrationSession {
    step: Step,
    session_id: Option<SessionId>,
    fields: Map<String, Value>,
    owners: BTreeMap<String, Step>,
    completion_failed: bool,
}

impl Default for RegistrationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationSession {
    pub fn new() -> Self {
        Self {
            step: Step::Placement,
            session_id: None,
            fields: Map::new(),
            owners: BTreeMap::new(),
            completion_failed: false,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// The session id, or [`WizardError::MissingSession`] when step 1 has not
    /// produced one yet.
    pub fn require_session(&self) -> Result<&SessionId, WizardError> {
        self.session_id.as_ref().ok_or(WizardError::MissingSession)
    }

    /// Move to the next step, keeping the first session id ever supplied.
    pub fn advance(&mut self, new_session_id: Option<SessionId>) {
        if self.session_id.is_none() {
            self.session_id = new_session_id;
        } else if let Some(ignored) = new_session_id {
            if Some(&ignored) != self.session_id.as_ref() {
                tracing::warn!(step = %self.step, "ignoring replacement registration session id");
            }
        }
        self.step = self.step.next();
    }

    /// Move back one step. Collected fields are kept for pre-filling.
    pub fn retreat(&mut self) {
        self.step = self.step.prev();
    }

    /// Shallow-merge `partial` into the accumulated fields on behalf of `step`.
    ///
    /// Either every key is merged or none is.
    pub fn merge_fields(
        &mut self,
        step: Step,
        partial: Map<String, Value>,
    ) -> Result<(), WizardError> {
        for key in partial.keys() {
            if let Some(owner) = self.owners.get(key) {
                if *owner < step {
                    return Err(WizardError::FieldOwned {
                        field: key.clone(),
                        owner: *owner,
                        writer: step,
                    });
                }
            }
        }
        for (key, value) in partial {
            self.owners.entry(key.clone()).or_insert(step);
            self.fields.insert(key, value);
        }
        Ok(())
    }

    /// Serialize a typed step payload and merge it.
    pub fn merge_payload<T: Serialize>(&mut self, step: Step, payload: &T) -> Result<(), WizardError> {
        match serde_json::to_value(payload) {
            Ok(Value::Object(map)) => self.merge_fields(step, map),
            _ => Err(WizardError::NotAnObject(step)),
        }
    }

    pub fn accumulated(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Fields owned by `step`, for pre-filling its form after a retreat.
    pub fn fields_for(&self, step: Step) -> Map<String, Value> {
        self.owners
            .iter()
            .filter(|(_, owner)| **owner == step)
            .filter_map(|(key, _)| self.fields.get(key).map(|v| (key.clone(), v.clone())))
            .collect()
    }

    /// Typed pre-fill for `step`, falling back to an empty form.
    pub fn prefill<T: DeserializeOwned + Default>(&self, step: Step) -> T {
        let fields = self.fields_for(step);
        if fields.is_empty() {
            return T::default();
        }
        serde_json::from_value(Value::Object(fields)).unwrap_or_default()
    }

    pub fn mark_completion_failed(&mut self) {
        self.completion_failed = true;
    }

    pub fn completion_failed(&self) -> bool {
        self.completion_failed
    }

    /// "Retry" is offered only once a session exists and completion failed.
    pub fn can_retry(&self) -> bool {
        self.step == Step::Completion && self.session_id.is_some() && self.completion_failed
    }

    /// Drop everything; used after a successful completion.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn advance_stores_first_session_id_only() {
        let mut session = RegistrationSession::new();
        assert!(session.session_id().is_none());

        session.advance(SessionId::new("abc"));
        assert_eq!(session.step(), Step::Products);
        assert_eq!(session.session_id().unwrap().as_str(), "abc");

        session.advance(SessionId::new("other"));
        assert_eq!(session.step(), Step::Account);
        assert_eq!(session.session_id().unwrap().as_str(), "abc");
    }

    #[test]
    fn blank_session_ids_are_rejected() {
        assert!(SessionId::new("   ").is_none());
        let mut session = RegistrationSession::new();
        session.advance(SessionId::new(""));
        assert_eq!(session.require_session(), Err(WizardError::MissingSession));
        assert_eq!(
            WizardError::MissingSession.to_string(),
            "Session ID is missing"
        );
    }

    #[test]
    fn steps_saturate_at_both_ends() {
        let mut session = RegistrationSession::new();
        session.retreat();
        assert_eq!(session.step(), Step::Placement);
        for _ in 0..10 {
            session.advance(None);
        }
        assert_eq!(session.step(), Step::Completion);
        assert_eq!(Step::Completion.number(), 6);
    }

    #[test]
    fn retreat_keeps_fields_for_prefill() {
        let mut session = RegistrationSession::new();
        session
            .merge_fields(Step::Placement, object(json!({"sponsor_id": 7, "leg": "left"})))
            .unwrap();
        session.advance(SessionId::new("s1"));
        session.retreat();

        assert_eq!(session.step(), Step::Placement);
        let prefill = session.fields_for(Step::Placement);
        assert_eq!(prefill.get("sponsor_id"), Some(&json!(7)));
        assert_eq!(prefill.get("leg"), Some(&json!("left")));
    }

    #[test]
    fn later_steps_cannot_overwrite_earlier_fields() {
        let mut session = RegistrationSession::new();
        session
            .merge_fields(Step::Placement, object(json!({"package_id": 1})))
            .unwrap();

        let err = session
            .merge_fields(Step::Products, object(json!({"package_id": 2, "products": []})))
            .unwrap_err();
        assert!(matches!(err, WizardError::FieldOwned { ref field, owner: Step::Placement, .. } if field == "package_id"));

        // Nothing from the rejected merge leaked in.
        assert_eq!(session.accumulated().get("package_id"), Some(&json!(1)));
        assert!(session.accumulated().get("products").is_none());
    }

    #[test]
    fn owning_step_may_resubmit_its_fields() {
        let mut session = RegistrationSession::new();
        session
            .merge_fields(Step::Placement, object(json!({"package_id": 1})))
            .unwrap();
        session
            .merge_fields(Step::Placement, object(json!({"package_id": 3})))
            .unwrap();
        assert_eq!(session.accumulated().get("package_id"), Some(&json!(3)));
    }

    #[test]
    fn retry_requires_session_and_failure() {
        let mut session = RegistrationSession::new();
        for _ in 0..5 {
            session.advance(None);
        }
        session.mark_completion_failed();
        assert!(!session.can_retry());

        let mut session = RegistrationSession::new();
        session.advance(SessionId::new("s"));
        for _ in 0..4 {
            session.advance(None);
        }
        assert!(!session.can_retry());
        session.mark_completion_failed();
        assert!(session.can_retry());

        session.reset();
        assert_eq!(session, RegistrationSession::new());
    }
}
