//! # Registration step submission
//!
//! Drives a [`RegistrationSession`] against the `registration/*` endpoints.
//! Every submission follows the same sequence:
//!
//! 1. the step must be the one the wizard is on,
//! 2. the payload is validated locally ([`ApiError::Validation`] on failure),
//! 3. steps after the first require the session id; without it the call is
//!    refused with "Session ID is missing" before anything is sent,
//! 4. one POST, tagged with the [`SESSION_HEADER`] whenever an id is held,
//! 5. on success the payload is merged into the session and the wizard
//!    advances, adopting the session id from the step 1 response.
//!
//! A failed submission leaves the session untouched; the user resubmits by
//! hand. Completion is the one retriable step: a failure marks the session so
//! the view can offer "Retry", and success resets the session.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use model::registration::{RegistrationSession, SessionId, Step, WizardError};
use model::steps::{AccountStep, PaymentStep, PayoutStep, PlacementStep, ProductsStep};
use model::FieldErrors;

use crate::client::{ApiClient, SESSION_HEADER};
use crate::error::{ApiError, ApiResult};
use crate::transport::{ApiRequest, Transport};

/// What the server said about an accepted step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepOutcome {
    pub message: String,
    pub data: Value,
}

/// Payment details returned by `registration/initiate`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentInstructions {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default, deserialize_with = "model::models::amount")]
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
    /// Hosted checkout page for card payments.
    #[serde(default)]
    pub payment_url: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub account_name: Option<String>,
}

impl StepOutcome {
    pub fn payment_instructions(&self) -> Option<PaymentInstructions> {
        serde_json::from_value(self.data.clone()).ok()
    }
}

fn session_id_in(body: &Value) -> Option<SessionId> {
    let candidates = [
        body.pointer("/data/session_id"),
        body.pointer("/session_id"),
        body.pointer("/data/sessionId"),
    ];
    candidates
        .into_iter()
        .flatten()
        .find_map(|v| match v {
            Value::String(s) => SessionId::new(s.as_str()),
            Value::Number(n) => SessionId::new(n.to_string()),
            _ => None,
        })
}

impl<T: Transport> ApiClient<T> {
    pub async fn submit_placement(
        &self,
        session: &mut RegistrationSession,
        payload: &PlacementStep,
    ) -> ApiResult<StepOutcome> {
        self.submit_step(session, Step::Placement, payload, payload.validate())
            .await
    }

    pub async fn submit_products(
        &self,
        session: &mut RegistrationSession,
        payload: &ProductsStep,
    ) -> ApiResult<StepOutcome> {
        self.submit_step(session, Step::Products, payload, payload.validate())
            .await
    }

    pub async fn submit_account(
        &self,
        session: &mut RegistrationSession,
        payload: &AccountStep,
    ) -> ApiResult<StepOutcome> {
        self.submit_step(session, Step::Account, payload, payload.validate())
            .await
    }

    /// The bank/USDT rule depends on the country chosen on the account step.
    pub async fn submit_payout(
        &self,
        session: &mut RegistrationSession,
        payload: PayoutStep,
    ) -> ApiResult<StepOutcome> {
        let country = session
            .accumulated()
            .get("country")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let payload = payload.for_country(&country);
        let validation = payload.validate(&country);
        self.submit_step(session, Step::Payout, &payload, validation)
            .await
    }

    pub async fn submit_payment(
        &self,
        session: &mut RegistrationSession,
        payload: &PaymentStep,
    ) -> ApiResult<StepOutcome> {
        self.submit_step(session, Step::Payment, payload, payload.validate())
            .await
    }

    /// Confirm payment and finalise the registration. Safe to call again after
    /// a failure; that is what "Retry" does.
    pub async fn complete_registration(
        &self,
        session: &mut RegistrationSession,
    ) -> ApiResult<StepOutcome> {
        ensure_on(session, Step::Completion)?;
        let session_id = session.require_session()?.clone();

        let request = ApiRequest::post(Step::Completion.endpoint(), Value::Object(Default::default()))
            .header(SESSION_HEADER, session_id.as_str());
        match self.call(request).await {
            Ok(body) => {
                tracing::info!("registration completed");
                session.reset();
                Ok(outcome(body))
            }
            Err(e) => {
                tracing::warn!("registration completion failed: {e}");
                session.mark_completion_failed();
                Err(e)
            }
        }
    }

    async fn submit_step<P: Serialize>(
        &self,
        session: &mut RegistrationSession,
        step: Step,
        payload: &P,
        validation: Result<(), FieldErrors>,
    ) -> ApiResult<StepOutcome> {
        ensure_on(session, step)?;
        validation?;

        let held = if step.requires_session() {
            Some(session.require_session()?.clone())
        } else {
            session.session_id().cloned()
        };

        let mut request = ApiRequest::post(step.endpoint(), serde_json::to_value(payload)?);
        if let Some(id) = &held {
            request = request.header(SESSION_HEADER, id.as_str());
        }

        let body = self.call(request).await?;
        let issued = session_id_in(&body);
        if held.is_none() && issued.is_none() {
            return Err(ApiError::Decode(format!(
                "step {step} response did not include a session id"
            )));
        }

        session.merge_payload(step, payload)?;
        session.advance(issued);
        tracing::info!(step = %step, "registration step accepted");
        Ok(outcome(body))
    }
}

fn ensure_on(session: &RegistrationSession, step: Step) -> Result<(), WizardError> {
    if session.step() == step {
        Ok(())
    } else {
        Err(WizardError::OutOfOrder {
            expected: session.step(),
            submitted: step,
        })
    }
}

fn outcome(mut body: Value) -> StepOutcome {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let data = body.get_mut("data").map(Value::take).unwrap_or(Value::Null);
    StepOutcome { message, data }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use model::placement::Leg;
    use model::registration::{RegistrationSession, Step, WizardError};
    use model::steps::{
        AccountStep, PaymentMethod, PaymentStep, PayoutStep, PlacementStep, ProductsStep,
    };

    use super::*;
    use crate::{MemoryTransport, Method};

    fn placement() -> PlacementStep {
        PlacementStep {
            package_id: Some(1),
            sponsor_id: Some(2),
            sponsor_username: "sponsor".into(),
            placement_id: Some(3),
            placement_username: "placement".into(),
            leg: Some(Leg::Left),
        }
    }

    fn products() -> ProductsStep {
        let mut step = ProductsStep::default();
        step.set_quantity(10, 2);
        step
    }

    fn account(country: &str) -> AccountStep {
        AccountStep {
            first_name: "Ada".into(),
            last_name: "Obi".into(),
            username: "ada_obi".into(),
            email: "ada@example.com".into(),
            phone: "+2348000000000".into(),
            password: "correct horse".into(),
            password_confirmation: "correct horse".into(),
            country_id: Some(1),
            country: country.into(),
            state_id: Some(2),
            city_id: Some(3),
        }
    }

    fn ok(transport: &MemoryTransport, step: Step, data: Value) {
        transport.respond(
            Method::Post,
            step.endpoint(),
            200,
            json!({"success": true, "message": format!("{} saved", step.title()), "data": data}),
        );
    }

    fn scripted() -> (MemoryTransport, ApiClient<MemoryTransport>) {
        let transport = MemoryTransport::new();
        ok(&transport, Step::Placement, json!({"session_id": "sess-1"}));
        for step in [Step::Products, Step::Account, Step::Payout] {
            ok(&transport, step, json!({}));
        }
        ok(
            &transport,
            Step::Payment,
            json!({"reference": "REG-1", "amount": "150.00", "payment_url": "https://pay.test/REG-1"}),
        );
        (transport.clone(), ApiClient::new(transport))
    }

    #[tokio::test]
    async fn full_flow_carries_session_header() {
        let (transport, client) = scripted();
        ok(&transport, Step::Completion, json!({"username": "ada_obi"}));
        let mut session = RegistrationSession::new();

        client.submit_placement(&mut session, &placement()).await.unwrap();
        assert_eq!(session.session_id().unwrap().as_str(), "sess-1");
        client.submit_products(&mut session, &products()).await.unwrap();
        client.submit_account(&mut session, &account("Ghana")).await.unwrap();
        let payout = PayoutStep {
            usdt_wallet_address: "TQ5bC4r5kK2Xy3wM1n7LJ2h8Zp9vAaBbCc".into(),
            bank_code: "058".into(),
            accept_terms: true,
            ..Default::default()
        };
        client.submit_payout(&mut session, payout).await.unwrap();
        let payment = client
            .submit_payment(
                &mut session,
                &PaymentStep {
                    payment_method: Some(PaymentMethod::Card),
                },
            )
            .await
            .unwrap();
        let instructions = payment.payment_instructions().unwrap();
        assert_eq!(instructions.amount, 150.0);
        assert_eq!(session.step(), Step::Completion);

        let done = client.complete_registration(&mut session).await.unwrap();
        assert_eq!(done.data["username"], "ada_obi");
        assert_eq!(session, RegistrationSession::new());

        let sent = transport.requests();
        assert_eq!(sent.len(), 6);
        assert_eq!(sent[0].header_value(SESSION_HEADER), None);
        for request in &sent[1..] {
            assert_eq!(request.header_value(SESSION_HEADER), Some("sess-1"));
        }
        // Ghana pays out in USDT: bank fields are stripped before sending.
        let payout_body = sent[3].body.as_ref().unwrap();
        assert_eq!(payout_body["bank_code"], "");
    }

    #[tokio::test]
    async fn no_step_two_call_without_session_id() {
        let transport = MemoryTransport::new();
        // Step 1 "succeeds" but never issues a session id.
        ok(&transport, Step::Placement, json!({}));
        ok(&transport, Step::Products, json!({}));
        let client = ApiClient::new(transport.clone());
        let mut session = RegistrationSession::new();

        let err = client.submit_placement(&mut session, &placement()).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(session.step(), Step::Placement);

        // Even a wizard forced onto step 2 refuses to send without the id.
        session.advance(None);
        let err = client.submit_products(&mut session, &products()).await.unwrap_err();
        assert!(err.is_missing_session());
        assert_eq!(err.user_message(), "Session ID is missing");
        assert_eq!(transport.calls_to(Step::Products.endpoint()), 0);
    }

    #[tokio::test]
    async fn validation_failure_sends_nothing() {
        let (transport, client) = scripted();
        let mut session = RegistrationSession::new();
        let err = client
            .submit_placement(&mut session, &PlacementStep::default())
            .await
            .unwrap_err();
        assert!(err.field_errors().unwrap().get("sponsor_id").is_some());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn out_of_order_submission_is_refused() {
        let (transport, client) = scripted();
        let mut session = RegistrationSession::new();
        let err = client
            .submit_account(&mut session, &account("Nigeria"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Wizard(WizardError::OutOfOrder {
                expected: Step::Placement,
                submitted: Step::Account
            })
        );
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn server_rejection_keeps_wizard_on_step() {
        let transport = MemoryTransport::new();
        ok(&transport, Step::Placement, json!({"session_id": 42}));
        transport.respond(
            Method::Post,
            Step::Products.endpoint(),
            200,
            json!({"success": false, "message": "Product out of stock"}),
        );
        let client = ApiClient::new(transport.clone());
        let mut session = RegistrationSession::new();
        client.submit_placement(&mut session, &placement()).await.unwrap();
        assert_eq!(session.session_id().unwrap().as_str(), "42");

        let err = client.submit_products(&mut session, &products()).await.unwrap_err();
        assert_eq!(err.user_message(), "Product out of stock");
        assert_eq!(session.step(), Step::Products);
        assert!(session.fields_for(Step::Products).is_empty());
    }

    #[tokio::test]
    async fn retreat_and_resubmit_reuses_session() {
        let (transport, client) = scripted();
        let mut session = RegistrationSession::new();
        client.submit_placement(&mut session, &placement()).await.unwrap();
        session.retreat();

        let prefill: PlacementStep = session.prefill(Step::Placement);
        assert_eq!(prefill, placement());

        let mut changed = prefill;
        changed.leg = Some(Leg::Right);
        client.submit_placement(&mut session, &changed).await.unwrap();
        assert_eq!(session.accumulated()["leg"], "right");
        assert_eq!(
            transport.requests()[1].header_value(SESSION_HEADER),
            Some("sess-1")
        );
    }

    #[tokio::test]
    async fn completion_failure_enables_retry() {
        let (transport, client) = scripted();
        transport.respond(
            Method::Post,
            Step::Completion.endpoint(),
            200,
            json!({"success": false, "message": "Payment not confirmed yet"}),
        );
        transport.respond(
            Method::Post,
            Step::Completion.endpoint(),
            200,
            json!({"success": true, "message": "Welcome aboard"}),
        );
        let mut session = RegistrationSession::new();
        client.submit_placement(&mut session, &placement()).await.unwrap();
        client.submit_products(&mut session, &products()).await.unwrap();
        client.submit_account(&mut session, &account("Nigeria")).await.unwrap();
        let payout = PayoutStep {
            bank_code: "058".into(),
            account_number: "0123456789".into(),
            account_name: "ADA OBI".into(),
            accept_terms: true,
            ..Default::default()
        };
        client.submit_payout(&mut session, payout).await.unwrap();
        client
            .submit_payment(
                &mut session,
                &PaymentStep {
                    payment_method: Some(PaymentMethod::BankTransfer),
                },
            )
            .await
            .unwrap();

        assert!(client.complete_registration(&mut session).await.is_err());
        assert!(session.can_retry());

        let done = client.complete_registration(&mut session).await.unwrap();
        assert_eq!(done.message, "Welcome aboard");
        assert!(!session.can_retry());
        assert_eq!(transport.calls_to(Step::Completion.endpoint()), 2);
    }
}
