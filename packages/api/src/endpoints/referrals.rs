use model::models::DownlineUser;
use model::placement::LegAvailability;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::transport::{ApiRequest, Transport};

impl<T: Transport> ApiClient<T> {
    /// Search the downline by username. With `sponsor_id`, only members under
    /// that sponsor are returned (placement search).
    pub async fn search_downlines(
        &self,
        query: &str,
        sponsor_id: Option<u64>,
    ) -> ApiResult<Vec<DownlineUser>> {
        let mut request = ApiRequest::get("referrals/downlines").query("search", query.trim());
        if let Some(id) = sponsor_id {
            request = request.query("sponsor_id", id);
        }
        self.call_data(request).await
    }

    /// Which legs are open under `placement_id`.
    pub async fn available_legs(&self, placement_id: u64) -> ApiResult<LegAvailability> {
        self.call_data(
            ApiRequest::get("referrals/available-legs").query("placement_id", placement_id),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use model::placement::Leg;

    use crate::{ApiClient, ApiError, MemoryTransport, Method};

    #[tokio::test]
    async fn placement_search_is_scoped_to_sponsor() {
        let transport = MemoryTransport::new();
        transport.respond(
            Method::Get,
            "referrals/downlines",
            200,
            json!({"success": true, "data": [{"id": 4, "username": "kemi"}]}),
        );
        let client = ApiClient::new(transport.clone());
        let found = client.search_downlines(" kem ", Some(2)).await.unwrap();
        assert_eq!(found[0].username, "kemi");

        let sent = &transport.requests()[0];
        assert_eq!(sent.query_value("search"), Some("kem"));
        assert_eq!(sent.query_value("sponsor_id"), Some("2"));
    }

    #[tokio::test]
    async fn availability_decodes_leg_names() {
        let transport = MemoryTransport::new();
        transport.respond(
            Method::Get,
            "referrals/available-legs",
            200,
            json!({"success": true, "data": {
                "can_place_left": false,
                "can_place_right": true,
                "available_legs": ["right"]
            }}),
        );
        let client = ApiClient::new(transport);
        let availability = client.available_legs(7).await.unwrap();
        assert_eq!(availability.open_legs(), vec![Leg::Right]);
    }

    #[tokio::test]
    async fn unknown_leg_names_fail_closed() {
        let transport = MemoryTransport::new();
        transport.respond(
            Method::Get,
            "referrals/available-legs",
            200,
            json!({"data": {"available_legs": ["middle"]}}),
        );
        let err = ApiClient::new(transport).available_legs(7).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
