//! Catalogue and reference data used while filling in the registration wizard.

use model::models::{Bank, Package, Place, Product, ResolvedAccount};

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::transport::{ApiRequest, Transport};

impl<T: Transport> ApiClient<T> {
    pub async fn packages(&self) -> ApiResult<Vec<Package>> {
        self.call_data(ApiRequest::get("packages")).await
    }

    /// Products that can be bundled with `package_id`.
    pub async fn products(&self, package_id: u64) -> ApiResult<Vec<Product>> {
        self.call_data(ApiRequest::get("products").query("package_id", package_id))
            .await
    }

    pub async fn countries(&self) -> ApiResult<Vec<Place>> {
        self.call_data(ApiRequest::get("countries")).await
    }

    pub async fn states(&self, country_id: u64) -> ApiResult<Vec<Place>> {
        self.call_data(ApiRequest::get(format!("countries/{country_id}/states")))
            .await
    }

    pub async fn cities(&self, state_id: u64) -> ApiResult<Vec<Place>> {
        self.call_data(ApiRequest::get(format!("states/{state_id}/cities")))
            .await
    }

    pub async fn banks(&self) -> ApiResult<Vec<Bank>> {
        self.call_data(ApiRequest::get("banks")).await
    }

    /// Ask the bank-resolution service for the account holder's name.
    pub async fn resolve_bank_account(
        &self,
        bank_code: &str,
        account_number: &str,
    ) -> ApiResult<ResolvedAccount> {
        self.call_data(
            ApiRequest::get("banks/resolve")
                .query("bank_code", bank_code)
                .query("account_number", account_number.trim()),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{ApiClient, MemoryTransport, Method};

    #[tokio::test]
    async fn cascading_places() {
        let transport = MemoryTransport::new();
        transport.respond(
            Method::Get,
            "countries/160/states",
            200,
            json!({"success": true, "data": [{"id": 25, "name": "Lagos"}]}),
        );
        transport.respond(
            Method::Get,
            "states/25/cities",
            200,
            json!({"success": true, "data": [{"id": 3, "name": "Ikeja"}]}),
        );
        let client = ApiClient::new(transport);
        let states = client.states(160).await.unwrap();
        let cities = client.cities(states[0].id).await.unwrap();
        assert_eq!(cities[0].name, "Ikeja");
    }

    #[tokio::test]
    async fn bank_resolution() {
        let transport = MemoryTransport::new();
        transport.respond(
            Method::Get,
            "banks/resolve",
            200,
            json!({"success": true, "data": {"account_number": "0123456789", "account_name": "ADA OBI"}}),
        );
        let client = ApiClient::new(transport.clone());
        let account = client.resolve_bank_account("058", " 0123456789 ").await.unwrap();
        assert_eq!(account.account_name, "ADA OBI");
        assert_eq!(
            transport.requests()[0].query_value("account_number"),
            Some("0123456789")
        );
    }
}
