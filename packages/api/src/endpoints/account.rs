use model::models::{DashboardSummary, Transaction, WalletOverview};
use model::pagination::{Page, PageRequest, PerPageParam};

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::transport::{ApiRequest, Transport};

impl<T: Transport> ApiClient<T> {
    pub async fn dashboard(&self) -> ApiResult<DashboardSummary> {
        self.call_data(ApiRequest::get("dashboard")).await
    }

    pub async fn wallet(&self) -> ApiResult<WalletOverview> {
        self.call_data(ApiRequest::get("wallet")).await
    }

    /// Transaction history, optionally restricted to one wallet slug.
    pub async fn transactions(
        &self,
        request: PageRequest,
        wallet: Option<&str>,
    ) -> ApiResult<Page<Transaction>> {
        let extra = wallet
            .filter(|w| !w.is_empty())
            .map(|w| vec![("wallet".to_string(), w.to_string())])
            .unwrap_or_default();
        self.page("wallet/transactions", request, PerPageParam::Snake, extra)
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use model::pagination::PageRequest;

    use crate::{ApiClient, MemoryTransport, Method};

    #[tokio::test]
    async fn wallet_overview_totals() {
        let transport = MemoryTransport::new();
        transport.respond(
            Method::Get,
            "wallet",
            200,
            json!({"success": true, "data": {
                "currency": "USD",
                "wallets": [
                    {"slug": "main", "name": "Main", "balance": "120.50"},
                    {"slug": "commission", "name": "Commission", "balance": 79.5}
                ]
            }}),
        );
        let overview = ApiClient::new(transport).wallet().await.unwrap();
        assert_eq!(overview.total(), 200.0);
    }

    #[tokio::test]
    async fn transactions_use_triple_nested_envelope() {
        let transport = MemoryTransport::new();
        transport.respond(
            Method::Get,
            "wallet/transactions",
            200,
            json!({"success": true, "data": {"data": {
                "data": [{"id": 9, "type": "debit", "amount": "10"}],
                "current_page": 2,
                "last_page": 2,
                "per_page": 10
            }}}),
        );
        let client = ApiClient::new(transport.clone());
        let page = client
            .transactions(PageRequest::new(2, 10), Some("main"))
            .await
            .unwrap();
        assert_eq!(page.data[0].id, 9);
        assert!(!page.has_next());

        let sent = &transport.requests()[0];
        assert_eq!(sent.query_value("page"), Some("2"));
        assert_eq!(sent.query_value("per_page"), Some("10"));
        assert_eq!(sent.query_value("wallet"), Some("main"));
    }
}
