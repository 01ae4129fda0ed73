use serde_json::json;

use model::models::{LoginSession, UserProfile};

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::transport::{ApiRequest, Transport};

impl<T: Transport> ApiClient<T> {
    /// Exchange credentials for a bearer token.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginSession> {
        self.call_data(ApiRequest::post(
            "auth/login",
            json!({ "username": username.trim(), "password": password }),
        ))
        .await
    }

    /// Revoke the current token server-side.
    pub async fn logout(&self) -> ApiResult<()> {
        self.call(ApiRequest::post("auth/logout", json!({}))).await?;
        Ok(())
    }

    /// The user the current token belongs to.
    pub async fn current_user(&self) -> ApiResult<UserProfile> {
        self.call_data(ApiRequest::get("auth/me")).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{ApiClient, ApiError, MemoryTransport, Method};

    #[tokio::test]
    async fn login_returns_token_and_user() {
        let transport = MemoryTransport::new();
        transport.respond(
            Method::Post,
            "auth/login",
            200,
            json!({
                "success": true,
                "message": "Login successful",
                "data": {"token": "abc", "user": {"id": 1, "username": "ada", "role": "user"}}
            }),
        );
        let client = ApiClient::new(transport.clone());
        let session = client.login(" ada ", "secret").await.unwrap();
        assert_eq!(session.token, "abc");
        assert_eq!(session.user.username, "ada");

        let sent = &transport.requests()[0];
        assert_eq!(sent.body.as_ref().unwrap()["username"], "ada");
        assert!(sent.header_value("authorization").is_none());
    }

    #[tokio::test]
    async fn bad_credentials_surface_server_message() {
        let transport = MemoryTransport::new();
        transport.respond(
            Method::Post,
            "auth/login",
            400,
            json!({"success": false, "message": "Invalid credentials"}),
        );
        let client = ApiClient::new(transport);
        let err = client.login("ada", "nope").await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid credentials");
        assert!(!matches!(err, ApiError::Unauthenticated(_)));
    }
}
