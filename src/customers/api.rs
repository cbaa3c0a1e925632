//! CRUD client for the customer collection.
//!
//! Thin wrapper over the mock REST endpoints; drafts should be run through
//! [`CustomerDraft::validated`](super::CustomerDraft::validated) first;
//! this client sends whatever it is given.

use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::NetworkError;

use super::{Customer, CustomerDraft};

/// HTTP request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the customer collection.
pub struct CustomerApi {
    config: ApiConfig,
    http: reqwest::Client,
}

impl CustomerApi {
    /// Create a client for the given API endpoint.
    pub fn new(config: ApiConfig) -> Result<Self, NetworkError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { config, http })
    }

    /// Fetch the full collection.
    pub async fn list(&self) -> Result<Vec<Customer>, NetworkError> {
        let resp = self.http.get(self.config.customers_url()).send().await?;
        decode_json(resp).await
    }

    /// Fetch a single record.
    pub async fn get(&self, id: &str) -> Result<Customer, NetworkError> {
        let resp = self.http.get(self.config.customer_url(id)).send().await?;
        decode_json(resp).await
    }

    /// Create a record; the server assigns `id` and `createdAt`.
    pub async fn create(&self, draft: &CustomerDraft) -> Result<Customer, NetworkError> {
        let resp = self
            .http
            .post(self.config.customers_url())
            .json(draft)
            .send()
            .await?;
        decode_json(resp).await
    }

    /// Replace a record.
    pub async fn update(&self, id: &str, draft: &CustomerDraft) -> Result<Customer, NetworkError> {
        let resp = self
            .http
            .put(self.config.customer_url(id))
            .json(draft)
            .send()
            .await?;
        decode_json(resp).await
    }

    /// Delete a record. The mock API answers with a JSON boolean body.
    pub async fn delete(&self, id: &str) -> Result<bool, NetworkError> {
        let resp = self.http.delete(self.config.customer_url(id)).send().await?;
        decode_json(resp).await
    }
}

async fn decode_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, NetworkError> {
    if !resp.status().is_success() {
        return Err(NetworkError::Status(resp.status().as_u16()));
    }
    resp.json().await.map_err(NetworkError::Body)
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn customer_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "createdAt": "2025-01-15T10:00:00.000Z",
            "name": "Ada",
            "lastname": "Lovelace",
            "email": "ada@gmail.com",
            "phone": "900111222",
            "user": "ada",
            "password": "secret1",
        })
    }

    fn draft() -> CustomerDraft {
        CustomerDraft {
            name: "Ada".into(),
            lastname: "Lovelace".into(),
            email: "ada@gmail.com".into(),
            phone: "900111222".into(),
            user: "ada".into(),
            password: "secret1".into(),
        }
    }

    async fn api_for(server: &MockServer) -> CustomerApi {
        CustomerApi::new(ApiConfig::new(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn list_decodes_collection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customers"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([customer_json("1"), customer_json("2")])),
            )
            .mount(&server)
            .await;

        let customers = api_for(&server).await.list().await.unwrap();
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].phone, "900111222");
    }

    #[tokio::test]
    async fn get_fetches_single_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customers/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(customer_json("7")))
            .mount(&server)
            .await;

        let customer = api_for(&server).await.get("7").await.unwrap();
        assert_eq!(customer.id, "7");
    }

    #[tokio::test]
    async fn create_posts_draft_and_decodes_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/customers"))
            .and(body_json(draft()))
            .respond_with(ResponseTemplate::new(201).set_body_json(customer_json("3")))
            .mount(&server)
            .await;

        let created = api_for(&server).await.create(&draft()).await.unwrap();
        assert_eq!(created.id, "3");
    }

    #[tokio::test]
    async fn update_puts_draft() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/customers/3"))
            .and(body_json(draft()))
            .respond_with(ResponseTemplate::new(200).set_body_json(customer_json("3")))
            .mount(&server)
            .await;

        let updated = api_for(&server).await.update("3", &draft()).await.unwrap();
        assert_eq!(updated.id, "3");
    }

    #[tokio::test]
    async fn delete_decodes_boolean_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/customers/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(true))
            .mount(&server)
            .await;

        assert!(api_for(&server).await.delete("3").await.unwrap());
    }

    #[tokio::test]
    async fn non_success_maps_to_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customers/404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = api_for(&server).await.get("404").await.unwrap_err();
        assert!(matches!(err, NetworkError::Status(404)));
    }
}
