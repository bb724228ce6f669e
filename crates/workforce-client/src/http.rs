//! # HTTP Data Source
//!
//! [`DataSource`] over one REST resource of the HR backend.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list         GET    {base}/{resource}?page=2&limit=10&search=..&<f>=.. │
//! │  create       POST   {base}/{resource}            expects 200 or 201    │
//! │  update       PUT    {base}/{resource}/{id}                             │
//! │  delete       DELETE {base}/{resource}/{id}                             │
//! │  delete_many  DELETE {base}/{resource}            body {"ids": [..]}    │
//! │                                                                         │
//! │  409 → ClientError::Conflict     other non-2xx → ClientError::Status    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;
use workforce_core::{Entity, EntityId, ListQuery, PageResponse};

use crate::config::ApiSettings;
use crate::envelope::{decode_ack, decode_entity, decode_page};
use crate::error::{ClientError, ClientResult};
use crate::source::{DataSource, DeleteAck};

/// REST client for one resource (`regions`, `holidays`, ...).
pub struct HttpSource<T> {
    client: reqwest::Client,
    collection: Url,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for HttpSource<T> {
    fn clone(&self) -> Self {
        HttpSource {
            client: self.client.clone(),
            collection: self.collection.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for HttpSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSource")
            .field("collection", &self.collection.as_str())
            .finish()
    }
}

impl<T> HttpSource<T> {
    pub fn new(api: &ApiSettings, resource: &str) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .default_headers(auth_headers(api.token.as_deref())?)
            .build()?;

        Ok(HttpSource {
            client,
            collection: collection_url(&api.base_url, resource)?,
            _entity: PhantomData,
        })
    }

    /// URL of the collection endpoint.
    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    /// URL of one item; the identifier is percent-encoded as a path segment.
    pub fn item_url(&self, id: &EntityId) -> ClientResult<Url> {
        let mut url = self.collection.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(format!("{} cannot have a path", self.collection)))?
            .push(&id.to_string());
        Ok(url)
    }

    async fn send<B>(&self, method: Method, url: Url, body: Option<&B>) -> ClientResult<(StatusCode, Value)>
    where
        B: Serialize + ?Sized + Sync,
    {
        debug!(%method, %url, "Sending request");
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        read_response(response).await
    }
}

#[async_trait]
impl<T> DataSource<T> for HttpSource<T>
where
    T: Entity + Serialize + DeserializeOwned,
{
    async fn list(&self, query: &ListQuery) -> ClientResult<PageResponse<T>> {
        let mut url = self.collection.clone();
        url.query_pairs_mut().extend_pairs(list_params(query));

        let (_, body) = self.send::<()>(Method::GET, url, None).await?;
        decode_page(body, query)
    }

    async fn create(&self, entity: &T) -> ClientResult<T> {
        let (status, body) = self
            .send(Method::POST, self.collection.clone(), Some(entity))
            .await?;

        if status != StatusCode::OK && status != StatusCode::CREATED {
            warn!(status = status.as_u16(), kind = T::KIND, "Create returned unexpected status");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: format!("Unexpected status {} creating {}", status.as_u16(), T::KIND),
            });
        }
        decode_entity(body)
    }

    async fn update(&self, id: &EntityId, entity: &T) -> ClientResult<T> {
        let (_, body) = self.send(Method::PUT, self.item_url(id)?, Some(entity)).await?;
        if body.is_null() {
            // 204: the backend stored exactly what was sent
            return Ok(entity.clone());
        }
        decode_entity(body)
    }

    async fn delete(&self, id: &EntityId) -> ClientResult<DeleteAck> {
        let (_, body) = self
            .send::<()>(Method::DELETE, self.item_url(id)?, None)
            .await?;
        decode_ack(body)
    }

    async fn delete_many(&self, ids: &[EntityId]) -> ClientResult<DeleteAck> {
        let payload = json!({ "ids": ids });
        let (_, body) = self
            .send(Method::DELETE, self.collection.clone(), Some(&payload))
            .await?;
        decode_ack(body)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn auth_headers(token: Option<&str>) -> ClientResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        let value = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|e| ClientError::InvalidConfig(format!("API token: {}", e)))?;
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

/// `{base}/{resource}` with exactly one slash between them.
fn collection_url(base_url: &str, resource: &str) -> ClientResult<Url> {
    let resource = resource.trim_matches('/');
    if resource.is_empty() {
        return Err(ClientError::InvalidConfig("resource path is empty".to_string()));
    }
    Ok(Url::parse(&format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        resource
    ))?)
}

/// Query-string pairs for a list request. Empty search is omitted.
pub(crate) fn list_params(query: &ListQuery) -> Vec<(String, String)> {
    let mut params = vec![
        ("page".to_string(), query.page.to_string()),
        ("limit".to_string(), query.page_size.to_string()),
    ];
    if !query.search.is_empty() {
        params.push(("search".to_string(), query.search.clone()));
    }
    params.extend(query.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
    params
}

async fn read_response(response: reqwest::Response) -> ClientResult<(StatusCode, Value)> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        warn!(status = status.as_u16(), "Request failed");
        return Err(ClientError::from_status(status.as_u16(), error_message(&text)));
    }

    if text.trim().is_empty() {
        return Ok((status, Value::Null));
    }
    Ok((status, serde_json::from_str(&text)?))
}

/// Best-effort message from an error body: `message`, then `error`, then the
/// raw text.
fn error_message(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(message) = map.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use workforce_core::types::Region;

    fn api() -> ApiSettings {
        ApiSettings {
            base_url: "https://hr.example.com/api/".to_string(),
            timeout_secs: 5,
            token: Some("secret".to_string()),
        }
    }

    #[test]
    fn test_collection_and_item_urls() {
        let source: HttpSource<Region> = HttpSource::new(&api(), "/regions/").unwrap();
        assert_eq!(source.collection_url().as_str(), "https://hr.example.com/api/regions");
        assert_eq!(
            source.item_url(&EntityId::Num(7)).unwrap().as_str(),
            "https://hr.example.com/api/regions/7"
        );
        assert_eq!(
            source.item_url(&EntityId::from("T 07")).unwrap().as_str(),
            "https://hr.example.com/api/regions/T%2007"
        );
    }

    #[test]
    fn test_empty_resource_rejected() {
        let err = HttpSource::<Region>::new(&api(), "/").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_list_params() {
        let query = ListQuery::new(2, 10)
            .with_search("north")
            .with_filter("organizationId", "4");

        assert_eq!(
            list_params(&query),
            vec![
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "10".to_string()),
                ("search".to_string(), "north".to_string()),
                ("organizationId".to_string(), "4".to_string()),
            ]
        );
        assert_eq!(list_params(&ListQuery::new(1, 5)).len(), 2);
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(error_message(r#"{"message":"Code exists"}"#), "Code exists");
        assert_eq!(error_message(r#"{"error":"Forbidden"}"#), "Forbidden");
        assert_eq!(error_message(" Bad Gateway "), "Bad Gateway");
    }

    #[test]
    fn test_token_header() {
        let headers = auth_headers(Some("abc")).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer abc");
        assert!(auth_headers(Some("  ")).unwrap().is_empty());
        assert!(auth_headers(Some("bad\ntoken")).is_err());
    }
}
