//! Request dispatcher for the Shipwire API.
//!
//! # Design
//! `Client` holds a configuration snapshot and a `Transport` and carries no
//! mutable state between calls, so it can be shared across threads. Every
//! call is split the same way: `build` turns a `RequestDescriptor` into an
//! `HttpRequest` (URL, Basic auth, JSON body, timeout), the transport performs
//! it, and `parse` turns the `HttpResponse` into a `Response` envelope.
//! `build` and `parse` are pure; only `send` does I/O.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use tracing::{info, warn};
use url::Url;

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::request::{Query, RequestDescriptor};
use crate::resources::{Classification, Orders, Products, Receivings, Returns, Stock};
use crate::response::Response;

#[cfg(feature = "ureq")]
use crate::transport::UreqTransport;

/// Client over the default ureq transport.
#[cfg(feature = "ureq")]
pub type DefaultClient = Client<UreqTransport>;

#[derive(Debug, Clone)]
pub struct Client<T> {
    config: Config,
    transport: T,
}

#[cfg(feature = "ureq")]
impl Client<UreqTransport> {
    pub fn new(config: Config) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }

    /// Snapshot the process-wide configuration set with `configure`.
    pub fn from_current() -> Self {
        Self::new(crate::config::current())
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve a descriptor into a concrete HTTP request without sending it.
    pub fn build(&self, descriptor: &RequestDescriptor) -> Result<HttpRequest> {
        self.config.validate()?;
        let url = self.url(&descriptor.path, &descriptor.query)?;

        let mut headers = vec![
            ("accept".to_string(), "application/json".to_string()),
            ("authorization".to_string(), self.basic_auth()),
        ];
        let body = if descriptor.has_body() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
            Some(serde_json::to_string(&descriptor.body)?)
        } else {
            None
        };

        Ok(HttpRequest {
            method: descriptor.verb,
            url,
            headers,
            body,
            timeout: self.config.timeout,
        })
    }

    /// Wrap any HTTP response in an envelope; non-2xx is data, not an error.
    pub fn parse(&self, response: HttpResponse) -> Result<Response> {
        Response::from_slice(response.status, &response.body)
    }

    /// Build, perform and parse one call.
    pub fn send(&self, descriptor: RequestDescriptor) -> Result<Response> {
        let request = self.build(&descriptor)?;
        let response = match self.transport.perform(&request) {
            Ok(response) => response,
            Err(err) => {
                if self.config.logging_enabled {
                    warn!(verb = %descriptor.verb, path = %descriptor.path, error = %err, "shipwire request failed");
                }
                return Err(err.into());
            }
        };
        if self.config.logging_enabled {
            info!(verb = %descriptor.verb, path = %descriptor.path, status = response.status, "shipwire request");
        }
        self.parse(response)
    }

    /// `send` spelled out as verb, path, body and query.
    pub fn request(
        &self,
        verb: HttpMethod,
        path: &str,
        body: Value,
        query: Query,
    ) -> Result<Response> {
        self.send(RequestDescriptor::new(verb, path).body(body).query(query))
    }

    pub fn orders(&self) -> Orders<'_, T> {
        Orders::new(self)
    }

    pub fn returns(&self) -> Returns<'_, T> {
        Returns::new(self)
    }

    pub fn receivings(&self) -> Receivings<'_, T> {
        Receivings::new(self)
    }

    pub fn stock(&self) -> Stock<'_, T> {
        Stock::new(self)
    }

    /// All products regardless of classification.
    pub fn products(&self) -> Products<'_, T> {
        Products::new(self, None)
    }

    pub fn product_variant(&self, classification: Classification) -> Products<'_, T> {
        Products::new(self, Some(classification))
    }

    pub fn base_products(&self) -> Products<'_, T> {
        self.product_variant(Classification::Base)
    }

    pub fn inserts(&self) -> Products<'_, T> {
        self.product_variant(Classification::Insert)
    }

    pub fn kits(&self) -> Products<'_, T> {
        self.product_variant(Classification::Kit)
    }

    pub fn virtual_kits(&self) -> Products<'_, T> {
        self.product_variant(Classification::VirtualKit)
    }

    /// `endpoint + "/" + path`, plus the encoded query when there is one.
    fn url(&self, path: &str, query: &Query) -> Result<String> {
        let endpoint = self.config.endpoint.trim().trim_end_matches('/');
        let base = Url::parse(endpoint).map_err(|e| invalid_endpoint(endpoint, e.to_string()))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(invalid_endpoint(endpoint, "expected an absolute http(s) URL"));
        }

        let joined = format!("{endpoint}/{}", path.trim_start_matches('/'));
        let mut url = Url::parse(&joined).map_err(|e| invalid_endpoint(endpoint, e.to_string()))?;
        let pairs = query.pairs()?;
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url.into())
    }

    fn basic_auth(&self) -> String {
        let credentials = format!("{}:{}", self.config.username, self.config.password);
        format!("Basic {}", STANDARD.encode(credentials))
    }
}

fn invalid_endpoint(endpoint: &str, reason: impl Into<String>) -> ApiError {
    ApiError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tracing_test::traced_test;

    use super::*;
    use crate::error::{ConfigError, TransportError};
    use crate::test_support::{recording_client, test_config, Recorder, OK_EMPTY};

    fn client() -> Client<Recorder> {
        recording_client(OK_EMPTY)
    }

    #[test]
    fn build_get_with_query() {
        let request = client()
            .build(&RequestDescriptor::get("orders").query(Query::new().with("status", "canceled")))
            .unwrap();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, "http://localhost:3000/api/v3/orders?status=canceled");
        assert!(request.body.is_none());
        assert_eq!(request.header("content-type"), None);
        assert_eq!(request.header("accept"), Some("application/json"));
        assert_eq!(request.timeout, Duration::from_secs(5));
    }

    #[test]
    fn build_sets_basic_auth() {
        let request = client().build(&RequestDescriptor::get("stock")).unwrap();
        assert_eq!(request.header("authorization"), Some("Basic YXBpLXVzZXI6czNjcmV0"));
    }

    #[test]
    fn build_post_serializes_body() {
        let request = client()
            .build(&RequestDescriptor::post("orders").body(json!({"orderNo": "A1", "items": [{"sku": "X", "quantity": 1}]})))
            .unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.header("content-type"), Some("application/json"));
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["orderNo"], "A1");
        assert_eq!(body["items"][0]["quantity"], 1);
    }

    #[test]
    fn build_get_drops_body() {
        let request = client()
            .build(&RequestDescriptor::get("orders").body(json!({"ignored": true})))
            .unwrap();
        assert!(request.body.is_none());
    }

    #[test]
    fn query_values_are_form_encoded() {
        let request = client()
            .build(&RequestDescriptor::get("orders").query(
                Query::new()
                    .with("orderNo", "A&B 1")
                    .with("sku", json!(["X", "Y"])),
            ))
            .unwrap();
        assert_eq!(
            request.url,
            "http://localhost:3000/api/v3/orders?orderNo=A%26B+1&sku=X%2CY"
        );
    }

    #[test]
    fn slashes_are_normalized_between_endpoint_and_path() {
        let config = test_config().with_endpoint("http://localhost:3000/api/v3/");
        let client = Client::with_transport(config, Recorder::replying(OK_EMPTY));
        let request = client.build(&RequestDescriptor::get("/orders/1")).unwrap();
        assert_eq!(request.url, "http://localhost:3000/api/v3/orders/1");
    }

    #[test]
    fn missing_credentials_fail_before_any_io() {
        let config = Config::default().with_endpoint("http://localhost:3000");
        let client = Client::with_transport(config, Recorder::replying(OK_EMPTY));
        let err = client.send(RequestDescriptor::get("orders")).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(ConfigError::Missing("username"))));
        assert!(client.transport().seen().is_empty());
    }

    #[test]
    fn malformed_endpoint_is_rejected() {
        for endpoint in ["not a url", "mailto:ops@example.test", "ftp://example.test"] {
            let config = test_config().with_endpoint(endpoint);
            let client = Client::with_transport(config, Recorder::replying(OK_EMPTY));
            let err = client.build(&RequestDescriptor::get("orders")).unwrap_err();
            assert!(
                matches!(err, ApiError::InvalidEndpoint { .. }),
                "{endpoint}: {err}"
            );
        }
    }

    #[test]
    fn nested_query_objects_are_rejected() {
        let err = client()
            .build(&RequestDescriptor::get("orders").query(Query::new().with("filter", json!({"a": 1}))))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidQueryParam { .. }));
    }

    #[test]
    fn parse_keeps_failures_as_data() {
        let response = client()
            .parse(HttpResponse::new(404, r#"{"status":404,"errors":[{"message":"Order not found."}]}"#))
            .unwrap();
        assert!(!response.ok());
        assert_eq!(response.error_summary(), Some("Order not found."));
    }

    #[test]
    fn parse_rejects_non_json() {
        let err = client().parse(HttpResponse::new(502, "Bad Gateway")).unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse { status: 502, .. }));
    }

    #[test]
    fn transport_errors_surface_unretried() {
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let transport = |_: &HttpRequest| -> std::result::Result<HttpResponse, TransportError> {
            calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Err(TransportError::Timeout(Duration::from_secs(5)))
        };
        let client = Client::with_transport(test_config(), &transport);
        let err = client.orders().list(Query::new()).unwrap_err();
        assert!(matches!(err, ApiError::Transport(TransportError::Timeout(_))));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn request_matches_send() {
        let client = client();
        let response = client
            .request(HttpMethod::Post, "orders/123/cancel", Value::Null, Query::new())
            .unwrap();
        assert!(response.ok());
        assert_eq!(client.transport().seen(), vec![(HttpMethod::Post, "orders/123/cancel".to_string())]);
    }

    #[traced_test]
    #[test]
    fn logging_records_verb_path_and_status_only() {
        let config = test_config().with_logging(true);
        let client = Client::with_transport(config, Recorder::replying(OK_EMPTY));
        client
            .orders()
            .create(&json!({"shipTo": {"email": "private@example.test"}}))
            .unwrap();
        assert!(logs_contain("shipwire request"));
        assert!(logs_contain("verb=POST"));
        assert!(logs_contain("path=orders"));
        assert!(logs_contain("status=200"));
        assert!(!logs_contain("s3cret"));
        assert!(!logs_contain("YXBpLXVzZXI6czNjcmV0"));
        assert!(!logs_contain("private@example.test"));
    }

    #[traced_test]
    #[test]
    fn logging_is_silent_when_disabled() {
        client().stock().list(Query::new()).unwrap();
        assert!(!logs_contain("shipwire request"));
    }

    #[test]
    fn client_is_shareable_across_threads() {
        fn assert_send_sync<S: Send + Sync>() {}
        assert_send_sync::<Client<Recorder>>();
        #[cfg(feature = "ureq")]
        assert_send_sync::<DefaultClient>();
    }
}
