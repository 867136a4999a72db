//! Default `Transport` backed by ureq.

use tracing::debug;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

/// Largest response body read before the call fails. Full `products` and
/// `stock` listings run well past ureq's 10 MB default.
pub const MAX_BODY_BYTES: u64 = 256 * 1024 * 1024;

/// Blocking transport over `ureq`.
///
/// An agent is built per request so the request's own timeout governs the
/// whole round-trip. Status codes are never turned into errors: 4xx/5xx
/// responses come back as data for the envelope to interpret.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl UreqTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for UreqTransport {
    fn perform(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(request.timeout))
            .build()
            .new_agent();

        let url = request.url.as_str();
        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(agent.get(url), &request.headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(agent.post(url), &request.headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(agent.post(url), &request.headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(agent.put(url), &request.headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(agent.put(url), &request.headers).send_empty(),
        };

        let mut response = result.map_err(|e| classify(e, request))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_vec()
            .map_err(|e| classify(e, request))?;

        debug!(status, bytes = body.len(), "ureq round-trip complete");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn classify(error: ureq::Error, request: &HttpRequest) -> TransportError {
    match error {
        ureq::Error::Timeout(_) => TransportError::Timeout(request.timeout),
        other => TransportError::failed(other),
    }
}
