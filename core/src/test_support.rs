//! Recording transport shared by the unit tests.

use std::sync::Mutex;
use std::time::Duration;

use crate::client::Client;
use crate::config::Config;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

pub const ENDPOINT: &str = "http://localhost:3000/api/v3";
pub const OK_EMPTY: &str = r#"{"status":200,"message":"Successful","resource":{}}"#;

pub fn test_config() -> Config {
    Config::new("api-user", "s3cret")
        .with_endpoint(ENDPOINT)
        .with_timeout(Duration::from_secs(5))
}

pub fn recording_client(reply: &str) -> Client<Recorder> {
    Client::with_transport(test_config(), Recorder::replying(reply))
}

/// Answers every request with the same body and remembers what it was sent.
pub struct Recorder {
    reply: String,
    requests: Mutex<Vec<HttpRequest>>,
}

impl Recorder {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }

    /// Verb and endpoint-relative path (query stripped) of every request.
    pub fn seen(&self) -> Vec<(HttpMethod, String)> {
        self.requests()
            .into_iter()
            .map(|request| {
                let path = request
                    .url
                    .strip_prefix(ENDPOINT)
                    .unwrap_or(&request.url)
                    .trim_start_matches('/');
                let path = path.split('?').next().unwrap_or_default().to_string();
                (request.method, path)
            })
            .collect()
    }
}

impl Transport for Recorder {
    fn perform(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(HttpResponse::new(200, self.reply.clone()))
    }
}
