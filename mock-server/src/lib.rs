//! In-memory stand-in for the Shipwire API, used by the client's integration
//! tests and runnable on its own (`cargo run -p mock-server`).
//!
//! It speaks the API's envelope (`status`, `message`, `resource`, `errors`,
//! `warnings`), checks Basic auth, and keeps orders, returns, receivings and
//! products in memory. Stock is derived from active products.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

const API_PREFIX: &str = "/api/v3";
const CLASSIFICATIONS: [&str; 4] = ["baseProduct", "marketingInsert", "kit", "virtualKit"];
const FILTERS: [&str; 4] = ["status", "sku", "classification", "externalId"];
const FIRST_ID: u64 = 1000;

/// Credentials the server accepts.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn header_value(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {encoded}")
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("fixture-user", "fixture-pass")
    }
}

/// The resources that live in the store, with the messages the API uses for them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Collection {
    Orders,
    Returns,
    Receivings,
    Products,
}

impl Collection {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "orders" => Some(Self::Orders),
            "returns" => Some(Self::Returns),
            "receivings" => Some(Self::Receivings),
            "products" => Some(Self::Products),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Returns => "returns",
            Self::Receivings => "receivings",
            Self::Products => "products",
        }
    }

    fn not_found(self) -> &'static str {
        match self {
            Self::Orders => "Order not found.",
            Self::Returns => "Return Order not found.",
            Self::Receivings => "Receiving Order not found.",
            Self::Products => "Product not found.",
        }
    }

    fn initial_status(self) -> &'static str {
        match self {
            Self::Products => "active",
            _ => "processed",
        }
    }

    fn subresources(self) -> &'static [&'static str] {
        match self {
            Self::Orders => &["holds", "items", "pieces", "returns", "trackings"],
            Self::Returns => &["holds", "items", "trackings", "labels"],
            Self::Receivings => &["holds", "instructionsRecipients", "items", "shipments", "trackings"],
            Self::Products => &[],
        }
    }
}

#[derive(Default)]
struct Store {
    next_id: u64,
    records: HashMap<Collection, BTreeMap<u64, Value>>,
}

impl Store {
    fn insert(&mut self, collection: Collection, mut record: Map<String, Value>) -> Value {
        let id = FIRST_ID + self.next_id;
        self.next_id += 1;
        record.insert("id".to_string(), json!(id));
        record
            .entry("status")
            .or_insert_with(|| json!(collection.initial_status()));
        let record = Value::Object(record);
        self.records
            .entry(collection)
            .or_default()
            .insert(id, record.clone());
        record
    }

    fn get(&self, collection: Collection, id: &str) -> Option<&Value> {
        let id: u64 = id.parse().ok()?;
        self.records.get(&collection)?.get(&id)
    }

    fn get_mut(&mut self, collection: Collection, id: &str) -> Option<&mut Value> {
        let id: u64 = id.parse().ok()?;
        self.records.get_mut(&collection)?.get_mut(&id)
    }

    fn all(&self, collection: Collection) -> impl Iterator<Item = &Value> {
        self.records.get(&collection).into_iter().flat_map(BTreeMap::values)
    }
}

#[derive(Clone)]
struct AppState {
    credentials: Arc<Credentials>,
    store: Arc<RwLock<Store>>,
}

type Params = HashMap<String, String>;

pub fn app(credentials: Credentials) -> Router {
    let state = AppState {
        credentials: Arc::new(credentials),
        store: Arc::new(RwLock::new(Store::default())),
    };
    let api = Router::new()
        .route("/stock", get(list_stock))
        .route("/products/retire", post(retire_products))
        .route("/{collection}", get(list_records).post(create_records))
        .route("/{collection}/{id}", get(find_record).put(update_record))
        .route("/{collection}/{id}/cancel", post(cancel_record))
        .route("/{collection}/{id}/{sub}", get(list_subresource))
        .route("/{collection}/{id}/{sub}/{action}", post(subresource_action))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_basic_auth))
        .with_state(state);
    Router::new()
        .nest(API_PREFIX, api)
        .route("/broken", get(broken))
}

pub async fn run(listener: TcpListener, credentials: Credentials) -> Result<(), std::io::Error> {
    axum::serve(listener, app(credentials)).await
}

// ---------------------------------------------------------------------------
// Envelope helpers
// ---------------------------------------------------------------------------

fn envelope(status: StatusCode, message: &str, resource: Value) -> Response {
    let body = json!({
        "status": status.as_u16(),
        "message": message,
        "resource": resource,
    });
    (status, Json(body)).into_response()
}

fn not_found(message: &str) -> Response {
    let body = json!({
        "status": 404,
        "message": message,
        "resourceLocation": null,
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

fn item(collection: &str, record: &Value) -> Value {
    json!({
        "resourceLocation": format!("{API_PREFIX}/{collection}/{}", record["id"]),
        "resource": record,
    })
}

fn page(items: Vec<Value>) -> Value {
    json!({
        "offset": 0,
        "total": items.len(),
        "previous": null,
        "next": null,
        "items": items,
    })
}

fn matches_filters(record: &Value, params: &Params) -> bool {
    FILTERS.iter().all(|key| match params.get(*key) {
        None => true,
        Some(wanted) => {
            let actual = match &record[*key] {
                Value::String(s) => s.clone(),
                Value::Null => return false,
                other => other.to_string(),
            };
            wanted.split(',').any(|candidate| candidate == actual)
        }
    })
}

fn collection_or_404(name: &str) -> Result<Collection, Response> {
    Collection::parse(name).ok_or_else(|| not_found("Resource not found."))
}

// ---------------------------------------------------------------------------
// Middleware
// ---------------------------------------------------------------------------

async fn require_basic_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if provided == Some(state.credentials.header_value().as_str()) {
        return next.run(request).await;
    }
    let body = json!({
        "status": 401,
        "message": "Please include a valid Authorization header (Basic)",
        "resourceLocation": null,
    });
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn broken() -> impl IntoResponse {
    (StatusCode::BAD_GATEWAY, "<html><body>Bad Gateway</body></html>")
}

async fn list_records(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Query(params): Query<Params>,
) -> Response {
    let collection = match collection_or_404(&collection) {
        Ok(collection) => collection,
        Err(response) => return response,
    };
    let store = state.store.read().await;
    let items = store
        .all(collection)
        .filter(|record| matches_filters(record, &params))
        .map(|record| item(collection.name(), record))
        .collect();
    envelope(StatusCode::OK, "Successful", page(items))
}

async fn create_records(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let collection = match collection_or_404(&collection) {
        Ok(collection) => collection,
        Err(response) => return response,
    };
    match collection {
        Collection::Products => create_products(&state, body).await,
        Collection::Orders => create_one(&state, collection, body, order_warnings).await,
        _ => create_one(&state, collection, body, |_| Vec::new()).await,
    }
}

/// Addresses with a company are reclassified the way the real API does it.
fn order_warnings(record: &Map<String, Value>) -> Vec<Value> {
    let commercial = record
        .get("shipTo")
        .and_then(|ship_to| ship_to.get("company"))
        .is_some_and(|company| !company.is_null());
    if commercial {
        vec![json!({
            "code": "orderResidentialToCommercial",
            "message": "Order was marked residential; now marked commercial",
            "type": "warning",
        })]
    } else {
        Vec::new()
    }
}

async fn create_one(
    state: &AppState,
    collection: Collection,
    body: Value,
    warnings: fn(&Map<String, Value>) -> Vec<Value>,
) -> Response {
    let Value::Object(record) = body else {
        return bad_request("Request body must be a JSON object.");
    };
    let warnings = warnings(&record);
    let created = state.store.write().await.insert(collection, record);
    let mut entry = item(collection.name(), &created);
    if !warnings.is_empty() {
        entry["warnings"] = Value::Array(warnings);
    }
    envelope(StatusCode::OK, "Successful", json!({ "items": [entry] }))
}

async fn create_products(state: &AppState, body: Value) -> Response {
    let single = body.is_object();
    let payloads = match body {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => return bad_request("Request body must be a JSON object or array."),
    };

    let mut store = state.store.write().await;
    let mut items = Vec::new();
    let mut errors = Vec::new();
    for payload in payloads {
        let classified = payload["classification"]
            .as_str()
            .is_some_and(|c| CLASSIFICATIONS.contains(&c));
        match payload {
            Value::Object(record) if classified => {
                let created = store.insert(Collection::Products, record);
                items.push(item(Collection::Products.name(), &created));
            }
            _ => errors.push(json!({
                "code": "productClassificationNotDetected",
                "message": "Product Classification not detected. Please pass classification for each product.",
                "type": "error",
            })),
        }
    }

    if errors.is_empty() {
        return envelope(StatusCode::OK, "Successful", json!({ "items": items }));
    }
    let status = if single { StatusCode::BAD_REQUEST } else { StatusCode::OK };
    let body = json!({
        "status": status.as_u16(),
        "message": "Some products could not be created.",
        "errors": errors,
        "resource": { "items": items },
    });
    (status, Json(body)).into_response()
}

fn bad_request(message: &str) -> Response {
    let body = json!({
        "status": 400,
        "message": message,
        "errors": [{ "message": message, "type": "error" }],
    });
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

async fn find_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Response {
    let collection = match collection_or_404(&collection) {
        Ok(collection) => collection,
        Err(response) => return response,
    };
    let store = state.store.read().await;
    match store.get(collection, &id) {
        Some(record) => envelope(StatusCode::OK, "Successful", record.clone()),
        None => not_found(collection.not_found()),
    }
}

async fn update_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let collection = match collection_or_404(&collection) {
        Ok(collection) => collection,
        Err(response) => return response,
    };
    let Value::Object(changes) = body else {
        return bad_request("Request body must be a JSON object.");
    };
    let mut store = state.store.write().await;
    let Some(Value::Object(record)) = store.get_mut(collection, &id) else {
        if collection == Collection::Receivings {
            return bad_request("Order ID not detected. Please make a POST if you wish to create an order.");
        }
        return not_found(collection.not_found());
    };
    for (key, value) in changes {
        if key != "id" {
            record.insert(key, value);
        }
    }
    let updated = Value::Object(record.clone());
    envelope(StatusCode::OK, "Successful", json!({ "items": [item(collection.name(), &updated)] }))
}

async fn cancel_record(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Response {
    let collection = match collection_or_404(&collection) {
        Ok(collection) if collection != Collection::Products => collection,
        Ok(_) => return not_found("Resource not found."),
        Err(response) => return response,
    };
    let mut store = state.store.write().await;
    match store.get_mut(collection, &id) {
        Some(record) => {
            record["status"] = json!("canceled");
            envelope(StatusCode::OK, "Cancellation requested", Value::Null)
        }
        None if collection == Collection::Receivings => not_found("Receiving not found"),
        None => not_found(collection.not_found()),
    }
}

async fn list_subresource(
    State(state): State<AppState>,
    Path((collection, id, sub)): Path<(String, String, String)>,
) -> Response {
    let collection = match collection_or_404(&collection) {
        Ok(collection) => collection,
        Err(response) => return response,
    };
    if !collection.subresources().contains(&sub.as_str()) {
        return not_found("Resource not found.");
    }
    let store = state.store.read().await;
    let Some(record) = store.get(collection, &id) else {
        return not_found(collection.not_found());
    };
    let items = match sub.as_str() {
        "items" => record["items"]
            .as_array()
            .map(|lines| {
                lines
                    .iter()
                    .map(|line| json!({ "resource": line }))
                    .collect()
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    };
    envelope(StatusCode::OK, "Successful", page(items))
}

async fn subresource_action(
    State(state): State<AppState>,
    Path((collection, id, sub, action)): Path<(String, String, String, String)>,
) -> Response {
    let collection = match collection_or_404(&collection) {
        Ok(collection) => collection,
        Err(response) => return response,
    };
    let store = state.store.read().await;
    match (collection, sub.as_str(), action.as_str()) {
        (Collection::Orders, "holds", "clear") => match store.get(collection, &id) {
            Some(_) => envelope(StatusCode::OK, "Holds cleared", Value::Null),
            None => not_found(collection.not_found()),
        },
        // The API acknowledges label cancellation even for unknown receivings.
        (Collection::Receivings, "labels", "cancel") => {
            envelope(StatusCode::OK, "Labels cancelled", Value::Null)
        }
        _ => not_found("Resource not found."),
    }
}

#[derive(Deserialize)]
struct RetireRequest {
    ids: Vec<Value>,
}

async fn retire_products(
    State(state): State<AppState>,
    Json(input): Json<RetireRequest>,
) -> Response {
    let mut store = state.store.write().await;
    let mut items = Vec::new();
    for id in input.ids {
        let key = match &id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if let Some(record) = store.get_mut(Collection::Products, &key) {
            record["status"] = json!("retired");
            items.push(json!({ "resource": { "id": id, "status": "retired" } }));
        } else {
            items.push(json!({ "resource": { "id": id, "status": "notFound" } }));
        }
    }
    envelope(StatusCode::OK, "Products retired", json!({ "items": items }))
}

async fn list_stock(State(state): State<AppState>, Query(params): Query<Params>) -> Response {
    let store = state.store.read().await;
    let items = store
        .all(Collection::Products)
        .filter(|product| product["status"] == "active")
        .filter(|product| matches_filters(product, &params))
        .map(|product| {
            json!({
                "resource": {
                    "productId": product["id"],
                    "sku": product["sku"],
                    "warehouseRegion": "TOR",
                    "pending": 0,
                    "good": 0,
                    "reserved": 0,
                    "backordered": 0,
                }
            })
        })
        .collect();
    envelope(StatusCode::OK, "Successful", page(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn store_assigns_increasing_ids_and_default_status() {
        let mut store = Store::default();
        let first = store.insert(Collection::Orders, record(json!({"orderNo": "A"})));
        let second = store.insert(Collection::Products, record(json!({"sku": "B"})));
        assert_eq!(first["id"], 1000);
        assert_eq!(first["status"], "processed");
        assert_eq!(second["id"], 1001);
        assert_eq!(second["status"], "active");
        assert!(store.get(Collection::Orders, "1000").is_some());
        assert!(store.get(Collection::Orders, "1001").is_none());
        assert!(store.get(Collection::Orders, "E-A").is_none());
    }

    #[test]
    fn filters_match_comma_lists() {
        let product = json!({"sku": "TEST-PRODUCT", "classification": "kit"});
        let params: Params = [("sku".to_string(), "OTHER,TEST-PRODUCT".to_string())].into();
        assert!(matches_filters(&product, &params));
        let params: Params = [("classification".to_string(), "virtualKit".to_string())].into();
        assert!(!matches_filters(&product, &params));
        let params: Params = [("status".to_string(), "active".to_string())].into();
        assert!(!matches_filters(&product, &params));
        let params: Params = [("offset".to_string(), "20".to_string())].into();
        assert!(matches_filters(&product, &params));
    }

    #[test]
    fn company_addresses_warn() {
        let order = record(json!({"shipTo": {"company": "Acme"}}));
        assert_eq!(order_warnings(&order).len(), 1);
        let order = record(json!({"shipTo": {"name": "Jane"}}));
        assert!(order_warnings(&order).is_empty());
    }

    #[test]
    fn credentials_render_basic_header() {
        assert_eq!(
            Credentials::default().header_value(),
            "Basic Zml4dHVyZS11c2VyOmZpeHR1cmUtcGFzcw=="
        );
    }

    #[test]
    fn collections_round_trip_names() {
        for name in ["orders", "returns", "receivings", "products"] {
            assert_eq!(Collection::parse(name).unwrap().name(), name);
        }
        assert!(Collection::parse("stock").is_none());
    }
}
