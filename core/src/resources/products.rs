//! `products` facade and its classification variants.
//!
//! The API stores base products, marketing inserts, kits and virtual kits
//! under the same `products` collection. The variants share one route table;
//! the only thing a variant adds is a default `classification` filter on
//! `list`. Payloads always go out unmodified.

use std::fmt::{self, Display};

use serde::Serialize;
use serde_json::Value;

use super::{MemberRoute, ResourceId, Route};
use crate::client::Client;
use crate::error::Result;
use crate::http::Transport;
use crate::request::Query;
use crate::response::Response;

pub const LIST: Route = Route::get("products");
pub const CREATE: Route = Route::post("products");
pub const FIND: MemberRoute = MemberRoute::get("products");
pub const UPDATE: MemberRoute = MemberRoute::put("products");
pub const RETIRE: Route = Route::post("products/retire");

/// Product kinds as the API names them in `classification`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Base,
    Insert,
    Kit,
    VirtualKit,
}

impl Classification {
    pub const ALL: [Classification; 4] = [
        Classification::Base,
        Classification::Insert,
        Classification::Kit,
        Classification::VirtualKit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Base => "baseProduct",
            Classification::Insert => "marketingInsert",
            Classification::Kit => "kit",
            Classification::VirtualKit => "virtualKit",
        }
    }
}

impl Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize)]
struct RetireBody {
    ids: Vec<Value>,
}

pub struct Products<'a, T> {
    client: &'a Client<T>,
    classification: Option<Classification>,
}

impl<'a, T: Transport> Products<'a, T> {
    pub(crate) fn new(client: &'a Client<T>, classification: Option<Classification>) -> Self {
        Self {
            client,
            classification,
        }
    }

    /// `None` for the generic facade.
    pub fn classification(&self) -> Option<Classification> {
        self.classification
    }

    /// Lists products; a variant facade filters by its classification unless
    /// `query` already names one.
    pub fn list(&self, mut query: Query) -> Result<Response> {
        if let Some(classification) = self.classification {
            if !query.contains_key("classification") {
                query.insert("classification", classification.as_str());
            }
        }
        self.client.send(LIST.request().query(query))
    }

    /// Create one product (an object) or several (an array).
    pub fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<Response> {
        self.client.send(CREATE.request().json(body)?)
    }

    pub fn find(&self, id: impl Into<ResourceId>, query: Query) -> Result<Response> {
        self.client.send(FIND.with_id(id)?.query(query))
    }

    pub fn update<B: Serialize + ?Sized>(&self, id: impl Into<ResourceId>, body: &B) -> Result<Response> {
        self.client.send(UPDATE.with_id(id)?.json(body)?)
    }

    /// Retire one or more products. Unknown ids are ignored by the API.
    pub fn retire<I, Id>(&self, ids: I) -> Result<Response>
    where
        I: IntoIterator<Item = Id>,
        Id: Into<Value>,
    {
        let body = RetireBody {
            ids: ids.into_iter().map(Into::into).collect(),
        };
        self.client.send(RETIRE.request().json(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::http::HttpMethod;
    use crate::test_support::{recording_client, OK_EMPTY};

    #[test]
    fn every_product_route_hits_its_path() {
        let client = recording_client(OK_EMPTY);
        let products = client.products();
        products.list(Query::new()).unwrap();
        products.create(&json!({"sku": "A", "classification": "baseProduct"})).unwrap();
        products.find(11, Query::new()).unwrap();
        products.update(11, &json!({"description": "Super awesome description"})).unwrap();
        products.retire([11]).unwrap();

        assert_eq!(
            client.transport().seen(),
            vec![
                (HttpMethod::Get, "products".to_string()),
                (HttpMethod::Post, "products".to_string()),
                (HttpMethod::Get, "products/11".to_string()),
                (HttpMethod::Put, "products/11".to_string()),
                (HttpMethod::Post, "products/retire".to_string()),
            ]
        );
    }

    #[test]
    fn retire_wraps_ids() {
        let client = recording_client(OK_EMPTY);
        client.products().retire([json!(11), json!(0)]).unwrap();
        let request = client.transport().last();
        assert_eq!(request.body.as_deref(), Some(r#"{"ids":[11,0]}"#));

        client.products().retire(["E-SKU-1"]).unwrap();
        assert_eq!(
            client.transport().last().body.as_deref(),
            Some(r#"{"ids":["E-SKU-1"]}"#)
        );
    }

    #[test]
    fn batch_create_passes_the_array_through() {
        let client = recording_client(OK_EMPTY);
        let payload = json!([
            {"sku": "A", "classification": "baseProduct"},
            {"sku": "B", "classification": "kit", "kitContent": [{"externalId": "A", "quantity": 1}]}
        ]);
        client.kits().create(&payload).unwrap();
        let sent: Value = serde_json::from_str(client.transport().last().body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, payload);
    }

    #[test]
    fn variants_filter_list_by_classification() {
        let client = recording_client(OK_EMPTY);
        client.virtual_kits().list(Query::new()).unwrap();
        assert_eq!(
            client.transport().last().url,
            "http://localhost:3000/api/v3/products?classification=virtualKit"
        );

        client
            .inserts()
            .list(Query::new().with("sku", "TEST-PRODUCT"))
            .unwrap();
        assert_eq!(
            client.transport().last().url,
            "http://localhost:3000/api/v3/products?classification=marketingInsert&sku=TEST-PRODUCT"
        );
    }

    #[test]
    fn explicit_classification_wins() {
        let client = recording_client(OK_EMPTY);
        client
            .base_products()
            .list(Query::new().with("classification", "kit"))
            .unwrap();
        assert_eq!(
            client.transport().last().url,
            "http://localhost:3000/api/v3/products?classification=kit"
        );
    }

    #[test]
    fn generic_facade_adds_no_filter() {
        let client = recording_client(OK_EMPTY);
        assert_eq!(client.products().classification(), None);
        client.products().list(Query::new()).unwrap();
        assert_eq!(client.transport().last().url, "http://localhost:3000/api/v3/products");
    }

    #[test]
    fn classification_names_match_the_api() {
        let names: Vec<&str> = Classification::ALL.iter().map(Classification::as_str).collect();
        assert_eq!(names, ["baseProduct", "marketingInsert", "kit", "virtualKit"]);
        let client = recording_client(OK_EMPTY);
        assert_eq!(
            client.product_variant(Classification::Kit).classification(),
            Some(Classification::Kit)
        );
    }
}
