//! Resource facades.
//!
//! # Design
//! Every facade is a table of routes plus thin methods that pick a route,
//! fill in the identifier and decide whether extra arguments travel as the
//! JSON body or as the query string. No facade looks at payloads; the remote
//! API owns every business rule.
//!
//! Collection routes (`Route`) and member routes (`MemberRoute`) are separate
//! types, so a member path can only be produced with an identifier.

pub mod orders;
pub mod products;
pub mod receivings;
pub mod returns;
pub mod stock;

use std::fmt::{self, Display};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;

use crate::error::{ApiError, Result};
use crate::http::HttpMethod;
use crate::request::RequestDescriptor;

pub use orders::Orders;
pub use products::{Classification, Products};
pub use receivings::Receivings;
pub use returns::Returns;
pub use stock::Stock;

/// Bytes escaped when an id becomes one path segment: the URL path set plus
/// `/` and `%`, so an id can never add segments, a query or a fragment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Identifier of one record: a numeric id or an `E<externalId>` string.
///
/// JSON strings convert without their quotes, so ids taken from
/// `Response::ids()` can be passed straight back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id escaped as a single path segment.
    fn segment(&self) -> Result<String> {
        let reason = match self.0.as_str() {
            "" => "ids cannot be empty",
            "." | ".." => "dot segments would change the path",
            _ => return Ok(utf8_percent_encode(&self.0, SEGMENT).to_string()),
        };
        Err(ApiError::InvalidId {
            id: self.0.clone(),
            reason,
        })
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&String> for ResourceId {
    fn from(id: &String) -> Self {
        Self(id.clone())
    }
}

impl From<&ResourceId> for ResourceId {
    fn from(id: &ResourceId) -> Self {
        id.clone()
    }
}

macro_rules! numeric_ids {
    ($($ty:ty),*) => {
        $(impl From<$ty> for ResourceId {
            fn from(id: $ty) -> Self {
                Self(id.to_string())
            }
        })*
    };
}

numeric_ids!(u32, u64, i32, i64, usize);

impl From<&Value> for ResourceId {
    fn from(id: &Value) -> Self {
        match id {
            Value::String(s) => Self(s.clone()),
            Value::Null => Self(String::new()),
            other => Self(other.to_string()),
        }
    }
}

impl From<Value> for ResourceId {
    fn from(id: Value) -> Self {
        match id {
            Value::String(s) => Self(s),
            other => Self::from(&other),
        }
    }
}

/// A collection route such as `orders` or `products/retire`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub verb: HttpMethod,
    pub path: &'static str,
}

impl Route {
    pub const fn get(path: &'static str) -> Self {
        Self {
            verb: HttpMethod::Get,
            path,
        }
    }

    pub const fn post(path: &'static str) -> Self {
        Self {
            verb: HttpMethod::Post,
            path,
        }
    }

    pub fn request(&self) -> RequestDescriptor {
        RequestDescriptor::new(self.verb, self.path)
    }
}

/// A route on one record: `{collection}/{id}` plus an optional action such
/// as `holds/clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberRoute {
    pub verb: HttpMethod,
    pub collection: &'static str,
    pub action: Option<&'static str>,
}

impl MemberRoute {
    const fn new(verb: HttpMethod, collection: &'static str) -> Self {
        Self {
            verb,
            collection,
            action: None,
        }
    }

    pub const fn get(collection: &'static str) -> Self {
        Self::new(HttpMethod::Get, collection)
    }

    pub const fn post(collection: &'static str) -> Self {
        Self::new(HttpMethod::Post, collection)
    }

    pub const fn put(collection: &'static str) -> Self {
        Self::new(HttpMethod::Put, collection)
    }

    pub const fn action(self, action: &'static str) -> Self {
        Self {
            action: Some(action),
            ..self
        }
    }

    /// Descriptor for this route on `id`, escaped as one path segment.
    pub fn with_id(&self, id: impl Into<ResourceId>) -> Result<RequestDescriptor> {
        let segment = id.into().segment()?;
        let path = match self.action {
            Some(action) => format!("{}/{segment}/{action}", self.collection),
            None => format!("{}/{segment}", self.collection),
        };
        Ok(RequestDescriptor::new(self.verb, path))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn id_is_interpolated() {
        let descriptor = MemberRoute::post("orders")
            .action("holds/clear")
            .with_id(123)
            .unwrap();
        assert_eq!(descriptor.verb, HttpMethod::Post);
        assert_eq!(descriptor.path, "orders/123/holds/clear");
    }

    #[test]
    fn external_ids_pass_through() {
        let descriptor = MemberRoute::get("orders").with_id("E-ORDER-1").unwrap();
        assert_eq!(descriptor.path, "orders/E-ORDER-1");
    }

    #[test]
    fn reserved_characters_stay_inside_the_segment() {
        let find = MemberRoute::get("orders");
        assert_eq!(find.with_id("E-A#1").unwrap().path, "orders/E-A%231");
        assert_eq!(find.with_id("E-A?x=1").unwrap().path, "orders/E-A%3Fx=1");
        assert_eq!(find.with_id("E 50%").unwrap().path, "orders/E%2050%25");
        assert_eq!(
            MemberRoute::post("orders")
                .action("cancel")
                .with_id("../../admin")
                .unwrap()
                .path,
            "orders/..%2F..%2Fadmin/cancel"
        );
    }

    #[test]
    fn dot_and_empty_ids_are_rejected() {
        for id in ["", ".", ".."] {
            let err = MemberRoute::get("orders").with_id(id).unwrap_err();
            assert!(matches!(err, ApiError::InvalidId { .. }), "{id:?}");
        }
        assert!(MemberRoute::get("orders").with_id(&Value::Null).is_err());
    }

    #[test]
    fn json_ids_drop_their_quotes() {
        let find = MemberRoute::get("orders");
        assert_eq!(find.with_id(json!("E-7")).unwrap().path, "orders/E-7");
        assert_eq!(find.with_id(&json!(1000)).unwrap().path, "orders/1000");
        assert_eq!(ResourceId::from(&json!("E-7")).to_string(), "E-7");
    }

    #[test]
    fn collection_routes_take_no_id() {
        let route = Route::get("stock");
        assert_eq!(route.request().path, "stock");
        assert_eq!(route.request().verb, HttpMethod::Get);
    }
}
