//! `returns` facade.

use serde::Serialize;

use super::{MemberRoute, ResourceId, Route};
use crate::client::Client;
use crate::error::Result;
use crate::http::Transport;
use crate::request::Query;
use crate::response::Response;

pub const LIST: Route = Route::get("returns");
pub const CREATE: Route = Route::post("returns");
pub const FIND: MemberRoute = MemberRoute::get("returns");
pub const CANCEL: MemberRoute = MemberRoute::post("returns").action("cancel");
pub const HOLDS: MemberRoute = MemberRoute::get("returns").action("holds");
pub const ITEMS: MemberRoute = MemberRoute::get("returns").action("items");
pub const TRACKINGS: MemberRoute = MemberRoute::get("returns").action("trackings");
pub const LABELS: MemberRoute = MemberRoute::get("returns").action("labels");

pub struct Returns<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> Returns<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    pub fn list(&self, query: Query) -> Result<Response> {
        self.client.send(LIST.request().query(query))
    }

    pub fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<Response> {
        self.client.send(CREATE.request().json(body)?)
    }

    pub fn find(&self, id: impl Into<ResourceId>, query: Query) -> Result<Response> {
        self.client.send(FIND.with_id(id)?.query(query))
    }

    pub fn cancel(&self, id: impl Into<ResourceId>) -> Result<Response> {
        self.client.send(CANCEL.with_id(id)?)
    }

    pub fn holds(&self, id: impl Into<ResourceId>, query: Query) -> Result<Response> {
        self.client.send(HOLDS.with_id(id)?.query(query))
    }

    pub fn items(&self, id: impl Into<ResourceId>) -> Result<Response> {
        self.client.send(ITEMS.with_id(id)?)
    }

    pub fn trackings(&self, id: impl Into<ResourceId>) -> Result<Response> {
        self.client.send(TRACKINGS.with_id(id)?)
    }

    pub fn labels(&self, id: impl Into<ResourceId>) -> Result<Response> {
        self.client.send(LABELS.with_id(id)?)
    }
}
