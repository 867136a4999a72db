//! `orders` facade.

use serde::Serialize;

use super::{MemberRoute, ResourceId, Route};
use crate::client::Client;
use crate::error::Result;
use crate::http::Transport;
use crate::request::Query;
use crate::response::Response;

pub const LIST: Route = Route::get("orders");
pub const CREATE: Route = Route::post("orders");
pub const FIND: MemberRoute = MemberRoute::get("orders");
pub const UPDATE: MemberRoute = MemberRoute::put("orders");
pub const CANCEL: MemberRoute = MemberRoute::post("orders").action("cancel");
pub const HOLDS: MemberRoute = MemberRoute::get("orders").action("holds");
pub const RELEASE: MemberRoute = MemberRoute::post("orders").action("holds/clear");
pub const ITEMS: MemberRoute = MemberRoute::get("orders").action("items");
pub const PIECES: MemberRoute = MemberRoute::get("orders").action("pieces");
pub const RETURNS: MemberRoute = MemberRoute::get("orders").action("returns");
pub const TRACKINGS: MemberRoute = MemberRoute::get("orders").action("trackings");

pub struct Orders<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> Orders<'a, T> {
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

    pub fn update<B: Serialize + ?Sized>(
        &self,
        id: impl Into<ResourceId>,
        body: &B,
        query: Query,
    ) -> Result<Response> {
        self.client.send(UPDATE.with_id(id)?.json(body)?.query(query))
    }

    pub fn cancel(&self, id: impl Into<ResourceId>) -> Result<Response> {
        self.client.send(CANCEL.with_id(id)?)
    }

    pub fn holds(&self, id: impl Into<ResourceId>, query: Query) -> Result<Response> {
        self.client.send(HOLDS.with_id(id)?.query(query))
    }

    /// Clear every hold on the order.
    pub fn release(&self, id: impl Into<ResourceId>) -> Result<Response> {
        self.client.send(RELEASE.with_id(id)?)
    }

    pub fn items(&self, id: impl Into<ResourceId>) -> Result<Response> {
        self.client.send(ITEMS.with_id(id)?)
    }

    pub fn pieces(&self, id: impl Into<ResourceId>) -> Result<Response> {
        self.client.send(PIECES.with_id(id)?)
    }

    pub fn returns(&self, id: impl Into<ResourceId>) -> Result<Response> {
        self.client.send(RETURNS.with_id(id)?)
    }

    pub fn trackings(&self, id: impl Into<ResourceId>) -> Result<Response> {
        self.client.send(TRACKINGS.with_id(id)?)
    }
}
