//! `receivings` facade: inbound shipments into a warehouse.

use serde::Serialize;

use super::{MemberRoute, ResourceId, Route};
use crate::client::Client;
use crate::error::Result;
use crate::http::Transport;
use crate::request::Query;
use crate::response::Response;

pub const LIST: Route = Route::get("receivings");
pub const CREATE: Route = Route::post("receivings");
pub const FIND: MemberRoute = MemberRoute::get("receivings");
pub const UPDATE: MemberRoute = MemberRoute::put("receivings");
pub const CANCEL: MemberRoute = MemberRoute::post("receivings").action("cancel");
pub const LABELS_CANCEL: MemberRoute = MemberRoute::post("receivings").action("labels/cancel");
pub const HOLDS: MemberRoute = MemberRoute::get("receivings").action("holds");
pub const INSTRUCTIONS: MemberRoute = MemberRoute::get("receivings").action("instructionsRecipients");
pub const ITEMS: MemberRoute = MemberRoute::get("receivings").action("items");
pub const SHIPMENTS: MemberRoute = MemberRoute::get("receivings").action("shipments");
pub const TRACKINGS: MemberRoute = MemberRoute::get("receivings").action("trackings");

pub struct Receivings<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> Receivings<'a, T> {
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

    /// Cancel the shipping labels issued for the receiving.
    pub fn labels_cancel(&self, id: impl Into<ResourceId>) -> Result<Response> {
        self.client.send(LABELS_CANCEL.with_id(id)?)
    }

    pub fn holds(&self, id: impl Into<ResourceId>, query: Query) -> Result<Response> {
        self.client.send(HOLDS.with_id(id)?.query(query))
    }

    /// Recipients of the receiving instructions.
    pub fn instructions(&self, id: impl Into<ResourceId>) -> Result<Response> {
        self.client.send(INSTRUCTIONS.with_id(id)?)
    }

    pub fn items(&self, id: impl Into<ResourceId>) -> Result<Response> {
        self.client.send(ITEMS.with_id(id)?)
    }

    pub fn shipments(&self, id: impl Into<ResourceId>) -> Result<Response> {
        self.client.send(SHIPMENTS.with_id(id)?)
    }

    pub fn trackings(&self, id: impl Into<ResourceId>) -> Result<Response> {
        self.client.send(TRACKINGS.with_id(id)?)
    }
}
