//! `stock` facade.

use super::Route;
use crate::client::Client;
use crate::error::Result;
use crate::http::Transport;
use crate::request::Query;
use crate::response::Response;

pub const LIST: Route = Route::get("stock");

pub struct Stock<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> Stock<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    /// Inventory levels; filter with e.g. `sku`, `warehouseId`.
    pub fn list(&self, query: Query) -> Result<Response> {
        self.client.send(LIST.request().query(query))
    }
}
