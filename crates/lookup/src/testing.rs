//! In-process fakes for the Admin API seams, used by unit tests.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use draft_lookup_core::ShopDomain;
use graphql_client::QueryBody;
use serde_json::Value;

use crate::shopify::{AdminApi, AdminApiError, AdminClientResolver};

type Reply = Box<dyn Fn() -> Result<Value, AdminApiError> + Send + Sync>;

/// Admin API client that returns a canned reply and records request bodies.
pub struct FakeAdmin {
    reply: Reply,
    requests: Mutex<Vec<Value>>,
}

impl FakeAdmin {
    pub fn replying(body: Value) -> Arc<Self> {
        Arc::new(Self {
            reply: Box::new(move || Ok(body.clone())),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: impl Fn() -> AdminApiError + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            reply: Box::new(move || Err(err())),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Serialized request bodies received so far.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AdminApi for FakeAdmin {
    async fn graphql(&self, body: QueryBody<Value>) -> Result<Value, AdminApiError> {
        self.requests
            .lock()
            .unwrap()
            .push(serde_json::to_value(&body)?);
        (self.reply)()
    }
}

/// Resolver that knows exactly one shop.
pub struct FakeResolver {
    shop: ShopDomain,
    admin: Arc<FakeAdmin>,
    ready: bool,
}

impl FakeResolver {
    pub fn new(shop: &str, admin: Arc<FakeAdmin>) -> Self {
        Self {
            shop: ShopDomain::parse(shop).unwrap(),
            admin,
            ready: true,
        }
    }

    pub fn unready(mut self) -> Self {
        self.ready = false;
        self
    }
}

#[async_trait]
impl AdminClientResolver for FakeResolver {
    async fn resolve(&self, shop: &ShopDomain) -> Result<Arc<dyn AdminApi>, AdminApiError> {
        if *shop != self.shop {
            return Err(AdminApiError::SessionNotFound(shop.to_string()));
        }
        let admin: Arc<dyn AdminApi> = self.admin.clone();
        Ok(admin)
    }

    async fn check_ready(&self) -> Result<(), AdminApiError> {
        if self.ready {
            Ok(())
        } else {
            Err(AdminApiError::Unauthorized("store unreachable".to_string()))
        }
    }
}
