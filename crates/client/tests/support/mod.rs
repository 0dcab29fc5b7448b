//! Shared fixtures for the integration suites: a mock commerce API that
//! records every request, plus product/line builders.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use axum::Json;
use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use rust_decimal::Decimal;
use serde_json::Value;

use fixhub_client::{CartLine, Product, WishlistEntry};
use fixhub_core::{CurrencyCode, Price, ProductId};

/// One request as the mock server saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Value,
}

/// In-process commerce API double.
///
/// Serves canned cart/wishlist collections on the GET endpoints, answers
/// everything else 204, and records every request. A status override
/// turns the whole API into a failure box.
#[derive(Clone)]
pub struct MockApi {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    status_override: Arc<Mutex<Option<u16>>>,
    cart: Arc<Mutex<Value>>,
    wishlist: Arc<Mutex<Value>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            status_override: Arc::new(Mutex::new(None)),
            cart: Arc::new(Mutex::new(Value::Array(Vec::new()))),
            wishlist: Arc::new(Mutex::new(Value::Array(Vec::new()))),
        }
    }

    /// Bind to an ephemeral port and serve. Returns the base URL.
    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock api");
        let addr = listener.local_addr().expect("mock api addr");

        let router = Router::new().fallback(handle).with_state(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve mock api");
        });

        format!("http://{addr}")
    }

    pub fn set_cart(&self, lines: &[CartLine]) {
        *self.cart.lock().unwrap() = serde_json::to_value(lines).unwrap();
    }

    pub fn set_wishlist(&self, entries: &[WishlistEntry]) {
        *self.wishlist.lock().unwrap() = serde_json::to_value(entries).unwrap();
    }

    /// Make every endpoint answer with `status` from now on.
    pub fn fail_with(&self, status: u16) {
        *self.status_override.lock().unwrap() = Some(status);
    }

    /// Restore normal behavior.
    pub fn succeed(&self) {
        *self.status_override.lock().unwrap() = None;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Recorded requests excluding the hydrate GETs.
    pub fn mutation_requests(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != "GET")
            .collect()
    }
}

async fn handle(State(api): State<MockApi>, req: Request) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_owned();

    let bytes = to_bytes(req.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    api.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        body,
    });

    if let Some(status) = *api.status_override.lock().unwrap() {
        return StatusCode::from_u16(status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response();
    }

    match (method.as_str(), path.as_str()) {
        ("GET", "/api/cart") => Json(api.cart.lock().unwrap().clone()).into_response(),
        ("GET", "/api/wishlist") => Json(api.wishlist.lock().unwrap().clone()).into_response(),
        _ => StatusCode::NO_CONTENT.into_response(),
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn usd(cents: i64) -> Price {
    Price::new(Decimal::new(cents, 2), CurrencyCode::USD)
}

pub fn product(id: &str, variant: Option<&str>, cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        variant: variant.map(ToOwned::to_owned),
        unit_price: usd(cents),
        title: format!("Product {id}"),
        image: None,
    }
}

pub fn cart_line(id: &str, variant: Option<&str>, quantity: u32, cents: i64) -> CartLine {
    CartLine {
        product_id: ProductId::new(id),
        variant: variant.map(ToOwned::to_owned),
        quantity,
        unit_price: usd(cents),
        title: format!("Product {id}"),
        image: None,
    }
}

pub fn wishlist_entry(id: &str, cents: i64) -> WishlistEntry {
    WishlistEntry {
        product_id: ProductId::new(id),
        title: format!("Product {id}"),
        price: usd(cents),
        image: None,
    }
}
