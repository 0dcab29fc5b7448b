//! Request bodies for the commerce API.
//!
//! Field names follow the API's camelCase JSON. `variant` serializes as
//! an explicit `null` for variant-less products, matching what the API
//! expects.

use fixhub_core::ProductId;
use serde::Serialize;

/// Body of `POST /api/cart`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemBody {
    pub product_id: ProductId,
    pub quantity: u32,
    pub variant: Option<String>,
}

/// Body of `DELETE /api/cart/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveCartItemBody {
    pub variant: Option<String>,
}

/// Body of `PUT /api/cart/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityBody {
    pub quantity: u32,
    pub variant: Option<String>,
}

/// Body of `POST /api/wishlist`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWishlistItemBody {
    pub product_id: ProductId,
}
