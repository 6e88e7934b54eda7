use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use models::{Cart, ProductId};
use service::notify::Notification;
use service::UpdateProductAmount;

use crate::state::ServerState;

/// Body of `PUT /api/cart/items/:id`.
#[derive(Debug, Deserialize)]
pub struct AmountInput {
    pub amount: i64,
}

pub async fn get_cart(State(state): State<ServerState>) -> Json<Cart> {
    Json(state.cart.cart())
}

/// Rejections are not HTTP errors; they land in `/api/notifications`.
pub async fn add_item(State(state): State<ServerState>, Path(id): Path<ProductId>) -> Json<Cart> {
    state.cart.add_product(id).await;
    Json(state.cart.cart())
}

pub async fn update_item(
    State(state): State<ServerState>,
    Path(id): Path<ProductId>,
    Json(input): Json<AmountInput>,
) -> Json<Cart> {
    state
        .cart
        .update_product_amount(UpdateProductAmount { product_id: id, amount: input.amount })
        .await;
    Json(state.cart.cart())
}

pub async fn remove_item(State(state): State<ServerState>, Path(id): Path<ProductId>) -> Json<Cart> {
    state.cart.remove_product(id).await;
    Json(state.cart.cart())
}

pub async fn drain_notifications(State(state): State<ServerState>) -> Json<Vec<Notification>> {
    Json(state.notifications.drain())
}
