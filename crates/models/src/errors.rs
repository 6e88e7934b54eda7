use thiserror::Error;

use crate::product::ProductId;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("product {0} is already in the cart")]
    Duplicate(ProductId),
    #[error("product {0} is not in the cart")]
    Missing(ProductId),
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}
