use thiserror::Error;

use models::errors::ModelError;
use models::ProductId;

use crate::cart::service::CartOp;
use crate::errors::ServiceError;
use crate::notify::NotificationKind;

/// Why a cart operation was rejected. Never returned to callers of
/// `CartStore`; each one becomes a notification.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("requested {requested} of product {product_id} but only {available} in stock")]
    StockExceeded { product_id: ProductId, requested: u64, available: u32 },
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),
    #[error(transparent)]
    Collaborator(#[from] ServiceError),
}

impl CartError {
    /// Stable numeric code for logging
    pub fn code(&self) -> u16 {
        match self {
            CartError::StockExceeded { .. } => 2001,
            CartError::NotInCart(_) => 2002,
            CartError::Collaborator(_) => 2100,
        }
    }

    /// Stock rejections share one notification; everything else reports the
    /// generic failure of the operation that hit it.
    pub fn notification_kind(&self, op: CartOp) -> NotificationKind {
        match self {
            CartError::StockExceeded { .. } => NotificationKind::StockExceeded,
            CartError::NotInCart(_) | CartError::Collaborator(_) => op.failure_kind(),
        }
    }
}

impl From<ModelError> for CartError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Missing(id) => CartError::NotInCart(id),
            other => CartError::Collaborator(ServiceError::Model(other)),
        }
    }
}
