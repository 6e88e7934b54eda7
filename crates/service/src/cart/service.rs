use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, instrument, warn};

use models::errors::ModelError;
use models::{Cart, ProductId};

use crate::cart::errors::CartError;
use crate::inventory::InventoryService;
use crate::notify::{Notification, NotificationKind, Notifier};
use crate::observability::{record_operation, record_storage_write};
use crate::storage::PersistenceSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOp {
    Add,
    Remove,
    Update,
}

impl CartOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CartOp::Add => "add",
            CartOp::Remove => "remove",
            CartOp::Update => "update",
        }
    }

    pub fn failure_kind(self) -> NotificationKind {
        match self {
            CartOp::Add => NotificationKind::AddFailed,
            CartOp::Remove => NotificationKind::RemoveFailed,
            CartOp::Update => NotificationKind::UpdateFailed,
        }
    }
}

/// Absolute quantity requested for a product already in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// The session cart.
///
/// Build one per session and share it behind `Arc`; it is the whole handle
/// consumers need: [`cart`](Self::cart) to read, [`subscribe`](Self::subscribe)
/// for changes, and the three mutators. Mutators never fail from the caller's
/// point of view. A rejection is reported through the [`Notifier`] and leaves
/// the cart untouched.
///
/// Each mutator snapshots the cart before awaiting the inventory and commits a
/// whole new cart afterwards, so overlapping calls are last-write-wins.
pub struct CartStore<I: InventoryService, N: Notifier> {
    inventory: Arc<I>,
    notifier: Arc<N>,
    slot: PersistenceSlot,
    state: watch::Sender<Cart>,
    /// Last value written to the slot; `None` until the slot holds a valid cart.
    persisted: Mutex<Option<Cart>>,
}

impl<I: InventoryService, N: Notifier> CartStore<I, N> {
    /// Restore the cart from the slot. A missing, unreadable or corrupt
    /// snapshot yields an empty cart.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::CartStore;
    /// use service::inventory::repository::mock::MockInventory;
    /// use service::notify::NotificationLog;
    /// use service::storage::{MemoryStorage, PersistenceSlot};
    ///
    /// let inventory = Arc::new(MockInventory::default().with_product(1, 5));
    /// let notifications = Arc::new(NotificationLog::default());
    /// let slot = PersistenceSlot::new(Arc::new(MemoryStorage::new()), "@RocketShoes:cart");
    /// let store = tokio_test::block_on(CartStore::open(inventory, notifications.clone(), slot));
    ///
    /// tokio_test::block_on(store.add_product(1));
    /// assert_eq!(store.cart().amount_of(1), 1);
    /// assert!(notifications.is_empty());
    /// ```
    pub async fn open(inventory: Arc<I>, notifier: Arc<N>, slot: PersistenceSlot) -> Self {
        let (cart, persisted) = match slot.load().await {
            Ok(Some(raw)) => match Cart::from_snapshot(&raw) {
                Ok(cart) => {
                    info!(key = slot.key(), items = cart.len(), "cart restored");
                    (cart.clone(), Some(cart))
                }
                Err(e) => {
                    warn!(key = slot.key(), error = %e, "persisted cart is corrupt; starting empty");
                    (Cart::new(), None)
                }
            },
            Ok(None) => (Cart::new(), None),
            Err(e) => {
                warn!(key = slot.key(), error = %e, "cannot read persisted cart; starting empty");
                (Cart::new(), None)
            }
        };
        let (state, _) = watch::channel(cart);
        Self { inventory, notifier, slot, state, persisted: Mutex::new(persisted) }
    }

    /// Current cart contents.
    pub fn cart(&self) -> Cart {
        self.state.borrow().clone()
    }

    /// Receiver that observes every cart change.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    /// Add one unit of a product, inserting it with amount 1 if absent.
    #[instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) {
        let outcome = self.try_add_product(product_id).await;
        self.settle(CartOp::Add, product_id, outcome).await;
    }

    /// Drop a product from the cart entirely.
    #[instrument(skip(self))]
    pub async fn remove_product(&self, product_id: ProductId) {
        let mut next = self.cart();
        let outcome = next.remove(product_id).map(|_| next).map_err(CartError::from);
        self.settle(CartOp::Remove, product_id, outcome).await;
    }

    /// Set the absolute amount of a product already in the cart. Amounts of
    /// zero or less are ignored.
    #[instrument(skip(self, request), fields(product_id = request.product_id, amount = request.amount))]
    pub async fn update_product_amount(&self, request: UpdateProductAmount) {
        if request.amount <= 0 {
            debug!("non-positive amount ignored");
            record_operation(CartOp::Update.as_str(), "ignored");
            return;
        }
        let outcome = self.try_update_product_amount(request).await;
        self.settle(CartOp::Update, request.product_id, outcome).await;
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let mut next = self.cart();
        let desired = u64::from(next.amount_of(product_id)) + 1;

        let stock = self.inventory.stock(product_id).await?;
        if !stock.covers(desired) {
            return Err(CartError::StockExceeded { product_id, requested: desired, available: stock.amount });
        }

        if next.get(product_id).is_some() {
            next.set_amount(product_id, to_amount(desired)?)?;
        } else {
            let product = self.inventory.product(product_id).await?;
            next.insert(product.with_amount(1))?;
        }
        Ok(next)
    }

    async fn try_update_product_amount(&self, request: UpdateProductAmount) -> Result<Cart, CartError> {
        let UpdateProductAmount { product_id, amount } = request;
        let mut next = self.cart();
        let requested = u64::try_from(amount).unwrap_or_default();

        let stock = self.inventory.stock(product_id).await?;
        if !stock.covers(requested) {
            return Err(CartError::StockExceeded { product_id, requested, available: stock.amount });
        }

        next.set_amount(product_id, to_amount(requested)?)?;
        Ok(next)
    }

    async fn settle(&self, op: CartOp, product_id: ProductId, outcome: Result<Cart, CartError>) {
        match outcome {
            Ok(next) => self.commit(op, next).await,
            Err(e) => {
                warn!(op = op.as_str(), product_id, code = e.code(), error = %e, "cart operation rejected");
                record_operation(op.as_str(), "rejected");
                self.notifier.notify(Notification::new(e.notification_kind(op), product_id));
            }
        }
    }

    /// Publish `next` and mirror it to the slot when it differs from what was
    /// last persisted. The persisted lock is held across both steps so the
    /// slot always ends up matching the last published cart.
    async fn commit(&self, op: CartOp, next: Cart) {
        let mut persisted = self.persisted.lock().await;
        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next.clone();
            true
        });
        record_operation(op.as_str(), if changed { "applied" } else { "unchanged" });
        if changed {
            info!(op = op.as_str(), items = next.len(), "cart updated");
        }
        if persisted.as_ref() == Some(&next) {
            return;
        }
        let written = match next.to_snapshot() {
            Ok(raw) => self.slot.store(raw).await,
            Err(e) => Err(e.into()),
        };
        match written {
            Ok(()) => {
                record_storage_write(true);
                debug!(key = self.slot.key(), "cart persisted");
                *persisted = Some(next);
            }
            Err(e) => {
                record_storage_write(false);
                error!(key = self.slot.key(), error = %e, "failed to persist cart");
            }
        }
    }
}

fn to_amount(requested: u64) -> Result<u32, CartError> {
    u32::try_from(requested)
        .map_err(|_| ModelError::Validation(format!("amount {requested} out of range")).into())
}
