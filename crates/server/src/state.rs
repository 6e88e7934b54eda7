use std::sync::Arc;

use service::inventory::HttpInventory;
use service::notify::NotificationLog;
use service::CartStore;

/// The one cart this process serves.
pub type SessionCart = CartStore<HttpInventory, NotificationLog>;

#[derive(Clone)]
pub struct ServerState {
    pub cart: Arc<SessionCart>,
    pub notifications: Arc<NotificationLog>,
}
