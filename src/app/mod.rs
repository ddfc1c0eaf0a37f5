pub mod messages;
pub mod notifier;
pub mod shop;

pub use notifier::{Notification, NotificationChannel};
pub use shop::{Outcome, Shop, ShopSnapshot};
