//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod app_state;
pub mod meal;
pub mod message;
pub mod notification;
pub mod order;
pub mod payment_method;
pub mod review;
pub mod user;
pub mod wallet_transaction;

// Re-export specific types to avoid conflicts
pub use app_state::{Column as AppStateColumn, Entity as AppState, Model as AppStateModel};
pub use meal::{Column as MealColumn, Entity as Meal, Model as MealModel};
pub use message::{Column as MessageColumn, Entity as Message, Model as MessageModel};
pub use notification::{
    Column as NotificationColumn, Entity as Notification, Model as NotificationModel,
};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel};
pub use payment_method::{
    Column as PaymentMethodColumn, Entity as PaymentMethod, Model as PaymentMethodModel,
};
pub use review::{Column as ReviewColumn, Entity as Review, Model as ReviewModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
pub use wallet_transaction::{
    Column as WalletTransactionColumn, Entity as WalletTransaction,
    Model as WalletTransactionModel,
};
