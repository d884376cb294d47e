pub mod auth;
pub mod dashboard;
pub mod events;
pub mod inventory;
pub mod products;
pub mod reports;
pub mod transactions;
pub mod users;
