pub mod error;
pub mod event;
pub mod health;
pub mod openapi;
