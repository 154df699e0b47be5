//! HTTP handlers for the gateway report API

pub mod health;
pub mod reports;
pub mod status;
