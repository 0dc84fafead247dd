//! Minimal client for the Pachca messages endpoint.

pub(crate) mod client;
pub(crate) mod models;
pub(crate) mod ops;

pub use client::PachcaClient;
pub use models::Delivery;
