pub mod api;
pub mod borrow_gate;
pub mod catalog_merge;
pub mod error;
pub mod featured;
pub mod projection;
pub mod remote_catalog;
pub mod routes;
pub mod session;
pub mod static_catalog;
pub mod suggestions;

#[cfg(any(feature = "client", test))]
pub mod client;
