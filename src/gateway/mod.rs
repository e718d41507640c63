//! Remote gateway: the only component that performs network I/O.
//!
//! # Modules
//!
//! - [`api`]: The [`CatalogApi`] contract consumed by views and the reconciler
//! - [`client`]: [`RemoteGateway`], the reqwest-backed implementation

pub mod api;
pub mod client;

pub use api::CatalogApi;
pub use client::{parse_base_url, RemoteGateway};
