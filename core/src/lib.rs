//! Client-side domain core for a small retail operation.
//!
//! # Overview
//! Four components, each owning one collection:
//! - `ClientRegistry`: session-local client CRUD.
//! - `ProductCatalog`: a cache of the remote product API, mutated only
//!   through server round-trips.
//! - `InvoiceBuilder`: a cart of product snapshots that commits into
//!   session-local invoices.
//! - `MovementLedger`: read-only purchase history.
//!
//! # Design
//! - The core never touches the network. `ProductApi` builds `HttpRequest`
//!   values and parses `HttpResponse` values; the host executes them
//!   (host-does-IO), either by hand through `ProductCatalog::begin_*` /
//!   `complete` or by lending the catalog a `Transport`.
//! - State lives in owned component values created by the caller; there are
//!   no globals.
//! - Product DTOs are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod api;
pub mod catalog;
pub mod clients;
pub mod config;
pub mod confirm;
pub mod error;
pub mod http;
pub mod invoice;
pub mod movements;
pub mod types;

pub use api::ProductApi;
pub use catalog::{Completion, PendingRequest, ProductCatalog, Ticket};
pub use clients::ClientRegistry;
pub use config::{CatalogConfig, UpdatePolicy};
pub use confirm::RemovalConfirmation;
pub use error::{ApiError, RetailError, RetailResult};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use invoice::{
    compute_total, sample_products, InvoiceBuilder, InvoiceIdSource, ProductLookup, RandomInvoiceIds,
    SequentialInvoiceIds,
};
pub use movements::MovementLedger;
pub use types::{
    Client, ClientDraft, ClientId, Invoice, InvoiceId, InvoiceLineItem, Movement, NewProduct, Product,
    ProductDraft, ProductId,
};
