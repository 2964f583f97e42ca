//! Entity shapes shared by the domain components.
//!
//! # Design
//! `Product` and `NewProduct` are the wire DTOs of the product API. They
//! mirror the mock-server's schema but are defined independently; the
//! integration tests catch drift. Field names are Rust-side English with
//! serde renames to the server's Spanish keys, and prices travel as JSON
//! numbers.
//!
//! Drafts carry raw form input. Each draft owns its own validation so the
//! components can reject bad input before touching any state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{RetailError, RetailResult};
use crate::invoice::compute_total;

pub type ClientId = u64;
pub type ProductId = i64;
pub type InvoiceId = u32;

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

/// A registered client. Lives only for the current session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub address: String,
    pub phone: String,
}

/// Form input for adding or editing a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientDraft {
    pub name: String,
    pub address: String,
    pub phone: String,
}

impl ClientDraft {
    pub fn new(name: impl Into<String>, address: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            phone: phone.into(),
        }
    }

    pub(crate) fn validate(&self) -> RetailResult<()> {
        if self.name.trim().is_empty() {
            return Err(RetailError::validation("client name is required"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// A product as stored by the remote API. The id is server-assigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    #[serde(rename = "id_producto")]
    pub id: ProductId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio_unitario", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub stock: u32,
}

impl Product {
    /// Edits must keep a name and a strictly positive price.
    pub fn validate_edit(&self) -> RetailResult<()> {
        if self.name.trim().is_empty() || self.unit_price <= Decimal::ZERO {
            return Err(RetailError::validation(
                "product name and a positive unit price are required",
            ));
        }
        Ok(())
    }
}

/// Form input for a new product. `unit_price` is `None` until the user
/// types one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub unit_price: Option<Decimal>,
    pub stock: u32,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, unit_price: Decimal, stock: u32) -> Self {
        Self {
            name: name.into(),
            unit_price: Some(unit_price),
            stock,
        }
    }

    /// Check the draft locally and produce the request payload.
    pub fn validate(&self) -> RetailResult<NewProduct> {
        let unit_price = match self.unit_price {
            Some(price) if !self.name.trim().is_empty() => price,
            _ => return Err(RetailError::validation("product name and unit price are required")),
        };
        if unit_price < Decimal::ZERO {
            return Err(RetailError::validation("unit price cannot be negative"));
        }
        Ok(NewProduct {
            name: self.name.clone(),
            unit_price,
            stock: self.stock,
        })
    }
}

/// Request payload for `POST /products`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewProduct {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio_unitario", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub stock: u32,
}

// ---------------------------------------------------------------------------
// Invoices
// ---------------------------------------------------------------------------

/// A product snapshot taken when it was added to an invoice, plus a quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvoiceLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl InvoiceLineItem {
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            quantity: 1,
            unit_price: product.unit_price,
        }
    }

    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// A finalized invoice. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Invoice {
    pub id: InvoiceId,
    pub client_name: String,
    pub line_items: Vec<InvoiceLineItem>,
}

impl Invoice {
    pub fn total(&self) -> Decimal {
        compute_total(&self.line_items)
    }
}

// ---------------------------------------------------------------------------
// Movements
// ---------------------------------------------------------------------------

/// A historical purchase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movement {
    pub id: u32,
    pub client_name: String,
    pub product_name: String,
    pub quantity: u32,
    pub total: Decimal,
}
