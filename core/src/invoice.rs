//! Invoice cart and the session's finalized invoices.
//!
//! # Design
//! The builder owns two things: the draft (line items being assembled) and
//! the invoices committed during this session. Products are looked up
//! through `ProductLookup` so the cart works against the live catalog or a
//! fixed product list alike; line items copy what they need from the product
//! at selection time.

use std::collections::HashSet;

use rand::Rng;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::error::{RetailError, RetailResult};
use crate::types::{Invoice, InvoiceId, InvoiceLineItem, Product, ProductId};

pub const MIN_INVOICE_ID: InvoiceId = 1000;
pub const MAX_INVOICE_ID: InvoiceId = 9999;

/// Sum of `quantity × unit_price` over `items`; zero when empty.
pub fn compute_total(items: &[InvoiceLineItem]) -> Decimal {
    items.iter().map(InvoiceLineItem::line_total).sum()
}

/// Source of products that can be put on an invoice.
pub trait ProductLookup {
    fn find_product(&self, id: ProductId) -> Option<Product>;
}

impl ProductLookup for [Product] {
    fn find_product(&self, id: ProductId) -> Option<Product> {
        self.iter().find(|p| p.id == id).cloned()
    }
}

impl ProductLookup for Vec<Product> {
    fn find_product(&self, id: ProductId) -> Option<Product> {
        self.as_slice().find_product(id)
    }
}

/// Candidate ids for new invoices. The builder skips ids already used.
pub trait InvoiceIdSource {
    fn next_id(&mut self) -> InvoiceId;
}

/// Uniformly random 4-digit ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomInvoiceIds;

impl InvoiceIdSource for RandomInvoiceIds {
    fn next_id(&mut self) -> InvoiceId {
        rand::thread_rng().gen_range(MIN_INVOICE_ID..=MAX_INVOICE_ID)
    }
}

/// 1000, 1001, ... wrapping back to 1000 after 9999.
#[derive(Debug, Clone, Copy)]
pub struct SequentialInvoiceIds {
    next: InvoiceId,
}

impl Default for SequentialInvoiceIds {
    fn default() -> Self {
        Self { next: MIN_INVOICE_ID }
    }
}

impl InvoiceIdSource for SequentialInvoiceIds {
    fn next_id(&mut self) -> InvoiceId {
        let id = self.next;
        self.next = if id >= MAX_INVOICE_ID { MIN_INVOICE_ID } else { id + 1 };
        id
    }
}

/// Products the invoice screen offers when no catalog is connected.
pub fn sample_products() -> Vec<Product> {
    [
        (1, "Café 500g", 12000),
        (2, "Azúcar 1kg", 3500),
        (3, "Aceite 1L", 9800),
        (4, "Arroz 5kg", 18000),
    ]
    .into_iter()
    .map(|(id, name, price)| Product {
        id,
        name: name.to_string(),
        unit_price: Decimal::from(price),
        stock: 0,
    })
    .collect()
}

#[derive(Debug, Clone)]
pub struct InvoiceBuilder<S = RandomInvoiceIds> {
    line_items: Vec<InvoiceLineItem>,
    invoices: Vec<Invoice>,
    ids: S,
}

impl Default for InvoiceBuilder<RandomInvoiceIds> {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceBuilder<RandomInvoiceIds> {
    pub fn new() -> Self {
        Self::with_id_source(RandomInvoiceIds)
    }
}

impl<S: InvoiceIdSource> InvoiceBuilder<S> {
    pub fn with_id_source(ids: S) -> Self {
        Self {
            line_items: Vec::new(),
            invoices: Vec::new(),
            ids,
        }
    }

    pub fn add_line_item<L>(&mut self, lookup: &L, product_id: ProductId) -> RetailResult<()>
    where
        L: ProductLookup + ?Sized,
    {
        let product = lookup
            .find_product(product_id)
            .ok_or_else(|| RetailError::not_found(format!("product {product_id}")))?;
        if self.line_items.iter().any(|item| item.product_id == product_id) {
            return Err(RetailError::duplicate(format!(
                "product {product_id} is already on the invoice"
            )));
        }
        self.line_items.push(InvoiceLineItem::from_product(&product));
        debug!(product_id, "line item added");
        Ok(())
    }

    /// Adjust a line's quantity by `delta`, never going below 1. Unknown
    /// product ids are ignored.
    pub fn change_quantity(&mut self, product_id: ProductId, delta: i32) {
        if let Some(item) = self.line_items.iter_mut().find(|item| item.product_id == product_id) {
            let wanted = i64::from(item.quantity) + i64::from(delta);
            item.quantity = wanted.clamp(1, i64::from(u32::MAX)) as u32;
        }
    }

    /// Commit the draft as a new invoice for `client_name` and clear it.
    pub fn finalize(&mut self, client_name: &str) -> RetailResult<Invoice> {
        let client_name = client_name.trim();
        if client_name.is_empty() {
            return Err(RetailError::validation("client name is required"));
        }
        if self.line_items.is_empty() {
            return Err(RetailError::validation("at least one product is required"));
        }
        let id = self.fresh_id()?;
        let invoice = Invoice {
            id,
            client_name: client_name.to_string(),
            line_items: std::mem::take(&mut self.line_items),
        };
        self.invoices.push(invoice.clone());
        info!(invoice_id = id, total = %invoice.total(), "invoice saved");
        Ok(invoice)
    }

    pub fn cancel(&mut self) {
        self.line_items.clear();
    }

    pub fn line_items(&self) -> &[InvoiceLineItem] {
        &self.line_items
    }

    pub fn draft_total(&self) -> Decimal {
        compute_total(&self.line_items)
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    fn fresh_id(&mut self) -> RetailResult<InvoiceId> {
        let used: HashSet<InvoiceId> = self.invoices.iter().map(|inv| inv.id).collect();
        let capacity = (MAX_INVOICE_ID - MIN_INVOICE_ID + 1) as usize;
        if used.len() >= capacity {
            return Err(RetailError::duplicate("no invoice ids left for this session"));
        }
        loop {
            let candidate = self.ids.next_id();
            if !used.contains(&candidate) {
                return Ok(candidate);
            }
        }
    }
}
