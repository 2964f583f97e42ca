//! Local cache of the remote product list.
//!
//! # Design
//! The server is the system of record. Every mutation runs as a task in two
//! halves: `begin_*` validates locally and returns a `PendingRequest`, the
//! host executes the request, and `complete` folds the outcome back into the
//! cache. The `create`/`update`/`remove`/`refresh` drivers do both halves
//! through a `Transport` for hosts that can block.
//!
//! Requests may overlap and finish in any order. Each one is stamped with a
//! sequence number from a logical clock when issued:
//! - a confirmed removal always drops the product; a product that is gone
//!   from the cache is never brought back by an update;
//! - an update applies only if no newer outcome for its product, and no
//!   newer list snapshot, has been applied already;
//! - a list snapshot applies only if nothing issued after it has been
//!   applied yet.
//! Anything else completes as `Completion::Superseded` and leaves the cache
//! alone. Failures are always reported, stale or not.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::api::ProductApi;
use crate::config::{CatalogConfig, UpdatePolicy};
use crate::error::{ApiError, RetailError, RetailResult};
use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::invoice::ProductLookup;
use crate::types::{Product, ProductDraft, ProductId};

/// Identifies one issued request and what it was for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    operation: Operation,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Operation {
    Create,
    Reload,
    Update(Product),
    Remove(ProductId),
}

impl Operation {
    fn target(&self) -> Option<ProductId> {
        match self {
            Operation::Update(product) => Some(product.id),
            Operation::Remove(id) => Some(*id),
            Operation::Create | Operation::Reload => None,
        }
    }
}

/// A request the host must execute, and the ticket to complete it with.
#[derive(Debug)]
#[must_use = "a pending request does nothing until it is sent and completed"]
pub struct PendingRequest {
    pub ticket: Ticket,
    pub request: HttpRequest,
}

#[derive(Debug)]
pub enum Completion {
    /// The outcome was applied to the cache.
    Committed,
    /// A newer request already decided this state; nothing changed.
    Superseded,
    /// The operation needs another round-trip (create reloads the list).
    FollowUp(PendingRequest),
}

#[derive(Debug, Clone)]
pub struct ProductCatalog {
    api: ProductApi,
    policy: UpdatePolicy,
    products: Vec<Product>,
    clock: u64,
    /// Newest sequence applied per product by an update or removal.
    applied_for: HashMap<ProductId, u64>,
    /// Sequence of the list snapshot the cache was last replaced with.
    snapshot: u64,
    /// Highest sequence whose outcome has been applied.
    applied: u64,
    in_flight: HashMap<u64, Option<ProductId>>,
}

impl ProductCatalog {
    pub fn new(api: ProductApi) -> Self {
        Self {
            api,
            policy: UpdatePolicy::default(),
            products: Vec::new(),
            clock: 0,
            applied_for: HashMap::new(),
            snapshot: 0,
            applied: 0,
            in_flight: HashMap::new(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(ProductApi::new(&config.base_url)).with_update_policy(config.update_policy)
    }

    pub fn with_update_policy(mut self, policy: UpdatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn update_policy(&self) -> UpdatePolicy {
        self.policy
    }

    pub fn list(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Whether a request touching `id` is still waiting for completion.
    pub fn is_pending(&self, id: ProductId) -> bool {
        self.in_flight.values().any(|target| *target == Some(id))
    }

    pub fn has_pending(&self) -> bool {
        !self.in_flight.is_empty()
    }

    // -----------------------------------------------------------------------
    // Issuing
    // -----------------------------------------------------------------------

    pub fn begin_create(&mut self, draft: &ProductDraft) -> RetailResult<PendingRequest> {
        let input = draft.validate()?;
        let request = self.api.build_create_product(&input)?;
        Ok(self.issue(Operation::Create, request))
    }

    pub fn begin_update(&mut self, product: Product) -> RetailResult<PendingRequest> {
        product.validate_edit()?;
        if self.get(product.id).is_none() {
            return Err(RetailError::not_found(format!("product {}", product.id)));
        }
        let request = self.api.build_update_product(&product)?;
        Ok(self.issue(Operation::Update(product), request))
    }

    pub fn begin_remove(&mut self, id: ProductId) -> PendingRequest {
        let request = self.api.build_delete_product(id);
        self.issue(Operation::Remove(id), request)
    }

    pub fn begin_refresh(&mut self) -> PendingRequest {
        let request = self.api.build_list_products();
        self.issue(Operation::Reload, request)
    }

    fn issue(&mut self, operation: Operation, request: HttpRequest) -> PendingRequest {
        self.clock += 1;
        let seq = self.clock;
        self.in_flight.insert(seq, operation.target());
        debug!(seq, method = request.method.as_str(), path = %request.path, "request issued");
        PendingRequest {
            ticket: Ticket { seq, operation },
            request,
        }
    }

    // -----------------------------------------------------------------------
    // Completing
    // -----------------------------------------------------------------------

    /// Fold the outcome of a request issued by one of the `begin_*` methods
    /// into the cache.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<HttpResponse, TransportError>,
    ) -> RetailResult<Completion> {
        let Ticket { seq, operation } = ticket;
        self.in_flight.remove(&seq);
        let response = outcome.map_err(ApiError::from);
        match operation {
            Operation::Create => self.complete_create(response),
            Operation::Reload => self.complete_reload(seq, response),
            Operation::Update(product) => self.complete_update(seq, product, response),
            Operation::Remove(id) => self.complete_remove(seq, id, response),
        }
    }

    fn complete_create(&mut self, response: Result<HttpResponse, ApiError>) -> RetailResult<Completion> {
        match response.and_then(|r| self.api.parse_create_product(r)) {
            Ok(created) => debug!(server_id = created.id, "product created"),
            // the id is not used; the reload below is what matters
            Err(ApiError::DeserializationError(e)) => {
                warn!(error = %e, "create response not understood, reloading anyway")
            }
            Err(e) => {
                warn!(error = %e, "product create failed");
                return Err(e.into());
            }
        }
        Ok(Completion::FollowUp(self.begin_refresh()))
    }

    fn complete_reload(&mut self, seq: u64, response: Result<HttpResponse, ApiError>) -> RetailResult<Completion> {
        let products = response
            .and_then(|r| self.api.parse_list_products(r))
            .inspect_err(|e| warn!(error = %e, "product list fetch failed"))?;
        if seq < self.applied {
            debug!(seq, applied = self.applied, "stale product list discarded");
            return Ok(Completion::Superseded);
        }
        info!(count = products.len(), "product list replaced");
        self.products = products;
        self.snapshot = seq;
        self.applied = seq;
        Ok(Completion::Committed)
    }

    fn complete_update(
        &mut self,
        seq: u64,
        product: Product,
        response: Result<HttpResponse, ApiError>,
    ) -> RetailResult<Completion> {
        let result = response.and_then(|r| self.api.parse_update_product(r));
        let id = product.id;
        let wanted = result.is_ok() || self.policy == UpdatePolicy::Optimistic;
        let fresh = seq > self.snapshot && self.applied_for.get(&id).map_or(true, |&newest| seq > newest);
        let slot = if wanted && fresh {
            self.products.iter_mut().find(|p| p.id == id)
        } else {
            None
        };
        let applied = match slot {
            Some(slot) => {
                *slot = product;
                true
            }
            None => false,
        };
        if applied {
            self.mark_applied(id, seq);
            info!(product_id = id, confirmed = result.is_ok(), "product updated locally");
        } else if wanted {
            debug!(product_id = id, seq, "stale update discarded");
        }
        match result {
            Ok(()) if applied => Ok(Completion::Committed),
            Ok(()) => Ok(Completion::Superseded),
            Err(e) => {
                warn!(product_id = id, error = %e, "product update failed");
                Err(e.into())
            }
        }
    }

    fn complete_remove(
        &mut self,
        seq: u64,
        id: ProductId,
        response: Result<HttpResponse, ApiError>,
    ) -> RetailResult<Completion> {
        if let Err(e) = response.and_then(|r| self.api.parse_delete_product(r)) {
            warn!(product_id = id, error = %e, "product delete failed");
            return Err(e.into());
        }
        // the server no longer has it, whatever else is in flight
        self.products.retain(|p| p.id != id);
        self.mark_applied(id, seq);
        info!(product_id = id, "product removed");
        Ok(Completion::Committed)
    }

    fn mark_applied(&mut self, id: ProductId, seq: u64) {
        let newest = self.applied_for.entry(id).or_insert(seq);
        *newest = (*newest).max(seq);
        self.applied = self.applied.max(seq);
    }

    // -----------------------------------------------------------------------
    // Blocking drivers
    // -----------------------------------------------------------------------

    /// Create a product, then reload the whole list from the server.
    pub fn create<T>(&mut self, transport: &mut T, draft: &ProductDraft) -> RetailResult<()>
    where
        T: Transport + ?Sized,
    {
        let pending = self.begin_create(draft)?;
        self.run(transport, pending)
    }

    pub fn update<T>(&mut self, transport: &mut T, product: Product) -> RetailResult<()>
    where
        T: Transport + ?Sized,
    {
        let pending = self.begin_update(product)?;
        self.run(transport, pending)
    }

    pub fn remove<T>(&mut self, transport: &mut T, id: ProductId) -> RetailResult<()>
    where
        T: Transport + ?Sized,
    {
        let pending = self.begin_remove(id);
        self.run(transport, pending)
    }

    pub fn refresh<T>(&mut self, transport: &mut T) -> RetailResult<()>
    where
        T: Transport + ?Sized,
    {
        let pending = self.begin_refresh();
        self.run(transport, pending)
    }

    fn run<T>(&mut self, transport: &mut T, pending: PendingRequest) -> RetailResult<()>
    where
        T: Transport + ?Sized,
    {
        let mut next = Some(pending);
        while let Some(PendingRequest { ticket, request }) = next.take() {
            let outcome = transport.send(request);
            if let Completion::FollowUp(follow_up) = self.complete(ticket, outcome)? {
                next = Some(follow_up);
            }
        }
        Ok(())
    }
}

impl ProductLookup for ProductCatalog {
    fn find_product(&self, id: ProductId) -> Option<Product> {
        self.get(id).cloned()
    }
}
