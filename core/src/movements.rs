//! Read-only history of purchases.

use rust_decimal::Decimal;

use crate::types::Movement;

#[derive(Debug, Clone)]
pub struct MovementLedger {
    movements: Vec<Movement>,
}

impl Default for MovementLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementLedger {
    /// The built-in purchase history.
    pub fn new() -> Self {
        Self::from_movements(seed_movements())
    }

    pub fn from_movements(movements: Vec<Movement>) -> Self {
        Self { movements }
    }

    pub fn list(&self) -> &[Movement] {
        &self.movements
    }
}

fn seed_movements() -> Vec<Movement> {
    [
        (1, "Juan Pérez", "Café 500g", 2, 24000),
        (2, "Juan Pérez", "Azúcar 1kg", 1, 3500),
        (3, "María López", "Aceite 1L", 3, 29400),
        (4, "María López", "Arroz 5kg", 1, 18000),
        (5, "Carlos Gómez", "Sal 500g", 5, 7500),
    ]
    .into_iter()
    .map(|(id, client, product, quantity, total)| Movement {
        id,
        client_name: client.to_string(),
        product_name: product.to_string(),
        quantity,
        total: Decimal::from(total),
    })
    .collect()
}
