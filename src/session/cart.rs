use super::store::KeyValueStore;
use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const CART_KEY: &str = "cart";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: i64,
    pub name: String,
    pub unit_price_cents: u64,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total_cents(&self) -> u64 {
        self.unit_price_cents.saturating_mul(u64::from(self.quantity))
    }
}

/// Shopping cart persisted as a JSON array under the `cart` key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Corrupt or missing data loads as an empty cart.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(raw) = store.get(CART_KEY) else {
            return Self::new();
        };
        match serde_json::from_str::<Vec<CartItem>>(&raw) {
            Ok(items) => Self { items },
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable cart");
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        let json = serde_json::to_string(&self.items)?;
        store.set(CART_KEY, &json)
    }

    /// Adding a product already in the cart increases its quantity.
    pub fn add(&mut self, item: CartItem) {
        if item.quantity == 0 {
            return;
        }
        match self.items.iter_mut().find(|i| i.product_id == item.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
    }

    pub fn remove(&mut self, product_id: i64) -> Option<CartItem> {
        let idx = self.items.iter().position(|i| i.product_id == product_id)?;
        Some(self.items.remove(idx))
    }

    /// A quantity of zero removes the line. Returns false if the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: i64, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id).is_some();
        }
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |n, i| n.saturating_add(i.quantity))
    }

    pub fn total_cents(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |t, i| t.saturating_add(i.line_total_cents()))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
