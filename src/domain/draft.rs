use super::order::{DiscountedOrderRequest, NewOrder, UserId};

/// An order being composed in the form. Never persisted.
///
/// Quantity and price bounds are enforced by the input widgets only; nothing
/// here re-validates them before submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub user_id: UserId,
    pub product: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub discount_percent: f64,
}

impl Default for Draft {
    fn default() -> Self {
        Self::for_user(UserId(1))
    }
}

impl Draft {
    /// Blank form for the given user.
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            product: String::new(),
            quantity: 1,
            unit_price: 0.0,
            discount_percent: 0.0,
        }
    }

    pub fn new(user_id: UserId, product: impl Into<String>, quantity: u32, unit_price: f64) -> Self {
        Self {
            user_id,
            product: product.into(),
            quantity,
            unit_price,
            discount_percent: 0.0,
        }
    }

    /// Plain create path: the total is computed here as quantity × unit price.
    pub fn to_new_order(&self) -> NewOrder {
        NewOrder {
            user_id: self.user_id,
            product: self.product.clone(),
            quantity: self.quantity,
            total_price: f64::from(self.quantity) * self.unit_price,
        }
    }

    /// Discounted create path: raw fields go out and the service prices the order.
    pub fn to_discounted(&self, discount_percent: f64) -> DiscountedOrderRequest {
        DiscountedOrderRequest {
            user_id: self.user_id,
            product: self.product.clone(),
            quantity: self.quantity,
            price: self.unit_price,
            discount_percent,
        }
    }

    /// Form fields back to their defaults. The selected user is kept.
    pub fn reset(&mut self) {
        *self = Self::for_user(self.user_id);
    }
}
