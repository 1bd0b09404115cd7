use crate::domain::{Draft, Order, UserId};

use super::Operation;

/// Everything the console view renders. Owned by the console service and
/// published to subscribers after every transition.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleState {
    pub user_id: UserId,
    pub draft: Draft,
    pub search_query: String,
    pub orders: Vec<Order>,
    pub expensive_products: Vec<Order>,
    pub error: Option<String>,
    /// Number of renders so far.
    pub renders: u64,
}

impl Default for ConsoleState {
    fn default() -> Self {
        Self::for_user(UserId(1))
    }
}

impl ConsoleState {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            draft: Draft::for_user(user_id),
            search_query: String::new(),
            orders: Vec::new(),
            expensive_products: Vec::new(),
            error: None,
            renders: 0,
        }
    }

    pub fn select_user(&mut self, user_id: UserId) {
        self.user_id = user_id;
        self.draft.user_id = user_id;
    }

    /// Successful list read: the list is replaced wholesale.
    pub fn orders_replaced(&mut self, orders: Vec<Order>) {
        self.orders = orders;
        self.error = None;
    }

    /// Failed list read: the previous list is discarded.
    pub fn orders_failed(&mut self, operation: Operation) {
        self.orders.clear();
        self.fail(operation);
    }

    /// Successful plain create: exactly one order is appended.
    pub fn order_appended(&mut self, order: Order) {
        self.orders.push(order);
        self.draft.reset();
        self.error = None;
    }

    pub fn discounted_order_placed(&mut self) {
        self.draft.reset();
        self.error = None;
    }

    pub fn expensive_products_replaced(&mut self, orders: Vec<Order>) {
        self.expensive_products = orders;
        self.error = None;
    }

    pub fn expensive_products_failed(&mut self) {
        self.expensive_products.clear();
        self.fail(Operation::FetchExpensiveProducts);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Sets the banner for `operation`. Silent operations leave it alone.
    pub fn fail(&mut self, operation: Operation) {
        if let Some(message) = operation.failure_message() {
            self.error = Some(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderId;
    use chrono::NaiveDateTime;

    fn order(id: u64, product: &str) -> Order {
        Order {
            id: OrderId(id),
            user_id: UserId(1),
            product: product.to_string(),
            quantity: 1,
            total_price: 1.0,
            order_date: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_reads_replace_instead_of_accumulating() {
        let mut state = ConsoleState::default();
        state.orders_replaced(vec![order(1, "a"), order(2, "b")]);
        state.orders_replaced(vec![order(3, "c")]);
        assert_eq!(state.orders, vec![order(3, "c")]);
    }

    #[test]
    fn test_append_grows_by_one_and_resets_draft() {
        let mut state = ConsoleState::default();
        state.orders_replaced(vec![order(1, "a")]);
        state.draft = Draft::new(UserId(1), "Widget", 3, 10.0);
        state.error = Some("stale".into());
        state.order_appended(order(2, "Widget"));
        assert_eq!(state.orders.len(), 2);
        assert_eq!(state.draft, Draft::for_user(UserId(1)));
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_read_failure_discards_list_and_sets_banner() {
        let mut state = ConsoleState::default();
        state.orders_replaced(vec![order(1, "a")]);
        state.orders_failed(Operation::SearchOrders);
        assert!(state.orders.is_empty());
        assert_eq!(
            state.error.as_deref(),
            Some("Error searching orders. Please try again.")
        );
    }

    #[test]
    fn test_silent_failure_keeps_banner_unset() {
        let mut state = ConsoleState::default();
        state.fail(Operation::CreateDiscountedOrder);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_select_user_moves_draft_along() {
        let mut state = ConsoleState::default();
        state.select_user(UserId(5));
        assert_eq!(state.user_id, UserId(5));
        assert_eq!(state.draft.user_id, UserId(5));
    }
}
