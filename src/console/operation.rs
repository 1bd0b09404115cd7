use std::fmt;

/// The console's request/response operations, used to pick the user-facing
/// failure message and to label diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    LoadOrdersForUser,
    CreateOrder,
    CreateDiscountedOrder,
    SearchOrders,
    CreateBatchOrders,
    FetchAllOrders,
    FetchExpensiveProducts,
    FetchOrderDetails,
    FetchUserOrderCounts,
    FetchUserOrders,
}

impl Operation {
    /// Banner text shown when the operation fails. `None` means the failure
    /// is only logged.
    pub fn failure_message(self) -> Option<&'static str> {
        match self {
            Operation::LoadOrdersForUser => Some("Error fetching orders. Please try again later."),
            Operation::CreateOrder => Some("Error creating order. Please try again."),
            // Known defect: discounted-order failures never reach the banner.
            Operation::CreateDiscountedOrder => None,
            Operation::SearchOrders => Some("Error searching orders. Please try again."),
            Operation::CreateBatchOrders => Some("Error creating batch orders. Please try again."),
            Operation::FetchAllOrders => Some("Error fetching all orders. Please try again."),
            Operation::FetchExpensiveProducts => {
                Some("Error fetching expensive products. Please try again.")
            }
            Operation::FetchOrderDetails => Some("Error fetching order details. Please try again."),
            Operation::FetchUserOrderCounts => {
                Some("Error fetching user order counts. Please try again.")
            }
            Operation::FetchUserOrders => Some("Error fetching user orders. Please try again."),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::LoadOrdersForUser => "load_orders_for_user",
            Operation::CreateOrder => "create_order",
            Operation::CreateDiscountedOrder => "create_discounted_order",
            Operation::SearchOrders => "search_orders",
            Operation::CreateBatchOrders => "create_batch_orders",
            Operation::FetchAllOrders => "fetch_all_orders",
            Operation::FetchExpensiveProducts => "fetch_expensive_products",
            Operation::FetchOrderDetails => "fetch_order_details",
            Operation::FetchUserOrderCounts => "fetch_user_order_counts",
            Operation::FetchUserOrders => "fetch_user_orders",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
