use tokio::sync::oneshot;

use crate::api::ApiResult;
use crate::domain::{Draft, NewOrder, Order, OrderId, UserId, UserOrderCounts};
use crate::error::ConsoleError;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;
pub type ConsoleResponse<T> = ServiceResponse<T, ConsoleError>;

/// Reply slot of an in-flight call. `None` when an effect started the call
/// and nobody is waiting on it.
pub type Reply<T> = Option<ConsoleResponse<T>>;

/// Messages accepted by [`crate::console::ConsoleService`].
#[derive(Debug)]
pub enum ConsoleRequest {
    // Form inputs
    SetUserId {
        user_id: UserId,
        respond_to: ConsoleResponse<()>,
    },
    SetProduct {
        product: String,
        respond_to: ConsoleResponse<()>,
    },
    SetQuantity {
        quantity: u32,
        respond_to: ConsoleResponse<()>,
    },
    SetUnitPrice {
        unit_price: f64,
        respond_to: ConsoleResponse<()>,
    },
    SetDiscountPercent {
        discount_percent: f64,
        respond_to: ConsoleResponse<()>,
    },
    SetSearchQuery {
        query: String,
        respond_to: ConsoleResponse<()>,
    },

    // Operations against the order service
    LoadOrdersForUser {
        user_id: UserId,
        respond_to: ConsoleResponse<Vec<Order>>,
    },
    CreateOrder {
        draft: Draft,
        respond_to: ConsoleResponse<Order>,
    },
    CreateDiscountedOrder {
        draft: Draft,
        discount_percent: f64,
        respond_to: ConsoleResponse<Order>,
    },
    SearchOrders {
        query: String,
        respond_to: ConsoleResponse<Vec<Order>>,
    },
    CreateBatchOrders {
        user_id: UserId,
        respond_to: ConsoleResponse<Vec<NewOrder>>,
    },
    FetchAllOrders {
        respond_to: ConsoleResponse<Vec<Order>>,
    },
    FetchExpensiveProducts {
        respond_to: ConsoleResponse<Vec<Order>>,
    },
    FetchOrderDetails {
        order_id: OrderId,
        respond_to: ConsoleResponse<Order>,
    },
    FetchUserOrderCounts {
        respond_to: ConsoleResponse<UserOrderCounts>,
    },
    FetchUserOrders {
        respond_to: ConsoleResponse<Vec<Order>>,
    },

    /// First render; turns the effects on.
    Mount {
        respond_to: ConsoleResponse<()>,
    },
    /// A spawned call has resolved.
    Completed(Completion),
    Shutdown,
}

/// Outcome of a spawned service call, delivered back to the console loop in
/// arrival order.
#[derive(Debug)]
pub enum Completion {
    OrdersLoaded {
        user_id: UserId,
        result: ApiResult<Vec<Order>>,
        respond_to: Reply<Vec<Order>>,
    },
    OrderCreated {
        result: ApiResult<Order>,
        respond_to: Reply<Order>,
    },
    DiscountedOrderCreated {
        result: ApiResult<Order>,
        respond_to: Reply<Order>,
    },
    SearchCompleted {
        query: String,
        result: ApiResult<Vec<Order>>,
        respond_to: Reply<Vec<Order>>,
    },
    AllOrdersLoaded {
        result: ApiResult<Vec<Order>>,
        respond_to: Reply<Vec<Order>>,
    },
    ExpensiveProductsLoaded {
        result: ApiResult<Vec<Order>>,
        respond_to: Reply<Vec<Order>>,
    },
    OrderDetailsLoaded {
        order_id: OrderId,
        result: ApiResult<Order>,
        respond_to: Reply<Order>,
    },
    UserOrderCountsLoaded {
        result: ApiResult<UserOrderCounts>,
        respond_to: Reply<UserOrderCounts>,
    },
    UserOrdersLoaded {
        user_id: UserId,
        result: ApiResult<Vec<Order>>,
        respond_to: Reply<Vec<Order>>,
    },
}
