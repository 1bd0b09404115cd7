//! The remote order service, seen from the console.
//!
//! [`OrderApi`] has one method per endpoint. [`HttpOrderApi`] is the real
//! transport; tests substitute the channel-backed mock from `mock_framework`.

pub mod http;

pub use http::HttpOrderApi;

use async_trait::async_trait;

use crate::domain::{DiscountedOrderRequest, NewOrder, Order, OrderId, UserId, UserOrderCounts};
use crate::error::ApiError;

pub type ApiResult<T> = Result<T, ApiError>;

#[async_trait]
pub trait OrderApi: Send + Sync + 'static {
    /// `GET /orders/{user_id}`
    async fn list_orders_for_user(&self, user_id: UserId) -> ApiResult<Vec<Order>>;

    /// `POST /orders/`
    async fn create_order(&self, order: NewOrder) -> ApiResult<Order>;

    /// `POST /orders/create-with-discount`
    async fn create_discounted_order(&self, order: DiscountedOrderRequest) -> ApiResult<Order>;

    /// `GET /orders/search?query=`
    async fn search_orders(&self, query: String) -> ApiResult<Vec<Order>>;

    /// `GET /all_orders`, unbounded.
    async fn all_orders(&self) -> ApiResult<Vec<Order>>;

    /// `GET /expensive_products`
    async fn expensive_products(&self) -> ApiResult<Vec<Order>>;

    /// `GET /order_details/{order_id}?user_id=`
    async fn order_details(&self, order_id: OrderId, user_id: UserId) -> ApiResult<Order>;

    /// `GET /users/order_count`
    async fn user_order_counts(&self) -> ApiResult<UserOrderCounts>;

    /// `GET /users/{user_id}/orders`
    async fn user_orders(&self, user_id: UserId) -> ApiResult<Vec<Order>>;
}
