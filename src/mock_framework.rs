//! # Mock Framework
//!
//! A channel-backed [`OrderApi`] for driving the console in tests.
//!
//! Every call made through [`MockOrderApi`] arrives as an [`ApiCall`] on a
//! receiver the test owns. The test inspects it and answers through the
//! embedded responder, in whatever order it likes, which is how response
//! reordering and partial failures are simulated. Dropping a responder fails
//! the call with a transport error.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::{mpsc, oneshot};

use crate::api::{ApiResult, OrderApi};
use crate::domain::{DiscountedOrderRequest, NewOrder, Order, OrderId, UserId, UserOrderCounts};
use crate::error::ApiError;

pub type Responder<T> = oneshot::Sender<ApiResult<T>>;

const CALL_TIMEOUT: Duration = Duration::from_secs(2);
const QUIET_PERIOD: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub enum ApiCall {
    ListOrdersForUser {
        user_id: UserId,
        respond_to: Responder<Vec<Order>>,
    },
    CreateOrder {
        order: NewOrder,
        respond_to: Responder<Order>,
    },
    CreateDiscountedOrder {
        order: DiscountedOrderRequest,
        respond_to: Responder<Order>,
    },
    SearchOrders {
        query: String,
        respond_to: Responder<Vec<Order>>,
    },
    AllOrders {
        respond_to: Responder<Vec<Order>>,
    },
    ExpensiveProducts {
        respond_to: Responder<Vec<Order>>,
    },
    OrderDetails {
        order_id: OrderId,
        user_id: UserId,
        respond_to: Responder<Order>,
    },
    UserOrderCounts {
        respond_to: Responder<UserOrderCounts>,
    },
    UserOrders {
        user_id: UserId,
        respond_to: Responder<Vec<Order>>,
    },
}

impl ApiCall {
    /// Request line the HTTP transport would issue for this call.
    pub fn path(&self) -> String {
        match self {
            ApiCall::ListOrdersForUser { user_id, .. } => format!("GET /orders/{user_id}"),
            ApiCall::CreateOrder { .. } => "POST /orders/".to_string(),
            ApiCall::CreateDiscountedOrder { .. } => "POST /orders/create-with-discount".to_string(),
            ApiCall::SearchOrders { query, .. } => format!("GET /orders/search?query={query}"),
            ApiCall::AllOrders { .. } => "GET /all_orders".to_string(),
            ApiCall::ExpensiveProducts { .. } => "GET /expensive_products".to_string(),
            ApiCall::OrderDetails {
                order_id, user_id, ..
            } => format!("GET /order_details/{order_id}?user_id={user_id}"),
            ApiCall::UserOrderCounts { .. } => "GET /users/order_count".to_string(),
            ApiCall::UserOrders { user_id, .. } => format!("GET /users/{user_id}/orders"),
        }
    }
}

#[derive(Clone)]
pub struct MockOrderApi {
    sender: mpsc::Sender<ApiCall>,
}

/// Creates a mock API and the receiver its calls arrive on.
pub fn create_mock_api(buffer_size: usize) -> (MockOrderApi, mpsc::Receiver<ApiCall>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (MockOrderApi { sender }, receiver)
}

impl MockOrderApi {
    async fn call<T: Send>(&self, make: impl FnOnce(Responder<T>) -> ApiCall + Send) -> ApiResult<T> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| ApiError::Transport("mock receiver dropped".to_string()))?;
        response
            .await
            .map_err(|_| ApiError::Transport("mock responder dropped".to_string()))?
    }
}

#[async_trait]
impl OrderApi for MockOrderApi {
    async fn list_orders_for_user(&self, user_id: UserId) -> ApiResult<Vec<Order>> {
        self.call(|respond_to| ApiCall::ListOrdersForUser { user_id, respond_to }).await
    }

    async fn create_order(&self, order: NewOrder) -> ApiResult<Order> {
        self.call(|respond_to| ApiCall::CreateOrder { order, respond_to }).await
    }

    async fn create_discounted_order(&self, order: DiscountedOrderRequest) -> ApiResult<Order> {
        self.call(|respond_to| ApiCall::CreateDiscountedOrder { order, respond_to }).await
    }

    async fn search_orders(&self, query: String) -> ApiResult<Vec<Order>> {
        self.call(|respond_to| ApiCall::SearchOrders { query, respond_to }).await
    }

    async fn all_orders(&self) -> ApiResult<Vec<Order>> {
        self.call(|respond_to| ApiCall::AllOrders { respond_to }).await
    }

    async fn expensive_products(&self) -> ApiResult<Vec<Order>> {
        self.call(|respond_to| ApiCall::ExpensiveProducts { respond_to }).await
    }

    async fn order_details(&self, order_id: OrderId, user_id: UserId) -> ApiResult<Order> {
        self.call(|respond_to| ApiCall::OrderDetails {
            order_id,
            user_id,
            respond_to,
        })
        .await
    }

    async fn user_order_counts(&self) -> ApiResult<UserOrderCounts> {
        self.call(|respond_to| ApiCall::UserOrderCounts { respond_to }).await
    }

    async fn user_orders(&self, user_id: UserId) -> ApiResult<Vec<Order>> {
        self.call(|respond_to| ApiCall::UserOrders { user_id, respond_to }).await
    }
}

/// Next call, or `None` if none arrives in time.
pub async fn next_call(receiver: &mut mpsc::Receiver<ApiCall>) -> Option<ApiCall> {
    tokio::time::timeout(CALL_TIMEOUT, receiver.recv())
        .await
        .ok()
        .flatten()
}

/// Waits briefly and returns every call that arrived meanwhile.
pub async fn drain_calls(receiver: &mut mpsc::Receiver<ApiCall>) -> Vec<ApiCall> {
    tokio::time::sleep(QUIET_PERIOD).await;
    let mut calls = Vec::new();
    while let Ok(call) = receiver.try_recv() {
        calls.push(call);
    }
    calls
}

/// Helper to verify that the next call is `GET /orders/{user_id}`
pub async fn expect_list_orders_for_user(
    receiver: &mut mpsc::Receiver<ApiCall>,
) -> Option<(UserId, Responder<Vec<Order>>)> {
    match next_call(receiver).await {
        Some(ApiCall::ListOrdersForUser { user_id, respond_to }) => Some((user_id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is `POST /orders/`
pub async fn expect_create_order(
    receiver: &mut mpsc::Receiver<ApiCall>,
) -> Option<(NewOrder, Responder<Order>)> {
    match next_call(receiver).await {
        Some(ApiCall::CreateOrder { order, respond_to }) => Some((order, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is `POST /orders/create-with-discount`
pub async fn expect_create_discounted_order(
    receiver: &mut mpsc::Receiver<ApiCall>,
) -> Option<(DiscountedOrderRequest, Responder<Order>)> {
    match next_call(receiver).await {
        Some(ApiCall::CreateDiscountedOrder { order, respond_to }) => Some((order, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is `GET /orders/search`
pub async fn expect_search_orders(
    receiver: &mut mpsc::Receiver<ApiCall>,
) -> Option<(String, Responder<Vec<Order>>)> {
    match next_call(receiver).await {
        Some(ApiCall::SearchOrders { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next call is `GET /all_orders`
pub async fn expect_all_orders(
    receiver: &mut mpsc::Receiver<ApiCall>,
) -> Option<Responder<Vec<Order>>> {
    match next_call(receiver).await {
        Some(ApiCall::AllOrders { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next call is `GET /users/{user_id}/orders`
pub async fn expect_user_orders(
    receiver: &mut mpsc::Receiver<ApiCall>,
) -> Option<(UserId, Responder<Vec<Order>>)> {
    match next_call(receiver).await {
        Some(ApiCall::UserOrders { user_id, respond_to }) => Some((user_id, respond_to)),
        _ => None,
    }
}

pub fn sample_order(id: u64, user_id: u64, product: &str) -> Order {
    Order {
        id: OrderId(id),
        user_id: UserId(user_id),
        product: product.to_string(),
        quantity: 1,
        total_price: 9.99,
        order_date: "2024-05-01T12:00:00"
            .parse::<NaiveDateTime>()
            .expect("valid timestamp"),
    }
}

/// What the service would answer for a created order.
pub fn created_from(id: u64, body: &NewOrder) -> Order {
    Order {
        id: OrderId(id),
        user_id: body.user_id,
        product: body.product.clone(),
        quantity: body.quantity,
        total_price: body.total_price,
        order_date: "2024-05-01T12:00:00"
            .parse::<NaiveDateTime>()
            .expect("valid timestamp"),
    }
}

pub fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        url: "http://localhost:8000".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_api() {
        let (api, mut receiver) = create_mock_api(10);

        let task = tokio::spawn(async move { api.list_orders_for_user(UserId(4)).await });

        let (user_id, responder) = expect_list_orders_for_user(&mut receiver)
            .await
            .expect("Expected list call");
        assert_eq!(user_id, UserId(4));
        responder.send(Ok(vec![sample_order(1, 4, "Desk")])).unwrap();

        let result = task.await.unwrap();
        assert_eq!(result.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_dropped_responder_is_a_transport_error() {
        let (api, mut receiver) = create_mock_api(10);
        let task = tokio::spawn(async move { api.all_orders().await });
        drop(expect_all_orders(&mut receiver).await.expect("Expected call"));
        assert!(matches!(task.await.unwrap(), Err(ApiError::Transport(_))));
    }
}
