use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{ApiResult, OrderApi};
use crate::config::ConsoleConfig;
use crate::domain::{DiscountedOrderRequest, NewOrder, Order, OrderId, UserId, UserOrderCounts};
use crate::error::ApiError;

/// [`OrderApi`] over HTTP/JSON. No timeouts, retries or auth are applied.
#[derive(Debug, Clone)]
pub struct HttpOrderApi {
    client: Client,
    base_url: String,
}

impl HttpOrderApi {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_url.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))
    }

    async fn get_json<T: DeserializeOwned + Send>(&self, url: Url) -> ApiResult<T> {
        debug!(%url, "GET");
        let resp = self.client.get(url).send().await?.error_for_status()?;
        Ok(resp.json::<T>().await?)
    }

    async fn post_json<B: Serialize + Sync, T: DeserializeOwned + Send>(&self, url: Url, body: &B) -> ApiResult<T> {
        debug!(%url, "POST");
        let resp = self.client.post(url).json(body).send().await?.error_for_status()?;
        Ok(resp.json::<T>().await?)
    }
}

#[async_trait]
impl OrderApi for HttpOrderApi {
    #[instrument(skip(self))]
    async fn list_orders_for_user(&self, user_id: UserId) -> ApiResult<Vec<Order>> {
        let url = self.url(&format!("/orders/{user_id}"))?;
        self.get_json(url).await
    }

    #[instrument(skip(self, order), fields(user_id = %order.user_id, product = %order.product))]
    async fn create_order(&self, order: NewOrder) -> ApiResult<Order> {
        let url = self.url("/orders/")?;
        self.post_json(url, &order).await
    }

    #[instrument(skip(self, order), fields(user_id = %order.user_id, product = %order.product))]
    async fn create_discounted_order(&self, order: DiscountedOrderRequest) -> ApiResult<Order> {
        let url = self.url("/orders/create-with-discount")?;
        self.post_json(url, &order).await
    }

    #[instrument(skip(self))]
    async fn search_orders(&self, query: String) -> ApiResult<Vec<Order>> {
        let mut url = self.url("/orders/search")?;
        url.query_pairs_mut().append_pair("query", &query);
        self.get_json(url).await
    }

    #[instrument(skip(self))]
    async fn all_orders(&self) -> ApiResult<Vec<Order>> {
        let url = self.url("/all_orders")?;
        self.get_json(url).await
    }

    #[instrument(skip(self))]
    async fn expensive_products(&self) -> ApiResult<Vec<Order>> {
        let url = self.url("/expensive_products")?;
        self.get_json(url).await
    }

    #[instrument(skip(self))]
    async fn order_details(&self, order_id: OrderId, user_id: UserId) -> ApiResult<Order> {
        let mut url = self.url(&format!("/order_details/{order_id}"))?;
        url.query_pairs_mut().append_pair("user_id", &user_id.to_string());
        self.get_json(url).await
    }

    #[instrument(skip(self))]
    async fn user_order_counts(&self) -> ApiResult<UserOrderCounts> {
        let url = self.url("/users/order_count")?;
        self.get_json(url).await
    }

    #[instrument(skip(self))]
    async fn user_orders(&self, user_id: UserId) -> ApiResult<Vec<Order>> {
        let url = self.url(&format!("/users/{user_id}/orders"))?;
        self.get_json(url).await
    }
}
