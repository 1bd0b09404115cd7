use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, instrument};

use crate::console::ConsoleState;
use crate::domain::{Draft, NewOrder, Order, OrderId, UserId, UserOrderCounts};
use crate::error::ConsoleError;
use crate::messages::ConsoleRequest;

/// Generate client methods with oneshot channel boilerplate and automatic tracing.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident) => {
        impl $client {
            #[instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, ConsoleError> {
                debug!("Sending request");
                let (respond_to, response) = oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| ConsoleError::ActorCommunicationError("Actor closed".to_string()))?;

                response.await.map_err(|_| ConsoleError::ActorCommunicationError("Actor dropped".to_string()))?
            }
        }
    };
}

/// Handle to a running [`crate::console::ConsoleService`].
///
/// Operation methods resolve once the outcome has been applied to the
/// console state. Snapshots of that state are available through
/// [`ConsoleClient::subscribe`] after every render.
#[derive(Clone)]
pub struct ConsoleClient {
    sender: mpsc::Sender<ConsoleRequest>,
    snapshots: watch::Receiver<ConsoleState>,
}

impl ConsoleClient {
    pub fn new(sender: mpsc::Sender<ConsoleRequest>, snapshots: watch::Receiver<ConsoleState>) -> Self {
        Self { sender, snapshots }
    }

    /// Observer for the rendering layer. Each render publishes a new state.
    pub fn subscribe(&self) -> watch::Receiver<ConsoleState> {
        self.snapshots.clone()
    }

    /// The most recently rendered state.
    pub fn snapshot(&self) -> ConsoleState {
        self.snapshots.borrow().clone()
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), ConsoleError> {
        debug!("Sending shutdown request");
        self.sender
            .send(ConsoleRequest::Shutdown)
            .await
            .map_err(|_| ConsoleError::ActorCommunicationError("Actor closed".to_string()))?;
        Ok(())
    }
}

// Form inputs
client_method!(ConsoleClient => fn set_user_id(user_id: UserId) -> () as ConsoleRequest::SetUserId);
client_method!(ConsoleClient => fn set_product(product: String) -> () as ConsoleRequest::SetProduct);
client_method!(ConsoleClient => fn set_quantity(quantity: u32) -> () as ConsoleRequest::SetQuantity);
client_method!(ConsoleClient => fn set_unit_price(unit_price: f64) -> () as ConsoleRequest::SetUnitPrice);
client_method!(ConsoleClient => fn set_discount_percent(discount_percent: f64) -> () as ConsoleRequest::SetDiscountPercent);
client_method!(ConsoleClient => fn set_search_query(query: String) -> () as ConsoleRequest::SetSearchQuery);
client_method!(ConsoleClient => fn mount() -> () as ConsoleRequest::Mount);

// Operations
client_method!(ConsoleClient => fn load_orders_for_user(user_id: UserId) -> Vec<Order> as ConsoleRequest::LoadOrdersForUser);
client_method!(ConsoleClient => fn create_order(draft: Draft) -> Order as ConsoleRequest::CreateOrder);
client_method!(ConsoleClient => fn create_discounted_order(draft: Draft, discount_percent: f64) -> Order as ConsoleRequest::CreateDiscountedOrder);
client_method!(ConsoleClient => fn search_orders(query: String) -> Vec<Order> as ConsoleRequest::SearchOrders);
client_method!(ConsoleClient => fn create_batch_orders(user_id: UserId) -> Vec<NewOrder> as ConsoleRequest::CreateBatchOrders);
client_method!(ConsoleClient => fn fetch_all_orders() -> Vec<Order> as ConsoleRequest::FetchAllOrders);
client_method!(ConsoleClient => fn fetch_expensive_products() -> Vec<Order> as ConsoleRequest::FetchExpensiveProducts);
client_method!(ConsoleClient => fn fetch_order_details(order_id: OrderId) -> Order as ConsoleRequest::FetchOrderDetails);
client_method!(ConsoleClient => fn fetch_user_order_counts() -> UserOrderCounts as ConsoleRequest::FetchUserOrderCounts);
client_method!(ConsoleClient => fn fetch_user_orders() -> Vec<Order> as ConsoleRequest::FetchUserOrders);
