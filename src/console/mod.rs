//! The Order Console service.
//!
//! [`ConsoleService`] exclusively owns [`ConsoleState`]. Every call to the
//! order service runs in its own spawned task and reports back with a
//! [`Completion`], so any number of operations can be in flight while state
//! is only ever mutated from this loop, one message at a time. Completions
//! are applied in arrival order: a slow response can overwrite the result
//! of a later, faster one.
//!
//! Each applied transition is a render: the state is published on a
//! `watch` channel and, once mounted, the effects run.

pub mod batch;
pub mod operation;
pub mod state;

pub use batch::{synthesize_batch, BATCH_SIZE};
pub use operation::Operation;
pub use state::ConsoleState;

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, Instrument};

use crate::api::{ApiResult, OrderApi};
use crate::clients::ConsoleClient;
use crate::domain::{Draft, NewOrder, Order, OrderId, UserId};
use crate::error::{ApiError, ConsoleError};
use crate::messages::{Completion, ConsoleRequest, ConsoleResponse, Reply};

/// Macro for clean completion replies
macro_rules! send_reply {
    ($respond_to:expr, $result:expr) => {{
        if let Some(respond_to) = $respond_to {
            let _ = respond_to.send($result);
        }
    }};
}

pub struct ConsoleService {
    receiver: mpsc::Receiver<ConsoleRequest>,
    // Weak so the loop still ends once every client and in-flight call is gone.
    sender: mpsc::WeakSender<ConsoleRequest>,
    api: Arc<dyn OrderApi>,
    state: ConsoleState,
    publisher: watch::Sender<ConsoleState>,
    mounted: bool,
    effect_user: Option<UserId>,
}

impl ConsoleService {
    pub fn new(buffer_size: usize, api: Arc<dyn OrderApi>) -> (Self, ConsoleClient) {
        Self::with_state(buffer_size, api, ConsoleState::default())
    }

    pub fn with_state(
        buffer_size: usize,
        api: Arc<dyn OrderApi>,
        state: ConsoleState,
    ) -> (Self, ConsoleClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (publisher, snapshots) = watch::channel(state.clone());
        let service = Self {
            receiver,
            sender: sender.downgrade(),
            api,
            state,
            publisher,
            mounted: false,
            effect_user: None,
        };
        let client = ConsoleClient::new(sender, snapshots);
        (service, client)
    }

    #[instrument(name = "console_service", skip(self))]
    pub async fn run(mut self) {
        info!("ConsoleService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ConsoleRequest::SetUserId { user_id, respond_to } => {
                    self.handle_set_user_id(user_id, respond_to);
                }
                ConsoleRequest::SetProduct { product, respond_to } => {
                    self.edit(respond_to, |state| state.draft.product = product);
                }
                ConsoleRequest::SetQuantity { quantity, respond_to } => {
                    self.edit(respond_to, |state| state.draft.quantity = quantity);
                }
                ConsoleRequest::SetUnitPrice { unit_price, respond_to } => {
                    self.edit(respond_to, |state| state.draft.unit_price = unit_price);
                }
                ConsoleRequest::SetDiscountPercent {
                    discount_percent,
                    respond_to,
                } => {
                    self.edit(respond_to, |state| {
                        state.draft.discount_percent = discount_percent
                    });
                }
                ConsoleRequest::SetSearchQuery { query, respond_to } => {
                    self.edit(respond_to, |state| state.search_query = query);
                }
                ConsoleRequest::LoadOrdersForUser { user_id, respond_to } => {
                    self.start_load_orders_for_user(user_id, Some(respond_to));
                }
                ConsoleRequest::CreateOrder { draft, respond_to } => {
                    self.handle_create_order(draft, respond_to);
                }
                ConsoleRequest::CreateDiscountedOrder {
                    draft,
                    discount_percent,
                    respond_to,
                } => {
                    self.handle_create_discounted_order(draft, discount_percent, respond_to);
                }
                ConsoleRequest::SearchOrders { query, respond_to } => {
                    self.handle_search_orders(query, respond_to);
                }
                ConsoleRequest::CreateBatchOrders { user_id, respond_to } => {
                    self.handle_create_batch_orders(user_id, respond_to);
                }
                ConsoleRequest::FetchAllOrders { respond_to } => {
                    let api = self.api.clone();
                    self.dispatch(async move { api.all_orders().await }, move |result| {
                        Completion::AllOrdersLoaded {
                            result,
                            respond_to: Some(respond_to),
                        }
                    });
                }
                ConsoleRequest::FetchExpensiveProducts { respond_to } => {
                    let api = self.api.clone();
                    self.dispatch(async move { api.expensive_products().await }, move |result| {
                        Completion::ExpensiveProductsLoaded {
                            result,
                            respond_to: Some(respond_to),
                        }
                    });
                }
                ConsoleRequest::FetchOrderDetails { order_id, respond_to } => {
                    self.handle_fetch_order_details(order_id, respond_to);
                }
                ConsoleRequest::FetchUserOrderCounts { respond_to } => {
                    let api = self.api.clone();
                    self.dispatch(async move { api.user_order_counts().await }, move |result| {
                        Completion::UserOrderCountsLoaded {
                            result,
                            respond_to: Some(respond_to),
                        }
                    });
                }
                ConsoleRequest::FetchUserOrders { respond_to } => {
                    self.start_fetch_user_orders(Some(respond_to));
                }
                ConsoleRequest::Mount { respond_to } => {
                    self.handle_mount(respond_to);
                }
                ConsoleRequest::Completed(completion) => {
                    self.handle_completion(completion);
                }
                ConsoleRequest::Shutdown => {
                    info!("ConsoleService shutting down");
                    break;
                }
            }
        }

        info!("ConsoleService stopped");
    }

    // -------------------------------------------------------------------------
    // Rendering and effects
    // -------------------------------------------------------------------------

    fn render(&mut self) {
        self.state.renders += 1;
        self.publisher.send_replace(self.state.clone());
        debug!(render = self.state.renders, "Rendered");
        if self.mounted {
            self.run_effects();
        }
    }

    /// Runs after every render once mounted.
    ///
    /// The user-id effect is gated on the selected user changing. The
    /// user-orders effect has no gate at all: it fires on every render, and
    /// since its own completion renders again, it never settles.
    fn run_effects(&mut self) {
        let user_id = self.state.user_id;
        if self.effect_user != Some(user_id) {
            self.effect_user = Some(user_id);
            debug!(user_id = %user_id, "Selected user changed, reloading orders");
            self.start_load_orders_for_user(user_id, None);
        }
        self.start_fetch_user_orders(None);
    }

    fn handle_mount(&mut self, respond_to: ConsoleResponse<()>) {
        if self.mounted {
            let _ = respond_to.send(Ok(()));
            return;
        }
        info!(user_id = %self.state.user_id, "Mounting console");
        self.mounted = true;
        self.render();
        let _ = respond_to.send(Ok(()));
    }

    fn edit(&mut self, respond_to: ConsoleResponse<()>, change: impl FnOnce(&mut ConsoleState)) {
        change(&mut self.state);
        self.render();
        let _ = respond_to.send(Ok(()));
    }

    #[instrument(fields(user_id = %user_id), skip(self, user_id, respond_to))]
    fn handle_set_user_id(&mut self, user_id: UserId, respond_to: ConsoleResponse<()>) {
        debug!("Selecting user");
        self.state.select_user(user_id);
        self.render();
        let _ = respond_to.send(Ok(()));
    }

    // -------------------------------------------------------------------------
    // Starting calls
    // -------------------------------------------------------------------------

    /// Runs `call` in its own task and posts the wrapped result back to the
    /// loop. Nothing is awaited here and nothing is de-duplicated.
    fn dispatch<T, Fut, W>(&self, call: Fut, wrap: W)
    where
        T: Send + 'static,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
        W: FnOnce(ApiResult<T>) -> Completion + Send + 'static,
    {
        let Some(sender) = self.sender.upgrade() else {
            error!("Console channel closed, dropping call");
            return;
        };
        tokio::spawn(
            async move {
                let result = call.await;
                if sender
                    .send(ConsoleRequest::Completed(wrap(result)))
                    .await
                    .is_err()
                {
                    debug!("Console stopped before the call resolved");
                }
            }
            .in_current_span(),
        );
    }

    fn start_load_orders_for_user(&self, user_id: UserId, respond_to: Reply<Vec<Order>>) {
        let api = self.api.clone();
        self.dispatch(
            async move { api.list_orders_for_user(user_id).await },
            move |result| Completion::OrdersLoaded {
                user_id,
                result,
                respond_to,
            },
        );
    }

    fn start_fetch_user_orders(&self, respond_to: Reply<Vec<Order>>) {
        let api = self.api.clone();
        let user_id = self.state.user_id;
        self.dispatch(
            async move { api.user_orders(user_id).await },
            move |result| Completion::UserOrdersLoaded {
                user_id,
                result,
                respond_to,
            },
        );
    }

    #[instrument(fields(user_id = %draft.user_id, product = %draft.product, quantity = draft.quantity), skip(self, draft, respond_to))]
    fn handle_create_order(&self, draft: Draft, respond_to: ConsoleResponse<Order>) {
        let body = draft.to_new_order();
        debug!(total_price = body.total_price, "Submitting order");
        let api = self.api.clone();
        self.dispatch(async move { api.create_order(body).await }, move |result| {
            Completion::OrderCreated {
                result,
                respond_to: Some(respond_to),
            }
        });
    }

    #[instrument(fields(user_id = %draft.user_id, product = %draft.product), skip(self, draft, respond_to))]
    fn handle_create_discounted_order(
        &self,
        draft: Draft,
        discount_percent: f64,
        respond_to: ConsoleResponse<Order>,
    ) {
        debug!("Submitting discounted order");
        let body = draft.to_discounted(discount_percent);
        let api = self.api.clone();
        self.dispatch(
            async move { api.create_discounted_order(body).await },
            move |result| Completion::DiscountedOrderCreated {
                result,
                respond_to: Some(respond_to),
            },
        );
    }

    #[instrument(skip(self, respond_to))]
    fn handle_search_orders(&self, query: String, respond_to: ConsoleResponse<Vec<Order>>) {
        debug!("Searching orders");
        let api = self.api.clone();
        let search = query.clone();
        self.dispatch(async move { api.search_orders(search).await }, move |result| {
            Completion::SearchCompleted {
                query,
                result,
                respond_to: Some(respond_to),
            }
        });
    }

    #[instrument(fields(order_id = %order_id, user_id = %self.state.user_id), skip(self, order_id, respond_to))]
    fn handle_fetch_order_details(&self, order_id: OrderId, respond_to: ConsoleResponse<Order>) {
        debug!("Fetching order details");
        let api = self.api.clone();
        let user_id = self.state.user_id;
        self.dispatch(
            async move { api.order_details(order_id, user_id).await },
            move |result| Completion::OrderDetailsLoaded {
                order_id,
                result,
                respond_to: Some(respond_to),
            },
        );
    }

    /// Fires the synthesized creates and a re-fetch, then replies at once.
    /// The creates are never joined: no ordering, no aggregate outcome.
    #[instrument(fields(user_id = %user_id), skip(self, user_id, respond_to))]
    fn handle_create_batch_orders(
        &mut self,
        user_id: UserId,
        respond_to: ConsoleResponse<Vec<NewOrder>>,
    ) {
        let orders = synthesize_batch(user_id, &mut rand::thread_rng());
        info!(batch_size = orders.len(), "Dispatching batch orders");

        for (index, order) in orders.iter().cloned().enumerate() {
            let api = self.api.clone();
            tokio::spawn(
                async move {
                    match api.create_order(order).await {
                        Ok(created) => debug!(index, order_id = %created.id, "Batch order created"),
                        Err(e) => error!(index, error = %e, "Error creating batch order"),
                    }
                }
                .in_current_span(),
            );
        }

        self.state.clear_error();
        self.render();
        self.start_load_orders_for_user(user_id, None);
        let _ = respond_to.send(Ok(orders));
    }

    // -------------------------------------------------------------------------
    // Applying completions
    // -------------------------------------------------------------------------

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::OrdersLoaded {
                user_id,
                result,
                respond_to,
            } => {
                debug!(user_id = %user_id, "Orders for user resolved");
                self.apply_list_read(Operation::LoadOrdersForUser, result, respond_to);
            }
            Completion::SearchCompleted {
                query,
                result,
                respond_to,
            } => {
                debug!(query = %query, "Search resolved");
                self.apply_list_read(Operation::SearchOrders, result, respond_to);
            }
            Completion::AllOrdersLoaded { result, respond_to } => {
                self.apply_list_read(Operation::FetchAllOrders, result, respond_to);
            }
            Completion::UserOrdersLoaded {
                user_id,
                result,
                respond_to,
            } => {
                debug!(user_id = %user_id, "User orders resolved");
                self.apply_list_read(Operation::FetchUserOrders, result, respond_to);
            }
            Completion::OrderCreated { result, respond_to } => match result {
                Ok(order) => {
                    info!(order_id = %order.id, product = %order.product, "Order created");
                    self.state.order_appended(order.clone());
                    self.render();
                    send_reply!(respond_to, Ok(order));
                }
                Err(e) => {
                    let err = self.fail(Operation::CreateOrder, e);
                    send_reply!(respond_to, Err(err));
                }
            },
            Completion::DiscountedOrderCreated { result, respond_to } => match result {
                Ok(order) => {
                    info!(order_id = %order.id, "Discounted order created");
                    self.state.discounted_order_placed();
                    self.render();
                    self.start_load_orders_for_user(self.state.user_id, None);
                    send_reply!(respond_to, Ok(order));
                }
                Err(e) => {
                    // Logged only: the banner is deliberately left as it was.
                    error!(error = %e, "Error creating discounted order");
                    send_reply!(
                        respond_to,
                        Err(ConsoleError::Api {
                            operation: Operation::CreateDiscountedOrder,
                            source: e,
                        })
                    );
                }
            },
            Completion::ExpensiveProductsLoaded { result, respond_to } => match result {
                Ok(orders) => {
                    info!(order_count = orders.len(), "Expensive products loaded");
                    self.state.expensive_products_replaced(orders.clone());
                    self.render();
                    send_reply!(respond_to, Ok(orders));
                }
                Err(e) => {
                    error!(error = %e, "Error fetching expensive products");
                    self.state.expensive_products_failed();
                    self.render();
                    send_reply!(
                        respond_to,
                        Err(ConsoleError::Api {
                            operation: Operation::FetchExpensiveProducts,
                            source: e,
                        })
                    );
                }
            },
            Completion::OrderDetailsLoaded {
                order_id,
                result,
                respond_to,
            } => match result {
                Ok(order) => {
                    info!(order_id = %order_id, details = ?order, "Order details");
                    self.state.clear_error();
                    self.render();
                    send_reply!(respond_to, Ok(order));
                }
                Err(e) => {
                    let err = self.fail(Operation::FetchOrderDetails, e);
                    send_reply!(respond_to, Err(err));
                }
            },
            Completion::UserOrderCountsLoaded { result, respond_to } => match result {
                Ok(counts) => {
                    info!(counts = ?counts, "User order counts");
                    self.state.clear_error();
                    self.render();
                    send_reply!(respond_to, Ok(counts));
                }
                Err(e) => {
                    let err = self.fail(Operation::FetchUserOrderCounts, e);
                    send_reply!(respond_to, Err(err));
                }
            },
        }
    }

    fn apply_list_read(
        &mut self,
        operation: Operation,
        result: ApiResult<Vec<Order>>,
        respond_to: Reply<Vec<Order>>,
    ) {
        match result {
            Ok(orders) => {
                info!(operation = %operation, order_count = orders.len(), "Order list replaced");
                self.state.orders_replaced(orders.clone());
                self.render();
                send_reply!(respond_to, Ok(orders));
            }
            Err(e) => {
                error!(operation = %operation, error = %e, "Order list read failed");
                self.state.orders_failed(operation);
                self.render();
                send_reply!(respond_to, Err(ConsoleError::Api { operation, source: e }));
            }
        }
    }

    /// Logs the failure, raises the banner and renders.
    fn fail(&mut self, operation: Operation, e: ApiError) -> ConsoleError {
        error!(operation = %operation, error = %e, "Operation failed");
        self.state.fail(operation);
        self.render();
        ConsoleError::Api {
            operation,
            source: e,
        }
    }
}
