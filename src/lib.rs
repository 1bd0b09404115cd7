//! # Order Console
//!
//! Client side of a small web-store demo: holds one user's order list and
//! form inputs, talks to a remote order service over HTTP/JSON, and publishes
//! every state change to observers.
//!
//! - **Domain types** → [`domain::Order`], [`domain::Draft`]
//! - **Service seam** → [`api::OrderApi`], [`api::HttpOrderApi`]
//! - **State owner** → [`console::ConsoleService`] with [`console::ConsoleState`]
//! - **Handle** → [`clients::ConsoleClient`]
//! - **Lifecycle** → [`app_system::ConsoleSystem`], [`app_system::setup_tracing`]
//!
//! The console keeps the demo's known defects observable: discounted-order
//! failures never reach the error banner, batch creates are fired without
//! being joined, and once mounted the user-orders effect re-fetches after
//! every render.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use order_console::app_system::ConsoleSystem;
//! use order_console::config::ConsoleConfig;
//! use order_console::domain::{Draft, UserId};
//!
//! let system = ConsoleSystem::new(&ConsoleConfig::from_env()?);
//! let client = system.console_client.clone();
//!
//! client.load_orders_for_user(UserId(1)).await?;
//! client.create_order(Draft::new(UserId(1), "Widget", 3, 10.0)).await?;
//! println!("{}", order_console::view::render(&client.snapshot()));
//!
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app_system;
pub mod clients;
pub mod config;
pub mod console;
pub mod domain;
pub mod error;
pub mod messages;
pub mod view;

#[cfg(test)]
mod mock_framework;
