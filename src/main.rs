use clap::{Parser, Subcommand};
use tracing::{error, info, Instrument};

use order_console::app_system::{setup_tracing, ConsoleSystem};
use order_console::clients::ConsoleClient;
use order_console::config::{ConsoleConfig, API_URL_ENV, DEFAULT_API_URL};
use order_console::domain::{Draft, OrderId, UserId};
use order_console::error::ConsoleError;
use order_console::view;

#[derive(Debug, Parser)]
#[command(name = "order_console", about = "Order console for the web-store demo service")]
struct Cli {
    /// Base URL of the order service
    #[arg(long, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load one user's orders
    List { user: u64 },
    /// Create an order priced at quantity x price
    Create {
        user: u64,
        product: String,
        quantity: u32,
        price: f64,
    },
    /// Create an order priced by the service with a discount
    Discounted {
        user: u64,
        product: String,
        quantity: u32,
        price: f64,
        percent: f64,
    },
    /// Search orders by product name
    Search { query: String },
    /// Fire five random orders for a user
    Batch { user: u64 },
    /// Fetch every order of every user
    All,
    /// Fetch the service's expensive products
    Expensive,
    /// Fetch one order's details for a user
    Details { user: u64, order: u64 },
    /// Fetch order counts per user
    Counts,
    /// Mount the console and print each render
    Watch {
        #[arg(long, default_value_t = 10)]
        renders: u64,
        #[arg(long, default_value_t = 1)]
        user: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let cli = Cli::parse();
    let config = ConsoleConfig::new(&cli.api_url).map_err(|e| e.to_string())?;

    info!(api_url = %config.api_url, "Starting order console");

    let system = ConsoleSystem::new(&config);
    let client = system.console_client.clone();

    let span = tracing::info_span!("command");
    let outcome = run(&client, cli.command).instrument(span).await;

    if let Err(e) = &outcome {
        // Already reflected in the banner (or deliberately not).
        error!(error = %e, "Command failed");
    }
    println!("{}", view::render(&client.snapshot()));

    system.shutdown().await.map_err(|e| e.to_string())?;
    Ok(())
}

async fn run(client: &ConsoleClient, command: Command) -> Result<(), ConsoleError> {
    match command {
        Command::List { user } => {
            client.set_user_id(UserId(user)).await?;
            client.load_orders_for_user(UserId(user)).await?;
        }
        Command::Create {
            user,
            product,
            quantity,
            price,
        } => {
            client.set_user_id(UserId(user)).await?;
            let order = client
                .create_order(Draft::new(UserId(user), product, quantity, price))
                .await?;
            info!(order_id = %order.id, total_price = order.total_price, "Order created");
        }
        Command::Discounted {
            user,
            product,
            quantity,
            price,
            percent,
        } => {
            client.set_user_id(UserId(user)).await?;
            let order = client
                .create_discounted_order(Draft::new(UserId(user), product, quantity, price), percent)
                .await?;
            info!(order_id = %order.id, total_price = order.total_price, "Discounted order created");
        }
        Command::Search { query } => {
            client.set_search_query(query.clone()).await?;
            client.search_orders(query).await?;
        }
        Command::Batch { user } => {
            client.set_user_id(UserId(user)).await?;
            let batch = client.create_batch_orders(UserId(user)).await?;
            for order in &batch {
                info!(product = %order.product, quantity = order.quantity, total_price = order.total_price, "Batch order dispatched");
            }
            // The batch is never joined; give the detached calls a moment.
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        }
        Command::All => {
            client.fetch_all_orders().await?;
        }
        Command::Expensive => {
            client.fetch_expensive_products().await?;
        }
        Command::Details { user, order } => {
            client.set_user_id(UserId(user)).await?;
            let details = client.fetch_order_details(OrderId(order)).await?;
            println!("{details:#?}");
        }
        Command::Counts => {
            let counts = client.fetch_user_order_counts().await?;
            for (user, count) in counts {
                println!("user {user}: {count} orders");
            }
        }
        Command::Watch { renders, user } => {
            let mut snapshots = client.subscribe();
            client.set_user_id(UserId(user)).await?;
            client.mount().await?;
            while snapshots.changed().await.is_ok() {
                let state = snapshots.borrow_and_update().clone();
                println!("--- render {} ---\n{}", state.renders, view::render(&state));
                if state.renders >= renders {
                    break;
                }
            }
        }
    }
    Ok(())
}
