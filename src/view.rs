//! Plain-text rendering of a console state.

use std::fmt::Write;

use crate::console::ConsoleState;
use crate::domain::Order;

pub const EMPTY_ORDERS: &str = "No orders found for this user.";

pub fn render(state: &ConsoleState) -> String {
    let mut out = String::new();

    if let Some(error) = &state.error {
        let _ = writeln!(out, "Error: {error}");
        out.push('\n');
    }

    let _ = writeln!(out, "Order History (user {})", state.user_id);
    if state.orders.is_empty() {
        let _ = writeln!(out, "  {EMPTY_ORDERS}");
    } else {
        for order in &state.orders {
            render_order(&mut out, order);
        }
    }

    if !state.expensive_products.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "Expensive Products");
        for order in &state.expensive_products {
            let _ = writeln!(out, "  {:<30} ${:.2}", order.product, order.total_price);
        }
    }

    out
}

fn render_order(out: &mut String, order: &Order) {
    let _ = writeln!(
        out,
        "  #{} {}  [{}]",
        order.id,
        order.product,
        order.order_date.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(
        out,
        "      Quantity: {}  Total: ${:.2}",
        order.quantity, order.total_price
    );
}
