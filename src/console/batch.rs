use rand::Rng;

use crate::domain::{NewOrder, UserId};

pub const BATCH_SIZE: usize = 5;

/// Synthetic orders for the batch button: random label, quantity in [1, 10]
/// and a total drawn directly from [0, 100).
pub fn synthesize_batch<R: Rng + ?Sized>(user_id: UserId, rng: &mut R) -> Vec<NewOrder> {
    (0..BATCH_SIZE)
        .map(|_| NewOrder {
            user_id,
            product: format!("Batch Product {}", rng.gen_range(0..1000)),
            quantity: rng.gen_range(1..=10),
            total_price: rng.gen_range(0.0..100.0),
        })
        .collect()
}
