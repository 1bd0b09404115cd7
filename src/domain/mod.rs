pub mod draft;
pub mod order;

pub use draft::*;
pub use order::*;
