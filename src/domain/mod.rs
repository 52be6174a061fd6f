// Domain types and value objects
mod asset;
mod price;

pub use asset::AssetId;
pub use price::{DisplayPrice, PriceSource};
