//! Store facade tying the user registry, follow graph and post timeline
//! together.

mod shared;
mod store;

#[cfg(test)]
mod tests;

pub use shared::SharedStore;
pub use store::{SocialStore, StoreStats};
