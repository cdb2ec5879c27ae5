//! Azure Resource Manager access

pub mod client;
pub mod factory;
pub mod locator;

pub use client::ArmClient;
pub use factory::ArmClientFactory;
pub use locator::{ResourceLocator, SubscriptionResolver};
