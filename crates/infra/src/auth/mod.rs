//! Credentials and tenant resolution

pub mod credential;
pub mod tenant;

pub use credential::{AccessToken, ChainedCredential, CredentialSettings};
pub use tenant::ArmTenantResolver;
