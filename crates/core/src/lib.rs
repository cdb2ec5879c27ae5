//! # cloudcmd Core
//!
//! Command execution and resource-client lifecycle - no infrastructure
//! dependencies.
//!
//! This crate contains:
//! - The command registry tree and path resolution
//! - Option binding and validation
//! - The single-slot credential/client cache
//! - The failure-to-status mapper and the execution pipeline
//! - Port interfaces (traits) for tenant resolution, client construction and
//!   resource-area services
//!
//! ## Architecture Principles
//! - Only depends on `cloudcmd-common` and `cloudcmd-domain`
//! - No HTTP or platform code
//! - All external collaborators via traits

pub mod areas;
pub mod clients;
pub mod errors;
pub mod options;
pub mod pipeline;
pub mod registry;
pub mod utils;

// Re-export specific items to avoid ambiguity
pub use areas::ports::{
    AppConfigService, KeyVaultService, KustoService, MarketplaceService, ResourceScope,
    ServiceBusService, StorageService,
};
pub use clients::{
    CacheStats, ClientOptions, HeaderPolicy, ResourceClientCache, ResourceClientFactory,
    TenantResolver,
};
pub use errors::mapper::{map_error, Outcome};
pub use options::{
    BoundOptions, OptionBinder, OptionDefinition, OptionKind, OptionValue, RawArgs,
};
pub use pipeline::{Command, CommandContext, CommandExecutor, Execution, ExecutionState};
pub use registry::{CommandNode, CommandRegistry, RegistryBuilder, RegistryError};
