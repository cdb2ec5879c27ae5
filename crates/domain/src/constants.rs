//! Application constants
//!
//! Centralized location for the status codes, environment variable names and
//! defaults shared across cloudcmd crates.

// Response status codes
pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_UNAUTHORIZED: u16 = 401;
pub const STATUS_FORBIDDEN: u16 = 403;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_ERROR: u16 = 500;
pub const STATUS_SERVICE_UNAVAILABLE: u16 = 503;

pub const SUCCESS_MESSAGE: &str = "Success";
pub const COMMAND_NOT_FOUND_MESSAGE: &str = "Command not found";

// Identity
pub const APP_NAME: &str = "cloudcmd";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// Environment variables
pub const ENV_SUBSCRIPTION_ID: &str = "AZURE_SUBSCRIPTION_ID";
pub const ENV_TENANT_ID: &str = "AZURE_TENANT_ID";
pub const ENV_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
pub const ENV_ACCESS_TOKEN: &str = "AZURE_ACCESS_TOKEN";
pub const ENV_MANAGEMENT_ENDPOINT: &str = "CLOUDCMD_MANAGEMENT_ENDPOINT";
pub const ENV_AUTHORITY_HOST: &str = "CLOUDCMD_AUTHORITY_HOST";
pub const ENV_LOG_LEVEL: &str = "CLOUDCMD_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "CLOUDCMD_LOG_FORMAT";

// Remote endpoints
pub const DEFAULT_MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";
pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 100;

// Client-library retry defaults, used for fields a caller leaves unset
pub const DEFAULT_RETRY_DELAY_SECS: f64 = 0.8;
pub const DEFAULT_RETRY_MAX_DELAY_SECS: f64 = 60.0;
pub const DEFAULT_RETRY_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_NETWORK_TIMEOUT_SECS: f64 = 100.0;

// Tokens are refreshed this long before they expire
pub const TOKEN_REFRESH_MARGIN_SECS: u64 = 300;

pub const TRANSPORT_STDIO: &str = "stdio";
