//! Shared test helpers for `cloudcmd` integration tests.
//!
//! One in-memory mock stands in for every area service so tests drive the
//! full command tree without a management endpoint.

#![allow(dead_code)]

pub mod mocks;

use std::collections::HashMap;
use std::sync::Arc;

use cloudcmd_core::options::EnvLookup;
use cloudcmd_domain::Config;
use cloudcmd_lib::AppContext;

pub use mocks::{Call, MockAreas};

pub const SUBSCRIPTION_ID: &str = "sub123";

/// Environment lookup backed by a fixed map
pub fn env_with(vars: &[(&str, &str)]) -> EnvLookup {
    let vars: HashMap<String, String> =
        vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    Arc::new(move |name: &str| vars.get(name).cloned())
}

/// Context over `mock` with an empty environment
pub fn context(mock: &Arc<MockAreas>) -> AppContext {
    context_with(mock, Config::default(), env_with(&[]))
}

pub fn context_with(mock: &Arc<MockAreas>, config: Config, env: EnvLookup) -> AppContext {
    AppContext::with_services(config, &mock.services(), env)
        .expect("command registration must not conflict")
}
