//! Shared test helpers for `cloudcmd-core` integration tests.
//!
//! In-memory mocks for the cache ports and a scripted command so tests can
//! focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod clients;
pub mod commands;
