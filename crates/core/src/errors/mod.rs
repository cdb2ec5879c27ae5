//! Failure classification for command responses

pub mod mapper;
