//! Integration tests for Marquee
//!
//! These tests run the real OMDb client and search session against a fake
//! OMDb served locally, covering the HTTP boundary, error mapping and the
//! debounce and ordering behavior end to end.

#![deny(unused_crate_dependencies)]

#[path = "integration/fake_omdb.rs"]
mod fake_omdb;

#[path = "integration/omdb_client.rs"]
mod omdb_client;

#[path = "integration/session_flow.rs"]
mod session_flow;
