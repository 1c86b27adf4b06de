//! Application layer containing the core business logic orchestration.
//!
//! This module defines the `RenewalEngine`, the single entry point for
//! registering lockers and processing payment submissions. The payment
//! computation itself is a pure function; the engine wires it to the
//! injected store ports.

pub mod engine;
