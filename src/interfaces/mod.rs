//! Inbound/outbound adapters for the front-desk CLI.

pub mod csv;
