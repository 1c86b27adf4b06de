//! Domain entities and the ports they are persisted through.

pub mod locker;
pub mod payment;
pub mod ports;
pub mod submission;
