//! Catalog query building blocks.
//!
//! # Responsibility
//! - Compose search criteria into one predicate over an entry.
//! - Provide interchangeable total orders and top-N recommendation strategies.
//!
//! # Invariants
//! - Query components are pure over the slice they receive: they never retain
//!   or mutate it, and never touch a store.
//! - Every sort is stable, so entries that compare equal keep input order.

pub mod filter;
pub mod ordering;
pub mod recommend;
