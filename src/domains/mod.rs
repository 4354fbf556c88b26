//! Domains module containing business logic organized by bounded contexts.
//!
//! The adapters only expose tools; each backing service lives under
//! `tools::definitions`.

pub mod tools;
