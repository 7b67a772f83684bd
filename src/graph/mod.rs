//! Graph construction and representation
//!
//! This module builds the undirected co-occurrence graph from ranked lemma
//! pairs, prunes isolated pairs and computes node strength.

pub mod builder;
pub mod components;
pub mod cooccurrence;
pub mod csr;
