//! End-to-end tests for dbplane.
//!
//! These tests drive the dispatch façade through its public contracts:
//! - the Operation × Service support table, for every pair
//! - backend routing and the shape of shared results
//! - lazy, single construction of the backend client
//! - composite operations and error context

#![cfg(test)]
