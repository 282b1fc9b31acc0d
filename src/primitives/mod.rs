//! Low-level algorithms shared by the stores.
//!
//! Query results are produced by exporting an index snapshot and running one of
//! these routines over it; index traversal order is never the answer.

/// Quicksort family and sorted-merge intersection.
///
/// Recency, id and count orderings plus the intersection used for mutual
/// relationship queries.
pub mod sort;
