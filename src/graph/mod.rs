//! Composable building blocks for the mixer signal chain.
//!
//! Graph nodes wrap the low-level DSP primitives in a block-based interface
//! so channel strips and the master bus can be assembled with
//! `NodeExt::through` instead of hand-written processing loops.

/// Feedback echo used as the effects return.
pub mod delay;
/// Fluent combinators (`.through()`, `.gain()`).
pub mod extensions;
/// Fixed and smoothed gain stages.
pub mod gain;
/// Core traits shared by all graph nodes.
pub mod node;
/// `GraphNode` impls for the EQ and dynamics processors.
pub mod processors;
/// Serial chaining of two nodes (source → effect).
pub mod through;
