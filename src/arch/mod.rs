//! # Architecture Abstraction Layer
//!
//! Hardware-specific code behind a narrow boundary: scheduler clock
//! control, the context-switch exception handler, synthetic stack frames,
//! and the one-way jump into the idle task. Currently implements the
//! Cortex-M4 port; extensible to other architectures by adding sibling
//! modules.

pub mod cortex_m4;
