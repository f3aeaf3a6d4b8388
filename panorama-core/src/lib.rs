// panorama-core/src/lib.rs

#![allow(missing_docs)]
// Memory safety
#![deny(unsafe_code)]
// Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (traits)
// Contracts with the gate backend (GateStore).
pub mod ports;

// 2. Domain
// Metric catalog, conditions, gate aggregate, mutability rules, result interpretation.
// Pure and synchronous; depends on nothing else in the crate.
pub mod domain;

// 3. Infrastructure (adapters)
// Config files, catalog loading, JSON file store.
pub mod infrastructure;

// 4. Application (use cases)
// Submission, deletion, status fetching, metric resolution for projects.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::PanoramaError;
