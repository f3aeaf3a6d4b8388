// panorama-core/src/ports/mod.rs

pub mod gate_store;

pub use gate_store::{ApiSurface, GateOwner, GateStore};
