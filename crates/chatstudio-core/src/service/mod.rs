//! Domain services layered over the repository ports.

pub mod store;
