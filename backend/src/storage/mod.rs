//! # Storage Module
//!
//! Abstracts the household data service behind repository traits.
//!
//! - **traits**: the CRUD interface the domain services depend on
//! - **memory**: a thread-safe in-memory implementation
//! - **snapshot**: YAML file format used to persist the in-memory store

pub mod memory;
pub mod snapshot;
pub mod traits;

pub use memory::MemoryConnection;
pub use snapshot::Snapshot;
pub use traits::{ChoreStorage, Connection, CookingStorage, ProfileStorage, TaskStorage};
