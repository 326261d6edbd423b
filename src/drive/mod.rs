//! Drive provider port and backends.
//!
//! The replication core only ever talks to the drive through the
//! [`DriveProvider`] trait; backends live behind it. The in-memory backend
//! is both the daemon's default and the test fixture.

pub mod kind;
pub mod memory;
pub mod provider;
pub mod types;

pub use kind::ItemKind;
pub use memory::{MemoryProvider, SeedItem};
pub use provider::{DriveProvider, ProviderError};
pub use types::{ItemDescriptor, ResourceRef};
