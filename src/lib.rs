// Allow panic/unwrap/expect in tests (denied globally via Cargo.toml lints)
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing
    )
)]

pub mod cors;
pub mod drive;
pub mod greeting;
pub mod grpc_logging;
pub mod logging;
pub mod metrics;
pub mod replicate;
pub mod server;
pub mod user_config;

// Re-export commonly used types
pub use drive::{
    DriveProvider, ItemDescriptor, ItemKind, MemoryProvider, ProviderError, ResourceRef,
    SeedItem,
};
pub use greeting::get_greeting;
pub use replicate::{
    extract_drive_id, BatchReport, CopiedFolder, CopyOutcome, CreatedItem, IterationReport,
    ReplicateError, Replicator, RetryPolicy, SkipReason,
};
pub use server::{DrivedupDaemonService, ShutdownSignal};
pub use user_config::{load_user_config, ReplicationConfig, UserConfig, UserConfigError};
