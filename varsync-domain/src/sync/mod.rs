//! Synchronization of desired tokens into the variable store.

pub mod pipeline;
pub mod service;
pub mod types;


pub use pipeline::{PipelineReport, ThemePipeline};
pub use service::TokenSynchronizer;
pub use types::{
    Change, ChangeKind, DeletionTarget, DesiredToken, DesiredValue, RawLiteral, SyncRequest, SyncResponse,
};
