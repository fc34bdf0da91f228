//! Delivery of the latest record: live per request, or a static snapshot file.

pub mod live;
pub mod snapshot;

pub use live::{router, LiveServer, PAGE_ERROR_MESSAGE, PageData, PageLoader, PageVideo};
pub use snapshot::{SnapshotOutcome, SnapshotPublisher};
