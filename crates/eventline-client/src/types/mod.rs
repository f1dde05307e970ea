pub mod batch;
pub mod subscription;

pub use batch::{Batch, Cursor, Event, EventMetadata};
pub use subscription::Subscription;
