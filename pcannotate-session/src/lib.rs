//! Interactive sessions over point cloud instances
//!
//! - [`AnnotationSession`]: walks every instance of a data directory, skips
//!   the ones already in the annotation log, and records one label per key
//!   press, saving the log after each decision.
//! - [`BrowsingSession`]: read-only cursor stepping back and forth through
//!   the instances of one file.
//!
//! Both are single-threaded. They wait for input only by pumping their
//! [`Display`](pcannotate_core::Display), and stop cooperatively when a
//! quit key or a window close sets their stop flag.

pub mod annotation;
pub mod browsing;
pub mod testing;

pub use annotation::{AnnotationSession, KeyOutcome, Presentation, RunSummary, SessionState};
pub use browsing::{BrowsingSession, Step};
