//! Session pipeline.
//!
//! Every input to a capture session funnels into one channel consumed by a
//! single worker task:
//!
//! ```text
//! Coordinator handle ──┐
//! SessionListener  ────┼──► mpsc (serial context) ──► SessionWorker ──► on_complete / on_error
//! ReviewListener   ────┤
//! HeadingListener  ────┘
//! ```
//!
//! Because the worker owns the backend, the heading tracker and the
//! completion callbacks, no state inside a session needs a lock. The only
//! value shared with the caller is the atomic session state in
//! [`crate::session`].

mod worker;

pub(crate) use worker::{Completion, SessionMessage, SessionWorker};
pub use worker::{CompleteCallback, ErrorCallback};
