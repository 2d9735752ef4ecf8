//! Task link distribution.
//!
//! A [`LinkDraft`] holds what the user typed. Validation turns it into a
//! [`HitCreationRequest`] locally; only valid requests reach the
//! [`HitCreationService`], and only one at a time per
//! [`LinkDistributionWorkflow`].
//!
//! | Mode | Participants | Link shown |
//! |------|--------------|------------|
//! | `individual` | required | first per-participant link |
//! | `group` | required | first group link |
//! | `open` | never sent | the single link |

mod request;
mod response;
mod workflow;

pub use request::{parse_participants, DistributionMode, HitCreationRequest, LinkDraft};
pub use response::{CreatedLinks, HitCreationResponse, HitLink};
pub use workflow::{HitCreationService, LinkDistributionWorkflow};
