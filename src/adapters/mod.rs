//! Port implementations: live HTTP clients plus record/replay wrappers.

pub mod live;
pub mod recording;
pub mod replaying;
