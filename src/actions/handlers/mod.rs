//! Action handler bodies
//!
//! Every handler checks its own preconditions and early-returns when the
//! target is absent (no focused window, workspace out of range); nothing
//! here is allowed to escalate to a user-visible error.

pub mod media;
pub mod session;
pub mod window;
pub mod workspace;
