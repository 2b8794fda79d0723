//! Authorization policy and request actor.
//!
//! Every handler resolves an [`Actor`] and asks this module two questions:
//! - may this actor perform the action at all ([`authorize`])
//! - which records may it see ([`achievement_scope`], [`student_scope`])
//!
//! Authorization is always evaluated before any existence check.

mod actor;
mod policy;

pub use actor::Actor;
pub use policy::{
    achievement_scope, admit, authorize, creation_target, ensure_active, ensure_approved,
    ensure_teacher_assignment, may_curate, permits, student_scope, AchievementScope, Action, StudentScope,
};
