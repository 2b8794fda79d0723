//! Approval state machines.
//!
//! Both are pure: they take the current record and return the transition to
//! persist, leaving the write itself to the stores.

pub mod account;
pub mod achievement;

pub use account::{AccountDecision, AccountTransition};
pub use achievement::{review, ReviewTransition, MAX_REMARKS_LEN};
