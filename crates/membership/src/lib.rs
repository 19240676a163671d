//! Owner of the bidirectional Account <-> Event relation.
//!
//! Every operation runs in a single write transaction, so both sides of the
//! relation are changed together or not at all.

use std::ops::Deref;

use eventflow_shared::State;

mod add_attendee;
mod cascade;
mod leave;
mod reconcile;
mod remove_attendee;

pub use cascade::{AccountDetached, detach_account, detach_event};
pub use reconcile::ReconcileReport;

#[derive(Clone)]
pub struct Membership(pub State);

impl Deref for Membership {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
