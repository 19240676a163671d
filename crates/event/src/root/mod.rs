use std::ops::Deref;

use eventflow_membership::Membership;
use eventflow_shared::{SharedImageHost, State};

mod create;
mod delete;
mod update;

pub use create::CreateInput;
pub use update::UpdateInput;

#[derive(Clone)]
pub struct Command {
    state: State,
    images: SharedImageHost,
    pub membership: Membership,
}

impl Deref for Command {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: State, images: SharedImageHost) -> Self {
        Self {
            membership: Membership(state.clone()),
            images,
            state,
        }
    }
}
