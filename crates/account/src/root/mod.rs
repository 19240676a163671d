use std::{ops::Deref, sync::LazyLock};

use eventflow_shared::{SharedImageHost, State};
use regex::Regex;

mod authenticate;
mod delete;
mod register;
mod update_profile;

pub use authenticate::AuthenticateInput;
pub use register::{DEFAULT_PROFILE_PICTURE, RegisterInput};
pub use update_profile::UpdateProfileInput;

/// Canonical mobile number rule for registration and profile updates.
pub(crate) static RE_MOBILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10,15}$").unwrap());

#[derive(Clone)]
pub struct Command {
    state: State,
    images: SharedImageHost,
}

impl Deref for Command {
    type Target = State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: State, images: SharedImageHost) -> Self {
        Self { state, images }
    }
}
