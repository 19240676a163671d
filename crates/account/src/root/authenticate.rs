use eventflow_db::account::{self, AccountDoc};
use eventflow_shared::Error;
use validator::Validate;

use crate::password::verify_password;

#[derive(Validate, Clone, Debug)]
pub struct AuthenticateInput {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl super::Command {
    /// Resolves the account by email and checks the password.
    #[tracing::instrument(skip_all, fields(email = %input.email))]
    pub async fn authenticate(
        &self,
        input: AuthenticateInput,
    ) -> eventflow_shared::Result<AccountDoc> {
        let input = AuthenticateInput {
            email: account::normalize_email(&input.email),
            password: input.password,
        };
        input.validate()?;

        let found = {
            let mut conn = self.read_db.acquire().await?;
            account::find(&mut conn, account::FindType::Email(input.email.to_owned())).await?
        };

        let Some(account) = found else {
            eventflow_shared::not_found!("User");
        };

        if !verify_password(&input.password, &account.password_hash)? {
            tracing::debug!(account_id = %account.id, "password mismatch");
            return Err(Error::InvalidCredentials);
        }

        Ok(account)
    }
}
