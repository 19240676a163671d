use eventflow_db::account::{self, AccountDoc};
use ulid::Ulid;
use validator::Validate;

use super::RE_MOBILE;
use crate::password::hash_password;

pub const DEFAULT_PROFILE_PICTURE: &str = "https://cdn.pixabay.com/photo/2015/10/05/22/37/blank-profile-picture-973460_960_720.png";

#[derive(Validate, Clone, Debug)]
pub struct RegisterInput {
    #[validate(custom(function = "eventflow_shared::not_blank"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[validate(regex(path = *RE_MOBILE, message = "Invalid mobile number format"))]
    pub mobile_number: String,
}

impl super::Command {
    #[tracing::instrument(skip_all, fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> eventflow_shared::Result<AccountDoc> {
        let input = RegisterInput {
            full_name: input.full_name.trim().to_owned(),
            email: account::normalize_email(&input.email),
            password: input.password,
            mobile_number: input.mobile_number.trim().to_owned(),
        };
        input.validate()?;

        let password_hash = hash_password(&input.password)?;
        let id = Ulid::new().to_string();

        let mut tx = self.write_db.begin().await?;

        if account::is_email_exists(&mut tx, &input.email).await? {
            eventflow_shared::conflict!("User already exists");
        }

        if account::is_mobile_number_exists(&mut tx, &input.mobile_number, None).await? {
            eventflow_shared::conflict!("Mobile number is already registered with another account");
        }

        account::create(
            &mut tx,
            account::CreateInput {
                id: id.to_owned(),
                full_name: input.full_name,
                email: input.email,
                password_hash,
                mobile_number: input.mobile_number,
                profile_picture_url: DEFAULT_PROFILE_PICTURE.to_owned(),
            },
        )
        .await?;

        let Some(account) = account::find(&mut tx, account::FindType::Id(id.to_owned())).await?
        else {
            eventflow_shared::server!("account {id} missing after register");
        };

        tx.commit().await?;

        tracing::info!(account_id = %account.id, "account registered");

        Ok(account)
    }
}
