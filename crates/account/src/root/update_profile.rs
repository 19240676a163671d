use eventflow_db::account::{self, AccountDoc};
use eventflow_shared::image::Uploads;
use sqlx::SqliteConnection;
use validator::Validate;

use super::RE_MOBILE;
use crate::password::hash_password;

/// Blank values count as not supplied.
#[derive(Validate, Clone, Debug, Default)]
pub struct UpdateProfileInput {
    pub full_name: Option<String>,
    pub profile_picture: Option<String>,
    #[validate(regex(path = *RE_MOBILE, message = "Invalid mobile number format"))]
    pub mobile_number: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub new_password: Option<String>,
    pub confirm_new_password: Option<String>,
}

async fn ensure_updatable(
    conn: &mut SqliteConnection,
    account_id: &str,
    mobile_number: Option<&str>,
) -> eventflow_shared::Result<()> {
    if account::find(conn, account::FindType::Id(account_id.to_owned()))
        .await?
        .is_none()
    {
        eventflow_shared::not_found!("User");
    }

    if let Some(mobile_number) = mobile_number {
        if account::is_mobile_number_exists(conn, mobile_number, Some(account_id)).await? {
            eventflow_shared::conflict!("This mobile number is already in use by another account");
        }
    }

    Ok(())
}

fn supplied(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl super::Command {
    #[tracing::instrument(skip(self, input))]
    pub async fn update_profile(
        &self,
        account_id: &str,
        input: UpdateProfileInput,
    ) -> eventflow_shared::Result<AccountDoc> {
        let input = UpdateProfileInput {
            full_name: supplied(input.full_name),
            profile_picture: supplied(input.profile_picture),
            mobile_number: supplied(input.mobile_number),
            new_password: input.new_password.filter(|v| !v.is_empty()),
            confirm_new_password: input.confirm_new_password.filter(|v| !v.is_empty()),
        };

        if input.full_name.is_none()
            && input.profile_picture.is_none()
            && input.mobile_number.is_none()
            && input.new_password.is_none()
            && input.confirm_new_password.is_none()
        {
            eventflow_shared::invalid!("At least one field is required to update");
        }

        if input.new_password != input.confirm_new_password {
            eventflow_shared::invalid!("Passwords do not match");
        }

        input.validate()?;

        let password_hash = input
            .new_password
            .as_deref()
            .map(hash_password)
            .transpose()?;

        {
            let mut conn = self.read_db.acquire().await?;
            ensure_updatable(&mut conn, account_id, input.mobile_number.as_deref()).await?;
        }

        let mut uploads = Uploads::default();
        let host = self.images.as_ref();
        let profile_picture_url = uploads
            .upload_optional(host, "Profile picture", input.profile_picture.as_deref())
            .await?;

        let result = self
            .apply_profile_update(account::UpdateInput {
                id: account_id.to_owned(),
                full_name: input.full_name,
                password_hash,
                mobile_number: input.mobile_number,
                profile_picture_url,
                ..Default::default()
            })
            .await;

        let account = uploads.settle(host, result).await?;

        tracing::info!(account_id, "profile updated");

        Ok(account)
    }

    async fn apply_profile_update(
        &self,
        changes: account::UpdateInput,
    ) -> eventflow_shared::Result<AccountDoc> {
        let account_id = changes.id.to_owned();
        let mut tx = self.write_db.begin().await?;

        ensure_updatable(&mut tx, &account_id, changes.mobile_number.as_deref()).await?;

        account::update(&mut tx, changes).await?;

        let Some(account) =
            account::find(&mut tx, account::FindType::Id(account_id.to_owned())).await?
        else {
            eventflow_shared::server!("account {account_id} missing after profile update");
        };

        tx.commit().await?;

        Ok(account)
    }
}
