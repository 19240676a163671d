use eventflow_db::{
    account::{self, EventList, FindType},
    event::{self, EventDoc},
};
use eventflow_shared::image::Uploads;
use ulid::Ulid;
use validator::Validate;

#[derive(Validate, Clone, Debug, Default)]
pub struct CreateInput {
    #[validate(custom(function = "eventflow_shared::not_blank"))]
    pub title: String,
    #[validate(custom(function = "eventflow_shared::not_blank"))]
    pub description: String,
    #[validate(custom(function = "eventflow_shared::not_blank"))]
    pub location: String,
    #[validate(custom(function = "eventflow_shared::not_blank"))]
    pub date: String,
    #[validate(custom(function = "eventflow_shared::not_blank"))]
    pub time: String,
    #[validate(custom(function = "eventflow_shared::not_blank"))]
    pub image: String,
    #[validate(custom(function = "eventflow_shared::not_blank"))]
    pub banner1: String,
    #[validate(custom(function = "eventflow_shared::not_blank"))]
    pub banner2: String,
    #[validate(range(min = 0, message = "Max attendees must be a non-negative number"))]
    pub max_attendees: Option<i64>,
}

impl super::Command {
    #[tracing::instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(
        &self,
        creator_id: &str,
        input: CreateInput,
    ) -> eventflow_shared::Result<EventDoc> {
        input.validate()?;

        let starts_at = crate::date::parse_future_date(&input.date, eventflow_shared::now())?;

        let creator = {
            let mut conn = self.read_db.acquire().await?;
            account::find(&mut conn, FindType::Id(creator_id.to_owned())).await?
        };

        if creator.is_none() {
            eventflow_shared::not_found!("Account");
        }

        let mut uploads = Uploads::default();
        let host = self.images.as_ref();
        let image = uploads.upload(host, "Image", &input.image).await?;
        let banner_primary = uploads.upload(host, "Banner1", &input.banner1).await?;
        let banner_secondary = uploads.upload(host, "Banner2", &input.banner2).await?;

        let result = self
            .insert_event(
                creator_id,
                event::CreateInput {
                    id: Ulid::new().to_string(),
                    title: input.title.trim().to_owned(),
                    description: input.description.trim().to_owned(),
                    location: input.location.trim().to_owned(),
                    starts_at,
                    time: input.time,
                    image,
                    banner_primary,
                    banner_secondary,
                    creator_id: creator_id.to_owned(),
                    max_attendees: input.max_attendees.unwrap_or(0),
                },
            )
            .await;

        let event = uploads.settle(host, result).await?;

        tracing::info!(event_id = %event.id, creator_id = %event.creator_id, "event created");

        Ok(event)
    }

    async fn insert_event(
        &self,
        creator_id: &str,
        input: event::CreateInput,
    ) -> eventflow_shared::Result<EventDoc> {
        let id = input.id.to_owned();
        let mut tx = self.write_db.begin().await?;

        if account::find(&mut tx, FindType::Id(creator_id.to_owned()))
            .await?
            .is_none()
        {
            eventflow_shared::not_found!("Account");
        }

        event::create(&mut tx, input).await?;
        account::push_event_id(&mut tx, creator_id, EventList::Created, &id).await?;

        let Some(event) = event::find(&mut tx, &id).await? else {
            eventflow_shared::server!("event {id} missing after create");
        };

        tx.commit().await?;

        Ok(event)
    }
}
