use eventflow_db::event::{self, EventDoc};
use eventflow_shared::{Error, image::Uploads};
use validator::Validate;

/// Partial update, `None` keeps the stored value.
#[derive(Validate, Clone, Debug, Default)]
pub struct UpdateInput {
    #[validate(custom(function = "eventflow_shared::not_blank"))]
    pub title: Option<String>,
    #[validate(custom(function = "eventflow_shared::not_blank"))]
    pub description: Option<String>,
    #[validate(custom(function = "eventflow_shared::not_blank"))]
    pub location: Option<String>,
    pub date: Option<String>,
    #[validate(custom(function = "eventflow_shared::not_blank"))]
    pub time: Option<String>,
    pub image: Option<String>,
    pub banner1: Option<String>,
    pub banner2: Option<String>,
    #[validate(range(min = 0, message = "Max attendees must be a non-negative number"))]
    pub max_attendees: Option<i64>,
}

/// Hosted image URLs resolved from the input payloads.
#[derive(Default)]
struct Images {
    image: Option<String>,
    banner_primary: Option<String>,
    banner_secondary: Option<String>,
}

impl super::Command {
    #[tracing::instrument(skip(self, input))]
    pub async fn update(
        &self,
        event_id: &str,
        requester_id: &str,
        input: UpdateInput,
    ) -> eventflow_shared::Result<EventDoc> {
        input.validate()?;

        let starts_at = input
            .date
            .as_deref()
            .map(crate::date::parse_date)
            .transpose()?;

        let current = {
            let mut conn = self.read_db.acquire().await?;
            event::find(&mut conn, event_id).await?
        };

        let Some(current) = current else {
            eventflow_shared::not_found!("Event");
        };

        if current.creator_id != requester_id {
            eventflow_shared::forbidden!("Only the event creator can update this event");
        }

        // Reject what can be rejected before any image is stored
        let has_images = input.image.is_some() || input.banner1.is_some() || input.banner2.is_some();
        let changes = changes(&current, &input, starts_at, Images::default())?;
        if changes.is_none() && !has_images {
            return Err(Error::NoOp);
        }

        let mut uploads = Uploads::default();
        let host = self.images.as_ref();
        let images = Images {
            image: uploads
                .upload_optional(host, "Image", input.image.as_deref())
                .await?,
            banner_primary: uploads
                .upload_optional(host, "Banner1", input.banner1.as_deref())
                .await?,
            banner_secondary: uploads
                .upload_optional(host, "Banner2", input.banner2.as_deref())
                .await?,
        };

        let result = self.apply_update(event_id, &input, starts_at, images).await;

        uploads.settle(host, result).await
    }

    async fn apply_update(
        &self,
        event_id: &str,
        input: &UpdateInput,
        starts_at: Option<i64>,
        images: Images,
    ) -> eventflow_shared::Result<EventDoc> {
        let mut tx = self.write_db.begin().await?;

        let Some(event) = event::find(&mut tx, event_id).await? else {
            eventflow_shared::not_found!("Event");
        };

        let Some(changes) = changes(&event, input, starts_at, images)? else {
            return Err(Error::NoOp);
        };

        event::update(&mut tx, changes).await?;

        let Some(event) = event::find(&mut tx, event_id).await? else {
            eventflow_shared::server!("event {event_id} missing after update");
        };

        tx.commit().await?;

        tracing::info!(event_id = %event.id, "event updated");

        Ok(event)
    }
}

/// Fields of `input` that differ from `event`, `None` when nothing changes.
fn changes(
    event: &EventDoc,
    input: &UpdateInput,
    starts_at: Option<i64>,
    images: Images,
) -> eventflow_shared::Result<Option<event::UpdateInput>> {
    let mut changes = event::UpdateInput {
        id: event.id.to_owned(),
        ..Default::default()
    };
    let mut has_data = false;

    if let Some(title) = input
        .title
        .as_deref()
        .map(|v| v.trim().to_owned())
        .filter(|v| *v != event.title)
    {
        has_data = true;
        changes.title = Some(title);
    }

    if let Some(description) = input
        .description
        .as_deref()
        .map(|v| v.trim().to_owned())
        .filter(|v| *v != event.description)
    {
        has_data = true;
        changes.description = Some(description);
    }

    if let Some(location) = input
        .location
        .as_deref()
        .map(|v| v.trim().to_owned())
        .filter(|v| *v != event.location)
    {
        has_data = true;
        changes.location = Some(location);
    }

    // Only a changed date has to lie in the future
    if let Some(starts_at) = starts_at.filter(|v| *v != event.starts_at) {
        has_data = true;
        changes.starts_at = Some(crate::date::ensure_future(
            starts_at,
            eventflow_shared::now(),
        )?);
    }

    if let Some(time) = input.time.as_ref().filter(|v| **v != event.time) {
        has_data = true;
        changes.time = Some(time.to_owned());
    }

    if let Some(image) = images.image.filter(|v| *v != event.image) {
        has_data = true;
        changes.image = Some(image);
    }

    if let Some(banner) = images.banner_primary.filter(|v| *v != event.banner_primary) {
        has_data = true;
        changes.banner_primary = Some(banner);
    }

    if let Some(banner) = images
        .banner_secondary
        .filter(|v| *v != event.banner_secondary)
    {
        has_data = true;
        changes.banner_secondary = Some(banner);
    }

    if let Some(max_attendees) = input.max_attendees.filter(|v| *v != event.max_attendees) {
        let attendees = event.attendee_ids.len() as i64;
        if max_attendees > 0 && max_attendees < attendees {
            eventflow_shared::invalid_operation!(
                "Max attendees cannot be lower than the current attendee count ({attendees})"
            );
        }

        has_data = true;
        changes.max_attendees = Some(max_attendees);
    }

    Ok(has_data.then_some(changes))
}
