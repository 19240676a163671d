use sea_query::Iden;

#[derive(Iden, Clone, Copy)]
pub enum Account {
    Table,
    Id,
    FullName,
    Email,
    PasswordHash,
    MobileNumber,
    ProfilePictureUrl,
    CreatedEventIds,
    AttendingEventIds,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum Event {
    Table,
    Id,
    Title,
    Description,
    Location,
    StartsAt,
    Time,
    Image,
    BannerPrimary,
    BannerSecondary,
    CreatorId,
    AttendeeIds,
    MaxAttendees,
    CreatedAt,
    UpdatedAt,
}
