pub mod clients;
pub mod meetings;
pub mod memberships;
pub mod notifications;
pub mod recurrences;
pub mod services;
pub mod users;

pub use meetings::MeetingStatus;
pub use memberships::MembershipStatus;
pub use notifications::NotificationType;
pub use recurrences::Frequency;
pub use users::Currency;

pub use clients as client_entity;
pub use meetings as meeting_entity;
pub use memberships as membership_entity;
pub use notifications as notification_entity;
pub use recurrences as recurrence_entity;
pub use services as service_entity;
pub use users as user_entity;
