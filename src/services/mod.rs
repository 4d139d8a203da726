pub mod client_service;
pub mod meeting_service;
pub mod membership_service;
pub mod notification_service;
pub mod profile_service;
pub mod recurrence_service;
pub mod service_service;
pub mod stats_service;

pub use client_service::*;
pub use meeting_service::*;
pub use membership_service::*;
pub use notification_service::*;
pub use profile_service::*;
pub use recurrence_service::*;
pub use service_service::*;
pub use stats_service::*;
