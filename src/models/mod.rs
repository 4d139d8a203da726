pub mod client;
pub mod common;
pub mod meeting;
pub mod membership;
pub mod notification;
pub mod profile;
pub mod recurrence;
pub mod service;
pub mod stats;

pub use client::*;
pub use common::*;
pub use meeting::*;
pub use membership::*;
pub use notification::*;
pub use profile::*;
pub use recurrence::*;
pub use service::*;
pub use stats::*;
