use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error envelope body, mirrored by every non-2xx response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}
