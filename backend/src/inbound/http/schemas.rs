//! Response payloads shared by several handlers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier of a stored submission.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: uuid::Uuid,
}
