// src/web/handlers/system_handlers.rs
use rocket::serde::json::Json;
use tracing::info;

use crate::editor::blank_template;
use crate::types::ResumeDocument;
use crate::web::types::*;

pub async fn template_handler() -> Json<DataResponse<ResumeDocument>> {
    Json(DataResponse::success(
        "Blank resume template".to_string(),
        blank_template(),
        None,
    ))
}

pub async fn health_handler() -> Json<TextResponse> {
    info!("Health check");
    Json(TextResponse::success("OK".to_string(), None))
}
