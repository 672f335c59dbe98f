// src/web/handlers/convert_handlers.rs
//! Conversion endpoints: structured document <-> Markdown / HTML / JSON

use rocket::serde::json::Json;
use rocket::State;
use tracing::{debug, error, info};

use crate::converter::{inspect, ItemReport};
use crate::types::ResumeDocument;
use crate::web::types::*;

pub async fn convert_handler(
    request: Json<StandardRequest<ConvertRequest>>,
    config: &State<ServerConfig>,
) -> Result<Json<DataResponse<ConvertedDocument>>, Json<StandardErrorResponse>> {
    let conversation_id = request.conversation_id.clone();
    let ConvertRequest {
        mut document,
        format,
    } = request.into_inner().data;
    let repaired = document.ensure_unique_ids();
    if repaired > 0 {
        debug!("Regenerated {} section ids", repaired);
    }

    info!(
        "Convert request: '{}' ({} sections) to {}",
        document.title,
        document.sections.len(),
        format
    );

    match config.converter.render(&document, format) {
        Ok(content) => Ok(Json(DataResponse::success(
            format!("Resume converted to {}", format),
            ConvertedDocument { format, content },
            conversation_id,
        ))),
        Err(e) => {
            error!("Failed to convert resume: {:#}", e);
            Err(Json(StandardErrorResponse::new(
                format!("Failed to convert resume: {}", e),
                "CONVERSION_ERROR".to_string(),
                vec!["Check that the document is a valid resume".to_string()],
                conversation_id,
            )))
        }
    }
}

pub async fn parse_handler(
    request: Json<StandardRequest<ParseRequest>>,
    config: &State<ServerConfig>,
) -> Result<Json<DataResponse<ResumeDocument>>, Json<StandardErrorResponse>> {
    let conversation_id = request.conversation_id.clone();
    let ParseRequest { content, format } = request.into_inner().data;

    info!("Parse request: {} bytes of {}", content.len(), format);

    match config.converter.parse(&content, format) {
        Ok(document) => Ok(Json(DataResponse::success(
            format!("Parsed {} sections from {}", document.sections.len(), format),
            document,
            conversation_id,
        ))),
        Err(e) => {
            error!("Failed to parse {} resume: {:#}", format, e);
            Err(Json(StandardErrorResponse::new(
                format!("Failed to parse resume: {:#}", e),
                "INVALID_DOCUMENT".to_string(),
                vec![
                    "Verify the content matches the declared format".to_string(),
                    "JSON input must contain a title and a sections array".to_string(),
                ],
                conversation_id,
            )))
        }
    }
}

pub async fn inspect_handler(
    request: Json<StandardRequest<InspectRequest>>,
) -> Json<DataResponse<Vec<ItemReport>>> {
    let conversation_id = request.conversation_id.clone();
    let mut document = request.into_inner().data.document;
    document.ensure_unique_ids();
    let reports = inspect(&document);

    Json(DataResponse::success(
        format!("Classified {} items", reports.len()),
        reports,
        conversation_id,
    ))
}
