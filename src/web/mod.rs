// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use tracing::info;

use crate::converter::{ItemReport, ResumeConverter};
use crate::core::ConverterConfig;
use crate::types::ResumeDocument;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[post("/convert", data = "<request>")]
pub async fn convert(
    request: Json<StandardRequest<ConvertRequest>>,
    config: &State<ServerConfig>,
) -> Result<Json<DataResponse<ConvertedDocument>>, Json<StandardErrorResponse>> {
    handlers::convert_handler(request, config).await
}

#[post("/parse", data = "<request>")]
pub async fn parse(
    request: Json<StandardRequest<ParseRequest>>,
    config: &State<ServerConfig>,
) -> Result<Json<DataResponse<ResumeDocument>>, Json<StandardErrorResponse>> {
    handlers::parse_handler(request, config).await
}

#[post("/inspect", data = "<request>")]
pub async fn inspect(
    request: Json<StandardRequest<InspectRequest>>,
) -> Json<DataResponse<Vec<ItemReport>>> {
    handlers::inspect_handler(request).await
}

#[get("/template")]
pub async fn template() -> Json<DataResponse<ResumeDocument>> {
    handlers::template_handler().await
}

#[get("/health")]
pub async fn health() -> Json<TextResponse> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Endpoint not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Available endpoints: /convert, /parse, /inspect, /template, /health".to_string()],
        None,
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body does not match the expected shape".to_string(),
        "UNPROCESSABLE_ENTITY".to_string(),
        vec![
            "Documents need a title and a sections array".to_string(),
            "Format must be one of json, markdown, html".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec!["Try again in a few moments".to_string()],
        None,
    ))
}

pub fn build_rocket(config: &ConverterConfig) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", config.server.address.clone()))
        .merge(("port", config.server.port));

    rocket::custom(figment)
        .attach(Cors)
        .manage(ServerConfig {
            converter: ResumeConverter::new(config.html.clone()),
        })
        .register(
            "/api",
            catchers![bad_request, not_found, unprocessable, internal_error],
        )
        .mount(
            "/api",
            routes![convert, parse, inspect, template, health, options],
        )
}

pub async fn start_web_server(config: &ConverterConfig) -> Result<()> {
    info!("Starting resume conversion API server");
    info!(
        "Server: http://{}:{}/api",
        config.server.address, config.server.port
    );
    info!("HTML escaping: {}", config.html.escape_values);

    let _rocket = build_rocket(config)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Web server failed: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::http::ContentType;
    use rocket::local::blocking::Client;
    use serde_json::{json, Value};

    fn client() -> Client {
        Client::tracked(build_rocket(&ConverterConfig::default())).expect("valid rocket instance")
    }

    fn scenario_document() -> Value {
        json!({
            "title": "A - B",
            "sections": [{
                "section name": "Experience",
                "id": "x1",
                "content": [{"job title": "Eng", "Organization": "Acme", "Duration": "2020-2024", "Description": "Built things."}]
            }]
        })
    }

    #[test]
    fn test_health() {
        let client = client();
        let response = client.get("/api/health").dispatch();

        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "OK");
    }

    #[test]
    fn test_convert_to_markdown() {
        let client = client();
        let response = client
            .post("/api/convert")
            .header(ContentType::JSON)
            .body(json!({"document": scenario_document(), "format": "markdown", "conversation_id": "c1"}).to_string())
            .dispatch();

        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().unwrap();
        assert_eq!(body["type"], "data");
        assert_eq!(body["conversation_id"], "c1");
        assert_eq!(body["data"]["format"], "markdown");
        let content = body["data"]["content"].as_str().unwrap();
        assert!(content.contains("### Eng (2020-2024)"));
    }

    #[test]
    fn test_convert_repairs_duplicate_section_ids() {
        let client = client();
        let document = json!({
            "title": "T",
            "sections": [
                {"section name": "One", "id": "dup", "content": []},
                {"section name": "Two", "id": "dup", "content": []}
            ]
        });
        let response = client
            .post("/api/convert")
            .header(ContentType::JSON)
            .body(json!({"document": document, "format": "html"}).to_string())
            .dispatch();

        let body: Value = response.into_json().unwrap();
        let html = body["data"]["content"].as_str().unwrap();
        assert_eq!(html.matches("data-id=\"dup\"").count(), 1);
        assert_eq!(html.matches("data-id=\"").count(), 2);
    }

    #[test]
    fn test_parse_html_placeholder() {
        let client = client();
        let response = client
            .post("/api/parse")
            .header(ContentType::JSON)
            .body(json!({"content": "<not-even-html", "format": "html"}).to_string())
            .dispatch();

        let body: Value = response.into_json().unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["sections"][0]["section name"], "Error");
    }

    #[test]
    fn test_parse_invalid_json_reports_error() {
        let client = client();
        let response = client
            .post("/api/parse")
            .header(ContentType::JSON)
            .body(json!({"content": "{oops", "format": "json"}).to_string())
            .dispatch();

        let body: Value = response.into_json().unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], "INVALID_DOCUMENT");
    }

    #[test]
    fn test_inspect_and_template() {
        let client = client();
        let response = client
            .post("/api/inspect")
            .header(ContentType::JSON)
            .body(json!({"document": scenario_document()}).to_string())
            .dispatch();
        let body: Value = response.into_json().unwrap();
        assert_eq!(body["data"][0]["template"], "experience");

        let body: Value = client.get("/api/template").dispatch().into_json().unwrap();
        assert_eq!(body["data"]["sections"][1]["section name"], "Experience");
    }

    #[test]
    fn test_unknown_format_is_unprocessable() {
        let client = client();
        let response = client
            .post("/api/convert")
            .header(ContentType::JSON)
            .body(json!({"document": scenario_document(), "format": "pdf"}).to_string())
            .dispatch();

        assert_eq!(response.status(), Status::UnprocessableEntity);
        let body: Value = response.into_json().unwrap();
        assert_eq!(body["error_code"], "UNPROCESSABLE_ENTITY");
    }

    #[test]
    fn test_cors_headers() {
        let client = client();
        let response = client.options("/api/convert").dispatch();

        assert_eq!(response.status(), Status::Ok);
        assert_eq!(
            response.headers().get_one("Access-Control-Allow-Origin"),
            Some("*")
        );
    }
}
