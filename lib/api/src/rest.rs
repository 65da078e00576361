use actix_cors::Cors;
use actix_multipart::form::{tempfile::TempFile, MultipartForm, MultipartFormConfig};
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::Deserialize;
use sheetqa_core::Error;
use sheetqa_engine::{QaEngine, TableFormat, DEFAULT_TOP_K};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Upload size cap; spreadsheets past this are rejected before parsing
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(MultipartForm)]
struct UploadForm {
    #[multipart(rename = "file")]
    file: TempFile,
}

#[derive(Deserialize)]
struct AskRequest {
    query: String,
    #[serde(default = "default_top_k")]
    top_k: usize,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        engine: Arc<QaEngine>,
        host: &str,
        port: u16,
        static_dir: Option<PathBuf>,
    ) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            let mut app = App::new()
                .wrap(cors)
                .app_data(web::Data::new(engine.clone()))
                .app_data(
                    MultipartFormConfig::default()
                        .total_limit(MAX_UPLOAD_BYTES)
                        .memory_limit(MAX_UPLOAD_BYTES),
                )
                .route("/upload", web::post().to(upload))
                .route("/ask", web::post().to(ask))
                .route("/status", web::get().to(status));

            if let Some(dir) = &static_dir {
                app = app
                    .service(actix_files::Files::new("/", dir.clone()).index_file("index.html"));
            }

            app
        })
        .bind((host, port))?
        .run()
        .await
    }
}

async fn upload(
    engine: web::Data<Arc<QaEngine>>,
    form: MultipartForm<UploadForm>,
) -> ActixResult<HttpResponse> {
    let form = form.into_inner();

    let file_name = form.file.file_name.clone().unwrap_or_default();
    let format = match TableFormat::from_filename(&file_name) {
        Some(f) => f,
        None => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("unsupported file type: {file_name:?}")
            })));
        }
    };

    let bytes = match std::fs::read(form.file.file.path()) {
        Ok(b) => b,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("failed to read upload: {e}")
            })));
        }
    };

    info!(file = %file_name, bytes = bytes.len(), "upload received");

    let engine = engine.get_ref().clone();
    let result = web::block(move || engine.load_table(&bytes, format)).await?;

    match result {
        Ok(stats) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": format!("indexed {} rows", stats.rows)
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn ask(
    engine: web::Data<Arc<QaEngine>>,
    req: web::Json<AskRequest>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();

    if req.query.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "query must not be empty"
        })));
    }
    if req.top_k == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "top_k must be at least 1"
        })));
    }

    let engine = engine.get_ref().clone();
    let result = web::block(move || engine.ask(&req.query, req.top_k)).await?;

    match result {
        Ok(answer) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "answer": answer.text
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn status(engine: web::Data<Arc<QaEngine>>) -> ActixResult<HttpResponse> {
    let status = engine.status();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "ready": status.ready,
        "rows": status.rows,
        "dim": status.dim,
    })))
}

/// Map the error taxonomy onto HTTP statuses. Asking before any corpus was
/// indexed is a precondition failure, not a bad request.
fn error_response(error: &Error) -> HttpResponse {
    let body = serde_json::json!({ "error": error.to_string() });
    match error {
        Error::IndexNotReady => HttpResponse::Conflict().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_statuses() {
        let not_ready = error_response(&Error::IndexNotReady);
        assert_eq!(not_ready.status(), actix_web::http::StatusCode::CONFLICT);

        let parse = error_response(&Error::Parse("bad file".to_string()));
        assert_eq!(parse.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_default_top_k_deserialization() {
        let req: AskRequest = serde_json::from_str(r#"{"query": "How old is Alice?"}"#).unwrap();
        assert_eq!(req.top_k, DEFAULT_TOP_K);

        let req: AskRequest =
            serde_json::from_str(r#"{"query": "How old is Alice?", "top_k": 5}"#).unwrap();
        assert_eq!(req.top_k, 5);
    }
}
