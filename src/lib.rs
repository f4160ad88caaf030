pub mod config;
pub mod processing;
pub mod templates;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, multipart::MultipartError},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use config::ServerConfig;
use processing::{FitProcessError, ProcessedFit, edited_file_name, process_fit_bytes};
use templates::render_landing_page;
use tracing::{error, info, warn};

const FALLBACK_FILE_NAME: &str = "activity.fit";

pub fn build_app(config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(landing_page))
        .route("/upload", post(handle_upload))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
}

async fn landing_page() -> Html<String> {
    Html(render_landing_page())
}

async fn handle_upload(mut multipart: Multipart) -> Response {
    let mut uploaded: Option<(String, Vec<u8>)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return multipart_rejection(err),
        };
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_FILE_NAME)
            .to_string();
        match field.bytes().await {
            Ok(bytes) => uploaded = Some((file_name, bytes.to_vec())),
            Err(err) => return multipart_rejection(err),
        }
    }

    let Some((file_name, file_bytes)) = uploaded else {
        return (StatusCode::BAD_REQUEST, "No file provided").into_response();
    };

    match process_fit_bytes(&file_bytes) {
        Ok(processed) => download_response(&file_name, processed),
        Err(err) => render_processing_error(&file_name, err),
    }
}

/// Oversized bodies surface here as 413; malformed multipart as 400.
fn multipart_rejection(err: MultipartError) -> Response {
    let status = err.status();
    warn!(%status, error = %err, "rejected multipart upload");
    (status, format!("Failed to read uploaded file: {}", err.body_text())).into_response()
}

fn download_response(file_name: &str, processed: ProcessedFit) -> Response {
    let edited_name = edited_file_name(&sanitize_file_name(file_name));
    info!(
        file = %edited_name,
        records = processed.totals.record_count,
        total_distance = processed.totals.total_distance,
        "processed upload"
    );

    (
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{edited_name}\""),
            ),
        ],
        processed.processed_bytes,
    )
        .into_response()
}

fn render_processing_error(file_name: &str, error: FitProcessError) -> Response {
    match &error {
        FitProcessError::Unexpected(_) => {
            error!(file = %file_name, error = %error, "failed to process upload");
            (StatusCode::INTERNAL_SERVER_ERROR, error.user_message()).into_response()
        }
        _ => {
            warn!(file = %file_name, error = %error, "rejected upload");
            (StatusCode::BAD_REQUEST, error.user_message()).into_response()
        }
    }
}

/// Keep the download name safe to place in a quoted header value.
fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    base.chars()
        .map(|ch| {
            if (ch.is_ascii_graphic() && ch != '"') || ch == ' ' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_names_drop_paths_and_quotes() {
        assert_eq!(sanitize_file_name("C:\\rides\\tour.fit"), "tour.fit");
        assert_eq!(sanitize_file_name("a\"b.fit"), "a_b.fit");
        assert_eq!(sanitize_file_name("ride é.fit"), "ride _.fit");
    }
}
