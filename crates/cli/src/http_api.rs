use crate::archive::{build_zip, ARCHIVE_NAME};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use conceptmap_core::{reconcile_inputs, ErrorCategory, ReconcileConfig, ReconcileError};
use std::sync::Arc;

pub(crate) const ALIAS_FIELD: &str = "alias_file";
pub(crate) const CONCEPTS_FIELD: &str = "conceptos_file";

#[derive(Clone)]
struct AppState {
    config: Arc<ReconcileConfig>,
}

pub(crate) fn router(config: ReconcileConfig, max_upload_bytes: usize) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(index_page))
        .route("/process", post(process_upload))
        .route("/health", get(|| async { "ok" }))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

async fn index_page() -> Html<String> {
    Html(render_form(None))
}

#[derive(Default)]
struct Uploads {
    alias: Option<Bytes>,
    concepts: Option<Bytes>,
}

async fn read_uploads(mut multipart: Multipart) -> Result<Uploads, String> {
    let mut uploads = Uploads::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| format!("Solicitud inválida: {err}"))?
    {
        let name = field.name().unwrap_or_default().to_string();
        // Browsers send an empty filename when no file was chosen.
        let chosen = field.file_name().map_or(true, |file| !file.is_empty());
        let bytes = field
            .bytes()
            .await
            .map_err(|err| format!("Error al leer los archivos: {err}"))?;
        if !chosen {
            continue;
        }

        match name.as_str() {
            ALIAS_FIELD => uploads.alias = Some(bytes),
            CONCEPTS_FIELD => uploads.concepts = Some(bytes),
            other => log::debug!("Ignoring unexpected upload field {other:?}"),
        }
    }
    Ok(uploads)
}

async fn process_upload(State(state): State<AppState>, multipart: Multipart) -> Response {
    let uploads = match read_uploads(multipart).await {
        Ok(uploads) => uploads,
        Err(message) => return form_error(StatusCode::BAD_REQUEST, message),
    };

    let config = Arc::clone(&state.config);
    let outcome = tokio::task::spawn_blocking(move || {
        reconcile_inputs(uploads.alias.as_deref(), uploads.concepts.as_deref(), &config)
    })
    .await;

    let encoded = match outcome {
        Ok(Ok(encoded)) => encoded,
        Ok(Err(err)) => {
            log::warn!("Upload rejected: {err}");
            let (status, message) = user_error(&err, &state.config);
            return form_error(status, message);
        }
        Err(err) => {
            log::error!("Reconcile task failed: {err}");
            return form_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error interno durante el procesamiento.".to_string(),
            );
        }
    };

    match build_zip(&encoded.files) {
        Ok(bytes) => {
            log::info!(
                "Served {ARCHIVE_NAME} ({} bytes, {} matched, {} unmatched, {} unused)",
                bytes.len(),
                encoded.stats.matched,
                encoded.stats.unmatched,
                encoded.stats.unused_keys
            );
            (
                [
                    (header::CONTENT_TYPE, "application/zip".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{ARCHIVE_NAME}\""),
                    ),
                ],
                bytes,
            )
                .into_response()
        }
        Err(err) => {
            log::error!("Failed to package outputs: {err:#}");
            form_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error al generar el archivo ZIP: {err}"),
            )
        }
    }
}

/// Status and message shown to the uploader for each error category
fn user_error(err: &ReconcileError, config: &ReconcileConfig) -> (StatusCode, String) {
    match err.category() {
        ErrorCategory::MissingInput => (
            StatusCode::BAD_REQUEST,
            "Debe subir ambos archivos (Alias y Conceptos).".to_string(),
        ),
        ErrorCategory::Encoding => (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!(
                "Error de codificación. Asegúrese de que los archivos sean '{}'.",
                config.encoding.as_str()
            ),
        ),
        ErrorCategory::Processing => (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Error durante el procesamiento de datos: {err}"),
        ),
    }
}

fn form_error(status: StatusCode, message: String) -> Response {
    (status, Html(render_form(Some(&message)))).into_response()
}

fn render_form(error: Option<&str>) -> String {
    let error_block = error
        .map(|message| format!("<p class=\"error\">Error: {}</p>\n", escape_html(message)))
        .unwrap_or_default();

    format!(
        r#"<!doctype html>
<html>
<head>
    <meta charset="utf-8">
    <title>Procesador de Archivos TXT</title>
    <style>
        body {{ font-family: sans-serif; margin: 20px; }}
        h1 {{ color: #333; }}
        .error {{ color: red; font-weight: bold; margin-bottom: 20px; }}
    </style>
</head>
<body>
    <h1>Herramienta de Mapeo y Procesamiento de Conceptos</h1>
    {error_block}<p>Por favor, sube los dos archivos de texto para comenzar el procesamiento.</p>
    <form method="post" enctype="multipart/form-data" action="/process">
        <p>1. Archivo de Alias (RelacionONVIO.txt): <input type="file" name="{ALIAS_FIELD}" required></p>
        <p>2. Archivo a Modificar (Relacion_de_Conceptos.TXT): <input type="file" name="{CONCEPTS_FIELD}" required></p>
        <p><input type="submit" value="Procesar Archivos"></p>
    </form>
    <hr>
    <p>La herramienta generará un archivo ZIP con los 3 reportes.</p>
</body>
</html>
"#
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use conceptmap_core::{InputKind, Stage, MATCHED_FILE_NAME, UNUSED_FILE_NAME};
    use std::io::{Cursor, Read};

    async fn spawn_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(ReconcileConfig::default(), 1024 * 1024);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn upload(name: &'static str, bytes: &'static [u8]) -> reqwest::multipart::Part {
        reqwest::multipart::Part::bytes(bytes).file_name(name)
    }

    #[test]
    fn form_escapes_error_message() {
        let html = render_form(Some("<b>\"x\" & y</b>"));
        assert!(html.contains("Error: &lt;b&gt;&quot;x&quot; &amp; y&lt;/b&gt;"));
        assert!(html.contains("name=\"alias_file\""));
        assert!(html.contains("name=\"conceptos_file\""));
        assert!(!render_form(None).contains("class=\"error\">"));
    }

    #[test]
    fn error_categories_map_to_distinct_messages() {
        let config = ReconcileConfig::default();

        let missing = ReconcileError::MissingInput(InputKind::Alias);
        let (status, message) = user_error(&missing, &config);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("ambos archivos"));

        let decode = ReconcileError::Decode {
            input: InputKind::Concepts,
            encoding: "utf-8",
            reason: "bad byte".into(),
        };
        let (status, message) = user_error(&decode, &config);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(message.contains("latin-1"));

        let stage = ReconcileError::stage(Stage::AliasIndex, "broken quote");
        let (_, message) = user_error(&stage, &config);
        assert!(message.starts_with("Error durante el procesamiento de datos"));
        assert!(message.contains("broken quote"));
    }

    #[tokio::test]
    async fn upload_returns_zip_with_reports() {
        let base = spawn_server().await;
        let form = reqwest::multipart::Form::new()
            .part(ALIAS_FIELD, upload("RelacionONVIO.txt", b"100;X;ALI1\n200;X;ALI2\n"))
            .part(
                CONCEPTS_FIELD,
                upload("Relacion_de_Conceptos.TXT", b"EMP001       100REST\n"),
            );

        let response = reqwest::Client::new()
            .post(format!("{base}/process"))
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"].to_str().unwrap(),
            "application/zip"
        );

        let bytes = response.bytes().await.unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        assert_eq!(archive.len(), 3);

        let mut matched = String::new();
        archive
            .by_name(MATCHED_FILE_NAME)
            .unwrap()
            .read_to_string(&mut matched)
            .unwrap();
        assert_eq!(matched, "EMP001ALI1      REST\n");

        let mut unused = String::new();
        archive
            .by_name(UNUSED_FILE_NAME)
            .unwrap()
            .read_to_string(&mut unused)
            .unwrap();
        assert_eq!(unused, "200;X;ALI2\n");
    }

    #[tokio::test]
    async fn missing_upload_re_renders_form() {
        let base = spawn_server().await;
        let form = reqwest::multipart::Form::new()
            .part(ALIAS_FIELD, upload("RelacionONVIO.txt", b"100;X;ALI1\n"));

        let response = reqwest::Client::new()
            .post(format!("{base}/process"))
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let body = response.text().await.unwrap();
        assert!(body.contains("Debe subir ambos archivos"));
    }

    #[tokio::test]
    async fn health_and_index_respond() {
        let base = spawn_server().await;
        let client = reqwest::Client::new();

        let health = client.get(format!("{base}/health")).send().await.unwrap();
        assert_eq!(health.text().await.unwrap(), "ok");

        let index = client.get(format!("{base}/")).send().await.unwrap();
        assert!(index.text().await.unwrap().contains("Procesador de Archivos TXT"));
    }
}
