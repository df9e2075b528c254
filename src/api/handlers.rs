use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::error;

use crate::error::Error;
use crate::pipeline;

use super::models::*;
use super::AppState;

pub async fn compute_ndvi(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NdviRequest>,
) -> Result<Json<NdviResponse>, (StatusCode, Json<ErrorResponse>)> {
    match pipeline::run(&state.config, state.live.as_ref(), &request.geometry).await {
        Ok(output) => Ok(Json(NdviResponse {
            status: "success",
            ndvi_file: output.record.raster_path.to_string_lossy().replace('\\', "/"),
            ndvi_overlay_url: output.record.overlay_url.clone(),
            bounds: output.bounds.to_array(),
            statistics: output.statistics.into(),
        })),
        Err(err) => Err(error_response(err)),
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn error_response(err: Error) -> (StatusCode, Json<ErrorResponse>) {
    let (status, message) = match &err {
        e if e.is_client_error() => (StatusCode::BAD_REQUEST, e.to_string()),
        Error::WriteFailure(detail) => {
            error!(detail = %detail, "asset write failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to write generated assets".to_string(),
            )
        }
        e if e.is_recoverable_upstream() => (StatusCode::BAD_GATEWAY, e.to_string()),
        _ => {
            error!(error = %err, "request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    };
    (
        status,
        Json(ErrorResponse {
            status: "error",
            message,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::create_router;
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn post_ndvi(dir: &TempDir, geometry: Value) -> (StatusCode, Value) {
        let mut config = Config::default();
        config.output_dir = dir.path().join("ndvi");
        config.static_dir = dir.path().to_path_buf();
        let state = Arc::new(AppState::from_config(config).unwrap());
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/ndvi")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "geometry": geometry }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_ndvi_endpoint_success_envelope() {
        let dir = TempDir::new().unwrap();
        let geometry = json!({
            "type": "Polygon",
            "coordinates": [[
                [10.1815, 36.8065],
                [10.1915, 36.8065],
                [10.1915, 36.8165],
                [10.1815, 36.8165],
                [10.1815, 36.8065],
            ]]
        });

        let (status, body) = post_ndvi(&dir, geometry).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");

        let bounds = body["bounds"].as_array().unwrap();
        assert!(bounds[0].as_f64().unwrap() < bounds[2].as_f64().unwrap());
        assert!(bounds[1].as_f64().unwrap() < bounds[3].as_f64().unwrap());

        let mean = body["statistics"]["mean"].as_f64().unwrap();
        assert!(mean > -1.0 && mean < 1.0);

        assert!(body["ndvi_file"].as_str().unwrap().ends_with(".tif"));
        assert!(body["ndvi_overlay_url"].as_str().unwrap().ends_with(".png"));
    }

    #[tokio::test]
    async fn test_invalid_geometry_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let geometry = json!({ "type": "Point", "coordinates": [10.0, 36.0] });

        let (status, body) = post_ndvi(&dir, geometry).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("geometry"));
    }

    #[tokio::test]
    async fn test_oversized_geometry_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let geometry = json!({
            "type": "Polygon",
            "coordinates": [[
                [0.0, 0.0],
                [10.0, 0.0],
                [10.0, 10.0],
                [0.0, 10.0],
                [0.0, 0.0],
            ]]
        });

        let (status, body) = post_ndvi(&dir, geometry).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.static_dir = dir.path().to_path_buf();
        let state = Arc::new(AppState::from_config(config).unwrap());
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_generated_overlay_is_served() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.output_dir = dir.path().join("static").join("ndvi");
        config.static_dir = dir.path().join("static");
        let state = Arc::new(AppState::from_config(config).unwrap());
        let app = create_router(state);

        let geometry = json!({
            "type": "Polygon",
            "coordinates": [[
                [10.1815, 36.8065],
                [10.1915, 36.8065],
                [10.1915, 36.8165],
                [10.1815, 36.8165],
                [10.1815, 36.8065],
            ]]
        });
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/ndvi")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "geometry": geometry }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        // the overlay URL path resolves through the static file service
        let overlay_url = body["ndvi_overlay_url"].as_str().unwrap();
        let path = overlay_url
            .rfind("/static/")
            .map(|at| &overlay_url[at..])
            .unwrap();
        let served = app
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(served.status(), StatusCode::OK);
    }
}
