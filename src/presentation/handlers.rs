// HTTP request handlers
use crate::domain::dashboard::Dashboard;
use crate::domain::error::{DashboardError, LoadFailure};
use crate::infrastructure::html_page::{render_dashboard_page, render_error_page};
use crate::infrastructure::http_response::{html_response, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<LoadFailure>,
}

impl From<&DashboardError> for ErrorBody {
    fn from(error: &DashboardError) -> Self {
        match error {
            DashboardError::MissingInputs(failures) => Self {
                error: "missing_input",
                message: error.to_string(),
                missing: failures.clone(),
            },
            DashboardError::Shape(_) => Self {
                error: "shape",
                message: error.to_string(),
                missing: Vec::new(),
            },
        }
    }
}

fn error_status(error: &DashboardError) -> StatusCode {
    match error {
        DashboardError::MissingInputs(_) => StatusCode::SERVICE_UNAVAILABLE,
        DashboardError::Shape(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Run the synchronous pipeline off the async workers
async fn build(state: &Arc<AppState>) -> Result<Result<Dashboard, DashboardError>, StatusCode> {
    let service = state.dashboard_service.clone();
    tokio::task::spawn_blocking(move || service.build_dashboard())
        .await
        .map_err(|e| {
            tracing::error!("Dashboard build task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

fn into_response(result: Result<Response, StatusCode>) -> Response {
    match result {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Rebuild the dashboard and render it as a page
pub async fn dashboard_page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let result = match build(&state).await {
        Ok(Ok(dashboard)) => match render_dashboard_page(&dashboard) {
            Ok(page) => html_response(StatusCode::OK, page),
            Err(e) => {
                tracing::error!("Page rendering error: {}", e);
                Err(StatusCode::INTERNAL_SERVER_ERROR)
            }
        },
        Ok(Err(error)) => {
            tracing::error!("Dashboard not built: {}", error);
            html_response(error_status(&error), render_error_page(&state.page_title, &error))
        }
        Err(status) => Err(status),
    };
    into_response(result)
}

/// Rebuild the dashboard and return statuses and chart specifications as JSON
pub async fn dashboard_json(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let result = match build(&state).await {
        Ok(Ok(dashboard)) => json_response(StatusCode::OK, &dashboard),
        Ok(Err(error)) => {
            tracing::error!("Dashboard not built: {}", error);
            json_response(error_status(&error), &ErrorBody::from(&error))
        }
        Err(status) => Err(status),
    };
    into_response(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::application::dashboard_service::tests::{sample_repository, shipped_config};

    fn state(drop_file: Option<&str>) -> Arc<AppState> {
        let mut repo = sample_repository();
        if let Some(file) = drop_file {
            repo.files.remove(file);
        }
        let config = shipped_config();
        Arc::new(AppState {
            page_title: config.page.title.clone(),
            dashboard_service: DashboardService::new(Arc::new(repo), config),
        })
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        assert_eq!(health_check().await, "ok");
    }

    #[tokio::test]
    async fn test_dashboard_json() {
        let response = dashboard_json(State(state(None))).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["charts"].as_array().unwrap().len(), 10);
        assert_eq!(body["charts"][0]["kind"], "line");
        assert_eq!(body["datasets"][0]["name"], "monthly_sales");
    }

    #[tokio::test]
    async fn test_dashboard_json_missing_input() {
        let response = dashboard_json(State(state(Some("top_products_clean.csv"))))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"], "missing_input");
        assert_eq!(body["missing"][0]["name"], "top_products");
        assert!(body.get("charts").is_none());
    }

    #[tokio::test]
    async fn test_dashboard_page() {
        let response = dashboard_page(State(state(None))).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_string(response).await;
        assert!(page.contains("<h2>Bonus vs Discount</h2>"));
        assert!(page.contains("chart-specs"));
    }

    #[tokio::test]
    async fn test_dashboard_page_missing_input() {
        let response = dashboard_page(State(state(Some("monthly_sales_clean.csv"))))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let page = body_string(response).await;
        assert!(page.contains("mem/monthly_sales_clean.csv: file not found"));
        assert!(!page.contains("chart-specs"));
    }
}
