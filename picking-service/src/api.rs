use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use diesel_async::{pooled_connection::bb8::Pool, AsyncPgConnection};
use jsonwebtoken::DecodingKey;
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use picking_core::SkippedLine;

use crate::handlers::{
    GenerateError, GenerateRequest, GeneratedItem, GenerationOutcome, PickListGenerator,
    PickListOverview,
};
use crate::auth::CurrentUser;

type DbPool = Pool<AsyncPgConnection>;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub jwt_decoding: DecodingKey,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<Vec<SkippedLine>>,
}

impl ApiError {
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Unauthorized".to_string(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request_with_details(message: impl Into<String>, details: Vec<SkippedLine>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            details: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<SkippedLine>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickListDto {
    pub id: Uuid,
    pub batch_number: String,
    pub status: String,
    pub assigned_to: Option<String>,
    pub total_items: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Warnings {
    pub skipped_items: Vec<SkippedLine>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub pick_list: PickListDto,
    pub items: Vec<GeneratedItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Warnings>,
}

impl From<GenerationOutcome> for GenerateResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        let warnings = if outcome.skipped.is_empty() {
            None
        } else {
            Some(Warnings {
                skipped_items: outcome.skipped,
            })
        };
        Self {
            pick_list: PickListDto {
                id: outcome.pick_list_id,
                batch_number: outcome.batch_number,
                status: outcome.status,
                assigned_to: outcome.assigned_to,
                total_items: outcome.total_items,
            },
            items: outcome.items,
            warnings,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub status: Option<String>,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickListSummary {
    pub id: Uuid,
    pub batch_number: String,
    pub status: String,
    pub assigned_to: Option<String>,
    pub total_items: i32,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub progress_percent: i32,
}

impl From<PickListOverview> for PickListSummary {
    fn from(overview: PickListOverview) -> Self {
        let list = overview.pick_list;
        Self {
            id: list.id,
            batch_number: list.batch_number,
            status: list.status,
            assigned_to: list.assigned_to,
            total_items: list.total_items,
            notes: list.notes,
            created_at: list.created_at,
            progress_percent: overview.progress_percent,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub pick_lists: Vec<PickListSummary>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/picking/generate",
            post(generate_pick_list).get(list_pick_lists),
        )
        .route("/health", get(health_check))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}

pub async fn generate_pick_list(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let generator = PickListGenerator::new(state.pool.clone());

    match generator.generate(&request, &user.id).await {
        Ok(outcome) => Ok(Json(GenerateResponse::from(outcome))),
        Err(GenerateError::NoCandidateOrders) => {
            Err(ApiError::bad_request("No allocated orders found"))
        }
        Err(GenerateError::NothingToPick(skipped)) => Err(ApiError::bad_request_with_details(
            "No pick items could be generated",
            skipped,
        )),
        Err(GenerateError::Internal(e)) => {
            error!(error = %e, "pick list generation failed");
            Err(ApiError::internal(e.to_string()))
        }
    }
}

pub async fn list_pick_lists(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let generator = PickListGenerator::new(state.pool.clone());

    match generator.list_recent(query.status, query.assigned_to).await {
        Ok(overviews) => Ok(Json(ListResponse {
            pick_lists: overviews.into_iter().map(Into::into).collect(),
        })),
        Err(e) => {
            error!(error = %e, "pick list listing failed");
            Err(ApiError::internal(e.to_string()))
        }
    }
}

pub async fn health_check() -> &'static str {
    "OK"
}
