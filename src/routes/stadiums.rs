use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::stadiums::{CreateStadiumRequest, StadiumList, UpdateStadiumRequest},
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthUser,
    models::Stadium,
    response::ApiResponse,
    routes::params::StadiumQuery,
    services::stadium_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stadiums).post(create_stadium))
        .route(
            "/{id}",
            get(get_stadium).put(update_stadium).delete(delete_stadium),
        )
}

#[utoipa::path(
    get,
    path = "/api/stadiums",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Search name or location"),
        ("sort_by" = Option<String>, Query, description = "created_at, price_per_hour, name, capacity"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "List stadiums", body = ApiResponse<StadiumList>)
    ),
    tag = "Stadiums"
)]
pub async fn list_stadiums(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<StadiumQuery>,
) -> AppResult<Json<ApiResponse<StadiumList>>> {
    let resp = stadium_service::list_stadiums(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/stadiums/{id}",
    params(
        ("id" = Uuid, Path, description = "Stadium ID")
    ),
    responses(
        (status = 200, description = "Get stadium", body = ApiResponse<Stadium>),
        (status = 404, description = "Stadium not found"),
    ),
    tag = "Stadiums"
)]
pub async fn get_stadium(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Stadium>>> {
    let resp = stadium_service::get_stadium(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/stadiums",
    request_body = CreateStadiumRequest,
    responses(
        (status = 201, description = "Create stadium (admin only)", body = ApiResponse<Stadium>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stadiums"
)]
pub async fn create_stadium(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateStadiumRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Stadium>>)> {
    let resp = stadium_service::create_stadium(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/stadiums/{id}",
    params(
        ("id" = Uuid, Path, description = "Stadium ID")
    ),
    request_body = UpdateStadiumRequest,
    responses(
        (status = 200, description = "Updated stadium", body = ApiResponse<Stadium>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Stadium not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stadiums"
)]
pub async fn update_stadium(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateStadiumRequest>,
) -> AppResult<Json<ApiResponse<Stadium>>> {
    let resp = stadium_service::update_stadium(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/stadiums/{id}",
    params(
        ("id" = Uuid, Path, description = "Stadium ID")
    ),
    responses(
        (status = 200, description = "Deleted stadium", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Stadium still has bookings"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Stadium not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stadiums"
)]
pub async fn delete_stadium(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = stadium_service::delete_stadium(&state, &user, id).await?;
    Ok(Json(resp))
}
