//! # REST API for Birthday Management
//!
//! Endpoints for creating, retrieving, updating, deleting, searching and
//! listing birthdays. Mounted under `/api/birthdays`.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use shared::{
    BirthdayListResponse, BirthdayResponse, CreateBirthdayRequest, DeleteBirthdayResponse, EventType,
    ListBirthdaysQuery, SearchBirthdaysQuery, UpcomingBirthdaysQuery, UpdateBirthdayRequest, STATUS_SUCCESS,
};
use tracing::info;

use crate::io::rest::error::ApiError;
use crate::io::rest::mappers::BirthdayMapper;
use crate::AppState;

/// Window used by `/upcoming` when no `days` parameter is given
pub const DEFAULT_UPCOMING_DAYS: i64 = 30;

type ApiResult<T> = Result<T, ApiError>;

/// Create the birthday API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_birthdays).post(create_birthday))
        .route("/search", get(search_birthdays))
        .route("/upcoming", get(get_upcoming_birthdays))
        .route("/event-type/:event_type", get(get_birthdays_by_event_type))
        .route("/:id", get(get_birthday).put(update_birthday).delete(delete_birthday))
}

fn parse_event_type(raw: &str, path: &str) -> ApiResult<EventType> {
    raw.parse::<EventType>()
        .map_err(|e| ApiError::bad_request(e.to_string(), path))
}

/// List birthdays, optionally limited to an upcoming window or an event type.
/// `daysAhead` wins when both filters are given.
pub async fn list_birthdays(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    query: Result<Query<ListBirthdaysQuery>, QueryRejection>,
) -> ApiResult<Json<BirthdayListResponse>> {
    let path = uri.path();
    let Query(query) = query.map_err(|e| ApiError::from_query_rejection(e, path))?;
    info!(
        "GET {} - eventType={:?}, daysAhead={:?}",
        path, query.event_type, query.days_ahead
    );

    let service = &state.birthday_service;
    let views = match (query.days_ahead, query.event_type.as_deref()) {
        (Some(days), _) => service.list_upcoming(days).await,
        (None, Some(raw)) => service.list_by_event_type(parse_event_type(raw, path)?).await,
        (None, None) => service.list_birthdays().await,
    }
    .map_err(|e| ApiError::from_service(e, path))?;

    info!("Retrieved {} birthdays", views.len());
    Ok(Json(BirthdayListResponse::new(
        "Birthdays retrieved successfully",
        BirthdayMapper::to_dto_list(views),
    )))
}

/// Create a new birthday
pub async fn create_birthday(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<CreateBirthdayRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<BirthdayResponse>)> {
    let path = uri.path();
    let Json(request) = payload.map_err(|e| ApiError::from_json_rejection(e, path))?;
    info!("POST {} - request: {:?}", path, request);

    let command = BirthdayMapper::to_create_command(request).map_err(|f| ApiError::validation(f, path))?;
    let view = state
        .birthday_service
        .create_birthday(command)
        .await
        .map_err(|e| ApiError::from_service(e, path))?;

    Ok((
        StatusCode::CREATED,
        Json(BirthdayResponse {
            status: STATUS_SUCCESS.to_string(),
            message: "Birthday created successfully".to_string(),
            data: BirthdayMapper::to_dto(view),
        }),
    ))
}

/// Get a birthday by ID
pub async fn get_birthday(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> ApiResult<Json<BirthdayResponse>> {
    let path = uri.path();
    info!("GET {}", path);

    let view = state
        .birthday_service
        .get_birthday(&id)
        .await
        .map_err(|e| ApiError::from_service(e, path))?;

    Ok(Json(BirthdayResponse {
        status: STATUS_SUCCESS.to_string(),
        message: "Birthday retrieved successfully".to_string(),
        data: BirthdayMapper::to_dto(view),
    }))
}

/// Update a birthday. Fields left out of the body keep their stored value.
pub async fn update_birthday(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    payload: Result<Json<UpdateBirthdayRequest>, JsonRejection>,
) -> ApiResult<Json<BirthdayResponse>> {
    let path = uri.path();
    let Json(request) = payload.map_err(|e| ApiError::from_json_rejection(e, path))?;
    info!("PUT {} - request: {:?}", path, request);

    let command = BirthdayMapper::to_update_command(request).map_err(|f| ApiError::validation(f, path))?;
    let view = state
        .birthday_service
        .update_birthday(&id, command)
        .await
        .map_err(|e| ApiError::from_service(e, path))?;

    Ok(Json(BirthdayResponse {
        status: STATUS_SUCCESS.to_string(),
        message: "Birthday updated successfully".to_string(),
        data: BirthdayMapper::to_dto(view),
    }))
}

/// Delete a birthday
pub async fn delete_birthday(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteBirthdayResponse>> {
    let path = uri.path();
    info!("DELETE {}", path);

    state
        .birthday_service
        .delete_birthday(&id)
        .await
        .map_err(|e| ApiError::from_service(e, path))?;

    Ok(Json(DeleteBirthdayResponse {
        status: STATUS_SUCCESS.to_string(),
        message: "Birthday deleted successfully".to_string(),
        id,
    }))
}

/// Case-insensitive name search
pub async fn search_birthdays(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    query: Result<Query<SearchBirthdaysQuery>, QueryRejection>,
) -> ApiResult<Json<BirthdayListResponse>> {
    let path = uri.path();
    let Query(query) = query.map_err(|e| ApiError::from_query_rejection(e, path))?;
    info!("GET {} - name={:?}", path, query.name);

    let views = state
        .birthday_service
        .search_birthdays(query.name.as_deref())
        .await
        .map_err(|e| ApiError::from_service(e, path))?;

    let mut response = BirthdayListResponse::new("Search completed successfully", BirthdayMapper::to_dto_list(views));
    response.search_term = query.name;
    Ok(Json(response))
}

/// Birthdays of a single event type, soonest first
pub async fn get_birthdays_by_event_type(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(event_type): Path<String>,
) -> ApiResult<Json<BirthdayListResponse>> {
    let path = uri.path();
    info!("GET {}", path);

    let event_type = parse_event_type(&event_type, path)?;
    let views = state
        .birthday_service
        .list_by_event_type(event_type)
        .await
        .map_err(|e| ApiError::from_service(e, path))?;

    let mut response = BirthdayListResponse::new("Birthdays retrieved successfully", BirthdayMapper::to_dto_list(views));
    response.event_type = Some(event_type);
    Ok(Json(response))
}

/// Birthdays coming up within `days` (default 30), soonest first
pub async fn get_upcoming_birthdays(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    query: Result<Query<UpcomingBirthdaysQuery>, QueryRejection>,
) -> ApiResult<Json<BirthdayListResponse>> {
    let path = uri.path();
    let Query(query) = query.map_err(|e| ApiError::from_query_rejection(e, path))?;
    let days = query.days.unwrap_or(DEFAULT_UPCOMING_DAYS);
    info!("GET {} - days={}", path, days);

    let views = state
        .birthday_service
        .list_upcoming(days)
        .await
        .map_err(|e| ApiError::from_service(e, path))?;

    let mut response = BirthdayListResponse::new(
        "Upcoming birthdays retrieved successfully",
        BirthdayMapper::to_dto_list(views),
    );
    response.days_ahead = Some(days);
    Ok(Json(response))
}
