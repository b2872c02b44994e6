use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};

use crate::{
    db::dao::TicketFilter,
    db::entities::TicketStatus,
    response::ApiResult,
    routes::{API_PREFIX, api::users::UserResponse, params::empty_string_as_none},
    services::{ServiceContext, TicketDetails, TicketInput, TicketService},
    state::AppState,
};

const BASE_PATH: &str = "/tickets";

/// Unknown members (`id`, `assignedUser`, timestamps) are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
    pub assigned_user_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketRequest {
    pub id: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
    pub assigned_user_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub assigned_user_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTicketsQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<TicketStatus>,
    #[serde(
        default,
        alias = "assigned_user_id",
        deserialize_with = "empty_string_as_none"
    )]
    pub assigned_user_id: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TicketStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub assigned_user_id: Option<i32>,
    pub assigned_user: Option<UserResponse>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(BASE_PATH, get(list_tickets).post(create_ticket))
        .route(
            "/tickets/{id}",
            get(get_ticket).put(update_ticket).delete(delete_ticket),
        )
        .route("/tickets/{id}/assign", post(assign_ticket))
        .with_state(state)
}

async fn list_tickets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListTicketsQuery>,
) -> ApiResult<Json<Vec<TicketResponse>>> {
    let filter = TicketFilter {
        status: query.status,
        assigned_user_id: query.assigned_user_id,
    };
    let tickets = ticket_service_from_state(state.as_ref())
        .list(filter)
        .await?;
    Ok(Json(tickets.into_iter().map(TicketResponse::from).collect()))
}

async fn get_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<TicketResponse>> {
    let ticket = ticket_service_from_state(state.as_ref()).get(id).await?;
    Ok(Json(ticket.into()))
}

async fn create_ticket(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTicketRequest>,
) -> ApiResult<impl IntoResponse> {
    let input = TicketInput {
        title: body.title,
        description: body.description,
        status: body.status,
        assigned_user_id: body.assigned_user_id,
    };
    let ticket = ticket_service_from_state(state.as_ref())
        .create(input)
        .await?;
    let location = format!("{API_PREFIX}{BASE_PATH}/{}", ticket.ticket.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(TicketResponse::from(ticket)),
    ))
}

async fn update_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateTicketRequest>,
) -> ApiResult<Json<TicketResponse>> {
    let body_id = body.id.unwrap_or_default();
    let input = TicketInput {
        title: body.title,
        description: body.description,
        status: body.status,
        assigned_user_id: body.assigned_user_id,
    };
    let ticket = ticket_service_from_state(state.as_ref())
        .update(id, body_id, input)
        .await?;
    Ok(Json(ticket.into()))
}

async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    ticket_service_from_state(state.as_ref()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn assign_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(body): Json<AssignRequest>,
) -> ApiResult<Json<TicketResponse>> {
    let ticket = ticket_service_from_state(state.as_ref())
        .assign(id, body.assigned_user_id)
        .await?;
    Ok(Json(ticket.into()))
}

impl From<TicketDetails> for TicketResponse {
    fn from(details: TicketDetails) -> Self {
        let TicketDetails {
            ticket,
            assigned_user,
        } = details;
        Self {
            id: ticket.id,
            title: ticket.title,
            description: ticket.description,
            status: ticket.status,
            created_at: ticket.created_at,
            updated_at: ticket.updated_at,
            assigned_user_id: ticket.assigned_user_id,
            assigned_user: assigned_user.map(UserResponse::from),
        }
    }
}

fn ticket_service_from_state(state: &AppState) -> TicketService {
    ServiceContext::from_state(state).ticket()
}
