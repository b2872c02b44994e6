use std::sync::Arc;

use askama::Template;
use axum::{
    Form, Router,
    extract::{
        Path, Query, State,
        rejection::{FormRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Deserialize;

use crate::{
    db::dao::TicketFilter,
    db::entities::{TicketStatus, user},
    error::AppError,
    response::{log_app_error, status_for},
    routes::params::empty_string_as_none,
    services::{ServiceContext, TicketDetails, TicketInput, ticket_service::ID_MISMATCH},
    state::AppState,
};

const UNASSIGNED: &str = "Unassigned";

type HtmlError = (StatusCode, Html<String>);
type PageResult = Result<Response, HtmlError>;

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<TicketStatus>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub assigned_user_id: Option<i32>,
}

/// Create and edit share one form; `id` is only posted by the edit page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketForm {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub id: Option<i32>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<TicketStatus>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub assigned_user_id: Option<i32>,
}

impl TicketForm {
    /// Browsers post an untouched textarea as an empty value; that means no
    /// description. Non-empty text is passed on as typed.
    fn to_input(&self) -> TicketInput {
        TicketInput {
            title: self.title.clone(),
            description: self.description.clone().filter(|text| !text.is_empty()),
            status: self.status,
            assigned_user_id: self.assigned_user_id,
        }
    }
}

impl From<&TicketDetails> for TicketForm {
    fn from(details: &TicketDetails) -> Self {
        let ticket = &details.ticket;
        Self {
            id: Some(ticket.id),
            title: Some(ticket.title.clone()),
            description: ticket.description.clone(),
            status: Some(ticket.status),
            assigned_user_id: ticket.assigned_user_id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AssignForm {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub assigned_user_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SelectOption {
    value: String,
    label: String,
    selected: bool,
}

struct TicketRow {
    id: i32,
    title: String,
    status: &'static str,
    assignee: String,
    updated_at: String,
}

impl From<&TicketDetails> for TicketRow {
    fn from(details: &TicketDetails) -> Self {
        Self {
            id: details.ticket.id,
            title: details.ticket.title.clone(),
            status: details.ticket.status.label(),
            assignee: assignee_name(details),
            updated_at: format_timestamp(&details.ticket.updated_at),
        }
    }
}

#[derive(Template)]
#[template(path = "tickets/index.html")]
struct TicketIndexTemplate {
    tickets: Vec<TicketRow>,
    status_options: Vec<SelectOption>,
    user_options: Vec<SelectOption>,
    filtered: bool,
}

#[derive(Template)]
#[template(path = "tickets/form.html")]
struct TicketFormTemplate {
    heading: String,
    action: String,
    cancel_href: String,
    ticket_id: Option<i32>,
    title: String,
    description: String,
    status_options: Vec<SelectOption>,
    user_options: Vec<SelectOption>,
    title_errors: Vec<String>,
    description_errors: Vec<String>,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "tickets/details.html")]
struct TicketDetailsTemplate {
    id: i32,
    title: String,
    description: Option<String>,
    status: &'static str,
    assignee: String,
    created_at: String,
    updated_at: String,
    user_options: Vec<SelectOption>,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    heading: String,
    message: String,
}

#[derive(Debug, Clone, Copy)]
enum FormMode {
    Create,
    Edit(i32),
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/tickets", get(index))
        .route("/tickets/create", get(create_page).post(create_submit))
        .route("/tickets/{id}", get(details_page))
        .route("/tickets/{id}/assign", post(assign_submit))
        .route("/tickets/{id}/edit", get(edit_page).post(edit_submit))
        .with_state(state)
}

async fn home() -> Redirect {
    Redirect::to("/tickets")
}

async fn index(
    State(state): State<Arc<AppState>>,
    query: Result<Query<IndexQuery>, QueryRejection>,
) -> PageResult {
    let Query(query) = query.map_err(|rejection| rejected(rejection.body_text()))?;
    let services = ServiceContext::from_state(state.as_ref());
    let filter = TicketFilter {
        status: query.status,
        assigned_user_id: query.assigned_user_id,
    };
    let tickets = services.ticket().list(filter).await.map_err(page_error)?;
    let users = services.user().list().await.map_err(page_error)?;

    render(
        StatusCode::OK,
        &TicketIndexTemplate {
            tickets: tickets.iter().map(TicketRow::from).collect(),
            status_options: status_options(query.status, Some("All")),
            user_options: user_options(&users, query.assigned_user_id, "All"),
            filtered: filter != TicketFilter::default(),
        },
    )
}

async fn create_page(State(state): State<Arc<AppState>>) -> PageResult {
    render_ticket_form(&state, FormMode::Create, TicketForm::default(), None).await
}

async fn create_submit(
    State(state): State<Arc<AppState>>,
    form: Result<Form<TicketForm>, FormRejection>,
) -> PageResult {
    let Form(form) = form.map_err(|rejection| rejected(rejection.body_text()))?;
    let service = ServiceContext::from_state(state.as_ref()).ticket();
    match service.create(form.to_input()).await {
        Ok(_) => Ok(Redirect::to("/tickets").into_response()),
        Err(err) if is_form_error(&err) => {
            render_ticket_form(&state, FormMode::Create, form, Some(&err)).await
        }
        Err(err) => Err(page_error(err)),
    }
}

async fn details_page(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> PageResult {
    let Path(id) = id.map_err(|rejection| rejected(rejection.body_text()))?;
    let details = ServiceContext::from_state(state.as_ref())
        .ticket()
        .get(id)
        .await
        .map_err(page_error)?;
    render_details(&state, details, None).await
}

async fn assign_submit(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
    form: Result<Form<AssignForm>, FormRejection>,
) -> PageResult {
    let Path(id) = id.map_err(|rejection| rejected(rejection.body_text()))?;
    let Form(form) = form.map_err(|rejection| rejected(rejection.body_text()))?;
    let service = ServiceContext::from_state(state.as_ref()).ticket();
    match service.assign(id, form.assigned_user_id).await {
        Ok(_) => Ok(Redirect::to(&details_href(id)).into_response()),
        Err(err @ AppError::BadRequest(_)) => {
            let details = service.get(id).await.map_err(page_error)?;
            render_details(&state, details, Some(&err)).await
        }
        Err(err) => Err(page_error(err)),
    }
}

async fn edit_page(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
) -> PageResult {
    let Path(id) = id.map_err(|rejection| rejected(rejection.body_text()))?;
    let details = ServiceContext::from_state(state.as_ref())
        .ticket()
        .get(id)
        .await
        .map_err(page_error)?;
    render_ticket_form(&state, FormMode::Edit(id), TicketForm::from(&details), None).await
}

async fn edit_submit(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i32>, PathRejection>,
    form: Result<Form<TicketForm>, FormRejection>,
) -> PageResult {
    let Path(id) = id.map_err(|rejection| rejected(rejection.body_text()))?;
    let Form(form) = form.map_err(|rejection| rejected(rejection.body_text()))?;
    let service = ServiceContext::from_state(state.as_ref()).ticket();
    let body_id = form.id.unwrap_or_default();
    match service.update(id, body_id, form.to_input()).await {
        Ok(_) => Ok(Redirect::to(&details_href(id)).into_response()),
        Err(AppError::BadRequest(message)) if message == ID_MISMATCH => {
            Err(page_error(AppError::bad_request(message)))
        }
        Err(err) if is_form_error(&err) => {
            render_ticket_form(&state, FormMode::Edit(id), form, Some(&err)).await
        }
        Err(err) => Err(page_error(err)),
    }
}

async fn render_ticket_form(
    state: &AppState,
    mode: FormMode,
    form: TicketForm,
    err: Option<&AppError>,
) -> PageResult {
    let users = ServiceContext::from_state(state)
        .user()
        .list()
        .await
        .map_err(page_error)?;
    let (heading, action, cancel_href, ticket_id) = match mode {
        FormMode::Create => (
            "New ticket".to_string(),
            "/tickets/create".to_string(),
            "/tickets".to_string(),
            None,
        ),
        FormMode::Edit(id) => (
            format!("Edit ticket #{id}"),
            format!("/tickets/{id}/edit"),
            details_href(id),
            Some(id),
        ),
    };
    let field_errors = |field: &str| {
        err.and_then(AppError::field_errors)
            .and_then(|errors| errors.get(field))
            .cloned()
            .unwrap_or_default()
    };

    let page = TicketFormTemplate {
        heading,
        action,
        cancel_href,
        ticket_id,
        title_errors: field_errors("title"),
        description_errors: field_errors("description"),
        error: banner_message(err),
        status_options: status_options(Some(form.status.unwrap_or_default()), None),
        user_options: user_options(&users, form.assigned_user_id, UNASSIGNED),
        title: form.title.unwrap_or_default(),
        description: form.description.unwrap_or_default(),
    };
    render(err.map(status_for).unwrap_or(StatusCode::OK), &page)
}

async fn render_details(
    state: &AppState,
    details: TicketDetails,
    err: Option<&AppError>,
) -> PageResult {
    let users = ServiceContext::from_state(state)
        .user()
        .list()
        .await
        .map_err(page_error)?;
    let assignee = assignee_name(&details);
    let ticket = details.ticket;

    let page = TicketDetailsTemplate {
        id: ticket.id,
        title: ticket.title,
        description: ticket.description,
        status: ticket.status.label(),
        assignee,
        created_at: format_timestamp(&ticket.created_at),
        updated_at: format_timestamp(&ticket.updated_at),
        user_options: user_options(&users, ticket.assigned_user_id, UNASSIGNED),
        error: banner_message(err),
    };
    render(err.map(status_for).unwrap_or(StatusCode::OK), &page)
}

fn render(status: StatusCode, template: &impl Template) -> PageResult {
    let body = template.render().map_err(|err| {
        tracing::error!(error = %err, "failed to render page");
        html_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to render page")
    })?;
    Ok((status, Html(body)).into_response())
}

fn page_error(err: AppError) -> HtmlError {
    let status = status_for(&err);
    if status.is_server_error() {
        log_app_error(&err, status);
    }
    let page = ErrorTemplate {
        heading: status.canonical_reason().unwrap_or("Error").to_string(),
        message: err.message().to_string(),
    };
    match page.render() {
        Ok(body) => (status, Html(body)),
        Err(_) => html_error(status, "request failed"),
    }
}

/// Malformed paths, queries and form bodies get the error page too.
fn rejected(message: String) -> HtmlError {
    page_error(AppError::bad_request(message))
}

fn html_error(status: StatusCode, message: &'static str) -> HtmlError {
    (status, Html(message.to_string()))
}

fn is_form_error(err: &AppError) -> bool {
    matches!(err, AppError::Validation(_) | AppError::BadRequest(_))
}

/// Field errors are shown next to their inputs; anything else goes on top.
fn banner_message(err: Option<&AppError>) -> Option<String> {
    match err {
        Some(AppError::Validation(_)) | None => None,
        Some(other) => Some(other.message().to_string()),
    }
}

fn status_options(selected: Option<TicketStatus>, blank: Option<&str>) -> Vec<SelectOption> {
    let blank = blank.map(|label| SelectOption {
        value: String::new(),
        label: label.to_string(),
        selected: selected.is_none(),
    });
    blank
        .into_iter()
        .chain(TicketStatus::ALL.into_iter().map(|status| SelectOption {
            value: status.as_str().to_string(),
            label: status.label().to_string(),
            selected: selected == Some(status),
        }))
        .collect()
}

fn user_options(users: &[user::Model], selected: Option<i32>, blank: &str) -> Vec<SelectOption> {
    let blank = SelectOption {
        value: String::new(),
        label: blank.to_string(),
        selected: selected.is_none(),
    };
    std::iter::once(blank)
        .chain(users.iter().map(|user| SelectOption {
            value: user.id.to_string(),
            label: user.name.clone(),
            selected: selected == Some(user.id),
        }))
        .collect()
}

fn assignee_name(details: &TicketDetails) -> String {
    details
        .assigned_user
        .as_ref()
        .map(|user| user.name.clone())
        .unwrap_or_else(|| UNASSIGNED.to_string())
}

fn details_href(id: i32) -> String {
    format!("/tickets/{id}")
}

fn format_timestamp(value: &DateTimeWithTimeZone) -> String {
    value.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
