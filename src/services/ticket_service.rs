use std::collections::HashMap;

use tracing::info;
use validator::Validate;

use crate::{
    db::dao::{DaoBase, DaoLayerError, TicketDao, TicketFields, TicketFilter, UserDao},
    db::entities::{TicketStatus, ticket, user},
    error::AppError,
};

pub const ASSIGNEE_NOT_FOUND: &str = "Assigned user does not exist";
pub const ID_MISMATCH: &str = "ID mismatch";
pub const TICKET_NOT_FOUND: &str = "Ticket not found";

/// Client-supplied ticket fields, shared by create and full update. Missing
/// values fall back to defaults rather than to what is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct TicketInput {
    #[validate(
        required(message = "Title is required."),
        length(max = 200, message = "Title must be at most 200 characters.")
    )]
    pub title: Option<String>,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters."))]
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
    pub assigned_user_id: Option<i32>,
}

impl TicketInput {
    /// A whitespace-only title counts as missing. Everything else is kept
    /// exactly as the client sent it.
    fn without_blank_title(self) -> Self {
        let title = self.title.filter(|title| !title.trim().is_empty());
        Self { title, ..self }
    }

    /// Validated column values, or field-level errors.
    pub fn into_fields(self) -> Result<TicketFields, AppError> {
        let input = self.without_blank_title();
        input.validate()?;
        Ok(TicketFields {
            title: input.title.unwrap_or_default(),
            description: input.description,
            status: input.status.unwrap_or_default(),
            assigned_user_id: input.assigned_user_id,
        })
    }
}

/// A ticket with its assignee resolved at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDetails {
    pub ticket: ticket::Model,
    pub assigned_user: Option<user::Model>,
}

#[derive(Clone)]
pub struct TicketService {
    ticket_dao: TicketDao,
    user_dao: UserDao,
}

impl TicketService {
    pub fn new(ticket_dao: TicketDao, user_dao: UserDao) -> Self {
        Self {
            ticket_dao,
            user_dao,
        }
    }

    /// Matching tickets, most recently updated first.
    pub async fn list(&self, filter: TicketFilter) -> Result<Vec<TicketDetails>, AppError> {
        let tickets = self.ticket_dao.list_tickets(filter).await?;
        self.with_assignees(tickets).await
    }

    pub async fn get(&self, id: i32) -> Result<TicketDetails, AppError> {
        let ticket = self.require_ticket(id).await?;
        self.with_assignee(ticket).await
    }

    pub async fn create(&self, input: TicketInput) -> Result<TicketDetails, AppError> {
        let fields = input.into_fields()?;
        self.ensure_assignee_exists(fields.assigned_user_id).await?;

        let ticket = self.ticket_dao.create_ticket(fields).await?;
        info!(ticket_id = ticket.id, "ticket created");
        self.with_assignee(ticket).await
    }

    /// Full replacement. `body_id` is the id the client put in the payload and
    /// must name the same ticket as the path.
    pub async fn update(
        &self,
        id: i32,
        body_id: i32,
        input: TicketInput,
    ) -> Result<TicketDetails, AppError> {
        let fields = input.into_fields()?;
        if body_id != id {
            return Err(AppError::bad_request(ID_MISMATCH));
        }
        self.require_exists(id).await?;
        self.ensure_assignee_exists(fields.assigned_user_id).await?;

        let ticket = self
            .ticket_dao
            .replace_ticket(id, fields)
            .await
            .map_err(not_found_as_ticket)?;
        info!(ticket_id = id, "ticket updated");
        self.with_assignee(ticket).await
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        self.ticket_dao
            .delete_ticket(id)
            .await
            .map_err(not_found_as_ticket)?;
        info!(ticket_id = id, "ticket deleted");
        Ok(())
    }

    /// Sets or clears the assignee without touching the other fields.
    pub async fn assign(
        &self,
        id: i32,
        assigned_user_id: Option<i32>,
    ) -> Result<TicketDetails, AppError> {
        self.require_exists(id).await?;
        self.ensure_assignee_exists(assigned_user_id).await?;

        let ticket = self
            .ticket_dao
            .set_assignee(id, assigned_user_id)
            .await
            .map_err(not_found_as_ticket)?;
        info!(ticket_id = id, assigned_user_id, "ticket assignment changed");
        self.with_assignee(ticket).await
    }

    async fn require_ticket(&self, id: i32) -> Result<ticket::Model, AppError> {
        self.ticket_dao
            .find_by_id(id)
            .await
            .map_err(not_found_as_ticket)
    }

    async fn require_exists(&self, id: i32) -> Result<(), AppError> {
        if !self.ticket_dao.exists(id).await? {
            return Err(AppError::not_found(TICKET_NOT_FOUND));
        }
        Ok(())
    }

    async fn ensure_assignee_exists(&self, assigned_user_id: Option<i32>) -> Result<(), AppError> {
        let Some(user_id) = assigned_user_id else {
            return Ok(());
        };
        if !self.user_dao.exists(user_id).await? {
            return Err(AppError::bad_request(ASSIGNEE_NOT_FOUND));
        }
        Ok(())
    }

    async fn with_assignee(&self, ticket: ticket::Model) -> Result<TicketDetails, AppError> {
        let assigned_user = match ticket.assigned_user_id {
            Some(user_id) => self.user_dao.find_many(&[user_id]).await?.into_iter().next(),
            None => None,
        };
        Ok(TicketDetails {
            ticket,
            assigned_user,
        })
    }

    async fn with_assignees(
        &self,
        tickets: Vec<ticket::Model>,
    ) -> Result<Vec<TicketDetails>, AppError> {
        let mut user_ids: Vec<i32> = tickets
            .iter()
            .filter_map(|ticket| ticket.assigned_user_id)
            .collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let users: HashMap<i32, user::Model> = self
            .user_dao
            .find_many(&user_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        Ok(tickets
            .into_iter()
            .map(|ticket| {
                let assigned_user = ticket
                    .assigned_user_id
                    .and_then(|user_id| users.get(&user_id).cloned());
                TicketDetails {
                    ticket,
                    assigned_user,
                }
            })
            .collect())
    }
}

fn not_found_as_ticket(err: DaoLayerError) -> AppError {
    match err {
        DaoLayerError::NotFound { .. } => AppError::not_found(TICKET_NOT_FOUND),
        other => other.into(),
    }
}
