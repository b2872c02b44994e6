use sea_orm::{ColumnTrait, DatabaseConnection, Order, QueryFilter, Set};

use super::{DaoBase, DaoResult, stamp_created, stamp_updated};
use crate::db::entities::{TicketStatus, prelude::Ticket, ticket};

#[derive(Clone)]
pub struct TicketDao {
    db: DatabaseConnection,
}

impl DaoBase for TicketDao {
    type Entity = Ticket;
    const ENTITY_NAME: &'static str = "Ticket";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Every client-writable column of a ticket. Writes always carry all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketFields {
    pub title: String,
    pub description: Option<String>,
    pub status: TicketStatus,
    pub assigned_user_id: Option<i32>,
}

/// Exact-match predicates for listings; `None` means "any".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    pub assigned_user_id: Option<i32>,
}

impl TicketDao {
    pub async fn create_ticket(&self, fields: TicketFields) -> DaoResult<ticket::Model> {
        let mut model = ticket::ActiveModel {
            title: Set(fields.title),
            description: Set(fields.description),
            status: Set(fields.status),
            assigned_user_id: Set(fields.assigned_user_id),
            ..Default::default()
        };
        stamp_created(&mut model);
        self.insert(model).await
    }

    pub async fn list_tickets(&self, filter: TicketFilter) -> DaoResult<Vec<ticket::Model>> {
        self.find_all((ticket::Column::UpdatedAt, Order::Desc), move |mut query| {
            if let Some(status) = filter.status {
                query = query.filter(ticket::Column::Status.eq(status));
            }
            if let Some(user_id) = filter.assigned_user_id {
                query = query.filter(ticket::Column::AssignedUserId.eq(user_id));
            }
            query
        })
        .await
    }

    /// Full replacement of the writable columns; `created_at` is kept.
    pub async fn replace_ticket(&self, id: i32, fields: TicketFields) -> DaoResult<ticket::Model> {
        self.update(id, move |active| {
            active.title = Set(fields.title);
            active.description = Set(fields.description);
            active.status = Set(fields.status);
            active.assigned_user_id = Set(fields.assigned_user_id);
            stamp_updated(active);
        })
        .await
    }

    pub async fn set_assignee(
        &self,
        id: i32,
        assigned_user_id: Option<i32>,
    ) -> DaoResult<ticket::Model> {
        self.update(id, move |active| {
            active.assigned_user_id = Set(assigned_user_id);
            stamp_updated(active);
        })
        .await
    }

    pub async fn delete_ticket(&self, id: i32) -> DaoResult<i32> {
        self.delete(id).await
    }
}
