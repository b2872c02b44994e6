use sea_orm::DatabaseConnection;

use crate::{
    db::dao::DaoContext,
    services::{ticket_service::TicketService, user_service::UserService},
    state::AppState,
};

#[derive(Clone)]
pub struct ServiceContext {
    daos: DaoContext,
}

impl ServiceContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self {
            daos: DaoContext::new(db),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.db)
    }

    pub fn user(&self) -> UserService {
        UserService::new(self.daos.user())
    }

    pub fn ticket(&self) -> TicketService {
        TicketService::new(self.daos.ticket(), self.daos.user())
    }
}
