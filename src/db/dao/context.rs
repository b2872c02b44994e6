use sea_orm::DatabaseConnection;

use super::{DaoBase, TicketDao, UserDao};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn user(&self) -> UserDao {
        DaoBase::new(&self.db)
    }

    pub fn ticket(&self) -> TicketDao {
        DaoBase::new(&self.db)
    }
}
