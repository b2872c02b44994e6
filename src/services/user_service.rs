use crate::{
    db::dao::{DaoBase, DaoLayerError, UserDao},
    db::entities::user,
    error::AppError,
};

pub const USER_NOT_FOUND: &str = "User not found";

/// Read-only access to users; they are only ever created by the seed routine.
#[derive(Clone)]
pub struct UserService {
    user_dao: UserDao,
}

impl UserService {
    pub fn new(user_dao: UserDao) -> Self {
        Self { user_dao }
    }

    pub async fn list(&self) -> Result<Vec<user::Model>, AppError> {
        Ok(self.user_dao.list_by_name().await?)
    }

    pub async fn get(&self, id: i32) -> Result<user::Model, AppError> {
        match self.user_dao.find_by_id(id).await {
            Ok(model) => Ok(model),
            Err(DaoLayerError::NotFound { .. }) => Err(AppError::not_found(USER_NOT_FOUND)),
            Err(err) => Err(err.into()),
        }
    }
}
