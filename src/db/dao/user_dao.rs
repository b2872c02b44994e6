use sea_orm::{ColumnTrait, DatabaseConnection, Order, QueryFilter, Set};

use super::{DaoBase, DaoResult};
use crate::db::entities::{prelude::User, user};

#[derive(Clone)]
pub struct UserDao {
    db: DatabaseConnection,
}

impl DaoBase for UserDao {
    type Entity = User;
    const ENTITY_NAME: &'static str = "User";

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl UserDao {
    pub async fn list_by_name(&self) -> DaoResult<Vec<user::Model>> {
        self.find_all((user::Column::Name, Order::Asc), |query| query)
            .await
    }

    pub async fn find_many(&self, ids: &[i32]) -> DaoResult<Vec<user::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = ids.to_vec();
        self.find_all((user::Column::Id, Order::Asc), move |query| {
            query.filter(user::Column::Id.is_in(ids))
        })
        .await
    }

    /// Insertion order; the seed routine picks assignees from the front.
    pub async fn list_by_id(&self) -> DaoResult<Vec<user::Model>> {
        self.find_all((user::Column::Id, Order::Asc), |query| query)
            .await
    }

    pub async fn create_user(&self, name: &str, email: &str) -> DaoResult<user::Model> {
        let model = user::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            ..Default::default()
        };
        self.insert(model).await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

    use crate::db::entities::user;

    use super::UserDao;
    use crate::db::dao::{DaoBase, DaoLayerError};

    fn user_model(id: i32, name: &str) -> user::Model {
        user::Model {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_ascii_lowercase()),
        }
    }

    #[tokio::test]
    async fn list_by_name_returns_rows_in_query_order() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([[user_model(2, "Alice"), user_model(1, "Bob")]])
            .into_connection();
        let dao = UserDao::new(&db);

        let users = dao.list_by_name().await.expect("query should succeed");
        let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["Alice", "Bob"]);
    }

    #[tokio::test]
    async fn find_many_skips_the_query_for_no_ids() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let dao = UserDao::new(&db);

        let users = dao.find_many(&[]).await.expect("no query should run");
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn exists_is_false_for_missing_rows() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let dao = UserDao::new(&db);

        assert!(!dao.exists(999_999).await.expect("query should succeed"));
    }

    #[tokio::test]
    async fn find_by_id_reports_the_missing_id() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let dao = UserDao::new(&db);

        let err = dao.find_by_id(42).await.expect_err("lookup should fail");
        assert!(matches!(
            err,
            DaoLayerError::NotFound { entity: "User", id: 42 }
        ));
    }

    #[tokio::test]
    async fn database_errors_are_wrapped() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let dao = UserDao::new(&db);

        let err = dao.list_by_name().await.expect_err("query should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
