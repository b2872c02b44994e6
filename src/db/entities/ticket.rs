use sea_orm::ActiveValue::{self, Set};
use sea_orm::entity::prelude::*;

use super::TicketStatus;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TicketStatus,
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(indexed)]
    pub updated_at: DateTimeWithTimeZone,
    #[sea_orm(indexed)]
    pub assigned_user_id: Option<i32>,
    #[sea_orm(belongs_to, from = "assigned_user_id", to = "id", on_delete = "SetNull")]
    pub assigned_user: HasOne<super::user::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

impl crate::db::dao::TimestampedActiveModel for ActiveModel {
    fn set_created_at(&mut self, ts: DateTimeWithTimeZone) {
        self.created_at = Set(ts);
    }

    fn set_updated_at(&mut self, ts: DateTimeWithTimeZone) {
        self.updated_at = Set(ts);
    }

    fn updated_at(&self) -> Option<DateTimeWithTimeZone> {
        match &self.updated_at {
            ActiveValue::Set(ts) | ActiveValue::Unchanged(ts) => Some(*ts),
            ActiveValue::NotSet => None,
        }
    }
}
