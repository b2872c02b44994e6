pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod ticket_dao;
pub mod user_dao;

pub use base::DaoBase;
pub use base_traits::{TimestampedActiveModel, next_updated_at, stamp_created, stamp_updated};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use ticket_dao::{TicketDao, TicketFields, TicketFilter};
pub use user_dao::UserDao;
