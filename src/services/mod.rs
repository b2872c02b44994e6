pub mod context;
pub mod ticket_service;
pub mod user_service;

pub use context::ServiceContext;
pub use ticket_service::{TicketDetails, TicketInput, TicketService};
pub use user_service::UserService;
