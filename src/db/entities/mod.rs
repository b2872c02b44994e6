#[allow(unused_imports)]
pub mod prelude {
    pub use super::ticket::Entity as Ticket;
    pub use super::user::Entity as User;
}

pub mod ticket;
pub mod ticket_status;
pub mod user;

pub use ticket_status::TicketStatus;
