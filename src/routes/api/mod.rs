mod router;
pub mod tickets;
pub mod users;

pub use router::router;
