mod docs;
mod router;
pub mod tickets;

pub use router::router;
