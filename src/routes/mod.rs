pub mod api;
mod entry;
pub mod params;
pub mod route_list;
pub mod views;

pub use entry::{API_PREFIX, app, router};
