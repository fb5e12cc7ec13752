pub mod ports;
pub mod services;

pub use services::{PlaceSearchService, PostService, SessionService, StampService};
