pub mod place_search_service;
pub mod post_service;
pub mod session_service;
pub mod stamp_service;

pub use place_search_service::PlaceSearchService;
pub use post_service::PostService;
pub use session_service::SessionService;
pub use stamp_service::{BoardPatch, NewBookmark, StampData, StampService};
