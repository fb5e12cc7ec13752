pub mod gateway;
pub mod place_search;
pub mod session_store;

pub use gateway::{
    AuthGateway, BookmarkGateway, LoginResponse, PlaceBookmarkRequest, PostGateway,
    StampBoardGateway, UserGateway,
};
pub use place_search::PlaceSearchGateway;
pub use session_store::SessionStore;
