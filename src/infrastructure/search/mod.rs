pub mod kakao;

pub use kakao::KakaoSearchClient;
