pub mod board_color;

pub use board_color::{BoardColor, BOARD_PALETTE};
