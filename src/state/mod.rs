pub mod autofit;
pub mod board;
pub mod camera;
pub mod coords;
pub mod drag;
pub mod gesture;
pub mod overlay;
pub mod touch;

pub use board::BoardEngine;
pub use coords::ScreenPoint;
pub use gesture::GestureOutcome;
pub use touch::{PointerInput, PointerKind};
