pub mod app;
pub mod board_view;
pub mod camera_controls;
pub mod header;
pub mod polaroid;
pub mod status_overlay;
