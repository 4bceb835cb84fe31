// Turns engine state into the styles and card props the components draw.

use crate::model::{PHOTO_WIDTH_PX, PhotoId, ViewportTransform};
use crate::state::BoardEngine;
use crate::util::format_capture_time;

/// Inline style for the transformed board container. The container is the
/// logical board in pixels; photos inside are placed by percentage.
pub fn container_style(t: &ViewportTransform, board_w: f64, board_h: f64) -> String {
    format!(
        "position:absolute; left:0; top:0; width:{}px; height:{}px; \
         transform: translate({}px, {}px) scale({}); transform-origin: 0 0;",
        board_w, board_h, t.offset_x, t.offset_y, t.scale
    )
}

#[derive(Clone, Debug, PartialEq)]
pub struct PhotoPlacement {
    pub id: PhotoId,
    pub left_pct: f64,
    pub top_pct: f64,
    pub rotation: f64,
    pub url: String,
    pub label: String,
    pub caption_time: String,
    pub dragging: bool,
}

impl PhotoPlacement {
    pub fn style(&self) -> String {
        format!(
            "position:absolute; left:{}%; top:{}%; width:{}px; transform: rotate({}deg);{}",
            self.left_pct,
            self.top_pct,
            PHOTO_WIDTH_PX,
            self.rotation,
            if self.dragging { " z-index:10; cursor:grabbing;" } else { "" }
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardStatus {
    /// No snapshot has arrived yet.
    Loading,
    /// Loaded, but nothing drawable.
    Empty,
}

/// Message shown over the board, if any.
pub fn board_status(engine: &BoardEngine) -> Option<BoardStatus> {
    if !engine.is_loaded() {
        Some(BoardStatus::Loading)
    } else if engine.visible_photos().is_empty() {
        Some(BoardStatus::Empty)
    } else {
        None
    }
}

/// Drawable photos in snapshot order; later entries render on top.
pub fn placements(engine: &BoardEngine, tz_offset_minutes: f64) -> Vec<PhotoPlacement> {
    let dragging = engine.dragging_photo();
    engine
        .visible_photos()
        .into_iter()
        .filter_map(|placed| {
            let url = placed.photo.url.clone()?;
            Some(PhotoPlacement {
                id: placed.photo.id.clone(),
                left_pct: placed.position.x,
                top_pct: placed.position.y,
                rotation: placed.photo.rotation,
                url,
                label: placed.photo.display_name.clone(),
                caption_time: format_capture_time(placed.photo.timestamp, tz_offset_minutes),
                dragging: dragging == Some(&placed.photo.id),
            })
        })
        .collect()
}
