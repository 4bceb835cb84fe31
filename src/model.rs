// Board records exchanged with the photo store, plus the session reducer
// that tracks which canvas the app has open.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use yew::Reducible;

/// Fixed on-screen footprint of one polaroid card at scale 1.0.
pub const PHOTO_WIDTH_PX: f64 = 180.0;
pub const PHOTO_HEIGHT_PX: f64 = 240.0;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(pub String);

impl PhotoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Percentage offsets inside the logical board. `[0, 100]` is the convention
/// the client keeps when it writes; values read back may lie outside it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LogicalPosition {
    #[serde(rename = "posX")]
    pub x: f64,
    #[serde(rename = "posY")]
    pub y: f64,
}

impl LogicalPosition {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(Self::MIN, Self::MAX),
            y: self.y.clamp(Self::MIN, Self::MAX),
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(rename = "_id")]
    pub id: PhotoId,
    /// Contributor's display name, shown under the picture.
    pub display_name: String,
    /// Capture time in milliseconds since the Unix epoch.
    pub timestamp: f64,
    #[serde(flatten)]
    pub position: LogicalPosition,
    /// Degrees in `[-15, 15]`, chosen at capture time and never changed here.
    pub rotation: f64,
    /// Display URL; `None` while the store is still resolving it.
    #[serde(default)]
    pub url: Option<String>,
}

impl Photo {
    pub fn is_resolved(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub slug: String,
    pub owner_id: String,
    pub invite_code: String,
    pub created_at: f64,
}

/// The single write the board issues: a photo's new logical position.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveRequest {
    pub photo_id: PhotoId,
    pub position: LogicalPosition,
}

/// Pan offset (screen pixels) and uniform scale mapping the logical board
/// onto the viewport. Process-local, never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportTransform {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionStatus {
    /// No `#/c/<slug>` in the URL.
    NoCanvas,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub slug: Option<String>,
    pub canvas: Option<Canvas>,
    pub status: SessionStatus,
    pub viewer_name: Option<String>,
}

impl SessionState {
    pub fn new(slug: Option<String>, viewer_name: Option<String>) -> Self {
        let status = if slug.is_some() {
            SessionStatus::Loading
        } else {
            SessionStatus::NoCanvas
        };
        Self {
            slug,
            canvas: None,
            status,
            viewer_name,
        }
    }
}

pub enum SessionAction {
    CanvasLoaded(Canvas),
    /// Lookup of `slug` failed with `reason`.
    CanvasFailed { slug: String, reason: String },
    /// The URL hash changed to a different canvas (or to none).
    Navigate(Option<String>),
}

impl Reducible for SessionState {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut new = (*self).clone();
        match action {
            SessionAction::CanvasLoaded(canvas) => {
                if new.slug.as_deref() != Some(canvas.slug.as_str()) {
                    return self;
                }
                new.canvas = Some(canvas);
                new.status = SessionStatus::Ready;
            }
            SessionAction::CanvasFailed { slug, reason } => {
                if new.slug.as_deref() != Some(slug.as_str()) {
                    return self;
                }
                new.canvas = None;
                new.status = SessionStatus::Failed(reason);
            }
            SessionAction::Navigate(slug) => {
                if slug == new.slug {
                    return self;
                }
                new = SessionState::new(slug, new.viewer_name);
            }
        }
        Rc::new(new)
    }
}
