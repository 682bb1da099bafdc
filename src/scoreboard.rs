//! Client-side change detection for live scores: which badge (if any) a new
//! snapshot deserves, and how long it stays on screen.

pub mod badges;
pub mod detector;
pub mod watcher;

pub use badges::{BadgeBoard, BadgeSignal, DEFAULT_BADGE_DURATION};
pub use detector::{BadgeKind, ScoringSide, StyleHint, detect, status_badge};
pub use watcher::ScoreWatcher;
