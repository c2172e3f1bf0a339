pub mod geometry;
pub mod locator;

pub use geometry::{EPSILON, Margins, Point, Rect, Size, clip_segment};
pub use locator::ElementRef;
