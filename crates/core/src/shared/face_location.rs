use std::fmt;

/// Bounding box of a detected face in image pixel coordinates.
///
/// Origin is the top-left corner with Y growing downward. Coordinates are
/// taken as-is from the upstream detector and are not validated against
/// the image bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceLocation {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl FaceLocation {
    pub fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Builds a location from the two corners of an axis-aligned rectangle.
    pub fn from_corners(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            top: min_y,
            right: max_x,
            bottom: max_y,
            left: min_x,
        }
    }
}

/// Renders as `top right bottom left`, the harness output format.
impl fmt::Display for FaceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}
