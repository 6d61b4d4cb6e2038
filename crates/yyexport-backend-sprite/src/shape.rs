//! Reference shapes rasterized into collision masks.
//!
//! A pixel (x, y) is filled when the point (x, y) lies inside the shape or
//! within half a pixel of its outline, so edge pixels the outline only
//! partly covers are kept.

use crate::mask::CollisionMask;

/// Distance from the outline within which a pixel still counts as covered.
pub const EDGE_COVERAGE: f64 = 0.5;

/// Trait for filled 2D shapes.
pub trait Shape2D {
    /// Whether the point lies inside the shape.
    fn contains(&self, x: f64, y: f64) -> bool;

    /// Whether the pixel centred on the point is filled when rasterized.
    fn covers(&self, x: f64, y: f64) -> bool;
}

/// Axis-aligned ellipse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub center_x: f64,
    pub center_y: f64,
    pub radius_x: f64,
    pub radius_y: f64,
}

impl Ellipse {
    pub fn new(center_x: f64, center_y: f64, radius_x: f64, radius_y: f64) -> Self {
        Self {
            center_x,
            center_y,
            radius_x,
            radius_y,
        }
    }

    fn inside_radii(&self, x: f64, y: f64, radius_x: f64, radius_y: f64) -> bool {
        if self.radius_x <= 0.0 || self.radius_y <= 0.0 {
            return false;
        }
        let dx = (x - self.center_x) / radius_x;
        let dy = (y - self.center_y) / radius_y;
        dx * dx + dy * dy <= 1.0
    }
}

impl Shape2D for Ellipse {
    fn contains(&self, x: f64, y: f64) -> bool {
        self.inside_radii(x, y, self.radius_x, self.radius_y)
    }

    // The outline band is approximated by growing both radii, which is exact
    // for circles.
    fn covers(&self, x: f64, y: f64) -> bool {
        self.inside_radii(
            x,
            y,
            self.radius_x + EDGE_COVERAGE,
            self.radius_y + EDGE_COVERAGE,
        )
    }
}

/// Simple polygon filled with the even-odd rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<[f64; 2]>,
}

impl Polygon {
    pub fn new(vertices: impl Into<Vec<[f64; 2]>>) -> Self {
        Self {
            vertices: vertices.into(),
        }
    }

    fn edges(&self) -> impl Iterator<Item = ([f64; 2], [f64; 2])> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[(i + n - 1) % n], self.vertices[i]))
    }
}

/// Distance from a point to the segment `a`-`b`.
fn segment_distance(x: f64, y: f64, a: [f64; 2], b: [f64; 2]) -> f64 {
    let (ex, ey) = (b[0] - a[0], b[1] - a[1]);
    let length_sq = ex * ex + ey * ey;
    let t = if length_sq > 0.0 {
        (((x - a[0]) * ex + (y - a[1]) * ey) / length_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (px, py) = (a[0] + t * ex - x, a[1] + t * ey - y);
    (px * px + py * py).sqrt()
}

impl Shape2D for Polygon {
    fn contains(&self, x: f64, y: f64) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }
        let mut inside = false;
        for ([xj, yj], [xi, yi]) in self.edges() {
            if (yi > y) != (yj > y) {
                let cross_x = xi + (y - yi) / (yj - yi) * (xj - xi);
                if x < cross_x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    fn covers(&self, x: f64, y: f64) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }
        self.contains(x, y)
            || self
                .edges()
                .any(|(a, b)| segment_distance(x, y, a, b) <= EDGE_COVERAGE)
    }
}

/// Rasterize any shape into a `width` x `height` mask.
pub fn render_mask<S: Shape2D + ?Sized>(shape: &S, width: u32, height: u32) -> CollisionMask {
    CollisionMask::from_fn(width, height, |x, y| shape.covers(x as f64, y as f64))
}

/// Rasterize a filled ellipse.
pub fn render_ellipse_mask(
    width: u32,
    height: u32,
    center_x: f64,
    center_y: f64,
    radius_x: f64,
    radius_y: f64,
) -> CollisionMask {
    render_mask(
        &Ellipse::new(center_x, center_y, radius_x, radius_y),
        width,
        height,
    )
}

/// Rasterize a filled polygon.
pub fn render_polygon_mask(width: u32, height: u32, vertices: &[[f64; 2]]) -> CollisionMask {
    render_mask(&Polygon::new(vertices), width, height)
}
