use super::geometry::{Point, Rect};

/// Where a pointer landed on the control. The ring and the center are
/// disjoint, so a press on the ring can never be read as a tap on the center
/// and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    Ring,
    Center,
    Outside,
}

/// Pixel layout of a square gauge of side `size` with a ring `stroke` wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeLayout {
    pub size: f64,
    pub stroke: f64,
}

impl GaugeLayout {
    pub fn new(size: f64, stroke: f64) -> Self {
        Self { size, stroke }
    }

    pub fn center(&self) -> Point {
        Point::new(self.size / 2.0, self.size / 2.0)
    }

    /// Radius of the ring's stroke centerline.
    pub fn radius(&self) -> f64 {
        (self.size - self.stroke) / 2.0
    }

    /// Radius of the center action disc; the ring hit area starts right outside it.
    pub fn center_radius(&self) -> f64 {
        (self.size - self.stroke * 1.5) / 2.0
    }

    pub fn outer_radius(&self) -> f64 {
        self.size / 2.0
    }

    /// Classifies `point` against the control placed at `bounds`, scaling the
    /// layout to the bounds' width.
    pub fn classify(&self, point: Point, bounds: Rect) -> HitRegion {
        if bounds.width <= 0.0 || self.size <= 0.0 {
            return HitRegion::Outside;
        }
        let scale = bounds.width / self.size;
        let dist = bounds.center().distance_to(point) / scale;

        if dist <= self.center_radius() {
            HitRegion::Center
        } else if dist <= self.outer_radius() {
            HitRegion::Ring
        } else {
            HitRegion::Outside
        }
    }
}
