use std::f64::consts::PI;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Angles are in degrees, clockwise, with 0 pointing up (12 o'clock).
pub fn polar_to_cartesian(center: Point, radius: f64, angle_deg: f64) -> Point {
    let rad = (angle_deg - 90.0).to_radians();
    Point::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
}

/// Clockwise sweep from `start` to `end` in degrees, always within `(0, 360]`.
/// Equal angles describe a full circle.
pub fn arc_length(start: f64, end: f64) -> f64 {
    let diff = end - start;
    if diff <= 0.0 { diff + 360.0 } else { diff }
}

/// Rendered length of the arc's stroke path.
pub fn path_length(radius: f64, start: f64, end: f64) -> f64 {
    radius * arc_length(start, end) * PI / 180.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    pub radius: f64,
    pub large_arc: bool,
    pub to: Point,
}

/// Path for an arc, drawn from the end angle back to the start angle so that a
/// shrinking dash offset fills it from the start.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcPath {
    pub from: Point,
    pub segments: Vec<ArcSegment>,
}

impl fmt::Display for ArcPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M {} {}", self.from.x, self.from.y)?;
        for seg in &self.segments {
            write!(
                f,
                " A {r} {r} 0 {} 0 {} {}",
                u8::from(seg.large_arc),
                seg.to.x,
                seg.to.y,
                r = seg.radius
            )?;
        }
        Ok(())
    }
}

pub fn describe_arc(center: Point, radius: f64, start: f64, end: f64) -> ArcPath {
    let from = polar_to_cartesian(center, radius, end);
    let to = polar_to_cartesian(center, radius, start);
    let len = arc_length(start, end);

    // a single arc whose endpoints coincide is dropped by SVG renderers
    if len >= 360.0 {
        let opposite = polar_to_cartesian(center, radius, start + 180.0);
        return ArcPath {
            from,
            segments: vec![
                ArcSegment {
                    radius,
                    large_arc: false,
                    to: opposite,
                },
                ArcSegment {
                    radius,
                    large_arc: false,
                    to,
                },
            ],
        };
    }

    ArcPath {
        from,
        segments: vec![ArcSegment {
            radius,
            large_arc: len > 180.0,
            to,
        }],
    }
}

/// Dash pattern that shows the leading `fraction` of an arc path drawn from
/// end to start: one dash of `array` followed by an equal gap, shifted by
/// `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StrokeDash {
    pub array: f64,
    pub offset: f64,
}

impl StrokeDash {
    pub fn for_fraction(path_length: f64, fraction: f64) -> Self {
        let fraction = fraction.clamp(0.0, 1.0);
        Self {
            array: path_length,
            offset: path_length * (1.0 + fraction),
        }
    }
}
