use super::geometry::{Point, arc_length};

/// Angular extent and value range of a gauge. Angles are degrees in `[0, 360)`,
/// clockwise from 12 o'clock, and are kept exactly as configured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcConfig {
    pub start_angle: f64,
    pub end_angle: f64,
    pub value_min: f64,
    pub value_max: f64,
}

impl ArcConfig {
    pub fn new(start_angle: f64, end_angle: f64, value_min: f64, value_max: f64) -> Self {
        Self {
            start_angle,
            end_angle,
            value_min,
            value_max,
        }
    }

    pub fn arc_length(&self) -> f64 {
        arc_length(self.start_angle, self.end_angle)
    }

    pub fn wraps(&self) -> bool {
        self.end_angle <= self.start_angle
    }

    /// Position of `deg` along the arc, or `None` when the angle falls in the gap.
    /// The result may spill marginally past `[0, 1]` at the boundaries; callers
    /// clamp it.
    pub fn relative_position(&self, deg: f64) -> Option<f64> {
        let (start, end) = (self.start_angle, self.end_angle);
        let len = self.arc_length();

        if !self.wraps() {
            if deg < start || deg > end {
                return None;
            }
            return Some((deg - start) / len);
        }

        if deg > end && deg < start {
            None
        } else if deg >= start {
            Some((deg - start) / len)
        } else {
            Some((360.0 - start + deg) / len)
        }
    }

    /// Angle sitting at `fraction` of the way along the arc.
    pub fn angle_at(&self, fraction: f64) -> f64 {
        (self.start_angle + fraction * self.arc_length()).rem_euclid(360.0)
    }

    pub fn value_at(&self, fraction: f64) -> f64 {
        let fraction = fraction.clamp(0.0, 1.0);
        (self.value_min + fraction * (self.value_max - self.value_min)).round()
    }

    pub fn fraction_of(&self, value: f64) -> f64 {
        let span = self.value_max - self.value_min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.value_min) / span).clamp(0.0, 1.0)
    }
}

/// Pointer angle around `center` in degrees `[0, 360)`, clockwise from 12 o'clock.
pub fn pointer_angle(center: Point, pointer: Point) -> f64 {
    let (dx, dy) = (pointer.x - center.x, pointer.y - center.y);
    (dy.atan2(dx).to_degrees() + 90.0).rem_euclid(360.0)
}

/// Clamped fraction under `pointer` for a gauge centered at `center`.
pub fn fraction_at(arc: &ArcConfig, center: Point, pointer: Point) -> Option<f64> {
    arc.relative_position(pointer_angle(center, pointer))
        .map(|rel| rel.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::geometry::polar_to_cartesian;

    const EPS: f64 = 1e-9;

    fn arc(start: f64, end: f64) -> ArcConfig {
        ArcConfig::new(start, end, 0.0, 255.0)
    }

    #[test]
    fn test_pointer_angle_cardinals() {
        let c = Point::new(100.0, 100.0);
        let cases = [
            (Point::new(100.0, 50.0), 0.0),
            (Point::new(150.0, 100.0), 90.0),
            (Point::new(100.0, 150.0), 180.0),
            (Point::new(50.0, 100.0), 270.0),
        ];
        for (p, expected) in cases {
            assert!((pointer_angle(c, p) - expected).abs() < EPS, "{p:?}");
        }
    }

    #[test]
    fn test_pointer_angle_matches_polar() {
        let c = Point::new(90.0, 90.0);
        for deg in [1.0, 45.0, 135.0, 222.5, 300.0, 359.0] {
            let p = polar_to_cartesian(c, 40.0, deg);
            assert!((pointer_angle(c, p) - deg).abs() < 1e-6);
        }
    }

    #[test]
    fn test_wrapping_arc_rejects_gap() {
        let a = arc(300.0, 120.0);
        assert_eq!(a.relative_position(200.0), None);
        assert_eq!(a.relative_position(121.0), None);
        assert_eq!(a.relative_position(299.0), None);

        let r = a.relative_position(310.0).unwrap();
        assert!((r - 10.0 / 180.0).abs() < EPS);
        let r = a.relative_position(10.0).unwrap();
        assert!((r - 70.0 / 180.0).abs() < EPS);
    }

    #[test]
    fn test_boundaries_wrapping() {
        let a = arc(300.0, 120.0);
        assert_eq!(a.relative_position(300.0), Some(0.0));
        assert_eq!(a.relative_position(120.0), Some(1.0));
        // discontinuity at 0/360
        let at_zero = a.relative_position(0.0).unwrap();
        assert!((at_zero - 60.0 / 180.0).abs() < EPS);
        let just_below = a.relative_position(359.999).unwrap();
        assert!(just_below < at_zero && (at_zero - just_below) < 1e-4);
    }

    #[test]
    fn test_boundaries_non_wrapping() {
        let a = arc(30.0, 330.0);
        assert_eq!(a.relative_position(30.0), Some(0.0));
        assert_eq!(a.relative_position(330.0), Some(1.0));
        assert_eq!(a.relative_position(0.0), None);
        assert_eq!(a.relative_position(29.9), None);
        assert_eq!(a.relative_position(330.1), None);
    }

    #[test]
    fn test_full_circle_accepts_everything() {
        let a = arc(90.0, 90.0);
        assert_eq!(a.arc_length(), 360.0);
        assert_eq!(a.relative_position(90.0), Some(0.0));
        let r = a.relative_position(0.0).unwrap();
        assert!((r - 270.0 / 360.0).abs() < EPS);
        let r = a.relative_position(180.0).unwrap();
        assert!((r - 0.25).abs() < EPS);
    }

    #[test]
    fn test_round_trip() {
        let arcs = [
            arc(300.0, 120.0),
            arc(30.0, 330.0),
            arc(0.0, 90.0),
            arc(350.0, 10.0),
            arc(180.0, 0.0),
            arc(45.0, 45.0),
        ];
        for a in arcs {
            for step in 0..=100 {
                let rel = step as f64 / 100.0;
                if a.arc_length() >= 360.0 && step == 100 {
                    // lands back on the start angle
                    continue;
                }
                let deg = a.angle_at(rel);
                let got = a
                    .relative_position(deg)
                    .unwrap_or_else(|| panic!("{a:?} rejected {deg} (rel {rel})"));
                assert!((got - rel).abs() < 1e-9, "{a:?} rel {rel} -> {got}");
            }
        }
    }

    #[test]
    fn test_monotonic_clockwise_sweep() {
        for a in [arc(300.0, 120.0), arc(30.0, 330.0), arc(200.0, 10.0)] {
            let mut last = -1.0;
            let mut deg = a.start_angle;
            let mut travelled = 0.0;
            while travelled <= a.arc_length() {
                let rel = a.relative_position(deg.rem_euclid(360.0)).unwrap();
                assert!(rel >= last, "{a:?} at {deg}: {rel} < {last}");
                last = rel;
                deg += 0.5;
                travelled += 0.5;
            }
        }
    }

    #[test]
    fn test_value_at_rounds_and_clamps() {
        let a = arc(300.0, 120.0);
        assert_eq!(a.value_at(1.0 / 3.0), 85.0);
        assert_eq!(a.value_at(-0.1), 0.0);
        assert_eq!(a.value_at(1.2), 255.0);

        let shifted = ArcConfig::new(0.0, 180.0, 10.0, 20.0);
        assert_eq!(shifted.value_at(0.5), 15.0);
    }

    #[test]
    fn test_fraction_of() {
        let a = arc(300.0, 120.0);
        assert_eq!(a.fraction_of(0.0), 0.0);
        assert_eq!(a.fraction_of(255.0), 1.0);
        assert_eq!(a.fraction_of(300.0), 1.0);
        assert!((a.fraction_of(51.0) - 0.2).abs() < EPS);
    }
}
