use super::geometry::{Point, Rect};
use super::host::{FrameToken, Scheduler};
use super::position::{ArcConfig, fraction_at};

/// State of one drag. The bounds are captured when the drag starts and reused
/// for every move, even if the control is laid out again mid-drag.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    pub bounds: Rect,
    pub last_fraction: Option<f64>,
    pub pending_frame: Option<FrameToken>,
    pub moved: bool,
}

impl GestureSession {
    fn fraction_under(&self, pointer: Point, arc: &ArcConfig) -> Option<f64> {
        fraction_at(arc, self.bounds.center(), pointer)
    }
}

#[derive(Debug, Default)]
pub struct GestureController {
    session: Option<GestureSession>,
}

impl GestureController {
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Starts a drag. Only the bounds are captured; the position is taken from
    /// the moves that follow.
    pub fn begin(&mut self, bounds: Rect) {
        self.session = Some(GestureSession {
            bounds,
            last_fraction: None,
            pending_frame: None,
            moved: false,
        });
    }

    /// Records a move and schedules a frame for it, replacing any frame still
    /// pending. Moves into the arc's gap leave everything untouched.
    pub fn track(
        &mut self,
        pointer: Point,
        arc: &ArcConfig,
        scheduler: &mut impl Scheduler,
    ) -> Option<f64> {
        let session = self.session.as_mut()?;
        session.moved = true;

        let fraction = session.fraction_under(pointer, arc)?;
        session.last_fraction = Some(fraction);

        if let Some(prev) = session.pending_frame.take() {
            scheduler.cancel_frame(prev);
        }
        session.pending_frame = Some(scheduler.request_frame());
        Some(fraction)
    }

    /// Fraction to render for a fired frame; stale frames yield nothing.
    pub fn take_frame(&mut self, token: FrameToken) -> Option<f64> {
        let session = self.session.as_mut()?;
        if session.pending_frame != Some(token) {
            return None;
        }
        session.pending_frame = None;
        session.last_fraction
    }

    pub fn end(&mut self, scheduler: &mut impl Scheduler) -> Option<GestureSession> {
        let mut session = self.session.take()?;
        if let Some(frame) = session.pending_frame.take() {
            scheduler.cancel_frame(frame);
        }
        Some(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::geometry::polar_to_cartesian;
    use crate::gauge::testing::ManualScheduler;

    fn arc() -> ArcConfig {
        ArcConfig::new(300.0, 120.0, 0.0, 255.0)
    }

    fn bounds() -> Rect {
        Rect::new(0.0, 0.0, 180.0, 180.0)
    }

    fn at(deg: f64) -> Point {
        polar_to_cartesian(bounds().center(), 85.0, deg)
    }

    #[test]
    fn test_begin_only_captures_bounds() {
        let mut sched = ManualScheduler::default();
        let mut g = GestureController::default();
        g.begin(bounds());

        assert!(g.is_dragging());
        let session = g.session().unwrap();
        assert_eq!(session.bounds, bounds());
        assert_eq!(session.last_fraction, None);
        assert!(!session.moved);

        let session = g.end(&mut sched).unwrap();
        assert_eq!(session.last_fraction, None);
        assert!(sched.pending_frames().is_empty());
    }

    #[test]
    fn test_first_move_maps_position() {
        let mut sched = ManualScheduler::default();
        let mut g = GestureController::default();
        g.begin(bounds());
        let rel = g.track(at(0.0), &arc(), &mut sched).unwrap();
        assert!((rel - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(sched.pending_frames().len(), 1);
    }

    #[test]
    fn test_moves_coalesce_into_one_frame() {
        let mut sched = ManualScheduler::default();
        let mut g = GestureController::default();
        g.begin(bounds());

        for deg in [310.0, 320.0, 330.0, 340.0] {
            g.track(at(deg), &arc(), &mut sched);
        }

        let frames = sched.take_frames();
        assert_eq!(frames.len(), 1);
        let rel = g.take_frame(frames[0]).unwrap();
        assert!((rel - 40.0 / 180.0).abs() < 1e-6);
        assert_eq!(g.session().unwrap().pending_frame, None);
    }

    #[test]
    fn test_gap_move_is_ignored() {
        let mut sched = ManualScheduler::default();
        let mut g = GestureController::default();
        g.begin(bounds());
        g.track(at(10.0), &arc(), &mut sched);
        let frames = sched.pending_frames();

        assert_eq!(g.track(at(200.0), &arc(), &mut sched), None);
        assert_eq!(sched.pending_frames(), frames);

        let session = g.session().unwrap();
        assert!(session.moved);
        assert!((session.last_fraction.unwrap() - 70.0 / 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_uses_captured_bounds() {
        let mut sched = ManualScheduler::default();
        let mut g = GestureController::default();
        g.begin(Rect::new(1000.0, 1000.0, 180.0, 180.0));

        // directly above the captured center, not the origin
        let rel = g.track(Point::new(1090.0, 900.0), &arc(), &mut sched).unwrap();
        assert!((rel - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_end_cancels_pending_frame() {
        let mut sched = ManualScheduler::default();
        let mut g = GestureController::default();
        g.begin(bounds());
        g.track(at(320.0), &arc(), &mut sched);
        let frame = sched.pending_frames()[0];

        let session = g.end(&mut sched).unwrap();
        assert!(session.moved);
        assert!(sched.pending_frames().is_empty());
        assert!(!g.is_dragging());
        assert_eq!(g.take_frame(frame), None);
    }

    #[test]
    fn test_track_without_session() {
        let mut sched = ManualScheduler::default();
        let mut g = GestureController::default();
        assert_eq!(g.track(at(0.0), &arc(), &mut sched), None);
        assert!(sched.pending_frames().is_empty());
    }
}
