use super::geometry::StrokeDash;
use super::host::{EntitySnapshot, EntityState};
use super::position::ArcConfig;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Readout {
    pub text: String,
    pub visible: bool,
}

/// Everything the drawing layer needs. Always derived from a fraction and the
/// latest snapshot, never written back.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisualState {
    pub fraction: f64,
    pub dash: StrokeDash,
    pub readout: Readout,
    pub title: String,
    pub state_label: String,
}

pub fn percent(fraction: f64) -> u32 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u32
}

pub fn state_label(state: &EntityState, fraction: f64) -> String {
    if state.is_on() {
        format!("On · {}%", percent(fraction))
    } else {
        "Off".to_string()
    }
}

#[derive(Debug)]
pub struct RenderSync {
    path_length: f64,
    visual: VisualState,
    seen: Option<(Option<f64>, EntityState)>,
}

impl RenderSync {
    pub fn new(path_length: f64) -> Self {
        Self {
            path_length,
            visual: VisualState {
                dash: StrokeDash::for_fraction(path_length, 0.0),
                readout: Readout {
                    text: "0%".to_string(),
                    visible: false,
                },
                ..VisualState::default()
            },
            seen: None,
        }
    }

    pub fn visual(&self) -> &VisualState {
        &self.visual
    }

    /// Returns whether anything visible changed.
    pub fn apply_fraction(&mut self, fraction: f64) -> bool {
        let fraction = fraction.clamp(0.0, 1.0);
        let dash = StrokeDash::for_fraction(self.path_length, fraction);
        let text = format!("{}%", percent(fraction));
        let changed = dash != self.visual.dash || text != self.visual.readout.text;

        self.visual.fraction = fraction;
        self.visual.dash = dash;
        self.visual.readout.text = text;
        changed
    }

    /// Folds in a state source snapshot. Only a changed value or a changed
    /// discrete state counts; the fill follows the snapshot only while idle.
    pub fn sync_external(
        &mut self,
        snapshot: &EntitySnapshot,
        arc: &ArcConfig,
        title: String,
        dragging: bool,
    ) -> bool {
        let key = (snapshot.value, snapshot.state.clone());
        if self.seen.as_ref() == Some(&key) {
            return false;
        }
        self.seen = Some(key);

        let fraction = arc.fraction_of(snapshot.value.unwrap_or(arc.value_min));
        self.visual.title = title;
        self.visual.state_label = state_label(&snapshot.state, fraction);
        if !dragging {
            self.apply_fraction(fraction);
        }
        true
    }

    pub fn set_readout_visible(&mut self, visible: bool) -> bool {
        let changed = self.visual.readout.visible != visible;
        self.visual.readout.visible = visible;
        changed
    }

    /// Forgets the last snapshot so the next one renders unconditionally.
    pub fn invalidate(&mut self) {
        self.seen = None;
    }
}
