use super::action::TapOutcome;
use super::dispatch::Dispatcher;
use super::geometry::{Point, Rect, path_length};
use super::gesture::GestureController;
use super::host::{
    Command, CommandSink, EntityId, EntitySnapshot, FrameToken, HostEvent, Scheduler,
    StateSource, TimerToken,
};
use super::layout::{GaugeLayout, HitRegion};
use super::position::ArcConfig;
use super::render::{RenderSync, VisualState};
use super::READOUT_HIDE_DELAY;
use crate::config::{ConfigError, GaugeConfig};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No snapshot seen yet.
    Waiting,
    Ready,
    /// The state source does not know the entity.
    Unresolved,
    Disposed,
}

/// What the drawing layer should put on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presentation<'a> {
    Waiting,
    Unresolved(&'a EntityId),
    Gauge(&'a VisualState),
}

/// One gauge instance. The host forwards pointer input, fired frames and
/// timers, and state source updates; every method returns whether the
/// control needs to be redrawn.
pub struct Control<S: Scheduler, K: CommandSink> {
    entity: EntityId,
    config: GaugeConfig,
    arc: ArcConfig,
    layout: GaugeLayout,
    scheduler: S,
    sink: K,
    status: Status,
    snapshot: Option<EntitySnapshot>,
    gesture: GestureController,
    dispatcher: Dispatcher,
    render: RenderSync,
    readout_timer: Option<TimerToken>,
}

impl<S: Scheduler, K: CommandSink> Control<S, K> {
    pub fn initialize(config: GaugeConfig, scheduler: S, sink: K) -> Result<Self, ConfigError> {
        let entity = config.validate()?;
        let arc = ArcConfig::new(
            config.start_angle,
            config.end_angle,
            config.value_min,
            config.value_max,
        );
        let layout = GaugeLayout::new(config.size, config.stroke);
        let render = RenderSync::new(path_length(
            layout.radius(),
            arc.start_angle,
            arc.end_angle,
        ));
        let dispatcher = Dispatcher::new(config.throttle_delay());

        log::debug!("Gauge for '{}' initialized", entity);

        Ok(Self {
            entity,
            config,
            arc,
            layout,
            scheduler,
            sink,
            status: Status::Waiting,
            snapshot: None,
            gesture: GestureController::default(),
            dispatcher,
            render,
            readout_timer: None,
        })
    }

    pub fn entity(&self) -> &EntityId {
        &self.entity
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn arc(&self) -> &ArcConfig {
        &self.arc
    }

    pub fn layout(&self) -> &GaugeLayout {
        &self.layout
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Picture for the center disc: the configured image wins over the entity's.
    pub fn picture(&self) -> Option<&Path> {
        self.config
            .image
            .as_deref()
            .or_else(|| self.snapshot.as_ref()?.picture.as_deref())
    }

    pub fn presentation(&self) -> Presentation<'_> {
        match self.status {
            Status::Ready => Presentation::Gauge(self.render.visual()),
            Status::Unresolved => Presentation::Unresolved(&self.entity),
            Status::Waiting | Status::Disposed => Presentation::Waiting,
        }
    }

    pub fn on_external_update(&mut self, source: &impl StateSource) -> bool {
        if self.status == Status::Disposed {
            return false;
        }

        let Some(snapshot) = source.entity(&self.entity) else {
            if self.status == Status::Unresolved {
                return false;
            }
            log::warn!("Entity '{}' not found", self.entity);
            self.release();
            self.snapshot = None;
            self.render.invalidate();
            self.status = Status::Unresolved;
            return true;
        };

        let first = self.status != Status::Ready;
        if first {
            self.render.invalidate();
            self.status = Status::Ready;
        }

        let title = self
            .config
            .name
            .clone()
            .or_else(|| snapshot.name.clone())
            .unwrap_or_else(|| self.entity.to_string());
        let dragging = self.gesture.is_dragging();
        let changed = self
            .render
            .sync_external(snapshot, &self.arc, title, dragging);
        let picture_changed = self.snapshot.as_ref().map(|s| &s.picture) != Some(&snapshot.picture);

        self.snapshot = Some(snapshot.clone());
        first || changed || picture_changed
    }

    pub fn pointer_down(&mut self, point: Point, bounds: Rect) -> bool {
        if self.status != Status::Ready
            || self.layout.classify(point, bounds) != HitRegion::Ring
        {
            return false;
        }

        // a previous drag that never saw its release
        if self.gesture.is_dragging() {
            self.end_drag();
        }
        if let Some(timer) = self.readout_timer.take() {
            self.scheduler.cancel_timer(timer);
        }

        log::debug!("Drag started on '{}'", self.entity);
        if self.config.show_percentage {
            self.render.set_readout_visible(true);
        }
        // the press itself sets nothing; moves carry the position
        self.gesture.begin(bounds);
        true
    }

    pub fn pointer_move(&mut self, point: Point) -> bool {
        if self.status != Status::Ready {
            return false;
        }
        if let Some(fraction) = self.gesture.track(point, &self.arc, &mut self.scheduler) {
            self.dispatcher
                .request(self.arc.value_at(fraction), &mut self.scheduler);
        }
        false
    }

    pub fn pointer_up(&mut self) -> bool {
        if self.status != Status::Ready {
            return false;
        }
        self.end_drag()
    }

    pub fn frame(&mut self, token: FrameToken) -> bool {
        if self.status != Status::Ready {
            return false;
        }
        match self.gesture.take_frame(token) {
            Some(fraction) => {
                self.render.apply_fraction(fraction);
                true
            }
            None => false,
        }
    }

    pub fn timer_fired(&mut self, token: TimerToken) -> bool {
        if self.status == Status::Disposed {
            return false;
        }
        if let Some(value) = self.dispatcher.next_dispatch_value(token) {
            log::debug!("Setting '{}' to {}", self.entity, value);
            self.sink.send(Command::SetValue {
                target: self.entity.clone(),
                value,
            });
            return false;
        }
        if self.readout_timer == Some(token) {
            self.readout_timer = None;
            return self.render.set_readout_visible(false);
        }
        false
    }

    /// Runs the tap action for a click on the center disc. Commands go to the
    /// sink; host events are handed back to the caller.
    pub fn tap(&mut self, point: Point, bounds: Rect) -> Option<HostEvent> {
        if self.status != Status::Ready
            || self.gesture.is_dragging()
            || self.layout.classify(point, bounds) != HitRegion::Center
        {
            return None;
        }

        match self.config.tap_action.resolve(&self.entity) {
            Some(TapOutcome::Command(command)) => {
                self.sink.send(command);
                None
            }
            Some(TapOutcome::Event(event)) => Some(event),
            None => {
                let kind: &'static str = (&self.config.tap_action).into();
                log::debug!("Tap action '{}' has nothing to do", kind);
                None
            }
        }
    }

    /// Cancels every outstanding frame and timer; nothing fires afterwards.
    pub fn dispose(&mut self) {
        if self.status == Status::Disposed {
            return;
        }
        self.release();
        self.status = Status::Disposed;
        log::debug!("Gauge for '{}' disposed", self.entity);
    }

    fn end_drag(&mut self) -> bool {
        let Some(session) = self.gesture.end(&mut self.scheduler) else {
            return false;
        };
        log::debug!(
            "Drag ended on '{}' (moved: {})",
            self.entity,
            session.moved
        );

        // the frame cancelled above may have held the final position
        let redraw = session
            .last_fraction
            .is_some_and(|fraction| self.render.apply_fraction(fraction));

        if self.config.show_percentage {
            self.readout_timer = Some(self.scheduler.start_timer(READOUT_HIDE_DELAY));
        }
        redraw
    }

    fn release(&mut self) {
        self.gesture.end(&mut self.scheduler);
        self.dispatcher.cancel(&mut self.scheduler);
        if let Some(timer) = self.readout_timer.take() {
            self.scheduler.cancel_timer(timer);
        }
        self.render.set_readout_visible(false);
    }
}

impl<S: Scheduler, K: CommandSink> Drop for Control<S, K> {
    fn drop(&mut self) {
        self.dispose();
    }
}
