use crate::config::{self, GaugeConfig};
use crate::events::AppEvent;
use crate::gauge::{Control, EntityId, EntitySnapshot, Point, Rect};
use crate::gui::LABEL_BAND;
use crate::gui::scheduler::{ChannelSink, Fired, GlibScheduler};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::view;
use crate::sys::server::Outbound;
use crate::sys::store::StateStore;
use gdk_pixbuf::Pixbuf;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub type GaugeControl = Control<GlibScheduler, ChannelSink>;

/// Picture currently shown in the center disc, keyed by its source path so a
/// failed load is not retried on every update.
struct CachedPicture {
    path: PathBuf,
    pixbuf: Option<Pixbuf>,
}

/// State shared between the component and the draw function.
#[derive(Default)]
pub struct Shared {
    gauge: Option<GaugeControl>,
    picture: Option<CachedPicture>,
}

impl Shared {
    fn pixbuf(&self) -> Option<&Pixbuf> {
        self.picture.as_ref()?.pixbuf.as_ref()
    }

    fn sync_picture(&mut self) {
        let wanted = self
            .gauge
            .as_ref()
            .and_then(|g| g.picture())
            .map(Path::to_path_buf);

        if self.picture.as_ref().map(|p| &p.path) == wanted.as_ref() {
            return;
        }
        self.picture = wanted.map(|path| {
            let pixbuf = Pixbuf::from_file(&path)
                .inspect_err(|e| log::warn!("Failed to load picture {}: {}", path.display(), e))
                .ok();
            CachedPicture { path, pixbuf }
        });
    }
}

pub struct AppInit {
    pub config: GaugeConfig,
    pub config_path: PathBuf,
    pub entity_override: Option<EntityId>,
    pub outbound: async_channel::Sender<Outbound>,
    pub events: async_channel::Receiver<AppEvent>,
}

pub struct AppModel {
    pub shared: Rc<RefCell<Shared>>,
    pub store: StateStore,
    pub config_path: PathBuf,
    pub entity_override: Option<EntityId>,
    pub outbound: async_channel::Sender<Outbound>,
    pub sender: ComponentSender<AppModel>,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    DragBegin(Point),
    DragUpdate(Point),
    DragEnd,
    Tap(Point),
    Fired(Fired),
    EntityUpdate(EntitySnapshot),
    EntityRemoved(EntityId),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::EntityUpdate(s) => AppMsg::EntityUpdate(s),
            AppEvent::EntityRemoved(e) => AppMsg::EntityRemoved(e),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Ring Gauge"),
            set_resizable: false,

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_halign: gtk::Align::Center,
                set_valign: gtk::Align::Center,
                set_margin_all: 12,
                add_css_class: "ring-gauge",

                add_controller = gtk::GestureDrag {
                    connect_drag_begin[sender] => move |_, x, y| {
                        sender.input(AppMsg::DragBegin(Point::new(x, y)));
                    },
                    connect_drag_update[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            sender.input(AppMsg::DragUpdate(Point::new(x + dx, y + dy)));
                        }
                    },
                    connect_drag_end[sender] => move |_, _, _| {
                        sender.input(AppMsg::DragEnd);
                    },
                    connect_cancel[sender] => move |_, _| {
                        sender.input(AppMsg::DragEnd);
                    },
                },

                add_controller = gtk::GestureClick {
                    connect_released[sender] => move |_, _, x, y| {
                        sender.input(AppMsg::Tap(Point::new(x, y)));
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit {
            config,
            config_path,
            entity_override,
            outbound,
            events,
        } = init;

        theme::load_css();

        let model = AppModel {
            shared: Rc::new(RefCell::new(Shared::default())),
            store: StateStore::default(),
            config_path,
            entity_override,
            outbound,
            sender: sender.clone(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        match model.build_control(config) {
            Ok(gauge) => model.install(gauge),
            Err(e) => {
                log::error!("Failed to start gauge: {}", e);
                relm4::main_application().quit();
            }
        }

        let shared_draw = model.shared.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                let shared = shared_draw.borrow();
                let Some(gauge) = &shared.gauge else {
                    return;
                };
                if let Err(e) = view::draw(cr, gauge, shared.pixbuf(), &colors, width as f64) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = events.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        let redraw = match msg {
            AppMsg::DragBegin(point) => {
                let bounds = self.bounds();
                self.with_gauge(|g| g.pointer_down(point, bounds))
            }
            AppMsg::DragUpdate(point) => self.with_gauge(|g| g.pointer_move(point)),
            AppMsg::DragEnd => self.with_gauge(|g| g.pointer_up()),
            AppMsg::Tap(point) => {
                let bounds = self.bounds();
                if let Some(event) = self.with_gauge(|g| g.tap(point, bounds)) {
                    log::debug!("Emitting {:?}", event);
                    if let Err(e) = self.outbound.try_send(Outbound::Event(event)) {
                        log::error!("Failed to forward event: {}", e);
                    }
                }
                false
            }
            AppMsg::Fired(Fired::Frame(token)) => self.with_gauge(|g| g.frame(token)),
            AppMsg::Fired(Fired::Timer(token)) => self.with_gauge(|g| g.timer_fired(token)),
            AppMsg::EntityUpdate(snapshot) => self.store.upsert(snapshot) && self.refresh(),
            AppMsg::EntityRemoved(entity) => self.store.remove(&entity) && self.refresh(),
            AppMsg::ConfigReload => self.reload_config(),
        };

        if redraw {
            self.drawing_area.queue_draw();
        }
    }
}

impl AppModel {
    fn build_control(&self, config: GaugeConfig) -> Result<GaugeControl, config::ConfigError> {
        let sender = self.sender.clone();
        let scheduler = GlibScheduler::new(&self.drawing_area, move |fired| {
            sender.input(AppMsg::Fired(fired));
        });
        Control::initialize(config, scheduler, ChannelSink::new(self.outbound.clone()))
    }

    /// Replaces the running control, disposing the old one, and syncs it
    /// with the known entities.
    fn install(&mut self, gauge: GaugeControl) {
        let layout = *gauge.layout();
        let band = if gauge.config().show_state {
            LABEL_BAND
        } else {
            0.0
        };
        self.drawing_area.set_content_width(layout.size.round() as i32);
        self.drawing_area
            .set_content_height((layout.size + band).round() as i32);

        self.shared.borrow_mut().gauge = Some(gauge);
        self.refresh();
        self.drawing_area.queue_draw();
    }

    fn with_gauge<T: Default>(&self, f: impl FnOnce(&mut GaugeControl) -> T) -> T {
        self.shared
            .borrow_mut()
            .gauge
            .as_mut()
            .map(f)
            .unwrap_or_default()
    }

    fn refresh(&mut self) -> bool {
        let mut shared = self.shared.borrow_mut();
        let changed = shared
            .gauge
            .as_mut()
            .is_some_and(|g| g.on_external_update(&self.store));
        shared.sync_picture();
        changed
    }

    /// The ring is square and sits at the top of the drawing area.
    fn bounds(&self) -> Rect {
        let width = self.drawing_area.width() as f64;
        Rect::new(0.0, 0.0, width, width)
    }

    fn reload_config(&mut self) -> bool {
        let config = match config::load_config_from(&self.config_path) {
            Ok(config) => config.with_entity(self.entity_override.as_ref()),
            Err(e) => {
                log::error!("Failed to reload config: {}", e);
                return false;
            }
        };
        match self.build_control(config) {
            Ok(gauge) => {
                self.install(gauge);
                log::info!("Configuration reloaded");
                true
            }
            Err(e) => {
                log::error!("Invalid configuration, keeping the current one: {}", e);
                false
            }
        }
    }
}
