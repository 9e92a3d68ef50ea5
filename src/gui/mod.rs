pub mod app;
pub mod scheduler;
pub mod theme;
pub mod view;

pub const LABEL_BAND: f64 = 40.0; // room under the ring for name and state
pub const BACKGROUND_ARC_ALPHA: f64 = 0.3;
pub const READOUT_FONT_SIZE: f64 = 14.0;
pub const READOUT_PADDING: f64 = 8.0;
pub const TITLE_FONT_SIZE: f64 = 13.0;
pub const STATE_FONT_SIZE: f64 = 11.0;
pub const PICTURE_FILL: f64 = 0.8; // share of the center disc covered by the picture
