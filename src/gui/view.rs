use super::theme::ThemeColors;
use super::{
    BACKGROUND_ARC_ALPHA, PICTURE_FILL, READOUT_FONT_SIZE, READOUT_PADDING, STATE_FONT_SIZE,
    TITLE_FONT_SIZE,
};
use crate::config::GaugeConfig;
use crate::gauge::layout::GaugeLayout;
use crate::gauge::position::ArcConfig;
use crate::gauge::render::VisualState;
use crate::gauge::{CommandSink, Control, EntityId, Point, Presentation, Scheduler};
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use std::f64::consts::PI;

/// Gauge angles run clockwise from 12 o'clock; cairo's start at 3 o'clock.
fn to_cairo(deg: f64) -> f64 {
    (deg - 90.0).to_radians()
}

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn rounded_rect(cr: &Context, x: f64, y: f64, w: f64, h: f64, r: f64) {
    cr.new_sub_path();
    cr.arc(x + w - r, y + r, r, -PI / 2.0, 0.0);
    cr.arc(x + w - r, y + h - r, r, 0.0, PI / 2.0);
    cr.arc(x + r, y + h - r, r, PI / 2.0, PI);
    cr.arc(x + r, y + r, r, PI, 1.5 * PI);
    cr.close_path();
}

struct GaugeRenderer<'a> {
    layout: &'a GaugeLayout,
    arc: &'a ArcConfig,
    config: &'a GaugeConfig,
    colors: &'a ThemeColors,
}

impl GaugeRenderer<'_> {
    fn draw(
        &self,
        cr: &Context,
        presentation: Presentation<'_>,
        picture: Option<&Pixbuf>,
    ) -> Result<(), cairo::Error> {
        match presentation {
            Presentation::Waiting => self.draw_track(cr),
            Presentation::Unresolved(entity) => self.draw_warning(cr, entity),
            Presentation::Gauge(visual) => {
                self.draw_track(cr)?;
                self.draw_progress(cr, visual)?;
                self.draw_center(cr, picture)?;
                if visual.readout.visible {
                    self.draw_readout(cr, &visual.readout.text)?;
                }
                if self.config.show_state {
                    self.draw_labels(cr, visual)?;
                }
                Ok(())
            }
        }
    }

    fn start_end(&self) -> (f64, f64) {
        let start = to_cairo(self.arc.start_angle);
        (start, start + self.arc.arc_length().to_radians())
    }

    fn draw_track(&self, cr: &Context) -> Result<(), cairo::Error> {
        let c = self.layout.center();
        let (start, end) = self.start_end();
        let (r, g, b, _) = self.colors.track.into_components();

        cr.new_path();
        cr.arc(c.x, c.y, self.layout.radius(), start, end);
        cr.set_source_rgba(r, g, b, BACKGROUND_ARC_ALPHA);
        cr.set_line_width(self.layout.stroke);
        cr.set_line_cap(cairo::LineCap::Round);
        cr.stroke()
    }

    fn draw_progress(&self, cr: &Context, visual: &VisualState) -> Result<(), cairo::Error> {
        // a zero-length dash would still leave a round cap behind
        if visual.fraction <= 0.0 {
            return Ok(());
        }
        let c = self.layout.center();
        let (start, end) = self.start_end();

        let gradient = cairo::LinearGradient::new(0.0, 0.0, self.layout.size, self.layout.size);
        let (r, g, b) = self.config.gradient_start.into_srgb().into_components();
        gradient.add_color_stop_rgb(0.0, r, g, b);
        let (r, g, b) = self.config.gradient_end.into_srgb().into_components();
        gradient.add_color_stop_rgb(1.0, r, g, b);

        cr.save()?;
        cr.new_path();
        // drawn end to start so the dash fills from the start angle
        cr.arc_negative(c.x, c.y, self.layout.radius(), end, start);
        cr.set_source(&gradient)?;
        cr.set_line_width(self.layout.stroke);
        cr.set_line_cap(cairo::LineCap::Round);
        cr.set_dash(&[visual.dash.array, visual.dash.array], visual.dash.offset);
        cr.stroke()?;
        cr.restore()
    }

    fn disc_radius(&self) -> f64 {
        self.layout.radius() - self.layout.stroke
    }

    fn draw_center(&self, cr: &Context, picture: Option<&Pixbuf>) -> Result<(), cairo::Error> {
        let c = self.layout.center();
        let radius = self.disc_radius();

        cr.new_path();
        cr.arc(c.x, c.y, radius, 0.0, 2.0 * PI);
        set_color(cr, self.colors.center_disc);
        cr.fill()?;

        if let Some(pixbuf) = picture {
            self.draw_picture(cr, pixbuf, c, radius)?;
        }
        Ok(())
    }

    fn draw_picture(
        &self,
        cr: &Context,
        pixbuf: &Pixbuf,
        center: Point,
        radius: f64,
    ) -> Result<(), cairo::Error> {
        let (pw, ph) = (pixbuf.width() as f64, pixbuf.height() as f64);
        if pw <= 0.0 || ph <= 0.0 {
            return Ok(());
        }
        // fit the longer side into the disc
        let scale = (radius * 2.0 * PICTURE_FILL) / pw.max(ph);
        let (w, h) = (pw * scale, ph * scale);

        cr.save()?;
        cr.new_path();
        cr.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
        cr.clip();
        cr.translate(center.x - w / 2.0, center.y - h / 2.0);
        cr.scale(scale, scale);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint()?;
        cr.restore()
    }

    fn draw_readout(&self, cr: &Context, text: &str) -> Result<(), cairo::Error> {
        let c = self.layout.center();
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(READOUT_FONT_SIZE);
        let ext = cr.text_extents(text)?;

        let (w, h) = (
            ext.width() + READOUT_PADDING * 2.0,
            READOUT_FONT_SIZE + READOUT_PADDING,
        );
        cr.new_path();
        rounded_rect(cr, c.x - w / 2.0, c.y - h / 2.0, w, h, h / 2.0);
        set_color(cr, self.colors.readout);
        cr.fill()?;

        set_color(cr, self.colors.text);
        cr.move_to(
            c.x - ext.width() / 2.0 - ext.x_bearing(),
            c.y - ext.height() / 2.0 - ext.y_bearing(),
        );
        cr.show_text(text)
    }

    fn draw_labels(&self, cr: &Context, visual: &VisualState) -> Result<(), cairo::Error> {
        let x = self.layout.center().x;
        let top = self.layout.size;
        centered_text(
            cr,
            &visual.title,
            Point::new(x, top + TITLE_FONT_SIZE + 4.0),
            TITLE_FONT_SIZE,
            cairo::FontWeight::Bold,
            self.colors.text,
        )?;
        centered_text(
            cr,
            &visual.state_label,
            Point::new(x, top + TITLE_FONT_SIZE + STATE_FONT_SIZE + 10.0),
            STATE_FONT_SIZE,
            cairo::FontWeight::Normal,
            self.colors.dim_text,
        )
    }

    fn draw_warning(&self, cr: &Context, entity: &EntityId) -> Result<(), cairo::Error> {
        let c = self.layout.center();
        centered_text(
            cr,
            "Entity not found",
            Point::new(c.x, c.y - 4.0),
            TITLE_FONT_SIZE,
            cairo::FontWeight::Bold,
            self.colors.warning,
        )?;
        centered_text(
            cr,
            entity.as_str(),
            Point::new(c.x, c.y + STATE_FONT_SIZE + 4.0),
            STATE_FONT_SIZE,
            cairo::FontWeight::Normal,
            self.colors.warning,
        )
    }
}

/// Draws `text` horizontally centered on `anchor`, with its baseline at `anchor.y`.
fn centered_text(
    cr: &Context,
    text: &str,
    anchor: Point,
    size: f64,
    weight: cairo::FontWeight,
    color: Srgba<f64>,
) -> Result<(), cairo::Error> {
    cr.select_font_face("Sans", cairo::FontSlant::Normal, weight);
    cr.set_font_size(size);
    set_color(cr, color);
    if let Ok(ext) = cr.text_extents(text) {
        cr.move_to(anchor.x - ext.width() / 2.0 - ext.x_bearing(), anchor.y);
        cr.show_text(text)?;
    }
    Ok(())
}

/// Paints the control into a drawing area `width` pixels wide.
pub fn draw<S: Scheduler, K: CommandSink>(
    cr: &Context,
    control: &Control<S, K>,
    picture: Option<&Pixbuf>,
    colors: &ThemeColors,
    width: f64,
) -> Result<(), cairo::Error> {
    let layout = control.layout();
    if width <= 0.0 {
        return Ok(());
    }
    let scale = width / layout.size;

    let renderer = GaugeRenderer {
        layout,
        arc: control.arc(),
        config: control.config(),
        colors,
    };

    cr.save()?;
    cr.scale(scale, scale);
    let drawn = renderer.draw(cr, control.presentation(), picture);
    cr.restore()?;
    drawn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::geometry::polar_to_cartesian;
    use crate::gauge::host::{EntitySnapshot, EntityState};
    use crate::gauge::testing::{ManualScheduler, RecordingSink};
    use crate::sys::store::StateStore;

    const SIZE: i32 = 180;

    fn control(value: f64) -> Control<ManualScheduler, RecordingSink> {
        let config = GaugeConfig {
            entity: Some(EntityId::new("light.desk")),
            show_state: false,
            ..GaugeConfig::default()
        };
        let mut control =
            Control::initialize(config, ManualScheduler::default(), RecordingSink::default())
                .unwrap();
        let mut store = StateStore::default();
        store.upsert(EntitySnapshot::new(
            EntityId::new("light.desk"),
            EntityState::new("on"),
            Some(value),
        ));
        control.on_external_update(&store);
        control
    }

    /// Alpha of each ring pixel at the given angles.
    fn ring_alpha(control: &Control<ManualScheduler, RecordingSink>, angles: &[f64]) -> Vec<u8> {
        let mut surface = cairo::ImageSurface::create(cairo::Format::ARgb32, SIZE, SIZE).unwrap();
        {
            let cr = Context::new(&surface).unwrap();
            draw(&cr, control, None, &ThemeColors::default(), SIZE as f64).unwrap();
        }
        surface.flush();
        let stride = surface.stride() as usize;
        let layout = *control.layout();
        let data = surface.data().unwrap();

        angles
            .iter()
            .map(|deg| {
                let p = polar_to_cartesian(layout.center(), layout.radius(), *deg);
                let (x, y) = (p.x.round() as usize, p.y.round() as usize);
                // ARGB32 is native-endian; alpha is the high byte
                let px = u32::from_ne_bytes([
                    data[y * stride + x * 4],
                    data[y * stride + x * 4 + 1],
                    data[y * stride + x * 4 + 2],
                    data[y * stride + x * 4 + 3],
                ]);
                (px >> 24) as u8
            })
            .collect()
    }

    #[test]
    fn test_progress_fills_from_start_angle() {
        // 85 of 255 is the first third of the arc, up to 12 o'clock
        let alphas = ring_alpha(&control(85.0), &[320.0, 340.0, 30.0, 90.0, 200.0]);
        assert_eq!(alphas[0], 255);
        assert_eq!(alphas[1], 255);
        assert!(alphas[2] < 128, "{alphas:?}");
        assert!(alphas[3] < 128, "{alphas:?}");
        assert_eq!(alphas[4], 0, "gap must stay empty");
    }

    #[test]
    fn test_empty_and_full() {
        let empty = ring_alpha(&control(0.0), &[310.0, 0.0, 110.0]);
        assert!(empty.iter().all(|a| *a < 128), "{empty:?}");

        let full = ring_alpha(&control(255.0), &[310.0, 0.0, 110.0]);
        assert!(full.iter().all(|a| *a == 255), "{full:?}");
    }
}
