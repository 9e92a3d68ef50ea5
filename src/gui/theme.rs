use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub track: Srgba<f64>,
    pub center_disc: Srgba<f64>,
    pub readout: Srgba<f64>,
    pub text: Srgba<f64>,
    pub dim_text: Srgba<f64>,
    pub warning: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        let fallback = Self::default();
        Self {
            track: Self::lookup_color(context, "insensitive_fg_color", fallback.track, Some(1.0)),
            center_disc: Self::lookup_color(
                context,
                "theme_fg_color",
                fallback.center_disc,
                Some(0.1),
            ),
            readout: Self::lookup_color(context, "theme_bg_color", fallback.readout, Some(0.85)),
            text: Self::lookup_color(context, "theme_fg_color", fallback.text, None),
            dim_text: Self::lookup_color(
                context,
                "theme_unfocused_fg_color",
                fallback.dim_text,
                None,
            ),
            warning: Self::lookup_color(context, "error_color", fallback.warning, None),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            track: Srgba::new(0.55, 0.55, 0.55, 1.0),
            center_disc: Srgba::new(0.2, 0.2, 0.2, 0.1),
            readout: Srgba::new(0.15, 0.15, 0.15, 0.85),
            text: Srgba::new(0.9, 0.9, 0.9, 1.0),
            dim_text: Srgba::new(0.6, 0.6, 0.6, 1.0),
            warning: Srgba::new(0.86, 0.2, 0.2, 1.0),
        }
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.ring-gauge {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
