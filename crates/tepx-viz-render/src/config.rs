use serde::Deserialize;

use crate::color::{Color, Colormap};
use crate::theme::BuiltinTheme;

/// Top-level visualization configuration (YAML or programmatic).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    pub theme: String,
    pub figure: FigureConfig,
    pub panel: FigureConfig,
    pub font: FontConfig,
    pub axes: AxesConfig,
    pub grid: GridConfig,
    pub experiment: ExperimentConfig,
    pub colors: ColorsConfig,
    pub palette: String,
    pub colormap: String,
    pub output: OutputConfig,
}

impl Default for VizConfig {
    fn default() -> Self {
        BuiltinTheme::Tepx.base_config()
    }
}

impl VizConfig {
    /// Theme preset with the given output format and resolution.
    pub fn for_report(theme: &str, format: &str, dpi: u32) -> Self {
        let mut cfg = BuiltinTheme::parse(theme).base_config();
        cfg.output = OutputConfig { format: format.to_string(), dpi };
        cfg
    }

    pub fn palette_colors(&self) -> Vec<Color> {
        crate::color::palette_colors(&self.palette)
    }

    /// Colour of the `i`-th extra series, cycling through the palette.
    pub fn series_color(&self, i: usize) -> Color {
        if i == 0 {
            return self.colors.data;
        }
        let palette = self.palette_colors();
        if palette.is_empty() { self.colors.data } else { palette[i % palette.len()] }
    }

    pub fn colormap(&self) -> Colormap {
        Colormap::parse(&self.colormap)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 504.0,  // 7" * 72
            height: 360.0, // 5" * 72
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub size: f64,
    pub label_size: f64,
    pub tick_size: f64,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { size: 10.0, label_size: 11.0, tick_size: 8.5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub tick_direction: String,
    pub show_top_ticks: bool,
    pub show_right_ticks: bool,
    pub tick_length: f64,
    pub minor_tick_length: f64,
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            tick_direction: "in".into(),
            show_top_ticks: true,
            show_right_ticks: true,
            tick_length: 5.0,
            minor_tick_length: 3.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub show: bool,
    pub color: Color,
    pub alpha: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { show: false, color: Color::hex("#CBD5E1"), alpha: 0.55 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub name: String,
    pub status: String,
    pub info: String,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self { name: "TEPX".into(), status: "Simulation".into(), info: "Phase-2 BRIL".into() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub data: Color,
    pub fit_line: Color,
    pub band: Color,
    pub deviation: Color,
    pub reference: Color,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            data: Color::hex("#000000"),
            fit_line: Color::hex("#ff00ff"),
            band: Color::hex("#ff00ff"),
            deviation: Color::hex("#0000ff"),
            reference: Color::hex("#888888"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: String,
    pub dpi: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { format: "png".into(), dpi: 150 }
    }
}

/// Resolve a VizConfig from an optional YAML string.
pub fn resolve_config(user_yaml: Option<&str>) -> crate::Result<VizConfig> {
    match user_yaml {
        None => Ok(VizConfig::default()),
        Some(yaml) => {
            let config: VizConfig = serde_yaml_ng::from_str(yaml)
                .map_err(|e| crate::RenderError::Config(e.to_string()))?;
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "output:\n  format: svg\ncolors:\n  data: '#112233'\n";
        let cfg = resolve_config(Some(yaml)).unwrap();
        assert_eq!(cfg.output.format, "svg");
        assert_eq!(cfg.output.dpi, 150);
        assert_eq!(cfg.colors.data, Color::rgb(0x11, 0x22, 0x33));
        assert_eq!(cfg.colors.fit_line, Color::hex("#ff00ff"));
    }

    #[test]
    fn bad_yaml_is_config_error() {
        assert!(matches!(
            resolve_config(Some("figure: [1, 2")),
            Err(crate::RenderError::Config(_))
        ));
    }

    #[test]
    fn report_override() {
        let cfg = VizConfig::for_report("cms", "svg", 72);
        assert_eq!(cfg.theme, "cms");
        assert_eq!(cfg.output.format, "svg");
        assert_eq!(cfg.series_color(0), cfg.colors.data);
    }
}
