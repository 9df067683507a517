use crate::color::Color;
use crate::config::*;

/// Built-in theme presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTheme {
    Tepx,
    Cms,
    Minimal,
}

impl BuiltinTheme {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "cms" => Self::Cms,
            "minimal" => Self::Minimal,
            _ => Self::Tepx,
        }
    }

    pub fn base_config(self) -> VizConfig {
        match self {
            Self::Tepx => tepx(),
            Self::Cms => cms(),
            Self::Minimal => minimal(),
        }
    }
}

fn tepx() -> VizConfig {
    VizConfig {
        theme: "tepx".into(),
        figure: FigureConfig { width: 504.0, height: 360.0 },
        panel: FigureConfig { width: 230.0, height: 170.0 },
        font: FontConfig { size: 10.0, label_size: 11.0, tick_size: 8.5 },
        axes: AxesConfig::default(),
        grid: GridConfig::default(),
        experiment: ExperimentConfig::default(),
        colors: ColorsConfig::default(),
        palette: "root_classic".into(),
        colormap: "viridis".into(),
        output: OutputConfig::default(),
    }
}

fn cms() -> VizConfig {
    VizConfig {
        theme: "cms".into(),
        figure: FigureConfig { width: 576.0, height: 432.0 },
        font: FontConfig { size: 11.0, label_size: 12.0, tick_size: 9.5 },
        experiment: ExperimentConfig {
            name: "CMS".into(),
            status: "Phase-2 Simulation".into(),
            info: "TEPX".into(),
        },
        colors: ColorsConfig {
            data: Color::hex("#000000"),
            fit_line: Color::hex("#e42536"),
            band: Color::hex("#f89c20"),
            deviation: Color::hex("#5790fc"),
            reference: Color::hex("#9c9ca1"),
        },
        palette: "cms_petroff6".into(),
        ..tepx()
    }
}

fn minimal() -> VizConfig {
    VizConfig {
        theme: "minimal".into(),
        figure: FigureConfig { width: 432.0, height: 302.4 },
        font: FontConfig { size: 9.0, label_size: 10.0, tick_size: 8.0 },
        axes: AxesConfig {
            tick_direction: "out".into(),
            show_top_ticks: false,
            show_right_ticks: false,
            tick_length: 4.0,
            minor_tick_length: 2.0,
        },
        grid: GridConfig { show: true, ..GridConfig::default() },
        experiment: ExperimentConfig {
            name: String::new(),
            status: String::new(),
            info: String::new(),
        },
        palette: "tableau10".into(),
        colormap: "greys".into(),
        ..tepx()
    }
}
