use crate::color::Color;
use crate::config::*;

/// Built-in theme presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTheme {
    Housestat,
    Minimal,
    Print,
}

impl BuiltinTheme {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "minimal" => Self::Minimal,
            "print" => Self::Print,
            _ => Self::Housestat,
        }
    }

    pub fn base_config(self) -> VizConfig {
        match self {
            Self::Housestat => housestat(),
            Self::Minimal => minimal(),
            Self::Print => print(),
        }
    }
}

fn housestat() -> VizConfig {
    VizConfig {
        theme: "housestat".into(),
        figure: FigureConfig::default(),
        font: FontConfig::default(),
        axes: AxesConfig::default(),
        grid: GridConfig::default(),
        header: HeaderConfig::default(),
        colors: ColorsConfig::default(),
        palette: "housestat".into(),
        states: StatesConfig::default(),
    }
}

fn minimal() -> VizConfig {
    VizConfig {
        theme: "minimal".into(),
        figure: FigureConfig { width: 540.0, height: 320.0 },
        font: FontConfig { size: 9.0, label_size: 10.0, tick_size: 8.0 },
        grid: GridConfig { show: false, ..GridConfig::default() },
        header: HeaderConfig { show_title: false, source: String::new() },
        palette: "tableau10".into(),
        ..housestat()
    }
}

fn print() -> VizConfig {
    VizConfig {
        theme: "print".into(),
        figure: FigureConfig { width: 720.0, height: 432.0 },
        font: FontConfig { size: 11.0, label_size: 12.0, tick_size: 9.5 },
        axes: AxesConfig {
            tick_direction: "in".into(),
            show_top_ticks: true,
            show_right_ticks: true,
            tick_length: 5.0,
        },
        grid: GridConfig { show: true, color: Color::hex("#D9D9D9"), alpha: 1.0 },
        colors: ColorsConfig {
            bar: Color::hex("#0072b2"),
            with_internet: Color::hex("#0072b2"),
            without_internet: Color::hex("#d55e00"),
            trend: Color::hex("#000000"),
            reference: Color::hex("#555555"),
        },
        palette: "okabe_ito".into(),
        ..housestat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_falls_back_to_housestat() {
        assert_eq!(BuiltinTheme::parse("PRINT"), BuiltinTheme::Print);
        assert_eq!(BuiltinTheme::parse("nope"), BuiltinTheme::Housestat);
    }

    #[test]
    fn presets_carry_their_name() {
        for t in [BuiltinTheme::Housestat, BuiltinTheme::Minimal, BuiltinTheme::Print] {
            let cfg = t.base_config();
            assert_eq!(BuiltinTheme::parse(&cfg.theme), t);
        }
    }
}
