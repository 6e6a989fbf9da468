use anyhow::Result;
use log::error;
use plotters::prelude::RGBColor;

pub static FONT_FAMILY: &str = "serif";
pub static FONT_SIZE: i32 = 22;
pub static TITLE_FONT_SIZE: i32 = 24;
pub static STROKE_WIDTH: u32 = 3;
pub static MARKER_SIZE: i32 = 5;

/// Default canvas for a single chart, and for the two-panel performance
/// chart.
pub static CHART_SIZE: (u32, u32) = (800, 600);
pub static WIDE_CHART_SIZE: (u32, u32) = (1400, 600);

/// Labels cycled through when a chart has one series per group.
pub static SERIES_LABELS: [&str; 5] = [
    "dark-blue",
    "dark-orange",
    "dark-green",
    "dark-red",
    "dark-yellow",
];

pub fn get_color_from_label(label: &str) -> Result<RGBColor> {
    match label {
        "dark-red" => Ok(RGBColor(130, 1, 1)),
        "dark-blue" => Ok(RGBColor(1, 6, 130)),
        "dark-green" => Ok(RGBColor(0, 97, 29)),
        "dark-orange" => Ok(RGBColor(163, 99, 2)),
        "dark-yellow" => Ok(RGBColor(179, 176, 0)),
        "box-fill" => Ok(RGBColor(146, 180, 214)),
        "histogram" => Ok(RGBColor(120, 160, 200)),
        "grid" => Ok(RGBColor(224, 224, 224)),
        _ => {
            error!("unrecognized label for color (label={label})");
            anyhow::bail!("unrecognized label (label={label})");
        }
    }
}

/// Color for the `idx`-th series of a multi-series chart.
pub fn get_series_color(idx: usize) -> Result<RGBColor> {
    get_color_from_label(SERIES_LABELS[idx % SERIES_LABELS.len()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_color_from_label() {
        assert_eq!(get_color_from_label("dark-red").unwrap(), RGBColor(130, 1, 1));
        assert!(get_color_from_label("not-a-color").is_err());
    }

    #[test]
    fn test_get_series_color_wraps_around() {
        assert_eq!(
            get_series_color(0).unwrap(),
            get_series_color(SERIES_LABELS.len()).unwrap()
        );
    }
}
