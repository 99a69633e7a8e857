use plotters::style::{RGBAColor, RGBColor};

/// Categorical palette for pie segments (the classic "category 10" scheme).
pub const CATEGORY10: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Series color for bars and lines in the low-level backend.
pub const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180);

/// Series color used by the declarative backend, as a CSS color string.
pub const TEAL_SERIES: &str = "rgba(75, 192, 192, 0.8)";
pub const TEAL_LINE: &str = "rgba(75, 192, 192, 1)";

/// Chart theme configuration
pub struct ChartTheme {
    pub background_color: RGBAColor,
    pub text_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub axis_color: RGBAColor,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: RGBAColor(255, 255, 255, 1.0),
            text_color: RGBAColor(40, 40, 40, 1.0),
            grid_color: RGBAColor(0, 0, 0, 0.15),
            axis_color: RGBAColor(40, 40, 40, 0.8),
        }
    }
}

/// Chart style configuration
pub struct ChartStyle {
    pub line_width: u32,
    pub font_size: u32,
    pub title_font_size: u32,
    pub margin: u32,
    pub label_area_size: u32,
    pub marker_radius: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            line_width: 2,
            font_size: 15,
            title_font_size: 30,
            margin: 10,
            label_area_size: 50,
            marker_radius: 5,
        }
    }
}
