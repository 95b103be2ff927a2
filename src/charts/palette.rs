//! Chart colors.

use plotters::style::RGBColor;

/// Series colors for line, bar and area charts.
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),  // Blue
    RGBColor(255, 127, 14),  // Orange
    RGBColor(44, 160, 44),   // Green
    RGBColor(214, 39, 40),   // Red
    RGBColor(148, 103, 189), // Purple
    RGBColor(140, 86, 75),   // Brown
    RGBColor(227, 119, 194), // Pink
    RGBColor(127, 127, 127), // Grey
    RGBColor(188, 189, 34),  // Olive
    RGBColor(23, 190, 207),  // Cyan
];

/// Fixed donut slice colors, reused from the start when entities outnumber them.
pub const DONUT_PALETTE: [RGBColor; 5] = [
    RGBColor(255, 215, 0),   // Gold
    RGBColor(154, 205, 50),  // Yellow green
    RGBColor(240, 128, 128), // Light coral
    RGBColor(135, 206, 250), // Light sky blue
    RGBColor(255, 0, 0),     // Red
];

/// Fill for a donut whose entities sum to zero.
pub const EMPTY_RING: RGBColor = RGBColor(230, 230, 230);

pub const DASHBOARD_BACKGROUND: RGBColor = RGBColor(211, 211, 211);
pub const TEXT: RGBColor = RGBColor(0, 0, 0);

pub fn series_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

pub fn donut_color(index: usize) -> RGBColor {
    DONUT_PALETTE[index % DONUT_PALETTE.len()]
}
