//! Auto-fitting label layout.
//!
//! The canvas is a fixed physical size. The lower half holds the QR code;
//! the text block above it gets the largest font size (64 down to 8) at
//! which every wrapped line fits. When nothing fits, the smallest size is
//! used with the unwrapped lines and the geometry is flagged as overflowing.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::measure::TextMeasure;
use crate::wrap::wrap_all;

pub const MAX_FONT_SIZE: u32 = 64;
pub const MIN_FONT_SIZE: u32 = 8;
/// Line height as a multiple of the font size.
pub const LINE_SPACING: f64 = 1.12;
/// Share of the canvas height taken by the QR code.
pub const CODE_FRACTION: f64 = 0.5;
/// Resolutions of the supported label printers.
pub const SUPPORTED_DPI: [u32; 2] = [203, 300];

/// Physical label size in centimeters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelSize {
    pub width_cm: f64,
    pub height_cm: f64,
}

impl Default for LabelSize {
    fn default() -> Self {
        Self {
            width_cm: 5.0,
            height_cm: 4.0,
        }
    }
}

impl LabelSize {
    /// Canvas size in pixels at `dpi`.
    pub fn pixels(&self, dpi: u32) -> (u32, u32) {
        let px = |cm: f64| (cm / 2.54 * f64::from(dpi)).round().max(0.0) as u32;
        (px(self.width_cm), px(self.height_cm))
    }

    /// Page size in PDF points.
    pub fn points(&self) -> (f32, f32) {
        let pt = |cm: f64| (cm / 2.54 * 72.0) as f32;
        (pt(self.width_cm), pt(self.height_cm))
    }
}

/// One text line positioned by its top-left corner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedLine {
    pub text: String,
    pub x: u32,
    pub y: u32,
}

/// Square area reserved for the QR code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRegion {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelGeometry {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub font_size: u32,
    pub line_height: u32,
    pub lines: Vec<PlacedLine>,
    pub code: CodeRegion,
    /// Set when no font size fit and the minimum was used anyway.
    pub overflow: bool,
}

impl LabelGeometry {
    /// Height of the text block.
    pub fn text_height(&self) -> u32 {
        self.lines.len() as u32 * self.line_height
    }

    /// Vertical space available for text above the code region.
    pub fn text_budget(&self) -> u32 {
        self.code.y.saturating_sub(self.margin)
    }
}

pub fn line_height(font_size: u32) -> u32 {
    (f64::from(font_size) * LINE_SPACING) as u32
}

/// Compute font size, wrapped lines and code placement for a label.
pub fn fit<S: AsRef<str>>(
    text_lines: &[S],
    size: LabelSize,
    dpi: u32,
    measure: &dyn TextMeasure,
) -> LabelGeometry {
    let (width, height) = size.pixels(dpi);
    let margin = ((f64::from(width) * 0.06) as u32).max(8);

    let code_size = (f64::from(height) * CODE_FRACTION) as u32;
    let code = CodeRegion {
        x: width.saturating_sub(code_size) / 2,
        y: height.saturating_sub(code_size).saturating_sub(margin / 3),
        size: code_size,
    };
    let text_h = code.y.saturating_sub(margin);
    let text_w = width.saturating_sub(2 * margin);

    let found = (MIN_FONT_SIZE..=MAX_FONT_SIZE).rev().find_map(|font_size| {
        let lh = line_height(font_size);
        let wrapped = wrap_all(text_lines, f64::from(font_size), f64::from(text_w), measure);
        (wrapped.len() as u32 * lh <= text_h).then_some((font_size, lh, wrapped))
    });

    let (font_size, lh, lines, overflow) = match found {
        Some((font_size, lh, wrapped)) => {
            debug!(
                "label text fits at {font_size}px: {} line(s) in {text_w}x{text_h}",
                wrapped.len()
            );
            (font_size, lh, wrapped, false)
        }
        None => {
            warn!(
                "label text does not fit {text_w}x{text_h} even at {MIN_FONT_SIZE}px; text will overflow"
            );
            let lines = text_lines.iter().map(|l| l.as_ref().to_string()).collect();
            (MIN_FONT_SIZE, line_height(MIN_FONT_SIZE), lines, true)
        }
    };

    let lines = lines
        .into_iter()
        .enumerate()
        .map(|(i, text)| PlacedLine {
            text,
            x: margin,
            y: margin + i as u32 * lh,
        })
        .collect();

    LabelGeometry {
        width,
        height,
        margin,
        font_size,
        line_height: lh,
        lines,
        code,
        overflow,
    }
}
