use qrcode::{Color, EcLevel, QrCode};

use crate::error::LabelError;

/// Light modules around the symbol on each side.
pub const QUIET_ZONE: usize = 2;

/// Dark/light module grid of a QR symbol, quiet zone included.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QrMatrix {
    width: usize,
    modules: Vec<bool>,
}

impl QrMatrix {
    pub fn encode(payload: &str) -> Result<Self, LabelError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
            .map_err(|e| LabelError::Qr(e.to_string()))?;
        let inner = code.width();
        let colors = code.to_colors();
        let width = inner + 2 * QUIET_ZONE;
        let mut modules = vec![false; width * width];
        for (i, color) in colors.iter().enumerate() {
            if *color == Color::Dark {
                let (x, y) = (i % inner + QUIET_ZONE, i / inner + QUIET_ZONE);
                modules[y * width + x] = true;
            }
        }
        Ok(Self { width, modules })
    }

    /// Modules per side, quiet zone included.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.modules[y * self.width + x]
    }

    /// Horizontal runs of dark modules as `(x, y, len)`.
    pub fn dark_runs(&self) -> Vec<(usize, usize, usize)> {
        let mut runs = Vec::new();
        for y in 0..self.width {
            let mut x = 0;
            while x < self.width {
                if self.is_dark(x, y) {
                    let start = x;
                    while x < self.width && self.is_dark(x, y) {
                        x += 1;
                    }
                    runs.push((start, y, x - start));
                } else {
                    x += 1;
                }
            }
        }
        runs
    }
}
