//! # label-core
//!
//! Layout and rendering of 5 × 4 cm inventory labels: wrapped field text
//! above a QR code.
//!
//! ```text
//! AssetRecord ──► text lines ──► fit() ──► LabelGeometry
//!                     │                        │
//!                     ▼                        ▼
//!                 QrMatrix ───────────► label_svg() ──► PNG / PDF
//! ```
//!
//! - **`measure`**: text width measurement (font-backed or fixed advance).
//! - **`wrap`**: greedy word wrap to a pixel width.
//! - **`layout`**: descending font-size search for a fixed canvas.
//! - **`qr`**: QR module matrix for the label payload.
//! - **`svg`**: label scene as an SVG document.
//! - **`render`**: rasterization (PNG) and PDF output.

pub mod error;
pub mod layout;
pub mod measure;
pub mod qr;
pub mod render;
pub mod svg;
pub mod wrap;

pub use error::LabelError;
pub use layout::{CodeRegion, LabelGeometry, LabelSize, PlacedLine, fit};
pub use measure::{FixedAdvance, FontMeasure, TextMeasure};
pub use qr::QrMatrix;
pub use render::{LabelRenderer, PdfBackend, RenderOptions, RenderedLabel, encode_png};
pub use svg::label_svg;
pub use wrap::wrap_to_width;
