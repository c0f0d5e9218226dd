//! Font embedded at build time for label text.
//!
//! `build.rs` places DejaVu Sans (or the file named by `FONT_TTF`) into
//! `OUT_DIR`. When neither is available the bytes are empty and callers are
//! expected to fall back to system fonts.

pub static FONT_BYTES: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/LabelSans.ttf"));

/// Whether a real font was embedded.
pub fn is_embedded() -> bool {
    !FONT_BYTES.is_empty()
}
