use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelError {
    #[error("QR encoding failed: {0}")]
    Qr(String),
    #[error("SVG parse error: {0}")]
    Svg(String),
    #[error("pixmap alloc failed for {0}x{1}")]
    Pixmap(u32, u32),
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
    #[error("PDF conversion failed: {0}")]
    Pdf(String),
}
