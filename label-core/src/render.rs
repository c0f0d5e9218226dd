//! Rasterization and PDF output.
//!
//! The label scene is parsed once by `usvg` and then painted with `resvg`
//! for PNG, or converted by `svg2pdf` for a vector PDF. Without the
//! `vector-pdf` feature, or when [`PdfBackend::Raster`] is requested, the PDF
//! page embeds the rendered pixels instead.

use inventory_core::AssetRecord;
use log::{debug, warn};
use png::{BitDepth, ColorType, Compression, Encoder, FilterType, PixelDimensions, Unit};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::LabelError;
use crate::layout::{LabelGeometry, LabelSize, fit};
use crate::measure::{self, FixedAdvance, TextMeasure};
use crate::qr::QrMatrix;
use crate::svg::label_svg;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PdfBackend {
    #[default]
    Vector,
    Raster,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderOptions {
    pub size: LabelSize,
    pub pdf_backend: PdfBackend,
}

/// Everything produced for one label.
#[derive(Clone, Debug)]
pub struct RenderedLabel {
    pub geometry: LabelGeometry,
    pub svg: String,
    pub png: Vec<u8>,
    pub pdf: Vec<u8>,
}

pub struct LabelRenderer {
    options: RenderOptions,
    fontdb: Arc<usvg::fontdb::Database>,
    measure: Box<dyn TextMeasure>,
}

impl LabelRenderer {
    /// Text is measured with the face the font database resolves for
    /// `sans-serif`, so wrapped lines fit once rasterized.
    pub fn new(options: RenderOptions) -> Self {
        let fontdb = font_database();
        let measure = measure::sans_serif(&fontdb).unwrap_or_else(|| {
            warn!("no sans-serif face available; text widths are approximate");
            Box::new(FixedAdvance::default())
        });
        Self::assemble(options, fontdb, measure)
    }

    pub fn with_measure(options: RenderOptions, measure: Box<dyn TextMeasure>) -> Self {
        Self::assemble(options, font_database(), measure)
    }

    fn assemble(
        mut options: RenderOptions,
        fontdb: usvg::fontdb::Database,
        measure: Box<dyn TextMeasure>,
    ) -> Self {
        if options.pdf_backend == PdfBackend::Vector && !cfg!(feature = "vector-pdf") {
            warn!("built without vector-pdf; PDFs will embed the raster label");
            options.pdf_backend = PdfBackend::Raster;
        }
        Self {
            options,
            fontdb: Arc::new(fontdb),
            measure,
        }
    }

    pub fn pdf_backend(&self) -> PdfBackend {
        self.options.pdf_backend
    }

    pub fn measure(&self) -> &dyn TextMeasure {
        self.measure.as_ref()
    }

    pub fn layout<S: AsRef<str>>(&self, text_lines: &[S], dpi: u32) -> LabelGeometry {
        fit(text_lines, self.options.size, dpi, self.measure())
    }

    pub fn render(&self, record: &AssetRecord, dpi: u32) -> Result<RenderedLabel, LabelError> {
        let geometry = self.layout(&record.text_lines(), dpi);
        let qr = QrMatrix::encode(&record.qr_payload())?;
        let svg = label_svg(&geometry, &qr, self.measure());

        let mut opt = usvg::Options::default();
        opt.fontdb = Arc::clone(&self.fontdb);
        let tree = usvg::Tree::from_str(&svg, &opt).map_err(|e| LabelError::Svg(format!("{e:?}")))?;

        let pixmap = rasterize(&tree, geometry.width, geometry.height)?;
        let png = encode_png(&pixmap, dpi)?;
        let pdf = match self.options.pdf_backend {
            PdfBackend::Vector => vector_pdf(&tree, dpi)?,
            PdfBackend::Raster => raster_pdf(&pixmap, self.options.size),
        };
        debug!(
            "rendered label {}: {} byte PNG, {} byte PDF",
            record.identifier(),
            png.len(),
            pdf.len()
        );
        Ok(RenderedLabel {
            geometry,
            svg,
            png,
            pdf,
        })
    }
}

/// System families tried for `sans-serif` when no font is embedded.
const SANS_FALLBACKS: [&str; 5] = [
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
];

fn font_database() -> usvg::fontdb::Database {
    let mut fontdb = usvg::fontdb::Database::new();
    let family_name = if fonts::is_embedded() {
        fontdb.load_font_data(fonts::FONT_BYTES.to_vec());
        // Map generic 'sans-serif' to the embedded font family
        first_family(&fontdb)
    } else {
        warn!("no embedded font; loading system fonts");
        fontdb.load_system_fonts();
        SANS_FALLBACKS
            .iter()
            .find(|&&name| {
                fontdb
                    .query(&usvg::fontdb::Query {
                        families: &[usvg::fontdb::Family::Name(name)],
                        ..Default::default()
                    })
                    .is_some()
            })
            .map(|name| name.to_string())
            .or_else(|| first_family(&fontdb))
    };
    match family_name {
        Some(name) => {
            debug!("sans-serif resolves to {name}");
            fontdb.set_sans_serif_family(name);
        }
        None => warn!("font database is empty; label text will not be drawn"),
    }
    fontdb
}

fn first_family(fontdb: &usvg::fontdb::Database) -> Option<String> {
    fontdb
        .faces()
        .next()
        .and_then(|face| face.families.first().map(|(n, _)| n.clone()))
}

fn rasterize(tree: &usvg::Tree, width: u32, height: u32) -> Result<tiny_skia::Pixmap, LabelError> {
    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(LabelError::Pixmap(width, height))?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// RGBA PNG with the physical resolution recorded in the pHYs chunk.
pub fn encode_png(pixmap: &tiny_skia::Pixmap, dpi: u32) -> Result<Vec<u8>, png::EncodingError> {
    let mut buf = Vec::new();
    {
        let mut enc = Encoder::new(&mut buf, pixmap.width(), pixmap.height());
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        enc.set_filter(FilterType::NoFilter);
        enc.set_compression(Compression::Default);
        let ppm = (f64::from(dpi) / 0.0254).round() as u32;
        enc.set_pixel_dims(Some(PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: Unit::Meter,
        }));
        let mut writer = enc.write_header()?;
        writer.write_image_data(pixmap.data())?;
    }
    Ok(buf)
}

#[cfg(feature = "vector-pdf")]
fn vector_pdf(tree: &usvg::Tree, dpi: u32) -> Result<Vec<u8>, LabelError> {
    let mut page = svg2pdf::PageOptions::default();
    page.dpi = dpi as f32;
    svg2pdf::to_pdf(tree, svg2pdf::ConversionOptions::default(), page)
        .map_err(|e| LabelError::Pdf(format!("{e:?}")))
}

#[cfg(not(feature = "vector-pdf"))]
fn vector_pdf(_tree: &usvg::Tree, _dpi: u32) -> Result<Vec<u8>, LabelError> {
    Err(LabelError::Pdf("vector PDF support not compiled in".to_string()))
}

/// Single-page PDF of `size` showing the pixmap as an RGB image.
fn raster_pdf(pixmap: &tiny_skia::Pixmap, size: LabelSize) -> Vec<u8> {
    use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref};

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let image_id = Ref::new(4);
    let content_id = Ref::new(5);
    let image_name = Name(b"Label");
    let (w_pt, h_pt) = size.points();

    // The label is painted on opaque white, so dropping alpha is lossless.
    let rgb: Vec<u8> = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);
    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(0.0, 0.0, w_pt, h_pt));
    page.parent(page_tree_id);
    page.contents(content_id);
    page.resources().x_objects().pair(image_name, image_id);
    page.finish();

    let mut image = pdf.image_xobject(image_id, &rgb);
    image.width(pixmap.width() as i32);
    image.height(pixmap.height() as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.finish();

    let mut content = Content::new();
    content.save_state();
    content.transform([w_pt, 0.0, 0.0, h_pt, 0.0, 0.0]);
    content.x_object(image_name);
    content.restore_state();
    pdf.stream(content_id, &content.finish());

    pdf.finish()
}
