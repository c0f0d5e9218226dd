use log::warn;
use usvg::fontdb::{Database, Family, Query};

/// Measures rendered text in pixels at a given font size.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f64) -> f64;

    /// Distance from the top of a line to its baseline.
    fn ascent(&self, font_size: f64) -> f64 {
        font_size * 0.8
    }
}

/// Every character advances by the same fraction of the font size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvance {
    pub em: f64,
}

impl Default for FixedAdvance {
    fn default() -> Self {
        // Average advance of a sans-serif Latin face.
        Self { em: 0.55 }
    }
}

impl TextMeasure for FixedAdvance {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * self.em * font_size
    }
}

/// Horizontal advances read from a TrueType/OpenType face. Kerning is not
/// applied. `D` is anything holding the font file: the embedded static bytes
/// or a copy taken from a font database.
pub struct FontMeasure<D = &'static [u8]> {
    data: D,
    index: u32,
    units_per_em: f64,
    ascender: f64,
    missing_advance: f64,
}

impl<D: AsRef<[u8]>> FontMeasure<D> {
    pub fn parse(data: D) -> Result<Self, ttf_parser::FaceParsingError> {
        Self::parse_face(data, 0)
    }

    /// Face `index` of a font collection.
    pub fn parse_face(data: D, index: u32) -> Result<Self, ttf_parser::FaceParsingError> {
        let (units_per_em, ascender, missing_advance) = {
            let face = ttf_parser::Face::parse(data.as_ref(), index)?;
            let units_per_em = f64::from(face.units_per_em().max(1));
            let missing_advance = face
                .glyph_index('?')
                .and_then(|g| face.glyph_hor_advance(g))
                .map(f64::from)
                .unwrap_or(units_per_em / 2.0);
            (units_per_em, f64::from(face.ascender()), missing_advance)
        };
        Ok(Self {
            data,
            index,
            units_per_em,
            ascender,
            missing_advance,
        })
    }

    fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(self.data.as_ref(), self.index).ok()
    }
}

impl<D: AsRef<[u8]>> TextMeasure for FontMeasure<D> {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        let units: f64 = match self.face() {
            Some(face) => text
                .chars()
                .map(|c| {
                    face.glyph_index(c)
                        .and_then(|g| face.glyph_hor_advance(g))
                        .map(f64::from)
                        .unwrap_or(self.missing_advance)
                })
                .sum(),
            // Already validated by `parse_face`.
            None => text.chars().count() as f64 * self.missing_advance,
        };
        units * font_size / self.units_per_em
    }

    fn ascent(&self, font_size: f64) -> f64 {
        self.ascender * font_size / self.units_per_em
    }
}

/// Measure for the font embedded by the `fonts` crate, or a fixed advance
/// when none was embedded.
pub fn embedded() -> Box<dyn TextMeasure> {
    if fonts::is_embedded() {
        match FontMeasure::parse(fonts::FONT_BYTES) {
            Ok(m) => return Box::new(m),
            Err(e) => warn!("embedded font unreadable ({e}); using fixed advance"),
        }
    } else {
        warn!("no embedded font; text widths are approximate");
    }
    Box::new(FixedAdvance::default())
}

/// Measure for the face `db` resolves the generic `sans-serif` family to,
/// which is the face the label text is rasterized with.
pub fn sans_serif(db: &Database) -> Option<Box<dyn TextMeasure>> {
    let id = db.query(&Query {
        families: &[Family::SansSerif],
        ..Query::default()
    })?;
    let (data, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    match FontMeasure::parse_face(data, index) {
        Ok(m) => {
            let measure: Box<dyn TextMeasure> = Box::new(m);
            Some(measure)
        }
        Err(e) => {
            warn!("sans-serif face unreadable ({e})");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_advance_scales_with_size() {
        let m = FixedAdvance { em: 0.5 };
        assert_eq!(m.text_width("abcd", 10.0), 20.0);
        assert_eq!(m.text_width("äöü", 20.0), 30.0);
        assert_eq!(m.ascent(10.0), 8.0);
    }

    #[test]
    fn embedded_measure_is_monotonic() {
        let m = embedded();
        let short = m.text_width("Garantie", 20.0);
        let long = m.text_width("Garantie: 2 Jahre", 20.0);
        assert!(short > 0.0);
        assert!(long > short);
        assert!(m.text_width("Garantie", 40.0) > short);
    }

    #[test]
    fn rejects_garbage_font() {
        assert!(FontMeasure::parse(b"not a font").is_err());
    }

    #[test]
    fn empty_database_resolves_no_face() {
        assert!(sans_serif(&Database::new()).is_none());
    }

    #[test]
    fn database_face_matches_embedded_font() {
        if !fonts::is_embedded() {
            return;
        }
        let mut db = Database::new();
        db.load_font_data(fonts::FONT_BYTES.to_vec());
        let family = db
            .faces()
            .next()
            .and_then(|f| f.families.first().map(|(n, _)| n.clone()));
        db.set_sans_serif_family(family.unwrap());

        let resolved = sans_serif(&db).unwrap();
        let direct = embedded();
        for text in ["Garantie: 2 Jahre", "Händler: Müller"] {
            assert_eq!(resolved.text_width(text, 24.0), direct.text_width(text, 24.0));
        }
        assert_eq!(resolved.ascent(24.0), direct.ascent(24.0));
    }
}
