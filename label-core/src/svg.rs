use crate::layout::LabelGeometry;
use crate::measure::TextMeasure;
use crate::qr::QrMatrix;

/// Label scene: white page, text lines, QR code in the code region.
pub fn label_svg(geometry: &LabelGeometry, qr: &QrMatrix, measure: &dyn TextMeasure) -> String {
    let (w, h) = (geometry.width, geometry.height);
    let mut s = String::new();
    s.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    s.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\" font-size=\"{}\">\n",
        geometry.font_size
    ));
    s.push_str("<rect x=\"0\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");

    let ascent = measure.ascent(f64::from(geometry.font_size));
    for line in &geometry.lines {
        s.push_str(&format!(
            "<text x=\"{}\" y=\"{:.2}\" fill=\"#000000\">{}</text>\n",
            line.x,
            f64::from(line.y) + ascent,
            svg_escape(&line.text)
        ));
    }

    s.push_str(&qr_path(geometry, qr));
    s.push_str("</svg>\n");
    s
}

fn qr_path(geometry: &LabelGeometry, qr: &QrMatrix) -> String {
    let code = geometry.code;
    if qr.width() == 0 || code.size == 0 {
        return String::new();
    }
    let module = f64::from(code.size) / qr.width() as f64;
    let mut d = String::new();
    for (x, y, len) in qr.dark_runs() {
        let px = f64::from(code.x) + x as f64 * module;
        let py = f64::from(code.y) + y as f64 * module;
        d.push_str(&format!(
            "M {:.3} {:.3} h {:.3} v {:.3} h {:.3} Z ",
            px,
            py,
            len as f64 * module,
            module,
            -(len as f64) * module
        ));
    }
    format!(
        "<path d=\"{}\" fill=\"#000000\" stroke=\"none\" shape-rendering=\"crispEdges\"/>\n",
        d.trim_end()
    )
}

fn svg_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
