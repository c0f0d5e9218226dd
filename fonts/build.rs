use std::env;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;
use zip::ZipArchive;

const FONT_FILE: &str = "LabelSans.ttf";
const ZIP_URL: &str =
    "https://github.com/dejavu-fonts/dejavu-fonts/releases/download/version_2_37/dejavu-fonts-ttf-2.37.zip";
const ZIP_MEMBER: &str = "ttf/DejaVuSans.ttf";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=FONT_TTF");
    println!("cargo:rerun-if-env-changed=FONTS_OFFLINE");

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let target_font = out_dir.join(FONT_FILE);

    // Allow overriding via env: FONT_TTF
    if let Ok(path) = env::var("FONT_TTF") {
        match fs::copy(&path, &target_font) {
            Ok(_) => return,
            Err(e) => println!("cargo:warning=failed to copy FONT_TTF {path}: {e}"),
        }
    }

    // Incremental build with a real font already in place
    if fs::metadata(&target_font).map(|m| m.len() > 0).unwrap_or(false) {
        return;
    }

    if env::var_os("FONTS_OFFLINE").is_none() {
        match download_font(&out_dir) {
            Ok(bytes) => {
                fs::write(&target_font, bytes).expect("write font failed");
                return;
            }
            Err(e) => println!("cargo:warning={e}; labels will use system fonts"),
        }
    }

    // No embedded font: the renderer falls back to system fonts and an
    // approximate text measure.
    fs::write(&target_font, []).expect("write empty font placeholder failed");
}

fn download_font(out_dir: &Path) -> Result<Vec<u8>, String> {
    let zip_path = out_dir.join("dejavu-fonts.zip");
    let zip_arg = zip_path.to_string_lossy().to_string();
    let mut ok = Command::new("curl")
        .args(["-L", "-f", "-s", "-o", &zip_arg, ZIP_URL])
        .status()
        .map(|st| st.success())
        .unwrap_or(false);
    if !ok {
        ok = Command::new("wget")
            .args(["-q", "-O", &zip_arg, ZIP_URL])
            .status()
            .map(|st| st.success())
            .unwrap_or(false);
    }
    if !ok {
        return Err(format!("failed to download {ZIP_URL}"));
    }

    let mut data = Vec::new();
    fs::File::open(&zip_path)
        .and_then(|mut f| f.read_to_end(&mut data))
        .map_err(|e| format!("zip read failed: {e}"))?;
    let mut zip = ZipArchive::new(std::io::Cursor::new(data))
        .map_err(|e| format!("zip parse failed: {e}"))?;
    for i in 0..zip.len() {
        let mut file = zip.by_index(i).map_err(|e| format!("zip entry failed: {e}"))?;
        if file.name().ends_with(ZIP_MEMBER) {
            let mut buf = Vec::new();
            std::io::copy(&mut file, &mut buf).map_err(|e| format!("extract failed: {e}"))?;
            return Ok(buf);
        }
    }
    Err(format!("{ZIP_MEMBER} not found in font archive"))
}
