use std::path::{Path, PathBuf};

/// First of `base`, `<stem>_v2<ext>`, `<stem>_v3<ext>`, … that does not exist.
pub fn free_path(base: &Path) -> PathBuf {
    if !base.exists() {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = base
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let mut i = 2;
    loop {
        let cand = base.with_file_name(format!("{stem}_v{i}{ext}"));
        if !cand.exists() {
            return cand;
        }
        i += 1;
    }
}

/// File stem for a label: `Inventar_<id>`, safe as a single path component.
pub fn label_stem(identifier: &str) -> String {
    let id = identifier.trim();
    let id = if id.is_empty() { "ohneINV" } else { id };
    let safe: String = id
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    format!("Inventar_{safe}")
}

/// Unused PNG and PDF paths for a label in `dir`.
pub fn label_paths(dir: &Path, identifier: &str) -> (PathBuf, PathBuf) {
    let stem = label_stem(identifier);
    (
        free_path(&dir.join(format!("{stem}.png"))),
        free_path(&dir.join(format!("{stem}.pdf"))),
    )
}
