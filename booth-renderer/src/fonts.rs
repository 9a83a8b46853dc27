//! Font database setup.
//!
//! A copy of DejaVu Sans is compiled in so stamps and text always have a face
//! to render with. System fonts and extra font files are layered on top, and
//! the generic `serif` / `sans-serif` families are pointed at faces that are
//! actually present.

use usvg::fontdb::{Database, Family, Query};

use crate::RendererConfig;

/// Family name of the compiled-in fallback font.
pub const BUNDLED_FAMILY: &str = "DejaVu Sans";

static BUNDLED_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

const SERIF_CANDIDATES: &[&str] = &[
    "Times New Roman",
    "DejaVu Serif",
    "Liberation Serif",
    "Noto Serif",
    "FreeSerif",
];

const SANS_SERIF_CANDIDATES: &[&str] = &[
    "Arial",
    "Helvetica",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "FreeSans",
];

/// Build the font database for `config`.
pub(crate) fn build_database(config: &RendererConfig) -> Database {
    let mut db = Database::new();
    if config.load_system_fonts {
        db.load_system_fonts();
    }
    for path in &config.font_files {
        if let Err(e) = db.load_font_file(path) {
            tracing::warn!("Skipping font file {}: {e}", path.display());
        }
    }
    db.load_font_data(BUNDLED_FONT.to_vec());

    let serif = pick_family(&db, Family::Serif, SERIF_CANDIDATES);
    db.set_serif_family(serif.clone());
    let sans_serif = pick_family(&db, Family::SansSerif, SANS_SERIF_CANDIDATES);
    db.set_sans_serif_family(sans_serif.clone());

    tracing::debug!(
        "Font database ready: {} faces, serif = {serif}, sans-serif = {sans_serif}",
        db.len()
    );
    db
}

/// The family a generic name should resolve to: the current mapping if it is
/// installed, else the first installed candidate, else the bundled font.
fn pick_family(db: &Database, generic: Family<'_>, candidates: &[&str]) -> String {
    if has_family(db, generic) {
        return db.family_name(&generic).to_string();
    }
    candidates
        .iter()
        .find(|name| has_family(db, Family::Name(name)))
        .map_or_else(|| BUNDLED_FAMILY.to_string(), |name| (*name).to_string())
}

fn has_family(db: &Database, family: Family<'_>) -> bool {
    db.query(&Query {
        families: &[family],
        ..Query::default()
    })
    .is_some()
}
