use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::env;

use chrono::{DateTime, Utc};
use printpdf::{Mm, PdfDocument, Pt};
use thiserror::Error;
use ttf_parser::Face;

mod layout;
mod typeface;

pub use layout::{paginate, wrap_text, Document, Page, PageLayout, PlacedLine};
pub use typeface::TypefaceStore;

pub const APP_NAME: &str = "vellum";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not load typeface: {0}")]
    AssetFetch(#[source] io::Error),
    #[error("typeface is not a usable font")]
    FaceParse,
    #[error("could not assemble document: {0}")]
    Pdf(String),
    #[error("could not save {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Wraps, paginates and serializes a text value into a paged PDF with the
/// typeface embedded. Callers hand in the live buffer value; the debounced
/// snapshot may be up to a window stale.
pub struct PaginationExporter {
    layout: PageLayout,
    typeface: TypefaceStore,
    out_dir: PathBuf,
}

impl PaginationExporter {
    pub fn new() -> Self {
        Self {
            layout: PageLayout::default(),
            typeface: TypefaceStore::discover(),
            out_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub fn export(&mut self, text: &str) -> Result<PathBuf, ExportError> {
        let layout = self.layout;
        let out_dir = self.out_dir.clone();

        let data = self.typeface.load().map_err(ExportError::AssetFetch)?;
        let face = Face::parse(data, 0).map_err(|_| ExportError::FaceParse)?;

        let lines = wrap_text(text, layout.usable_width(), |s| {
            typeface::line_width(&face, layout.font_size_pt, s)
        });
        let document = paginate(&lines, &layout);

        let path = out_dir.join(export_filename(Utc::now()));
        write_pdf(&document, &layout, data, &path)?;
        Ok(path)
    }
}

fn export_filename(at: DateTime<Utc>) -> String {
    // Colons are unsafe in filenames, so the timestamp swaps them out.
    format!("{}-{}.pdf", APP_NAME, at.format("%Y-%m-%dT%H-%M-%S"))
}

fn write_pdf(
    document: &Document,
    layout: &PageLayout,
    font_data: &[u8],
    path: &Path,
) -> Result<(), ExportError> {
    let page_width = Mm::from(Pt(layout.page_width_pt));
    let page_height = Mm::from(Pt(layout.page_height_pt));

    let (doc, first_page, first_layer) = PdfDocument::new(APP_NAME, page_width, page_height, "text");
    let font = doc
        .add_external_font(font_data)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    let mut target = (first_page, first_layer);
    for (index, page) in document.pages.iter().enumerate() {
        if index > 0 {
            target = doc.add_page(page_width, page_height, "text");
        }
        let layer = doc.get_page(target.0).get_layer(target.1);
        for line in &page.lines {
            if line.text.is_empty() {
                continue;
            }
            // PDF y runs bottom-up; our layout runs top-down to the baseline.
            let baseline = line.y_pt + layout.line_height_pt;
            layer.use_text(
                line.text.as_str(),
                layout.font_size_pt,
                Mm::from(Pt(layout.margin_pt)),
                Mm::from(Pt(layout.page_height_pt - baseline)),
                &font,
            );
        }
    }

    let file = File::create(path).map_err(|e| ExportError::Save {
        path: path.to_path_buf(),
        source: e,
    })?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn filename_embeds_a_filesystem_safe_timestamp() {
        let at = Utc.with_ymd_and_hms(2026, 8, 5, 9, 3, 41).unwrap();
        let name = export_filename(at);
        assert_eq!(name, "vellum-2026-08-05T09-03-41.pdf");
        assert!(!name.contains(':'));
    }

    #[test]
    fn failed_typeface_load_aborts_with_asset_fetch() {
        let mut exporter = PaginationExporter {
            layout: PageLayout::default(),
            typeface: TypefaceStore::at(PathBuf::from("/nonexistent/vellum/face.ttf")),
            out_dir: PathBuf::from("/nonexistent/vellum"),
        };
        let err = exporter.export("some text").expect_err("export should fail");
        assert!(matches!(err, ExportError::AssetFetch(_)));
    }

    #[test]
    fn failed_export_leaves_the_session_untouched() {
        use crate::input::{DeviceClass, EditOp};
        use crate::session::Session;
        use crate::visibility::Visibility;
        use std::time::Instant;

        let mut session = Session::new(DeviceClass::Keyboard);
        session.apply(EditOp::AppendRun("draft".into()), Instant::now());

        let mut exporter = PaginationExporter {
            layout: PageLayout::default(),
            typeface: TypefaceStore::at(PathBuf::from("/nonexistent/vellum/face.ttf")),
            out_dir: PathBuf::from("/nonexistent/vellum"),
        };
        assert!(exporter.export(&session.export_text()).is_err());
        assert_eq!(session.export_text(), "draft");
        assert_eq!(session.visibility(), Visibility::Hidden);
    }

    #[test]
    fn asset_failure_leaves_no_partial_document() {
        let out_dir = env::temp_dir().join("vellum-export-abort-test");
        std::fs::create_dir_all(&out_dir).expect("temp dir");
        let mut exporter = PaginationExporter {
            layout: PageLayout::default(),
            typeface: TypefaceStore::at(PathBuf::from("/nonexistent/vellum/face.ttf")),
            out_dir: out_dir.clone(),
        };
        assert!(exporter.export("text").is_err());
        let leftovers = std::fs::read_dir(&out_dir).expect("read temp dir").count();
        assert_eq!(leftovers, 0);
    }
}
