use std::io;
use std::path::PathBuf;
use std::{env, fs};

use ttf_parser::Face;

// Reasonable serif faces to embed when the user has not pointed us at one.
const SYSTEM_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/TTF/DejaVuSerif.ttf",
    "/usr/share/fonts/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSerif-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Times New Roman.ttf",
    "C:\\Windows\\Fonts\\georgia.ttf",
];

/// Lazily loaded typeface bytes, cached for the session. A failed load is
/// not cached; the next export attempt reads again.
pub struct TypefaceStore {
    path: Option<PathBuf>,
    data: Option<Vec<u8>>,
}

impl TypefaceStore {
    pub fn discover() -> Self {
        Self {
            path: locate(),
            data: None,
        }
    }

    pub fn at(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            data: None,
        }
    }

    pub fn load(&mut self) -> io::Result<&[u8]> {
        if self.data.is_none() {
            let path = self.path.clone().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    "no embeddable typeface found; set VELLUM_FONT to a .ttf file",
                )
            })?;
            self.data = Some(fs::read(&path)?);
        }
        Ok(self.data.as_deref().unwrap_or_default())
    }
}

fn locate() -> Option<PathBuf> {
    if let Some(path) = env::var_os("VELLUM_FONT") {
        return Some(PathBuf::from(path));
    }
    if let Some(dir) = config_dir() {
        let configured = dir.join("typeface.ttf");
        if configured.exists() {
            return Some(configured);
        }
    }
    SYSTEM_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

fn config_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        let mut config_path = PathBuf::from(home);
        config_path.push(".config/vellum");
        Some(config_path)
    } else if let Ok(appdata) = env::var("APPDATA") {
        let mut config_path = PathBuf::from(appdata);
        config_path.push("vellum");
        Some(config_path)
    } else {
        None
    }
}

/// Rendered width of `text` in points, from the face's horizontal advances.
pub fn line_width(face: &Face, font_size_pt: f32, text: &str) -> f32 {
    let upem = face.units_per_em() as f32;
    if upem == 0.0 {
        return 0.0;
    }
    let units: f32 = text
        .chars()
        .map(|ch| {
            face.glyph_index(ch)
                .and_then(|glyph| face.glyph_hor_advance(glyph))
                .unwrap_or((upem / 2.0) as u16) as f32
        })
        .sum();
    units * font_size_pt / upem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_file_surfaces_an_io_error() {
        let mut store = TypefaceStore::at(PathBuf::from("/nonexistent/vellum/face.ttf"));
        let err = store.load().expect_err("load should fail");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn failed_load_is_retried_not_cached() {
        let mut store = TypefaceStore::at(PathBuf::from("/nonexistent/vellum/face.ttf"));
        assert!(store.load().is_err());
        // Still errors, and still actually attempts the read.
        assert!(store.load().is_err());
        assert!(store.data.is_none());
    }

    #[test]
    fn store_without_any_candidate_reports_not_found() {
        let mut store = TypefaceStore {
            path: None,
            data: None,
        };
        let err = store.load().expect_err("load should fail");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
