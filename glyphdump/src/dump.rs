//! Per font glyph dumps.

use std::{fmt::Write, path::Path};

use glyph_engine::{
    error::EngineError, BoundingBox, CachedGlyph, CoordWidth, FtFontEngine, GlyphAdaptor,
    GlyphCacheManager, GlyphId, GlyphRendering,
};
use serde::Serialize;

use crate::{ascii, svg::SvgPath};

/// What to prepare and how to print it.
#[derive(Clone, Debug)]
pub struct DumpOptions {
    pub text: String,
    pub size: f64,
    pub modes: Vec<GlyphRendering>,
    pub hinting: bool,
    pub flip_y: bool,
    pub coord_width: CoordWidth,
    pub json: bool,
    pub bitmaps: bool,
    pub svg: bool,
}

/// One prepared glyph.
#[derive(Clone, Serialize, Debug)]
pub struct GlyphRecord {
    pub face: String,
    pub mode: String,
    pub character: char,
    pub code: u32,
    pub glyph_index: GlyphId,
    pub data_type: String,
    pub data_size: usize,
    pub bounds: BoundingBox<i32>,
    pub advance: [f64; 2],
    /// Kerning against the previous glyph.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kerning: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
}

impl GlyphRecord {
    fn new(face: &str, mode: GlyphRendering, character: char, glyph: &CachedGlyph) -> Self {
        let metrics = &glyph.metrics;
        Self {
            face: face.to_owned(),
            mode: format!("{mode:?}"),
            character,
            code: metrics.glyph_code,
            glyph_index: metrics.glyph_index,
            data_type: format!("{:?}", metrics.data_type),
            data_size: metrics.data_size,
            bounds: metrics.bounds,
            advance: [metrics.advance_x, metrics.advance_y],
            kerning: None,
            svg: None,
        }
    }

    fn write_text(&self, out: &mut String) {
        let b = &self.bounds;
        let _ = write!(
            out,
            "{:?} {} {} {:<7} {:>6} bytes [{}, {}, {}, {}] advance ({:.2}, {:.2})",
            self.character,
            self.glyph_index,
            self.mode,
            self.data_type,
            self.data_size,
            b.x_min,
            b.y_min,
            b.x_max,
            b.y_max,
            self.advance[0],
            self.advance[1],
        );
        if let Some([x, y]) = self.kerning {
            let _ = write!(out, " kern ({x:.2}, {y:.2})");
        }
        out.push('\n');
        if let Some(svg) = &self.svg {
            let _ = writeln!(out, "  {svg}");
        }
    }
}

/// Loads the first face of `path` and dumps the text in every requested
/// mode.
pub fn dump_file(path: &Path, options: &DumpOptions) -> Result<String, EngineError> {
    let engine = FtFontEngine::new(options.coord_width);
    let mut face = engine.load_face_file(path, 0)?;
    face.set_height(options.size)
        .set_hinting(options.hinting)
        .set_flip_y(options.flip_y);
    let name = face.face_name().to_owned();
    let mut cache = GlyphCacheManager::default();
    let mut out = String::new();
    if !options.json {
        let _ = writeln!(
            out,
            "[{}] {name}: {} glyphs, ascender {:.2}, descender {:.2}, line height {:.2}",
            path.display(),
            face.num_glyphs(),
            face.ascender(),
            face.descender(),
            face.line_height(),
        );
    }
    for &mode in &options.modes {
        face.set_rendering(mode);
        cache.reset_last_glyph();
        for character in options.text.chars() {
            let Some(glyph) = cache.glyph(&mut face, character as u32).cloned() else {
                if !options.json {
                    let _ = writeln!(out, "{character:?} failed to prepare in {mode:?}");
                }
                continue;
            };
            let mut record = GlyphRecord::new(&name, mode, character, &glyph);
            let (mut x, mut y) = (0.0, 0.0);
            if cache.add_kerning(&mut face, &mut x, &mut y) && (x, y) != (0.0, 0.0) {
                record.kerning = Some([x, y]);
            }
            let adaptor = glyph.adaptor(0.0, 0.0);
            if options.svg {
                if let Some(GlyphAdaptor::Outline(outline)) = &adaptor {
                    let mut svg = SvgPath::with_precision(2);
                    svg.extend(outline.elements());
                    record.svg = Some(svg.into());
                }
            }
            if options.json {
                match serde_json::to_string(&record) {
                    Ok(line) => {
                        out.push_str(&line);
                        out.push('\n');
                    }
                    Err(e) => log::warn!("unable to serialize {character:?}: {e}"),
                }
            } else {
                record.write_text(&mut out);
                if options.bitmaps {
                    if let Some(art) = adaptor.and_then(|a| ascii::render(&a, options.flip_y)) {
                        out.push_str(&art);
                    }
                }
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_engine::{GlyphDataType, GlyphMetrics};

    fn record() -> GlyphRecord {
        let glyph = CachedGlyph {
            metrics: GlyphMetrics {
                glyph_index: GlyphId::new(36),
                glyph_code: 'A' as u32,
                data_type: GlyphDataType::Outline,
                data_size: 64,
                bounds: BoundingBox::new(0, -1, 8, 9),
                advance_x: 8.5,
                advance_y: 0.0,
            },
            data: vec![],
            coord_width: CoordWidth::Int32,
        };
        GlyphRecord::new("Test Sans", GlyphRendering::Outline, 'A', &glyph)
    }

    #[test]
    fn text_line() {
        let mut record = record();
        record.kerning = Some([-1.0, 0.0]);
        let mut out = String::new();
        record.write_text(&mut out);
        assert_eq!(
            out,
            "'A' GID_36 Outline Outline     64 bytes [0, -1, 8, 9] advance (8.50, 0.00) kern (-1.00, 0.00)\n"
        );
    }

    #[test]
    fn json_omits_missing_fields() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["glyph_index"], 36);
        assert_eq!(json["bounds"]["y_min"], -1);
        assert_eq!(json["advance"][0], 8.5);
        assert!(json.get("kerning").is_none());
        assert!(json.get("svg").is_none());
    }

    #[test]
    fn missing_file() {
        let options = DumpOptions {
            text: "A".into(),
            size: 12.0,
            modes: vec![GlyphRendering::Outline],
            hinting: true,
            flip_y: false,
            coord_width: CoordWidth::Int32,
            json: false,
            bitmaps: false,
            svg: false,
        };
        assert!(dump_file(Path::new("/no/such/font.ttf"), &options).is_err());
    }
}
