//! `PARA_TEXT` payload decoding.

use super::control::{WIDE, classify};
use crate::document::{ControlChar, ControlClass, ControlId, Paragraph};

/// Characters with no visible content that editors leave in text
#[inline]
fn is_invisible(ch: char) -> bool {
    matches!(ch, '\u{FEFF}' | '\u{200B}'..='\u{200D}')
}

/// Decode a `PARA_TEXT` payload (UTF-16LE) into `para`.
///
/// Text becomes runs; control characters become [`ControlChar`] children,
/// except ignorable ones, which are dropped. Extended controls keep the
/// control id stored in their second and third code units so the builder
/// can attach the object that follows in later records.
pub fn decode_para_text(data: &[u8], para: &mut Paragraph) {
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();

    let mut text: Vec<u16> = Vec::with_capacity(units.len());
    let mut i = 0;
    while i < units.len() {
        let unit = units[i];
        let Some(spec) = classify(unit) else {
            text.push(unit);
            i += 1;
            continue;
        };

        flush_text(&mut text, para);

        let width = spec.width as usize;
        let id = if spec.width == WIDE && i + 2 < units.len() {
            let raw = (units[i + 1] as u32) | ((units[i + 2] as u32) << 16);
            Some(ControlId(raw))
        } else {
            None
        };

        match spec.class {
            ControlClass::Ignorable => {},
            ControlClass::Extended | ControlClass::FieldBoundary => para.push_control(ControlChar {
                code: unit,
                class: spec.class,
                id,
            }),
            class => para.push_class(unit, class),
        }
        i += width;
    }
    flush_text(&mut text, para);
}

fn flush_text(buf: &mut Vec<u16>, para: &mut Paragraph) {
    if buf.is_empty() {
        return;
    }
    let text: String = char::decode_utf16(buf.drain(..))
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .filter(|&ch| !is_invisible(ch))
        .collect();
    para.push_text(&text);
}
