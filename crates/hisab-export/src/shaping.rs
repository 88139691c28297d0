//! Arabic glyph joining and visual reordering
//!
//! PDF text is drawn glyph by glyph, left to right, so Arabic has to be
//! prepared before it reaches the page: each letter is replaced by its
//! contextual presentation form (isolated, final, initial or medial), lam +
//! alef pairs become their ligature, harakat are dropped, and the result is
//! reordered into visual order with the Unicode bidirectional algorithm.

use hisab_core::{is_arabic_diacritic, looks_arabic};
use unicode_bidi::BidiInfo;

const TATWEEL: char = '\u{0640}';
const LAM: char = '\u{0644}';

/// Presentation forms of one letter.
///
/// Letters without `initial`/`medial` forms only join to the preceding
/// letter.
struct Forms {
    letter: char,
    isolated: char,
    final_: Option<char>,
    initial: Option<char>,
    medial: Option<char>,
}

const fn dual(letter: char, first: u32) -> Forms {
    Forms {
        letter,
        isolated: from_u32(first),
        final_: Some(from_u32(first + 1)),
        initial: Some(from_u32(first + 2)),
        medial: Some(from_u32(first + 3)),
    }
}

const fn right(letter: char, first: u32) -> Forms {
    Forms {
        letter,
        isolated: from_u32(first),
        final_: Some(from_u32(first + 1)),
        initial: None,
        medial: None,
    }
}

const fn from_u32(cp: u32) -> char {
    match char::from_u32(cp) {
        Some(c) => c,
        None => '\u{FFFD}',
    }
}

const FORMS: &[Forms] = &[
    Forms {
        letter: '\u{0621}',
        isolated: '\u{FE80}',
        final_: None,
        initial: None,
        medial: None,
    },
    right('\u{0622}', 0xFE81),
    right('\u{0623}', 0xFE83),
    right('\u{0624}', 0xFE85),
    right('\u{0625}', 0xFE87),
    dual('\u{0626}', 0xFE89),
    right('\u{0627}', 0xFE8D),
    dual('\u{0628}', 0xFE8F),
    right('\u{0629}', 0xFE93),
    dual('\u{062A}', 0xFE95),
    dual('\u{062B}', 0xFE99),
    dual('\u{062C}', 0xFE9D),
    dual('\u{062D}', 0xFEA1),
    dual('\u{062E}', 0xFEA5),
    right('\u{062F}', 0xFEA9),
    right('\u{0630}', 0xFEAB),
    right('\u{0631}', 0xFEAD),
    right('\u{0632}', 0xFEAF),
    dual('\u{0633}', 0xFEB1),
    dual('\u{0634}', 0xFEB5),
    dual('\u{0635}', 0xFEB9),
    dual('\u{0636}', 0xFEBD),
    dual('\u{0637}', 0xFEC1),
    dual('\u{0638}', 0xFEC5),
    dual('\u{0639}', 0xFEC9),
    dual('\u{063A}', 0xFECD),
    dual('\u{0641}', 0xFED1),
    dual('\u{0642}', 0xFED5),
    dual('\u{0643}', 0xFED9),
    dual('\u{0644}', 0xFEDD),
    dual('\u{0645}', 0xFEE1),
    dual('\u{0646}', 0xFEE5),
    dual('\u{0647}', 0xFEE9),
    right('\u{0648}', 0xFEED),
    right('\u{0649}', 0xFEEF),
    dual('\u{064A}', 0xFEF1),
    dual('\u{067E}', 0xFB56),
    dual('\u{0686}', 0xFB7A),
    right('\u{0698}', 0xFB8A),
    dual('\u{06A9}', 0xFB8E),
    dual('\u{06AF}', 0xFB92),
    dual('\u{06CC}', 0xFBFC),
];

/// Lam-alef ligatures: (alef variant, isolated, final)
const LAM_ALEF: &[(char, char, char)] = &[
    ('\u{0622}', '\u{FEF5}', '\u{FEF6}'),
    ('\u{0623}', '\u{FEF7}', '\u{FEF8}'),
    ('\u{0625}', '\u{FEF9}', '\u{FEFA}'),
    ('\u{0627}', '\u{FEFB}', '\u{FEFC}'),
];

fn forms(c: char) -> Option<&'static Forms> {
    FORMS.iter().find(|f| f.letter == c)
}

/// Joins to the following letter
fn joins_forward(c: char) -> bool {
    c == TATWEEL || forms(c).is_some_and(|f| f.initial.is_some())
}

/// Joins to the preceding letter
fn joins_backward(c: char) -> bool {
    c == TATWEEL || forms(c).is_some_and(|f| f.final_.is_some())
}

/// Replace Arabic letters with their contextual presentation forms.
///
/// Operates in logical order. Harakat are removed; characters outside the
/// letter table pass through unchanged and break joining.
pub fn reshape_arabic(text: &str) -> String {
    let chars: Vec<char> = text.chars().filter(|c| !is_arabic_diacritic(*c)).collect();
    let mut out = String::with_capacity(text.len());

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let joined_before = i > 0 && joins_forward(chars[i - 1]) && joins_backward(c);

        if c == LAM {
            if let Some(&(_, isolated, final_)) = chars
                .get(i + 1)
                .and_then(|next| LAM_ALEF.iter().find(|(alef, _, _)| alef == next))
            {
                out.push(if joined_before { final_ } else { isolated });
                i += 2;
                continue;
            }
        }

        let Some(f) = forms(c) else {
            out.push(c);
            i += 1;
            continue;
        };
        let joins_after = chars
            .get(i + 1)
            .is_some_and(|&next| joins_forward(c) && joins_backward(next));

        let shaped = match (joined_before, joins_after) {
            (true, true) => f.medial,
            (true, false) => f.final_,
            (false, true) => f.initial,
            (false, false) => None,
        };
        out.push(shaped.unwrap_or(f.isolated));
        i += 1;
    }
    out
}

fn mirror(c: char) -> char {
    match c {
        '(' => ')',
        ')' => '(',
        '[' => ']',
        ']' => '[',
        '{' => '}',
        '}' => '{',
        '<' => '>',
        '>' => '<',
        '«' => '»',
        '»' => '«',
        other => other,
    }
}

/// Reorder logical-order text into left-to-right visual order.
///
/// Right-to-left runs are reversed and their paired brackets mirrored. The
/// base direction of each paragraph comes from its first strong character.
pub fn visual_order(text: &str) -> String {
    let info = BidiInfo::new(text, None);
    let mut out = String::with_capacity(text.len());
    for para in &info.paragraphs {
        let line = para.range.clone();
        let (levels, runs) = info.visual_runs(para, line);
        for run in runs {
            let segment = &text[run.clone()];
            if levels[run.start].is_rtl() {
                out.extend(segment.chars().rev().map(mirror));
            } else {
                out.push_str(segment);
            }
        }
    }
    out
}

/// Prepare one string for the PDF page.
///
/// Text without Arabic letters is returned unchanged.
pub fn shape_for_display(text: &str) -> String {
    if !looks_arabic(text) {
        return text.to_string();
    }
    visual_order(&reshape_arabic(text))
}

#[cfg(test)]
mod tests;
