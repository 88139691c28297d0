//! Tests for document layout

use super::*;
use hisab_core::TabularResult;

/// Every character is half an em wide; text is drawn as given
struct FixedFace;

impl Typeface for FixedFace {
    fn prepare(&self, text: &str) -> String {
        text.to_string()
    }

    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * 0.5
    }
}

fn plan(result: &TabularResult, title: &str, logo: Option<(u32, u32)>) -> DocumentLayout {
    let table = ClassifiedTable::new(result);
    DocumentLayout::plan(
        &table,
        title,
        logo,
        &FixedFace,
        &DocumentSettings::default(),
        &ExportLabels::english(),
    )
}

fn numbered_rows(count: usize) -> TabularResult {
    TabularResult::new(
        vec!["Name".into(), "Amount".into()],
        (0..count)
            .map(|i| vec![Value::from(format!("row {}", i)), Value::Number(i as f64)])
            .collect(),
    )
    .unwrap()
}

mod wrap_tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(wrap_text("a b", &FixedFace, 10.0, 100.0), vec!["a b"]);
        assert_eq!(wrap_text("", &FixedFace, 10.0, 100.0), vec![""]);
    }

    #[test]
    fn test_wraps_on_words() {
        // 5pt per char at size 10, so 40pt holds 8 chars
        assert_eq!(
            wrap_text("alpha beta gamma", &FixedFace, 10.0, 40.0),
            vec!["alpha", "beta", "gamma"]
        );
    }

    #[test]
    fn test_breaks_long_words() {
        assert_eq!(
            wrap_text("abcdefghij", &FixedFace, 10.0, 20.0),
            vec!["abcd", "efgh", "ij"]
        );
    }

    #[test]
    fn test_keeps_explicit_newlines() {
        assert_eq!(
            wrap_text("one\ntwo", &FixedFace, 10.0, 100.0),
            vec!["one", "two"]
        );
    }
}

mod table_tests {
    use super::*;

    #[test]
    fn test_empty_result_draws_header_only() {
        let result = TabularResult::empty(vec!["Name".into(), "Amount".into()]).unwrap();
        let layout = plan(&result, "Report", None);
        assert_eq!(layout.pages.len(), 1);
        assert_eq!(layout.pages[0].rows.len(), 1);
        assert_eq!(layout.pages[0].rows[0].style, RowStyle::Header);
        assert_eq!(layout.pages[0].title.len(), 1);
    }

    #[test]
    fn test_no_columns_draws_title_only() {
        let layout = plan(&TabularResult::default(), "Report", None);
        assert_eq!(layout.pages.len(), 1);
        assert!(layout.pages[0].rows.is_empty());
        assert_eq!(layout.pages[0].title[0].text, "Report");
    }

    #[test]
    fn test_header_repeats_on_every_page() {
        let result = numbered_rows(200);
        let layout = plan(&result, "Report", None);
        assert!(layout.pages.len() > 1);

        let bottom = PAGE_HEIGHT - DocumentSettings::default().margin_bottom;
        for page in &layout.pages {
            assert_eq!(page.rows[0].style, RowStyle::Header);
            assert_eq!(page.rows[0].cells[0].lines[0].text, "Name");
            for row in &page.rows {
                assert!(row.top + row.height <= bottom + 0.01);
            }
        }
        // Only the first page carries the title
        assert!(layout.pages[1].title.is_empty());
    }

    #[test]
    fn test_rows_stack_without_gaps() {
        let layout = plan(&numbered_rows(80), "Report", None);
        for page in &layout.pages {
            for pair in page.rows.windows(2) {
                let (above, below) = (&pair[0], &pair[1]);
                assert!((above.top + above.height - below.top).abs() < 0.01);
                for cell in &below.cells {
                    assert!((cell.top - below.top).abs() < 0.01);
                }
            }
        }
    }

    #[test]
    fn test_rows_keep_their_order_across_pages() {
        let result = numbered_rows(120);
        let layout = plan(&result, "", None);
        let names: Vec<String> = layout
            .pages
            .iter()
            .flat_map(|p| p.data_rows())
            .map(|r| r.cells[0].lines[0].text.clone())
            .collect();
        let expected: Vec<String> = (0..120).map(|i| format!("row {}", i)).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_rows_alternate_background() {
        let layout = plan(&numbered_rows(3), "", None);
        let styles: Vec<RowStyle> = layout.pages[0].data_rows().map(|r| r.style).collect();
        assert_eq!(
            styles,
            vec![RowStyle::Plain, RowStyle::Shaded, RowStyle::Plain]
        );
    }

    #[test]
    fn test_link_cells_show_label_and_keep_target() {
        let result = TabularResult::new(
            vec!["Name".into(), "Invoice Link".into()],
            vec![
                vec![Value::from("A"), Value::from("https://ex/1")],
                vec![Value::from("B"), Value::from("")],
            ],
        )
        .unwrap();
        let layout = plan(&result, "", None);
        let rows: Vec<&PlacedRow> = layout.pages[0].data_rows().collect();

        let link = &rows[0].cells[1];
        assert_eq!(link.link.as_deref(), Some("https://ex/1"));
        assert_eq!(link.lines[0].text, "Open Link");
        assert!(rows[1].cells[1].link.is_none());
    }

    #[test]
    fn test_arabic_cells_are_right_aligned() {
        let result = TabularResult::new(
            vec!["الاسم".into(), "Note".into()],
            vec![vec![Value::from("مورد"), Value::from("plain")]],
        )
        .unwrap();
        let layout = plan(&result, "", None);
        let row = layout.pages[0].data_rows().next().unwrap();

        let arabic = &row.cells[0];
        let line = &arabic.lines[0];
        let right_edge = line.x + FixedFace.text_width(&line.text, line.font_size);
        assert!((right_edge - (arabic.x + arabic.width - 3.0)).abs() < 0.01);

        let latin = &row.cells[1];
        assert!((latin.lines[0].x - (latin.x + 3.0)).abs() < 0.01);
    }

    #[test]
    fn test_numbers_use_display_format() {
        let result = TabularResult::new(
            vec!["Amount".into(), "رقم الشيك".into()],
            vec![vec![Value::Number(1234.5), Value::Number(1234.0)]],
        )
        .unwrap();
        let layout = plan(&result, "", None);
        let row = layout.pages[0].data_rows().next().unwrap();
        assert_eq!(row.cells[0].lines[0].text, "1,234.50");
        assert_eq!(row.cells[1].lines[0].text, "1234");
    }
}

mod density_tests {
    use super::*;

    fn wide(columns: usize) -> TabularResult {
        TabularResult::new(
            (0..columns).map(|i| format!("Column number {}", i)).collect(),
            vec![(0..columns)
                .map(|_| Value::from("a fairly long description of the item"))
                .collect()],
        )
        .unwrap()
    }

    #[test]
    fn test_tier_follows_column_count() {
        assert_eq!(plan(&wide(4), "", None).tier, DensityTier::Regular);
        assert_eq!(plan(&wide(9), "", None).tier, DensityTier::Dense);
        assert_eq!(plan(&wide(15), "", None).tier, DensityTier::Compact);
    }

    #[test]
    fn test_columns_fit_the_page() {
        let settings = DocumentSettings::default();
        let available = PAGE_WIDTH - settings.margin_left - settings.margin_right;
        for columns in [2, 9, 15] {
            let layout = plan(&wide(columns), "", None);
            let total: f32 = layout.column_widths.iter().sum();
            assert!(total <= available + 0.01, "{} columns: {}", columns, total);
            let tier = layout.tier;
            assert!(
                layout
                    .column_widths
                    .iter()
                    .all(|w| *w <= tier.max_column_width() + 0.01)
            );
        }
    }

    #[test]
    fn test_compact_tier_uses_smaller_font() {
        let layout = plan(&wide(15), "", None);
        let row = layout.pages[0].data_rows().next().unwrap();
        assert_eq!(row.cells[0].lines[0].font_size, 7.0);
        let header = &layout.pages[0].rows[0];
        assert!((header.cells[0].lines[0].font_size - 7.6).abs() < 1e-5);
    }
}

mod logo_tests {
    use super::*;

    #[test]
    fn test_logo_keeps_aspect_and_is_centred() {
        let settings = DocumentSettings::default();
        let available = PAGE_WIDTH - settings.margin_left - settings.margin_right;
        let layout = plan(&numbered_rows(1), "Report", Some((1000, 200)));
        let logo = layout.pages[0].logo.unwrap();

        assert!((logo.height / logo.width - 0.2).abs() < 1e-3);
        assert!(logo.height >= settings.min_logo_height);
        assert!(logo.height <= settings.max_logo_height);
        let left_gap = logo.x - settings.margin_left;
        let right_gap = settings.margin_left + available - (logo.x + logo.width);
        assert!((left_gap - right_gap).abs() < 0.01);

        // Title sits below the banner
        assert!(layout.pages[0].title[0].baseline > logo.top + logo.height);
    }

    #[test]
    fn test_tall_logo_is_capped() {
        let layout = plan(&numbered_rows(1), "", Some((100, 400)));
        let logo = layout.pages[0].logo.unwrap();
        assert!(logo.height <= DocumentSettings::default().max_logo_height + 0.01);
    }

    #[test]
    fn test_thin_logo_gets_minimum_height() {
        let settings = DocumentSettings::default();
        let layout = plan(&numbered_rows(1), "", Some((4000, 20)));
        let logo = layout.pages[0].logo.unwrap();
        // 22pt at a 1:200 ratio would be wider than the page, so width wins
        assert!(logo.width <= PAGE_WIDTH - settings.margin_left - settings.margin_right + 0.01);
    }
}

mod face_tests {
    use super::*;

    #[test]
    fn test_builtin_face_replaces_unsupported_text() {
        assert_eq!(BuiltinFace.prepare("Total 10"), "Total 10");
        assert_eq!(BuiltinFace.prepare("مورد A"), "???? A");
        assert!(BuiltinFace.text_width("iii", 10.0) < BuiltinFace.text_width("MMM", 10.0));
    }

    #[test]
    fn test_embedded_face_rejects_garbage() {
        assert!(EmbeddedFace::parse(b"not a font").is_err());
    }
}
