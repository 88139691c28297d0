//! Tests for Arabic shaping

use super::*;

mod reshape_tests {
    use super::*;

    #[test]
    fn test_dual_joining_pair() {
        assert_eq!(reshape_arabic("بب"), "\u{FE91}\u{FE90}");
    }

    #[test]
    fn test_right_joining_letters_break_the_chain() {
        assert_eq!(reshape_arabic("دار"), "\u{FEA9}\u{FE8D}\u{FEAD}");
    }

    #[test]
    fn test_medial_forms() {
        assert_eq!(
            reshape_arabic("المبلغ"),
            "\u{FE8D}\u{FEDF}\u{FEE4}\u{FE92}\u{FEE0}\u{FECE}"
        );
    }

    #[test]
    fn test_lam_alef_ligature() {
        assert_eq!(reshape_arabic("لا"), "\u{FEFB}");
        assert_eq!(reshape_arabic("سلام"), "\u{FEB3}\u{FEFC}\u{FEE1}");
    }

    #[test]
    fn test_harakat_are_dropped() {
        assert_eq!(reshape_arabic("بَب"), reshape_arabic("بب"));
    }

    #[test]
    fn test_hamza_never_joins() {
        assert_eq!(reshape_arabic("بءب"), "\u{FE8F}\u{FE80}\u{FE8F}");
    }

    #[test]
    fn test_latin_passes_through() {
        assert_eq!(reshape_arabic("Total 12"), "Total 12");
    }
}

mod display_tests {
    use super::*;

    #[test]
    fn test_non_arabic_is_untouched() {
        assert_eq!(shape_for_display("Amount (USD)"), "Amount (USD)");
        assert_eq!(shape_for_display(""), "");
    }

    #[test]
    fn test_arabic_is_reversed_into_visual_order() {
        assert_eq!(shape_for_display("بب"), "\u{FE90}\u{FE91}");
    }

    #[test]
    fn test_numbers_keep_their_direction() {
        assert_eq!(
            shape_for_display("المبلغ 100"),
            "100 \u{FECE}\u{FEE0}\u{FE92}\u{FEE4}\u{FEDF}\u{FE8D}"
        );
    }

    #[test]
    fn test_brackets_are_mirrored_in_rtl_runs() {
        let shaped = shape_for_display("(بب)");
        assert_eq!(shaped, "(\u{FE90}\u{FE91})");
    }

    #[test]
    fn test_no_logical_arabic_remains() {
        let shaped = shape_for_display("تقرير الفواتير 2024");
        assert!(!looks_arabic(&shaped));
        assert!(shaped.starts_with("2024"));
    }
}
