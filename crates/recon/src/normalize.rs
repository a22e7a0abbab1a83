use crate::model::{format_number, RawValue};

/// Rejoin dashes split from their neighbours by a single space.
///
/// Shared by tokens and document text so both sides have the same shape.
pub fn collapse_dash_joins(text: &str) -> String {
    text.replace("- ", "-").replace(" -", "-")
}

/// Canonicalize one cell into a comparison token.
///
/// Weight fields get their numeric part re-rendered (`2.0` → `2`) and the
/// unit suffix appended; text that is not a finite number keeps its original
/// form and still gets the suffix. Every token then loses its spaces.
pub fn normalize(raw: &RawValue, weight: bool, weight_suffix: &str) -> String {
    let text = raw.to_string();
    let text = if weight {
        match text.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => format!("{}{weight_suffix}", format_number(n)),
            _ => format!("{text}{weight_suffix}"),
        }
    } else {
        text
    };

    collapse_dash_joins(&text.replace(' ', "")).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawValue {
        RawValue::from(s)
    }

    #[test]
    fn integral_weights_share_a_token() {
        assert_eq!(normalize(&RawValue::Int(1), true, "KG"), "1KG");
        assert_eq!(normalize(&RawValue::Float(1.0), true, "KG"), "1KG");
        assert_eq!(normalize(&text("1.0"), true, "KG"), "1KG");
        assert_eq!(normalize(&text("1"), true, "KG"), "1KG");
    }

    #[test]
    fn fractional_weight_keeps_shortest_form() {
        assert_eq!(normalize(&RawValue::Float(2.5), true, "KG"), "2.5KG");
        assert_eq!(normalize(&text("2.50"), true, "KG"), "2.5KG");
        assert_eq!(normalize(&RawValue::Float(0.125), true, "KG"), "0.125KG");
    }

    #[test]
    fn unparseable_weight_keeps_text() {
        assert_eq!(normalize(&text("n/a"), true, "KG"), "n/aKG");
        assert_eq!(normalize(&text("1,200"), true, "KG"), "1,200KG");
        assert_eq!(normalize(&text("nan"), true, "KG"), "nanKG");
    }

    #[test]
    fn empty_weight_still_gets_suffix() {
        assert_eq!(normalize(&text(""), true, "KG"), "KG");
        assert_eq!(normalize(&text("   "), true, "KG"), "KG");
    }

    #[test]
    fn plain_fields_never_get_suffix() {
        assert_eq!(normalize(&RawValue::Float(2.0), false, "KG"), "2");
        assert_eq!(normalize(&text("12 kg"), false, "KG"), "12kg");
        assert_eq!(normalize(&RawValue::Bool(false), false, "KG"), "FALSE");
    }

    #[test]
    fn dash_variants_collapse() {
        for raw in ["AB-123", "AB -123", " AB- 123 ", "AB - 123"] {
            assert_eq!(normalize(&text(raw), false, "KG"), "AB-123", "raw {raw:?}");
        }
    }

    #[test]
    fn surrounding_tabs_and_newlines_trimmed() {
        assert_eq!(normalize(&text("\tX-9\n"), false, "KG"), "X-9");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["AB - 123", " 7.50 ", "CD- 9 -1", "n/a"] {
            for weight in [false, true] {
                let once = normalize(&text(raw), weight, "KG");
                let twice = normalize(&text(&once), false, "KG");
                assert_eq!(once, twice, "raw {raw:?} weight {weight}");
            }
        }
    }

    #[test]
    fn document_dash_joins_keep_spaces() {
        assert_eq!(
            collapse_dash_joins("Part AB- 123 and CD -45 qty 3"),
            "Part AB-123 and CD-45 qty 3"
        );
        assert_eq!(collapse_dash_joins("a - b"), "a-b");
    }
}
