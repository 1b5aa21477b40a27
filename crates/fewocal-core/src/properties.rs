//! Property display order and display-name overrides.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Preferred top-to-bottom lane order.
///
/// Properties not listed here are appended after the known ones, sorted
/// alphabetically.
pub const PROPERTY_ORDER: &[&str] = &[
    "Sonnenwende 2a",
    "Dämmerlicht 2b",
    "Regenbogen 2c",
    "Wolke7 2d",
    "Küstenzauber 4a",
    "Strandliebe 4b",
    "Wellengang 4c",
    "Lüdde Wattwurm 4d",
    "Kl. Austernfischer",
    "Austernfischer",
    "Dat Lütte Huus1",
    "Dat Lütte Huus2",
    "Lütte Stuuv",
    "Fischers Huus",
    "Michels Koje",
    "Fietes Kajüte",
    "Fietes Lütte Huus",
    "Bös Lütte Stuuv",
];

// Label-column overrides for names too wide for the lane labels.
static DISPLAY_OVERRIDES: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| HashMap::from([("Lüdde Wattwurm 4d", "Lüdde Watt 4d")]));

/// Display name for a property, applying the override table.
#[inline]
#[must_use]
pub fn display_name(property: &str) -> &str {
    DISPLAY_OVERRIDES.get(property).copied().unwrap_or(property)
}

/// Order property names for display: preferred order first, then the rest
/// alphabetically. Duplicates are collapsed.
#[must_use]
pub fn order_properties<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut unique: Vec<String> = names.into_iter().collect();
    unique.sort();
    unique.dedup();
    let rank = |name: &str| {
        PROPERTY_ORDER
            .iter()
            .position(|known| *known == name)
            .unwrap_or(usize::MAX)
    };
    unique.sort_by(|a, b| rank(a).cmp(&rank(b)).then_with(|| a.cmp(b)));
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_properties_keep_preferred_order() {
        let ordered = order_properties(
            ["Austernfischer", "Sonnenwende 2a", "Wellengang 4c"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(
            ordered,
            vec!["Sonnenwende 2a", "Wellengang 4c", "Austernfischer"],
            "known names must follow PROPERTY_ORDER, not the input order"
        );
    }

    #[test]
    fn test_unknown_properties_append_alphabetically() {
        let ordered = order_properties(
            ["Zander Huus", "Austernfischer", "Anker Koje"]
                .into_iter()
                .map(String::from),
        );
        assert_eq!(ordered, vec!["Austernfischer", "Anker Koje", "Zander Huus"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let ordered = order_properties(
            ["Lütte Stuuv", "Lütte Stuuv"].into_iter().map(String::from),
        );
        assert_eq!(ordered.len(), 1);
    }

    #[test]
    fn test_display_name_override() {
        assert_eq!(display_name("Lüdde Wattwurm 4d"), "Lüdde Watt 4d");
        assert_eq!(display_name("Fischers Huus"), "Fischers Huus");
    }
}
