//! Milestone color classification

use flagchart_core::ColorCategory;

/// Classify a raw (un-wrapped) milestone label
///
/// Rules are checked in order and the first match wins: "PQ", then "TP"
/// (both case-sensitive), then "today" in any case.
pub fn classify(label: &str) -> ColorCategory {
    if label.contains("PQ") {
        ColorCategory::Pq
    } else if label.contains("TP") {
        ColorCategory::Tp
    } else if label.to_lowercase().contains("today") {
        ColorCategory::Today
    } else {
        ColorCategory::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_category() {
        assert_eq!(classify("PQ Review"), ColorCategory::Pq);
        assert_eq!(classify("TP3 sign-off"), ColorCategory::Tp);
        assert_eq!(classify("Today"), ColorCategory::Today);
        assert_eq!(classify("Go live"), ColorCategory::Default);
    }

    #[test]
    fn priority_order() {
        assert_eq!(classify("PQ today"), ColorCategory::Pq);
        assert_eq!(classify("TP and PQ"), ColorCategory::Pq);
        assert_eq!(classify("TP due TODAY"), ColorCategory::Tp);
    }

    #[test]
    fn codes_are_case_sensitive() {
        assert_eq!(classify("pq review"), ColorCategory::Default);
        assert_eq!(classify("tp1"), ColorCategory::Default);
        assert_eq!(classify("status as of ToDaY"), ColorCategory::Today);
    }
}
