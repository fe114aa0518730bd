//! Rule-based file classification.
//!
//! Files are routed to destination categories either by extension, against
//! an ordered rule table, or by creation-date bucket. Rule order is part of
//! the contract: when an extension appears in more than one category, the
//! first rule in declaration order wins, so the rule set is an ordered `Vec`
//! rather than a map.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default bucket for files matching no rule.
pub const DEFAULT_BUCKET: &str = "Otros";

/// A named subcategory inside a category rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubRule {
    pub name: String,
    pub extensions: Vec<String>,
}

/// One ordered classification rule: a category with a flat extension list,
/// one nested level of subcategories, or both (flat entries checked first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub subcategories: Vec<SubRule>,
}

impl CategoryRule {
    /// A rule mapping extensions straight to `category`.
    pub fn flat(category: &str, extensions: &[&str]) -> Self {
        Self {
            category: category.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            subcategories: Vec::new(),
        }
    }

    /// A rule mapping extensions to `category/subcategory` paths.
    pub fn nested(category: &str, subcategories: &[(&str, &[&str])]) -> Self {
        Self {
            category: category.to_string(),
            extensions: Vec::new(),
            subcategories: subcategories
                .iter()
                .map(|(name, exts)| SubRule {
                    name: name.to_string(),
                    extensions: exts.iter().map(|e| e.to_string()).collect(),
                })
                .collect(),
        }
    }
}

/// Ordered mapping from category to extensions. First match wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationRuleSet {
    rules: Vec<CategoryRule>,
}

impl ClassificationRuleSet {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Returns the category path for `ext`, or `None` when no rule matches.
    ///
    /// Matching is case-insensitive; nested matches yield
    /// `category/subcategory`.
    pub fn match_extension(&self, ext: &str) -> Option<String> {
        let ext = ext.to_lowercase();
        for rule in &self.rules {
            if rule.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
                return Some(rule.category.clone());
            }
            for sub in &rule.subcategories {
                if sub.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
                    return Some(format!("{}/{}", rule.category, sub.name));
                }
            }
        }
        None
    }

    /// Like [`match_extension`](Self::match_extension), but falls back to the
    /// default bucket instead of `None`.
    pub fn classify(&self, ext: &str) -> String {
        self.match_extension(ext)
            .unwrap_or_else(|| DEFAULT_BUCKET.to_string())
    }

    /// Rejects rule sets that could never route a file anywhere.
    pub fn validate(&self) -> Result<(), String> {
        for rule in &self.rules {
            if rule.category.trim().is_empty() {
                return Err("rule with an empty category name".to_string());
            }
            if rule.extensions.is_empty() && rule.subcategories.is_empty() {
                return Err(format!("category '{}' lists no extensions", rule.category));
            }
            for sub in &rule.subcategories {
                if sub.name.trim().is_empty() {
                    return Err(format!(
                        "category '{}' has a subcategory with an empty name",
                        rule.category
                    ));
                }
                if sub.extensions.is_empty() {
                    return Err(format!(
                        "subcategory '{}/{}' lists no extensions",
                        rule.category, sub.name
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Creation-date bucketing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateMode {
    /// `YYYY-MM-DD_HH-MM`
    Full,
    /// `YYYY-MM-DD`
    Day,
    /// `YYYY-MM`
    Month,
    /// `YYYY`
    Year,
    /// Only files inside an inclusive date interval are processed,
    /// bucketed by their creation day.
    Range,
}

impl std::str::FromStr for DateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "day" => Ok(Self::Day),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            "range" => Ok(Self::Range),
            other => Err(format!(
                "unknown date mode '{other}' (expected full, day, month, year or range)"
            )),
        }
    }
}

/// Inclusive `[start, end]` creation-date interval for [`DateMode::Range`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl DateMode {
    /// Bucket label for a creation timestamp, or `None` when the file should
    /// be skipped entirely (range mode, timestamp outside the interval).
    pub fn bucket(&self, created: DateTime<Local>, range: Option<&DateRange>) -> Option<String> {
        match self {
            Self::Full => Some(created.format("%Y-%m-%d_%H-%M").to_string()),
            Self::Day => Some(created.format("%Y-%m-%d").to_string()),
            Self::Month => Some(created.format("%Y-%m").to_string()),
            Self::Year => Some(created.format("%Y").to_string()),
            Self::Range => {
                let range = range?;
                if range.contains(created.date_naive()) {
                    Some(created.format("%Y-%m-%d").to_string())
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_rules() -> ClassificationRuleSet {
        ClassificationRuleSet::new(vec![
            CategoryRule::flat("Images", &["jpg", "png"]),
            CategoryRule::nested("Docs", &[("Office", &["docx"])]),
        ])
    }

    fn timestamp(y: i32, m: u32, d: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(y, m, d, 14, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn test_flat_match() {
        assert_eq!(sample_rules().classify("png"), "Images");
    }

    #[test]
    fn test_nested_match_yields_category_path() {
        assert_eq!(sample_rules().classify("docx"), "Docs/Office");
    }

    #[test]
    fn test_no_match_falls_back_to_default_bucket() {
        assert_eq!(sample_rules().classify("exe"), "Otros");
        assert_eq!(sample_rules().match_extension("exe"), None);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert_eq!(sample_rules().classify("PNG"), "Images");
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let rules = ClassificationRuleSet::new(vec![
            CategoryRule::flat("Pictures", &["png"]),
            CategoryRule::flat("Images", &["png", "jpg"]),
        ]);
        assert_eq!(rules.classify("png"), "Pictures");
        assert_eq!(rules.classify("jpg"), "Images");
    }

    #[test]
    fn test_validate_rejects_empty_rules() {
        let empty_category = ClassificationRuleSet::new(vec![CategoryRule::flat("", &["png"])]);
        assert!(empty_category.validate().is_err());

        let no_extensions = ClassificationRuleSet::new(vec![CategoryRule::flat("Images", &[])]);
        assert!(no_extensions.validate().is_err());

        assert!(sample_rules().validate().is_ok());
    }

    #[test]
    fn test_date_buckets() {
        let ts = timestamp(2023, 7, 15);
        assert_eq!(
            DateMode::Full.bucket(ts, None).as_deref(),
            Some("2023-07-15_14-30")
        );
        assert_eq!(DateMode::Day.bucket(ts, None).as_deref(), Some("2023-07-15"));
        assert_eq!(DateMode::Month.bucket(ts, None).as_deref(), Some("2023-07"));
        assert_eq!(DateMode::Year.bucket(ts, None).as_deref(), Some("2023"));
    }

    #[test]
    fn test_range_mode_filters_and_buckets_by_day() {
        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2023, 1, 1).expect("date"),
            end: NaiveDate::from_ymd_opt(2023, 6, 30).expect("date"),
        };

        // Outside the interval: skipped
        assert_eq!(
            DateMode::Range.bucket(timestamp(2023, 7, 15), Some(&range)),
            None
        );
        // Inside the interval: bucketed by creation day
        assert_eq!(
            DateMode::Range
                .bucket(timestamp(2023, 3, 2), Some(&range))
                .as_deref(),
            Some("2023-03-02")
        );
        // Boundaries are inclusive
        assert!(DateMode::Range
            .bucket(timestamp(2023, 6, 30), Some(&range))
            .is_some());
        // No range configured: skipped
        assert_eq!(DateMode::Range.bucket(timestamp(2023, 3, 2), None), None);
    }

    #[test]
    fn test_rule_order_survives_toml_round_trip() {
        let toml_rules = r#"
            [[rules]]
            category = "Pictures"
            extensions = ["png"]

            [[rules]]
            category = "Images"
            extensions = ["png", "jpg"]
        "#;

        #[derive(Deserialize)]
        struct Wrapper {
            rules: ClassificationRuleSet,
        }

        let parsed: Wrapper = toml::from_str(toml_rules).expect("parse rules");
        assert_eq!(parsed.rules.classify("png"), "Pictures");
    }
}
