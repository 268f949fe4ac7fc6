use crate::config::DEFAULT_SKIP_PATTERNS;
use regex::Regex;

struct SkipRule {
    pattern: String,
    regex: Regex,
}

/// Ordered set of key patterns that exempt an object from archiving.
///
/// Every pattern is anchored at the start of the key, so a pattern matches a
/// prefix of the key but never a substring further in. The set is fixed once
/// built.
pub struct SkipRules {
    rules: Vec<SkipRule>,
}

impl SkipRules {
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = patterns
            .into_iter()
            .map(|p| {
                let pattern = p.as_ref().to_string();
                let regex = Regex::new(&format!("^(?:{})", pattern))?;
                Ok(SkipRule { pattern, regex })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self { rules })
    }

    /// First pattern (in configured order) that matches `key`.
    pub fn matching(&self, key: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.regex.is_match(key))
            .map(|rule| rule.pattern.as_str())
    }

    pub fn is_skipped(&self, key: &str) -> bool {
        self.matching(key).is_some()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.pattern.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for SkipRules {
    fn default() -> Self {
        Self::new(DEFAULT_SKIP_PATTERNS).expect("built-in skip patterns compile")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_skip_nightly_partials() {
        let rules = SkipRules::default();
        assert_eq!(
            rules.matching("pub/firefox/nightly/partials/x.tar"),
            Some("^pub/firefox/nightly/partials")
        );
        assert!(rules.is_skipped("pub/thunderbird/nightly/partials/2024/y.mar"));
        assert!(rules.is_skipped("to-be-deleted/old.log"));
        assert!(rules.is_skipped("to-be-deleted"));
    }

    #[test]
    fn test_default_rules_keep_other_keys() {
        let rules = SkipRules::default();
        assert!(!rules.is_skipped("releases/v1/build.zip"));
        assert!(!rules.is_skipped("pub/firefox/releases/120.0/firefox.tar.bz2"));
        assert!(!rules.is_skipped(""));
    }

    #[test]
    fn test_match_is_anchored_at_start() {
        let rules = SkipRules::default();
        assert!(!rules.is_skipped("archive/to-be-deleted/old.log"));
        assert!(!rules.is_skipped("mirror/pub/firefox/nightly/partials/x.tar"));
    }

    #[test]
    fn test_unanchored_patterns_still_match_from_start() {
        let rules = SkipRules::new(["tmp/", "cache"]).unwrap();
        assert!(rules.is_skipped("tmp/file"));
        assert!(rules.is_skipped("cache-v2/blob"));
        assert!(!rules.is_skipped("data/tmp/file"));
        assert!(!rules.is_skipped("data/cache"));
    }

    #[test]
    fn test_alternation_stays_anchored() {
        let rules = SkipRules::new(["a|b"]).unwrap();
        assert!(rules.is_skipped("b/key"));
        assert!(!rules.is_skipped("xb/key"));
    }

    #[test]
    fn test_first_matching_pattern_wins() {
        let rules = SkipRules::new(["logs/", "logs/debug"]).unwrap();
        assert_eq!(rules.matching("logs/debug/1.txt"), Some("logs/"));
    }

    #[test]
    fn test_prefix_not_full_match() {
        let rules = SkipRules::new(["^logs$"]).unwrap();
        assert!(rules.is_skipped("logs"));
        assert!(!rules.is_skipped("logs/1.txt"));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(SkipRules::new(["(unclosed"]).is_err());
    }

    #[test]
    fn test_empty_rule_set_skips_nothing() {
        let rules = SkipRules::new(Vec::<String>::new()).unwrap();
        assert!(rules.is_empty());
        assert!(!rules.is_skipped("to-be-deleted/old.log"));
    }
}
