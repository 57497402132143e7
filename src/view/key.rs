use std::fmt;

/// Position of a formula inside the topic tree.
///
/// Formulas have no id of their own, so open/closed state is keyed by
/// topic id plus rule and formula index. Renders as `topicId-rule-formula`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormulaKey {
    pub topic_id: String,
    pub rule_index: usize,
    pub formula_index: usize,
}

impl FormulaKey {
    pub fn new(topic_id: impl Into<String>, rule_index: usize, formula_index: usize) -> Self {
        Self {
            topic_id: topic_id.into(),
            rule_index,
            formula_index,
        }
    }
}

impl fmt::Display for FormulaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.topic_id, self.rule_index, self.formula_index)
    }
}

impl std::str::FromStr for FormulaKey {
    type Err = String;

    /// Topic ids may contain dashes, so the two indices are split off the right.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.rsplitn(3, '-');
        let formula = parts.next();
        let rule = parts.next();
        let topic = parts.next();

        match (topic, rule, formula) {
            (Some(topic), Some(rule), Some(formula)) if !topic.is_empty() => {
                let rule_index = rule
                    .parse()
                    .map_err(|_| format!("invalid rule index in '{}'", s))?;
                let formula_index = formula
                    .parse()
                    .map_err(|_| format!("invalid formula index in '{}'", s))?;
                Ok(Self::new(topic, rule_index, formula_index))
            }
            _ => Err(format!(
                "expected TOPIC-RULE-FORMULA (e.g. t1-0-0), got '{}'",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_composite_form() {
        assert_eq!(FormulaKey::new("t1", 0, 2).to_string(), "t1-0-2");
    }

    #[test]
    fn test_parse_allows_dashes_in_topic_id() {
        let key: FormulaKey = "present-simple-1-3".parse().unwrap();
        assert_eq!(key, FormulaKey::new("present-simple", 1, 3));
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        assert!("t1".parse::<FormulaKey>().is_err());
        assert!("t1-0".parse::<FormulaKey>().is_err());
        assert!("t1-a-0".parse::<FormulaKey>().is_err());
        assert!("-0-0".parse::<FormulaKey>().is_err());
    }
}
