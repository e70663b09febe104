use tracing::trace;

use super::{Violation, ViolationKind};
use crate::Directive;

const YES_NO: &[&str] = &["yes", "no"];

/// A validation strategy applied to the values of one directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The first value must equal the given string.
    Fixed(&'static str),
    /// Every value must be one of the given strings.
    OneOf(&'static [&'static str]),
    /// Every value is a comma-separated list whose tokens must each be one of
    /// the given strings.
    CommaSubset(&'static [&'static str]),
    /// Every value must be `yes` or `no`.
    Boolean,
    /// Every value must parse as a base-10 integer.
    Integer,
    /// No value may be empty.
    NonEmpty,
    /// The directive may have at most one value.
    SingleValue,
}

impl Rule {
    /// Check a directive against this rule, appending any violations found.
    ///
    /// Every failing value is reported; checking never stops early.
    pub fn check(self, directive: &Directive, violations: &mut Vec<Violation>) {
        trace!(directive = directive.name(), rule = ?self, "checking");
        let name = directive.name();

        match self {
            Self::Fixed(expected) => {
                let actual = directive.first();
                if actual != expected {
                    violations.push(Violation::new(
                        name,
                        ViolationKind::Mismatch {
                            expected,
                            actual: actual.to_string(),
                        },
                    ));
                }
            }
            Self::OneOf(allowed) => {
                check_membership(name, directive.values(), allowed, violations);
            }
            Self::CommaSubset(allowed) => {
                let tokens = directive.values().flat_map(|value| value.split(','));
                check_membership(name, tokens, allowed, violations);
            }
            Self::Boolean => check_membership(name, directive.values(), YES_NO, violations),
            Self::Integer => {
                for value in directive.values() {
                    if value.parse::<i64>().is_err() {
                        violations.push(Violation::new(
                            name,
                            ViolationKind::NotInteger {
                                actual: value.to_string(),
                            },
                        ));
                    }
                }
            }
            Self::NonEmpty => {
                for _ in directive.values().filter(|value| value.is_empty()) {
                    violations.push(Violation::new(name, ViolationKind::Empty));
                }
            }
            Self::SingleValue => {
                if directive.len() > 1 {
                    violations.push(Violation::new(
                        name,
                        ViolationKind::MultipleValues {
                            count: directive.len(),
                        },
                    ));
                }
            }
        }
    }
}

fn check_membership<'a>(
    name: &str,
    candidates: impl Iterator<Item = &'a str>,
    allowed: &'static [&'static str],
    violations: &mut Vec<Violation>,
) {
    for candidate in candidates.filter(|candidate| !allowed.contains(candidate)) {
        violations.push(Violation::new(
            name,
            ViolationKind::NotAllowed {
                allowed,
                actual: candidate.to_string(),
            },
        ));
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn directive(name: &str, values: &[&str]) -> Directive {
        let (first, rest) = values.split_first().unwrap();
        let mut directive = Directive::new(name, *first);
        for value in rest {
            directive.prepend(*value);
        }
        directive
    }

    fn check(rule: Rule, directive: &Directive) -> Vec<Violation> {
        let mut violations = Vec::new();
        rule.check(directive, &mut violations);
        violations
    }

    #[test]
    fn fixed_compares_first_value_only() {
        // "no" is prepended last, so it is the first value
        let d = directive("PermitRootLogin", &["yes", "no"]);
        assert!(check(Rule::Fixed("no"), &d).is_empty());

        let d = directive("PermitRootLogin", &["no", "yes"]);
        assert_eq!(
            check(Rule::Fixed("no"), &d),
            vec![Violation::new(
                "PermitRootLogin",
                ViolationKind::Mismatch {
                    expected: "no",
                    actual: "yes".into()
                }
            )]
        );
    }

    #[test]
    fn fixed_is_case_sensitive() {
        let d = directive("PermitRootLogin", &["No"]);
        assert_eq!(check(Rule::Fixed("no"), &d).len(), 1);
    }

    #[test]
    fn one_of_reports_every_bad_value() {
        let d = directive("LogLevel", &["INFO", "LOUD", "quiet"]);
        let violations = check(Rule::OneOf(&["QUIET", "INFO"]), &d);
        let actual: Vec<_> = violations
            .iter()
            .map(|v| match &v.kind {
                ViolationKind::NotAllowed { actual, .. } => actual.as_str(),
                other => panic!("unexpected violation {other:?}"),
            })
            .collect();
        assert_eq!(actual, vec!["quiet", "LOUD"]);
    }

    #[test]
    fn one_of_does_not_split_on_commas() {
        let d = directive("Protocol", &["2,1"]);
        assert!(check(Rule::OneOf(&["1", "2", "1,2", "2,1"]), &d).is_empty());
    }

    #[test]
    fn comma_subset_checks_each_token() {
        let d = directive("Ciphers", &["aes256-ctr,aes128-cbc"]);
        assert_eq!(
            check(Rule::CommaSubset(&["aes256-ctr", "aes128-ctr"]), &d),
            vec![Violation::new(
                "Ciphers",
                ViolationKind::NotAllowed {
                    allowed: &["aes256-ctr", "aes128-ctr"],
                    actual: "aes128-cbc".into()
                }
            )]
        );
    }

    #[test]
    fn comma_subset_treats_empty_token_as_a_value() {
        let d = directive("Ciphers", &["aes256-ctr,"]);
        assert_eq!(check(Rule::CommaSubset(&["aes256-ctr"]), &d).len(), 1);
    }

    #[test_case("yes", 0)]
    #[test_case("no", 0)]
    #[test_case("Yes", 1)]
    #[test_case("maybe", 1)]
    #[test_case("", 1)]
    fn boolean(value: &str, expected: usize) {
        let d = directive("UsePAM", &[value]);
        assert_eq!(check(Rule::Boolean, &d).len(), expected);
    }

    #[test]
    fn boolean_lists_yes_and_no() {
        let d = directive("UsePAM", &["maybe"]);
        assert_eq!(
            check(Rule::Boolean, &d),
            vec![Violation::new(
                "UsePAM",
                ViolationKind::NotAllowed {
                    allowed: YES_NO,
                    actual: "maybe".into()
                }
            )]
        );
    }

    #[test_case("22", 0)]
    #[test_case("-1", 0)]
    #[test_case("+5", 0)]
    #[test_case("10:30:100", 1)]
    #[test_case("2.5", 1)]
    #[test_case("", 1)]
    #[test_case("99999999999999999999", 1)]
    fn integer(value: &str, expected: usize) {
        let d = directive("MaxStartups", &[value]);
        assert_eq!(check(Rule::Integer, &d).len(), expected);
    }

    #[test]
    fn non_empty_reports_each_empty_value() {
        let d = directive("Banner", &["", "/etc/issue", ""]);
        assert_eq!(
            check(Rule::NonEmpty, &d),
            vec![
                Violation::new("Banner", ViolationKind::Empty),
                Violation::new("Banner", ViolationKind::Empty),
            ]
        );
    }

    #[test]
    fn single_value_reports_once() {
        let d = directive("UsePAM", &["yes", "no", "yes"]);
        assert_eq!(
            check(Rule::SingleValue, &d),
            vec![Violation::new(
                "UsePAM",
                ViolationKind::MultipleValues { count: 3 }
            )]
        );
        assert!(check(Rule::SingleValue, &directive("UsePAM", &["yes"])).is_empty());
    }
}
