//! Locale-tolerant classifiers for make's `--debug` diagnostic lines.
//!
//! Each message category is an ordered table of `(locale, pattern)` pairs.
//! Lines are tried against the table in order and the first capture wins.
//! Supporting another locale means appending one row per table.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// Placeholder substituted with the escaped name of the considered target.
const TARGET: &str = "{target}";

static CONSIDER: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("en", r"Considering target file [`'](.+)'"),
        ("nl", r"Doelbestand '(.+)' wordt overwogen"),
        ("de", r"Betrachte Ziel-Datei „(.+)“"),
    ]
    .into_iter()
    .map(|(locale, pattern)| (locale, Regex::new(pattern).unwrap()))
    .collect()
});

const NO_IMPLICIT_RULE: &[(&str, &str)] = &[
    ("en", r"No implicit rule found for [`']{target}'"),
    ("nl", r"Geen impliciete regel voor '{target}' gevonden"),
    ("de", r"Keine implizite Regel für „{target}“ gefunden"),
];

const MUST_REMAKE: &[(&str, &str)] = &[
    ("en", r"Must remake target [`']{target}'"),
    ("nl", r"Doel '{target}' moet opnieuw gemaakt worden"),
    ("de", r"Das Target „{target}“ muss neu erzeugt werden"),
];

/// A successful classification: which locale row matched and the captured target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleMatch<'a> {
    pub locale: &'static str,
    pub target: &'a str,
}

/// Match a "considering target file" line, capturing any target name.
pub fn consider(line: &str) -> Option<LocaleMatch<'_>> {
    first_match(&CONSIDER, line)
}

/// Match a "no implicit rule" line about `target` only.
///
/// Builds the anchored table on every call; use [`TargetPatterns`] when
/// classifying many lines against the same target.
pub fn no_implicit_rule<'a>(line: &'a str, target: &str) -> Option<LocaleMatch<'a>> {
    TargetPatterns::new(target).no_implicit_rule(line)
}

/// Match a "must remake target" line about `target` only.
pub fn must_remake<'a>(line: &'a str, target: &str) -> Option<LocaleMatch<'a>> {
    TargetPatterns::new(target).must_remake(line)
}

/// Patterns anchored to a single target name, compiled once per consideration.
///
/// The target is regex-escaped before substitution, so names such as
/// `lib+x.a` or `out[1].o` only ever match themselves.
#[derive(Debug, Clone)]
pub struct TargetPatterns {
    target: String,
    no_implicit_rule: Vec<(&'static str, Regex)>,
    must_remake: Vec<(&'static str, Regex)>,
}

impl TargetPatterns {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            no_implicit_rule: anchored(NO_IMPLICIT_RULE, target),
            must_remake: anchored(MUST_REMAKE, target),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn no_implicit_rule<'a>(&self, line: &'a str) -> Option<LocaleMatch<'a>> {
        first_match(&self.no_implicit_rule, line)
    }

    pub fn must_remake<'a>(&self, line: &'a str) -> Option<LocaleMatch<'a>> {
        first_match(&self.must_remake, line)
    }
}

fn anchored(table: &[(&'static str, &'static str)], target: &str) -> Vec<(&'static str, Regex)> {
    let group = format!("({})", regex::escape(target));
    table
        .iter()
        .filter_map(|(locale, template)| {
            match Regex::new(&template.replace(TARGET, &group)) {
                Ok(re) => Some((*locale, re)),
                Err(e) => {
                    warn!("skipping {} pattern for '{}': {}", locale, target, e);
                    None
                }
            }
        })
        .collect()
}

fn first_match<'a>(table: &[(&'static str, Regex)], line: &'a str) -> Option<LocaleMatch<'a>> {
    table.iter().find_map(|(locale, re)| {
        re.captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| LocaleMatch {
                locale: *locale,
                target: m.as_str(),
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- consider ---

    #[test]
    fn consider_english() {
        let m = consider("Considering target file 'out.o'.").unwrap();
        assert_eq!(m.locale, "en");
        assert_eq!(m.target, "out.o");
    }

    #[test]
    fn consider_english_legacy_quotes() {
        let m = consider("Considering target file `src/main.o'.").unwrap();
        assert_eq!(m.target, "src/main.o");
    }

    #[test]
    fn consider_dutch() {
        let m = consider("Doelbestand 'out.o' wordt overwogen.").unwrap();
        assert_eq!(m.locale, "nl");
        assert_eq!(m.target, "out.o");
    }

    #[test]
    fn consider_german() {
        let m = consider("Betrachte Ziel-Datei „out.o“.").unwrap();
        assert_eq!(m.locale, "de");
        assert_eq!(m.target, "out.o");
    }

    #[test]
    fn consider_ignores_unrelated_lines() {
        assert_eq!(consider("GNU Make 4.3"), None);
        assert_eq!(consider("Must remake target 'out.o'."), None);
        assert_eq!(consider("Finished prerequisites of target file 'all'."), None);
        assert_eq!(consider(""), None);
    }

    // --- no_implicit_rule ---

    #[test]
    fn no_implicit_rule_for_current_target() {
        let m = no_implicit_rule("No implicit rule found for 'Makefile'.", "Makefile").unwrap();
        assert_eq!(m.locale, "en");
        assert_eq!(m.target, "Makefile");
    }

    #[test]
    fn no_implicit_rule_other_locales() {
        let nl = no_implicit_rule("Geen impliciete regel voor 'a.c' gevonden.", "a.c").unwrap();
        assert_eq!(nl.locale, "nl");
        let de = no_implicit_rule("Keine implizite Regel für „a.c“ gefunden.", "a.c").unwrap();
        assert_eq!(de.locale, "de");
    }

    #[test]
    fn no_implicit_rule_rejects_other_target() {
        assert_eq!(no_implicit_rule("No implicit rule found for 'b.c'.", "a.c"), None);
        assert_eq!(no_implicit_rule("Geen impliciete regel voor 'b.c' gevonden.", "a.c"), None);
        assert_eq!(no_implicit_rule("Keine implizite Regel für „b.c“ gefunden.", "a.c"), None);
    }

    // --- must_remake ---

    #[test]
    fn must_remake_for_current_target() {
        let m = must_remake("Must remake target 'out.o'.", "out.o").unwrap();
        assert_eq!(m.target, "out.o");
    }

    #[test]
    fn must_remake_other_locales() {
        assert!(must_remake("Doel 'out.o' moet opnieuw gemaakt worden.", "out.o").is_some());
        assert!(must_remake("Das Target „out.o“ muss neu erzeugt werden.", "out.o").is_some());
    }

    #[test]
    fn must_remake_rejects_other_target() {
        assert_eq!(must_remake("Must remake target 'b.o'.", "a.o"), None);
        // prefix of the real target must not match
        assert_eq!(must_remake("Must remake target 'out.o.d'.", "out.o"), None);
    }

    #[test]
    fn must_remake_escapes_metacharacters() {
        assert!(must_remake("Must remake target 'lib+x.a'.", "lib+x.a").is_some());
        assert_eq!(must_remake("Must remake target 'outXo'.", "out.o"), None);
        assert!(must_remake("Must remake target 'out[1].o'.", "out[1].o").is_some());
    }

    // --- TargetPatterns ---

    #[test]
    fn target_patterns_reused_across_lines() {
        let patterns = TargetPatterns::new("out.o");
        assert_eq!(patterns.target(), "out.o");
        assert!(patterns.must_remake("Must remake target 'out.o'.").is_some());
        assert!(patterns.no_implicit_rule("No implicit rule found for 'out.o'.").is_some());
        assert!(patterns.must_remake("Pruning file 'out.o'.").is_none());
    }
}
