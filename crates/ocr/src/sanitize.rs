use std::sync::OnceLock;

use regex::Regex;

/// One shorthand rewrite: every match of `pattern` is replaced by `replacement`.
#[derive(Debug)]
pub struct FractionRule {
    pub pattern: Regex,
    pub replacement: &'static str,
}

// Order matters: each rule runs over the output of the previous one.
// The "34" rule matches the literal digits after a slash or hyphen, so an
// input such as "12-34" also becomes "12.75".
const FRACTION_TABLE: &[(&str, &str)] = &[
    (r"(\d+)\s*½", "${1}.5"),
    (r"(\d+)\s*[/-]\s*2", "${1}.5"),
    (r"(\d+)\s*¼", "${1}.25"),
    (r"(\d+)\s*[/-]\s*4", "${1}.25"),
    (r"(\d+)\s*¾", "${1}.75"),
    (r"(\d+)\s*[/-]\s*34", "${1}.75"),
];

/// The compiled rule table, in application order.
pub fn fraction_rules() -> &'static [FractionRule] {
    static RULES: OnceLock<Vec<FractionRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        FRACTION_TABLE
            .iter()
            .map(|&(pat, replacement)| FractionRule {
                pattern: Regex::new(pat).expect("invalid fraction rule"),
                replacement,
            })
            .collect()
    })
}

/// Rewrite tailor fraction shorthand (`37½`, `37-2`, `37/4`, …) as decimals.
pub fn sanitize(text: &str) -> String {
    fraction_rules().iter().fold(text.to_string(), |acc, rule| {
        rule.pattern.replace_all(&acc, rule.replacement).into_owned()
    })
}
