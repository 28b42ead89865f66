use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use tailorscan_core::{to_percent, MeasurementEntry, RecognizedLine, UnknownValue};

use crate::sanitize::sanitize;

/// `<letters>[:=]<number>`, where the number may carry a fraction glyph or
/// slash/hyphen shorthand that [`sanitize`] resolves afterwards.
fn re_measurement() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(r"(?i)([A-Z]+)\s*[:=]?\s*(\d+(?:[.½¼¾/-]\d*)?)").expect("invalid regex")
    })
}

/// Result of walking the engine's lines once, before the overall score is attached.
#[derive(Debug, Default)]
pub struct ParsedMeasurements {
    pub measurements: BTreeMap<String, MeasurementEntry>,
    pub unknown_values: Vec<UnknownValue>,
}

/// Collect `<CODE><value>` pairs line by line in engine order. A code seen
/// again on a later line replaces the earlier value. Non-blank lines with no
/// pair at all are kept as unknown values.
pub fn parse_measurements(lines: &[RecognizedLine]) -> ParsedMeasurements {
    let mut parsed = ParsedMeasurements::default();

    for line in lines {
        let confidence = to_percent(line.confidence);
        let mut matched = false;

        for c in re_measurement().captures_iter(&line.text) {
            let (Some(code), Some(value)) = (c.get(1), c.get(2)) else {
                continue;
            };
            matched = true;
            let code = code.as_str().to_uppercase();
            let entry = MeasurementEntry { value: sanitize(value.as_str()), confidence };
            if let Some(previous) = parsed.measurements.insert(code.clone(), entry) {
                tracing::debug!(%code, previous = %previous.value, "measurement code repeated; keeping later value");
            }
        }

        if !matched && !line.text.trim().is_empty() {
            parsed.unknown_values.push(UnknownValue { text: line.text.clone(), confidence });
        }
    }

    parsed
}
