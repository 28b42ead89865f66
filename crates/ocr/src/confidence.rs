use tailorscan_core::{round2, RecognizedLine};

/// Mean engine confidence across all lines as a percentage with two
/// decimals; `0.0` when nothing was recognized.
pub fn aggregate(lines: &[RecognizedLine]) -> f64 {
    if lines.is_empty() {
        return 0.0;
    }
    let sum: f64 = lines.iter().map(|l| l.confidence).sum();
    round2(sum / lines.len() as f64 * 100.0)
}
