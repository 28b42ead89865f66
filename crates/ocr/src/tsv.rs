//! Tesseract TSV output → recognized lines.
//!
//! Tesseract reports one row per word (level 5) along with the page, block,
//! paragraph and line it belongs to. Words sharing those four numbers form
//! one line; lines come out in the order Tesseract emitted them.

use tailorscan_core::{BoundingPolygon, RecognizedLine};

const WORD_LEVEL: u32 = 5;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
struct LineKey {
    page: u32,
    block: u32,
    par: u32,
    line: u32,
}

#[derive(Debug)]
struct Word<'a> {
    key: LineKey,
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    conf: f64,
    text: &'a str,
}

struct LineAcc<'a> {
    key: LineKey,
    words: Vec<&'a str>,
    conf_sum: f64,
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl<'a> LineAcc<'a> {
    fn start(word: &Word<'a>) -> Self {
        Self {
            key: word.key,
            words: vec![word.text],
            conf_sum: word.conf,
            left: word.left,
            top: word.top,
            right: word.right,
            bottom: word.bottom,
        }
    }

    fn push(&mut self, word: &Word<'a>) {
        self.words.push(word.text);
        self.conf_sum += word.conf;
        self.left = self.left.min(word.left);
        self.top = self.top.min(word.top);
        self.right = self.right.max(word.right);
        self.bottom = self.bottom.max(word.bottom);
    }

    fn finish(self) -> RecognizedLine {
        let confidence = self.conf_sum / self.words.len() as f64 / 100.0;
        RecognizedLine::new(
            BoundingPolygon::from_rect(
                self.left,
                self.top,
                self.right - self.left,
                self.bottom - self.top,
            ),
            self.words.join(" "),
            confidence,
        )
    }
}

fn parse_word(row: &str) -> Option<Word<'_>> {
    let cols: Vec<&str> = row.split('\t').collect();
    if cols.len() < 12 {
        return None;
    }
    let level: u32 = cols[0].parse().ok()?;
    let text = cols[11].trim();
    let conf: f64 = cols[10].parse().ok()?;
    if level != WORD_LEVEL || text.is_empty() || conf < 0.0 {
        return None;
    }
    let key = LineKey {
        page: cols[1].parse().ok()?,
        block: cols[2].parse().ok()?,
        par: cols[3].parse().ok()?,
        line: cols[4].parse().ok()?,
    };
    let left: f32 = cols[6].parse().ok()?;
    let top: f32 = cols[7].parse().ok()?;
    let width: f32 = cols[8].parse().ok()?;
    let height: f32 = cols[9].parse().ok()?;
    Some(Word { key, left, top, right: left + width, bottom: top + height, conf, text })
}

/// Group the word rows of a Tesseract TSV dump into lines. Header rows,
/// structural rows and empty words are skipped.
pub fn parse_lines(tsv: &str) -> Vec<RecognizedLine> {
    let mut lines: Vec<RecognizedLine> = Vec::new();
    let mut current: Option<LineAcc<'_>> = None;

    for word in tsv.lines().filter_map(parse_word) {
        if let Some(acc) = current.as_mut().filter(|acc| acc.key == word.key) {
            acc.push(&word);
            continue;
        }
        if let Some(done) = current.replace(LineAcc::start(&word)) {
            lines.push(done.finish());
        }
    }
    if let Some(done) = current {
        lines.push(done.finish());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use tailorscan_core::Point;

    const SAMPLE: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t800\t600\t-1\t
2\t1\t1\t0\t0\t0\t10\t10\t300\t80\t-1\t
4\t1\t1\t1\t1\t0\t10\t10\t200\t30\t-1\t
5\t1\t1\t1\t1\t1\t10\t10\t50\t30\t90\tCH
5\t1\t1\t1\t1\t2\t70\t12\t60\t28\t80\t38½
4\t1\t1\t1\t2\t0\t10\t50\t150\t30\t-1\t
5\t1\t1\t1\t2\t1\t10\t50\t150\t30\t95.5\tLEN=40
5\t1\t1\t1\t2\t2\t170\t50\t10\t30\t40\t ";

    #[test]
    fn groups_words_into_lines() {
        let lines = parse_lines(SAMPLE);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "CH 38½");
        assert!((lines[0].confidence - 0.85).abs() < 1e-6);
        assert_eq!(lines[1].text, "LEN=40");
        assert!((lines[1].confidence - 0.955).abs() < 1e-6);
    }

    #[test]
    fn bbox_is_union_of_words() {
        let lines = parse_lines(SAMPLE);
        assert_eq!(
            lines[0].bbox.points(),
            &[Point(10.0, 10.0), Point(130.0, 10.0), Point(130.0, 40.0), Point(10.0, 40.0)]
        );
    }

    #[test]
    fn empty_and_header_only_input() {
        assert!(parse_lines("").is_empty());
        assert!(parse_lines("level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext").is_empty());
    }
}
