//! Mapping regex matches in a selection back onto document positions

use crate::{MatchRange, MatchSpec, PatternError, Position, TextBlock};

/// Find every match of `spec` in `block`, in document coordinates.
///
/// Each line of the block is searched on its own, so a match never spans a
/// line break. Only the first line is offset by the block's starting column;
/// later lines start at column 0 of their document line. Results come back
/// ordered by line, then column.
pub fn locate_matches(block: &TextBlock, spec: &MatchSpec) -> Result<Vec<MatchRange>, PatternError> {
    let regex = spec.compile()?;
    let mut ranges = Vec::new();

    if block.is_empty() {
        return Ok(ranges);
    }

    let unit = block.columns();
    let anchor = block.start();

    for (index, (_, line)) in split_lines(block.text()).into_iter().enumerate() {
        let line_number = anchor.line + index;
        let base = if index == 0 { anchor.column } else { 0 };

        // Columns are measured incrementally from the previous match
        let mut byte = 0;
        let mut column = base;

        for mat in regex.find_iter(line) {
            column += unit.width(&line[byte..mat.start()]);
            let width = unit.width(mat.as_str());

            ranges.push(MatchRange {
                start: Position::new(line_number, column),
                end: Position::new(line_number, column + width),
                text: mat.as_str().to_string(),
            });

            byte = mat.start();
        }
    }

    Ok(ranges)
}

/// Split `text` at `\r\n`, `\n` and `\r`, returning each line with the byte
/// offset where it starts. There is always at least one line.
pub(crate) fn split_lines(text: &str) -> Vec<(usize, &str)> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push((start, &text[start..i]));
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push((start, &text[start..i]));
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }
    lines.push((start, &text[start..]));

    lines
}
