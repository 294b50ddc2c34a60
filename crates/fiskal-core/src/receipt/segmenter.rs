//! Item block segmentation.
//!
//! The body region of a receipt is a flat run of lines with no reliable
//! delimiters. Each item is laid out as:
//!
//! ```text
//! [marker line]*            e.g. "[М+]"
//! description line+         last one may carry ";<unit>"
//! <qty> x <price> <total>
//! НДС <n>%
//! Признак способа расчета <text>
//! Признак предмета расчета <text>
//! ```
//!
//! Item boundaries are recovered by scanning forward for the quantity line.

use tracing::trace;

use super::rules::QTY_LINE;

/// Number of metadata lines following a quantity line.
pub const METADATA_LINES: usize = 3;

/// Decides whether a line is an item annotation marker.
pub trait MarkerPredicate {
    fn is_marker(&self, line: &str) -> bool;
}

impl<F> MarkerPredicate for F
where
    F: Fn(&str) -> bool,
{
    fn is_marker(&self, line: &str) -> bool {
        self(line)
    }
}

/// Marker predicate matching any of a set of bracketed tokens.
#[derive(Debug, Clone)]
pub struct BracketMarkers {
    tokens: Vec<String>,
}

impl BracketMarkers {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for BracketMarkers {
    fn default() -> Self {
        Self::new(["[М+]", "[М-]", "[М]"])
    }
}

impl MarkerPredicate for BracketMarkers {
    fn is_marker(&self, line: &str) -> bool {
        self.tokens.iter().any(|t| line.contains(t.as_str()))
    }
}

/// One item's worth of lines, before field parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock<'a> {
    /// Description lines joined with single spaces.
    pub description: String,
    /// Unit split off the last description line.
    pub unit: Option<String>,
    /// Whether the description run ended with a marker line.
    pub marked: bool,
    /// The `<qty> x <price> <total>` line.
    pub qty_line: &'a str,
    /// Up to [`METADATA_LINES`] lines following the quantity line.
    pub metadata: Vec<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SkipMarker,
    SeekQtyLine,
    EmitBlock { qty_line: usize },
    Done,
}

/// Line-scanning state machine splitting a body region into item blocks.
pub struct Segmenter<'m, M: MarkerPredicate + ?Sized> {
    markers: &'m M,
}

impl<'m, M: MarkerPredicate + ?Sized> Segmenter<'m, M> {
    pub fn new(markers: &'m M) -> Self {
        Self { markers }
    }

    /// Segment `lines[start..end]` into item blocks in document order.
    pub fn segment<'a>(&self, lines: &'a [String], start: usize, end: usize) -> Vec<RawBlock<'a>> {
        let end = end.min(lines.len());
        let mut blocks = Vec::new();
        let mut cursor = start;
        let mut block_start = start;
        let mut state = State::SkipMarker;

        loop {
            state = match state {
                State::SkipMarker => {
                    while cursor < end && self.markers.is_marker(&lines[cursor]) {
                        cursor += 1;
                    }
                    if cursor >= end {
                        State::Done
                    } else {
                        block_start = cursor;
                        State::SeekQtyLine
                    }
                }
                State::SeekQtyLine => match (cursor..end).find(|&j| QTY_LINE.is_match(&lines[j])) {
                    Some(j) => State::EmitBlock { qty_line: j },
                    None => State::Done,
                },
                State::EmitBlock { qty_line } => {
                    let block = self.build_block(lines, block_start, qty_line, end);
                    trace!(
                        "Item block at lines {}..={}: {:?}",
                        block_start,
                        qty_line,
                        block.description
                    );
                    blocks.push(block);
                    cursor = qty_line + 1 + METADATA_LINES;
                    State::SkipMarker
                }
                State::Done => break,
            };
        }

        blocks
    }

    fn build_block<'a>(&self, lines: &'a [String], start: usize, qty_line: usize, end: usize) -> RawBlock<'a> {
        let mut description: Vec<&str> = lines[start..qty_line].iter().map(String::as_str).collect();

        let marked = description
            .last()
            .is_some_and(|last| self.markers.is_marker(last));
        if marked {
            description.pop();
        }

        let mut unit = None;
        if let Some(last) = description.pop() {
            match last.split_once(';') {
                Some((text, maybe_unit)) => {
                    description.push(text);
                    let maybe_unit = maybe_unit.trim();
                    if !maybe_unit.is_empty() {
                        unit = Some(maybe_unit.to_string());
                    }
                }
                None => description.push(last),
            }
        }

        let description = description
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let metadata_end = (qty_line + 1 + METADATA_LINES).min(end);
        let metadata = lines[qty_line + 1..metadata_end]
            .iter()
            .map(String::as_str)
            .collect();

        RawBlock {
            description,
            unit,
            marked,
            qty_line: &lines[qty_line],
            metadata,
        }
    }
}
