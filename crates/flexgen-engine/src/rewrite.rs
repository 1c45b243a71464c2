//! Rewrite buffer: queued textual edits against one source text.
//!
//! Edits are recorded against offsets in the original source and only
//! materialized by [`RewriteBuffer::apply`], which either produces the whole
//! rewritten text or fails without producing anything.

use serde::Serialize;
use std::ops::Range;
use thiserror::Error;

/// Where an insertion goes relative to other insertions at the same offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Before,
    After,
}

/// One queued edit. A pure insertion has an empty range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range<usize>,
    pub text: String,
    pub placement: Placement,
    /// Registration order within the buffer
    pub sequence: usize,
}

impl Edit {
    pub fn is_insertion(&self) -> bool {
        self.range.is_empty()
    }

    /// Total order used when applying: by offset, insertions ahead of a
    /// replacement starting at the same offset, `Before` ahead of `After`,
    /// then registration order.
    fn order_key(&self) -> (usize, bool, Placement, usize) {
        (
            self.range.start,
            !self.is_insertion(),
            self.placement,
            self.sequence,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error("edit at {second:?} overlaps edit at {first:?}")]
    Overlapping {
        first: Range<usize>,
        second: Range<usize>,
    },

    #[error("edit at {range:?} is outside the source (length {len}) or splits a character")]
    OutOfBounds { range: Range<usize>, len: usize },
}

/// Ordered collection of edits against `source`.
#[derive(Debug, Clone)]
pub struct RewriteBuffer<'a> {
    source: &'a str,
    edits: Vec<Edit>,
}

impl<'a> RewriteBuffer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            edits: Vec::new(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Queued edits in registration order.
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Queue `text` for insertion at `location`.
    pub fn insert(&mut self, location: usize, text: impl Into<String>, after: bool) {
        let placement = if after {
            Placement::After
        } else {
            Placement::Before
        };
        self.push(location..location, text.into(), placement);
    }

    pub fn insert_before(&mut self, location: usize, text: impl Into<String>) {
        self.insert(location, text, false);
    }

    pub fn insert_after(&mut self, location: usize, text: impl Into<String>) {
        self.insert(location, text, true);
    }

    /// Queue replacement of `range` with `text`.
    pub fn replace(&mut self, range: Range<usize>, text: impl Into<String>) {
        self.push(range, text.into(), Placement::After);
    }

    fn push(&mut self, range: Range<usize>, text: String, placement: Placement) {
        let sequence = self.edits.len();
        tracing::trace!(?range, ?placement, sequence, "queue edit");
        self.edits.push(Edit {
            range,
            text,
            placement,
            sequence,
        });
    }

    /// Produce the rewritten text.
    pub fn apply(&self) -> Result<String, RewriteError> {
        let len = self.source.len();
        for edit in &self.edits {
            let Range { start, end } = edit.range;
            let in_bounds = start <= end
                && end <= len
                && self.source.is_char_boundary(start)
                && self.source.is_char_boundary(end);
            if !in_bounds {
                return Err(RewriteError::OutOfBounds {
                    range: edit.range.clone(),
                    len,
                });
            }
        }

        let mut ordered: Vec<&Edit> = self.edits.iter().collect();
        ordered.sort_by_key(|e| e.order_key());

        // End of the furthest replacement seen so far
        let mut replaced: Option<&Range<usize>> = None;
        for edit in &ordered {
            if let Some(previous) = replaced {
                let conflicts = if edit.is_insertion() {
                    edit.range.start > previous.start && edit.range.start < previous.end
                } else {
                    edit.range.start < previous.end
                };
                if conflicts {
                    return Err(RewriteError::Overlapping {
                        first: previous.clone(),
                        second: edit.range.clone(),
                    });
                }
            }
            if !edit.is_insertion() && replaced.map_or(true, |r| edit.range.end >= r.end) {
                replaced = Some(&edit.range);
            }
        }

        let added: usize = self.edits.iter().map(|e| e.text.len()).sum();
        let mut out = String::with_capacity(len + added);
        let mut cursor = 0;
        for edit in ordered {
            out.push_str(&self.source[cursor..edit.range.start]);
            out.push_str(&edit.text);
            cursor = edit.range.end;
        }
        out.push_str(&self.source[cursor..]);

        tracing::debug!(edits = self.edits.len(), from = len, to = out.len(), "applied rewrite");
        Ok(out)
    }
}
