//! Task list parsing
//!
//! The generator returns free text; we asked for a numbered list but must
//! not assume we got one. This is a best-effort, line-heuristic parse: a
//! non-blank line whose first character is a digit and which contains the
//! literal marker `Title:` opens a new block, every following non-blank line
//! joins that block, and anything before the first marker is discarded.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

/// Marker that identifies the opening line of a task block
const TITLE_MARKER: &str = "Title:";

/// Split raw generator output into ordered raw task blocks.
///
/// Empty input, or input with no opening marker, yields an empty Vec —
/// never an error.
pub fn split_task_blocks(text: &str) -> Vec<String> {
    let mut blocks: Vec<String> = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let opens_block = line.chars().next().is_some_and(|c| c.is_ascii_digit()) && line.contains(TITLE_MARKER);

        if opens_block {
            if let Some(lines) = current.take() {
                blocks.push(lines.join("\n"));
            }
            current = Some(vec![line]);
        } else if let Some(lines) = current.as_mut() {
            lines.push(line);
        }
        // Lines before the first opening marker fall through and are dropped
    }

    if let Some(lines) = current {
        blocks.push(lines.join("\n"));
    }

    debug!(count = blocks.len(), "split_task_blocks: parsed blocks");
    blocks
}

/// A parsed task record. Field extraction is best-effort: a record with
/// missing fields is still a selectable unit of "today's task" text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub title: Option<String>,
    pub area: Option<String>,
    pub description: Option<String>,
    pub estimated_minutes: Option<u32>,
    /// The full block text as returned by the generator
    pub raw: String,
}

fn minutes_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+)\s*min").expect("minutes regex is valid"))
}

/// Take the value after a `Label:` marker on a line, if present
fn field_after<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    line.find(label).map(|idx| line[idx + label.len()..].trim())
}

impl TaskRecord {
    /// Extract what fields we can from one raw block
    pub fn from_block(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let mut record = Self {
            title: None,
            area: None,
            description: None,
            estimated_minutes: None,
            raw: String::new(),
        };

        for line in raw.lines() {
            if record.title.is_none() {
                if let Some(value) = field_after(line, TITLE_MARKER) {
                    record.title = Some(value.to_string());
                    continue;
                }
            }
            if record.area.is_none() {
                if let Some(value) = field_after(line, "Area:") {
                    record.area = Some(value.to_string());
                    continue;
                }
            }
            if record.description.is_none() {
                if let Some(value) = field_after(line, "Description:") {
                    record.description = Some(value.to_string());
                    continue;
                }
            }
            if record.estimated_minutes.is_none() {
                if let Some(caps) = minutes_regex().captures(line) {
                    record.estimated_minutes = caps[1].parse().ok();
                }
            }
        }

        record.raw = raw;
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_blocks_round_trip() {
        let text = "1. Title: A\nArea: X\n\n2. Title: B\nArea: Y\n";
        let blocks = split_task_blocks(text);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], "1. Title: A\nArea: X");
        assert_eq!(blocks[1], "2. Title: B\nArea: Y");
    }

    #[test]
    fn test_no_marker_yields_empty() {
        assert!(split_task_blocks("").is_empty());
        assert!(split_task_blocks("Here is your plan:\n- do a thing\n- do another\n").is_empty());
        // A number alone does not open a block
        assert!(split_task_blocks("1. do a thing\n2. do another\n").is_empty());
    }

    #[test]
    fn test_prose_before_first_marker_is_discarded() {
        let text = "Sure! Here are your tasks:\n\n1. Title: Walk\nArea: Fitness\n";
        let blocks = split_task_blocks(text);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0], "1. Title: Walk\nArea: Fitness");
    }

    #[test]
    fn test_continuation_lines_join_current_block() {
        // Once a block has started, even lines without markers append to it
        let text = "1. Title: Walk\nArea: Fitness\nsome stray continuation\n2. Title: Read\n";
        let blocks = split_task_blocks(text);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], "1. Title: Walk\nArea: Fitness\nsome stray continuation");
        assert_eq!(blocks[1], "2. Title: Read");
    }

    #[test]
    fn test_final_open_block_is_emitted() {
        let blocks = split_task_blocks("3. Title: Last one");
        assert_eq!(blocks, vec!["3. Title: Last one"]);
    }

    #[test]
    fn test_record_field_extraction() {
        let record = TaskRecord::from_block("1. Title: Walk\nArea: Fitness\nDescription: Around the block\nTime: 20 minutes");

        assert_eq!(record.title.as_deref(), Some("Walk"));
        assert_eq!(record.area.as_deref(), Some("Fitness"));
        assert_eq!(record.description.as_deref(), Some("Around the block"));
        assert_eq!(record.estimated_minutes, Some(20));
    }

    #[test]
    fn test_record_with_missing_fields_is_retained() {
        let record = TaskRecord::from_block("1. Title: Walk");

        assert_eq!(record.title.as_deref(), Some("Walk"));
        assert!(record.area.is_none());
        assert!(record.description.is_none());
        assert!(record.estimated_minutes.is_none());
        assert_eq!(record.raw, "1. Title: Walk");
    }

    #[test]
    fn test_minutes_variants() {
        assert_eq!(TaskRecord::from_block("1. Title: A\n15 min").estimated_minutes, Some(15));
        assert_eq!(
            TaskRecord::from_block("1. Title: A\nEstimated: 45 Minutes").estimated_minutes,
            Some(45)
        );
    }
}
