//! The engine's configuration record. Hosts translate their environment
//! into this struct; the engine itself reads nothing process-wide.

use serde::{Deserialize, Serialize};

use crate::error::DiffError;

/// Options for one [`crate::DiffEngine`] instance. All thresholds counting
/// characters are Unicode code-point counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Disable unchanged-region clipping and show the full text.
    pub full_diff: bool,
    /// Render moved groups as block moves; when off, renderers show the
    /// move marks as deletions in their original position.
    pub show_block_moves: bool,
    /// Enable character-level refinement of same-shape gaps.
    pub char_diff: bool,
    /// Recurse into still-unresolved sub-gaps.
    pub recursive_diff: bool,
    /// Maximum matcher recursion depth.
    pub recursion_max: usize,
    /// Re-run the matcher once with an empty symbol table to catch
    /// cross-over duplicates.
    pub repeated_diff: bool,
    /// Convert short non-unique same-blocks back into insertions and
    /// deletions.
    pub unlink_blocks: bool,
    /// Maximum unlink-and-redetect cycles.
    pub unlink_max: usize,
    /// Minimum words for a block to resist unlinking and to qualify a
    /// token as an anchor by length.
    pub block_min_length: usize,
    /// Renderer hint: color moved blocks by their move index.
    pub colored_blocks: bool,
    /// Renderer hint: use ASCII markers instead of Unicode symbols.
    pub no_unicode_symbols: bool,
    /// Remove a trailing newline from both inputs before diffing.
    pub strip_trailing_newline: bool,
    /// Log token-list and block-model dumps between stages.
    pub debug: bool,
    /// Collect per-stage wall-clock timings into the result.
    pub timer: bool,
    /// Run the projection self-check and flag failures on the result.
    pub unit_testing: bool,

    // Clipping thresholds, in code points unless stated otherwise.
    pub clip_heading_left: usize,
    pub clip_heading_right: usize,
    pub clip_paragraph_left_min: usize,
    pub clip_paragraph_left_max: usize,
    pub clip_paragraph_right_min: usize,
    pub clip_paragraph_right_max: usize,
    pub clip_line_left_min: usize,
    pub clip_line_left_max: usize,
    pub clip_line_right_min: usize,
    pub clip_line_right_max: usize,
    pub clip_blank_left_min: usize,
    pub clip_blank_left_max: usize,
    pub clip_blank_right_min: usize,
    pub clip_blank_right_max: usize,
    pub clip_chars_left: usize,
    pub clip_chars_right: usize,
    /// Maximum kept lines per side, in line breaks.
    pub clip_lines_left_max: usize,
    pub clip_lines_right_max: usize,
    /// Do not clip gaps smaller than this many code points…
    pub clip_skip_chars: usize,
    /// …or spanning fewer than this many line breaks.
    pub clip_skip_lines: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            full_diff: false,
            show_block_moves: true,
            char_diff: true,
            recursive_diff: true,
            recursion_max: 10,
            repeated_diff: true,
            unlink_blocks: true,
            unlink_max: 5,
            block_min_length: 3,
            colored_blocks: false,
            no_unicode_symbols: false,
            strip_trailing_newline: false,
            debug: false,
            timer: false,
            unit_testing: false,
            clip_heading_left: 1500,
            clip_heading_right: 1500,
            clip_paragraph_left_min: 500,
            clip_paragraph_left_max: 1500,
            clip_paragraph_right_min: 500,
            clip_paragraph_right_max: 1500,
            clip_line_left_min: 500,
            clip_line_left_max: 1000,
            clip_line_right_min: 500,
            clip_line_right_max: 1000,
            clip_blank_left_min: 500,
            clip_blank_left_max: 1000,
            clip_blank_right_min: 500,
            clip_blank_right_max: 1000,
            clip_chars_left: 500,
            clip_chars_right: 500,
            clip_lines_left_max: 15,
            clip_lines_right_max: 15,
            clip_skip_chars: 1000,
            clip_skip_lines: 5,
        }
    }
}

impl DiffOptions {
    /// Check every value against its declared domain. The engine refuses to
    /// run with an invalid record.
    pub fn validate(&self) -> Result<(), DiffError> {
        let windows = [
            (
                "clip_paragraph_left",
                self.clip_paragraph_left_min,
                self.clip_paragraph_left_max,
            ),
            (
                "clip_paragraph_right",
                self.clip_paragraph_right_min,
                self.clip_paragraph_right_max,
            ),
            (
                "clip_line_left",
                self.clip_line_left_min,
                self.clip_line_left_max,
            ),
            (
                "clip_line_right",
                self.clip_line_right_min,
                self.clip_line_right_max,
            ),
            (
                "clip_blank_left",
                self.clip_blank_left_min,
                self.clip_blank_left_max,
            ),
            (
                "clip_blank_right",
                self.clip_blank_right_min,
                self.clip_blank_right_max,
            ),
        ];
        for (name, min, max) in windows {
            if min > max {
                return Err(DiffError::InvalidConfig(format!(
                    "{name}: min {min} exceeds max {max}"
                )));
            }
        }
        if self.block_min_length == 0 {
            return Err(DiffError::InvalidConfig(
                "block_min_length must be at least 1".to_string(),
            ));
        }
        if self.clip_chars_left == 0 || self.clip_chars_right == 0 {
            return Err(DiffError::InvalidConfig(
                "clip_chars thresholds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        DiffOptions::default().validate().unwrap();
    }

    #[test]
    fn inverted_window_is_rejected() {
        let options = DiffOptions {
            clip_line_left_min: 2000,
            ..DiffOptions::default()
        };
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("clip_line_left"));
    }

    #[test]
    fn zero_block_min_length_is_rejected() {
        let options = DiffOptions {
            block_min_length: 0,
            ..DiffOptions::default()
        };
        assert!(options.validate().is_err());
    }
}
