//! Pipeline orchestration: tokenize → match per level → slide → char
//! refine → enumerate → block detection → fragment assembly → self-check →
//! clip.

use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::blocks::BlockModel;
use crate::error::DiffError;
use crate::fragments::{self, Fragment, FragmentKind};
use crate::matching::{Matcher, slide_gaps, split_refine_chars};
use crate::options::DiffOptions;
use crate::tokens::{arena, Level, Patterns, Revision};
use crate::unicode;

/// One engine instance: validated options plus the compiled pattern set.
/// Instances are immutable and independent; concurrent `diff` calls on
/// distinct inputs never share mutable state.
#[derive(Debug)]
pub struct DiffEngine {
    options: DiffOptions,
    patterns: Patterns,
}

/// Wall-clock duration of one pipeline stage, collected when
/// [`DiffOptions::timer`] is set. Observational only.
#[derive(Debug, Clone)]
pub struct StageTiming {
    pub stage: &'static str,
    pub elapsed: Duration,
}

/// The outcome of one `diff` call: the fragment stream, the self-check
/// flag, and optional stage timings.
#[derive(Debug, Clone)]
pub struct DiffResult {
    pub fragments: Vec<Fragment>,
    /// Set when `unit_testing` is enabled and the projection self-check
    /// failed; indicates a bug in the engine, not in the input.
    pub error: bool,
    pub timings: Vec<StageTiming>,
}

struct StageClock {
    enabled: bool,
    last: Instant,
    timings: Vec<StageTiming>,
}

impl StageClock {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last: Instant::now(),
            timings: Vec::new(),
        }
    }

    fn stage(&mut self, stage: &'static str) {
        if !self.enabled {
            return;
        }
        let elapsed = self.last.elapsed();
        debug!("stage {stage}: {elapsed:?}");
        self.timings.push(StageTiming { stage, elapsed });
        self.last = Instant::now();
    }
}

impl DiffEngine {
    /// Build an engine from `options`; refuses invalid configuration.
    pub fn new(options: DiffOptions) -> Result<Self, DiffError> {
        options.validate()?;
        Ok(Self {
            options,
            patterns: Patterns::new(),
        })
    }

    /// An engine with default options.
    pub fn with_defaults() -> Self {
        Self {
            options: DiffOptions::default(),
            patterns: Patterns::new(),
        }
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Compare two revisions and return the fragment stream.
    pub fn diff(&self, old_text: &str, new_text: &str) -> Result<DiffResult, DiffError> {
        let mut clock = StageClock::new(self.options.timer);
        let mut old_text = unicode::normalize_line_endings(old_text);
        let mut new_text = unicode::normalize_line_endings(new_text);
        if self.options.strip_trailing_newline {
            if let Some(stripped) = old_text.strip_suffix('\n') {
                old_text.truncate(stripped.len());
            }
            if let Some(stripped) = new_text.strip_suffix('\n') {
                new_text.truncate(stripped.len());
            }
        }

        // Trivial change: emit the no-change container directly.
        if old_text == new_text {
            let fragments = wrap_single(Fragment::new(new_text.as_str(), FragmentKind::Same, None));
            let fragments = self.maybe_clip(fragments);
            return Ok(DiffResult {
                fragments,
                error: false,
                timings: clock.timings,
            });
        }

        let mut new_rev = Revision::new(new_text, &self.patterns);
        let mut old_rev = Revision::new(old_text, &self.patterns);
        new_rev.split_initial(Level::Paragraph, &self.patterns);
        old_rev.split_initial(Level::Paragraph, &self.patterns);
        clock.stage("tokenize");

        Matcher::new(&mut new_rev, &mut old_rev, &self.patterns, &self.options)
            .run(Level::Paragraph);
        for level in [Level::Line, Level::Sentence, Level::Chunk, Level::Word] {
            new_rev.split_refine(level, &self.patterns);
            old_rev.split_refine(level, &self.patterns);
            Matcher::new(&mut new_rev, &mut old_rev, &self.patterns, &self.options).run(level);
        }
        clock.stage("match");

        slide_gaps(&mut new_rev, &mut old_rev, &self.patterns);
        slide_gaps(&mut old_rev, &mut new_rev, &self.patterns);
        clock.stage("slide");

        if self.options.char_diff {
            split_refine_chars(&mut new_rev, &mut old_rev, &self.patterns);
            Matcher::new(&mut new_rev, &mut old_rev, &self.patterns, &self.options)
                .run(Level::Character);
            slide_gaps(&mut new_rev, &mut old_rev, &self.patterns);
            slide_gaps(&mut old_rev, &mut new_rev, &self.patterns);
            clock.stage("char refine");
        }

        new_rev.enumerate();
        old_rev.enumerate();
        self.check_invariants(&new_rev, &old_rev)?;
        if self.options.debug {
            dump_tokens("new", &new_rev);
            dump_tokens("old", &old_rev);
        }

        let model = BlockModel::detect(&mut new_rev, &mut old_rev, &self.options, &self.patterns);
        clock.stage("blocks");
        if self.options.debug {
            dump_blocks(&model);
        }

        let fragments = fragments::assemble(&model);
        clock.stage("assemble");

        // Self-check: the unclipped stream must reproduce both inputs.
        let mut error = false;
        let projected_new = fragments::project_new(&fragments);
        let projected_old = fragments::project_old(&fragments);
        if projected_new != new_rev.text() || projected_old != old_rev.text() {
            warn!("diff projection self-check failed");
            if self.options.unit_testing {
                error = true;
            }
        }

        let fragments = self.maybe_clip(fragments);
        clock.stage("clip");
        Ok(DiffResult {
            fragments,
            error,
            timings: clock.timings,
        })
    }

    fn maybe_clip(&self, fragments: Vec<Fragment>) -> Vec<Fragment> {
        if self.options.full_diff {
            fragments
        } else {
            fragments::clip(fragments, &self.options, &self.patterns)
        }
    }

    fn check_invariants(&self, new_rev: &Revision, old_rev: &Revision) -> Result<(), DiffError> {
        arena::check_list(new_rev.arena(), new_rev.first(), new_rev.last())
            .map_err(DiffError::Tokenizer)?;
        arena::check_list(old_rev.arena(), old_rev.first(), old_rev.last())
            .map_err(DiffError::Tokenizer)?;
        for i in new_rev.active() {
            if let Some(j) = new_rev.token(i).link {
                if old_rev.token(j).link != Some(i) {
                    return Err(DiffError::Matcher(format!(
                        "NEW token {i} links to OLD {j}, which links back to {:?}",
                        old_rev.token(j).link
                    )));
                }
            }
        }
        Ok(())
    }
}

fn wrap_single(fragment: Fragment) -> Vec<Fragment> {
    vec![
        Fragment::bare(FragmentKind::ContainerStart),
        Fragment::bare(FragmentKind::FragmentStart),
        fragment,
        Fragment::bare(FragmentKind::FragmentEnd),
        Fragment::bare(FragmentKind::ContainerEnd),
    ]
}

fn dump_tokens(label: &str, rev: &Revision) {
    for i in rev.active() {
        let token = rev.token(i);
        debug!(
            "{label} #{:>4} {:?} link {:?} unique {} text {:?}",
            token.number, i, token.link, token.unique, rev.token_text(i)
        );
    }
}

fn dump_blocks(model: &BlockModel) {
    for (idx, block) in model.blocks.iter().enumerate() {
        debug!(
            "block #{idx:>3} {:?} old {:?} new {} group {:?} fixed {} moved {:?} text {:?}",
            block.kind, block.old_number, block.new_number, block.group, block.fixed, block.moved,
            block.text
        );
    }
    for (idx, group) in model.groups.iter().enumerate() {
        debug!(
            "group #{idx:>3} blocks {}..={} old {:?} fixed {} moved_from {:?} color {:?}",
            group.block_start,
            group.block_end,
            group.old_number,
            group.fixed,
            group.moved_from,
            group.color
        );
    }
}
