//! driftdiff: compare two files and render an inline diff with block-move
//! detection on the terminal.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::style::Stylize;

use driftdiff_config::Config;
use driftdiff_engine::{render_text, DiffEngine, DiffOptions, DiffResult, FragmentKind};

#[derive(Parser)]
#[command(
    name = "driftdiff",
    version,
    about = "Inline text diff with block-move detection"
)]
struct Args {
    /// Old revision file
    old: PathBuf,
    /// New revision file
    new: PathBuf,
    /// Output format
    #[arg(long, value_enum, default_value = "ansi")]
    format: Format,
    /// Show the full text instead of clipping unchanged regions
    #[arg(long)]
    full: bool,
    /// Show moved blocks as deletions in their original position
    #[arg(long)]
    no_moves: bool,
    /// Disable character-level refinement
    #[arg(long)]
    no_char_diff: bool,
    /// Disable the repeated empty-table matcher pass
    #[arg(long)]
    no_repeated: bool,
    /// Disable matcher recursion into unresolved gaps
    #[arg(long)]
    no_recursion: bool,
    /// Keep weak same-blocks linked instead of unlinking them
    #[arg(long)]
    no_unlink: bool,
    /// Use ASCII markers instead of Unicode symbols
    #[arg(long)]
    ascii: bool,
    /// Color moved blocks by their move index
    #[arg(long)]
    colored_blocks: bool,
    /// Print per-stage timings to stderr
    #[arg(long)]
    timer: bool,
    /// Explicit config file path (default: ~/.config/driftdiff/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Colored terminal output
    Ansi,
    /// Plain text with inline markers
    Text,
    /// The raw fragment stream as JSON
    Json,
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("driftdiff: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    let mut options = config.map(|c| c.diff).unwrap_or_default();
    merge_flags(&mut options, &args);

    let engine = DiffEngine::new(options)?;
    let old = std::fs::read_to_string(&args.old)
        .with_context(|| format!("reading {}", args.old.display()))?;
    let new = std::fs::read_to_string(&args.new)
        .with_context(|| format!("reading {}", args.new.display()))?;
    let result = engine.diff(&old, &new)?;

    for timing in &result.timings {
        eprintln!("{:>12}: {:?}", timing.stage, timing.elapsed);
    }

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&result.fragments)?),
        Format::Text => println!("{}", render_text(&result, engine.options())),
        Format::Ansi => println!("{}", render_ansi(&result, engine.options())),
    }
    Ok(if result.error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn merge_flags(options: &mut DiffOptions, args: &Args) {
    if args.full {
        options.full_diff = true;
    }
    if args.no_moves {
        options.show_block_moves = false;
    }
    if args.no_char_diff {
        options.char_diff = false;
    }
    if args.no_repeated {
        options.repeated_diff = false;
    }
    if args.no_recursion {
        options.recursive_diff = false;
    }
    if args.no_unlink {
        options.unlink_blocks = false;
    }
    if args.ascii {
        options.no_unicode_symbols = true;
    }
    if args.colored_blocks {
        options.colored_blocks = true;
    }
    if args.timer {
        options.timer = true;
    }
}

/// Render the fragment stream with ANSI styling: insertions green,
/// deletions red struck through, move marks yellow, moved blocks tinted by
/// move index when `colored_blocks` is set.
fn render_ansi(result: &DiffResult, options: &DiffOptions) -> String {
    use crossterm::style::Color;

    const MOVE_COLORS: [Color; 4] = [Color::Cyan, Color::Magenta, Color::Blue, Color::Green];
    let tint = |color: Option<usize>| {
        color.map(|c| MOVE_COLORS[(c - 1) % MOVE_COLORS.len()])
    };
    let ellipsis = |ascii: bool| if ascii { "..." } else { "…" };

    let mut out = String::new();
    for fragment in &result.fragments {
        match fragment.kind {
            FragmentKind::ContainerStart
            | FragmentKind::ContainerEnd
            | FragmentKind::FragmentStart
            | FragmentKind::FragmentEnd => {}
            FragmentKind::Separator => out.push('\n'),
            FragmentKind::Same => {
                match tint(fragment.color).filter(|_| options.colored_blocks) {
                    Some(c) => out.push_str(&format!("{}", fragment.text.as_str().with(c))),
                    None => out.push_str(&fragment.text),
                }
            }
            FragmentKind::Insert => {
                out.push_str(&format!("{}", fragment.text.as_str().green().underlined()));
            }
            FragmentKind::Delete => {
                out.push_str(&format!("{}", fragment.text.as_str().red().crossed_out()));
            }
            FragmentKind::MarkLeft | FragmentKind::MarkRight => {
                if options.show_block_moves {
                    let arrow = match (fragment.kind, options.no_unicode_symbols) {
                        (FragmentKind::MarkLeft, false) => "◀",
                        (FragmentKind::MarkRight, false) => "▶",
                        (FragmentKind::MarkLeft, true) => "<",
                        _ => ">",
                    };
                    let label = format!("{arrow}{}", fragment.color.unwrap_or(0));
                    out.push_str(&format!("{}", label.as_str().yellow().bold()));
                } else {
                    out.push_str(&format!("{}", fragment.text.as_str().red().crossed_out()));
                }
            }
            FragmentKind::BlockStartLeft | FragmentKind::BlockStartRight => {
                if options.show_block_moves {
                    let arrow = if fragment.kind == FragmentKind::BlockStartLeft {
                        "◁"
                    } else {
                        "▷"
                    };
                    let arrow = if options.no_unicode_symbols { "|" } else { arrow };
                    out.push_str(&format!("{}", arrow.yellow().bold()));
                }
            }
            FragmentKind::BlockEnd => {
                if options.show_block_moves {
                    let bar = if options.no_unicode_symbols { "|" } else { "◅" };
                    out.push_str(&format!("{}", bar.yellow().bold()));
                }
            }
            FragmentKind::OmissionChars => {
                out.push_str(&format!(
                    "{}",
                    ellipsis(options.no_unicode_symbols).dim()
                ));
            }
            FragmentKind::OmissionBlankLeft => {
                out.push(' ');
                out.push_str(&format!(
                    "{}",
                    ellipsis(options.no_unicode_symbols).dim()
                ));
            }
            FragmentKind::OmissionBlankRight => {
                out.push_str(&format!(
                    "{}",
                    ellipsis(options.no_unicode_symbols).dim()
                ));
                out.push(' ');
            }
        }
    }
    if result.error {
        format!(
            "{}\n{out}",
            "diff self-check failed; output may be inconsistent"
                .red()
                .bold()
        )
    } else {
        out
    }
}
