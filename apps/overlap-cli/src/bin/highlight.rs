//! Character-level diff of a candidate against one reference.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use overlap_cli::{equal_share, init_tracing, read_text, render_highlight, Markup};
use overlap_text::align;

#[derive(Parser, Debug)]
#[command(name = "overlap-highlight", version, about = "Mark where a candidate and a reference differ")]
struct Args {
    candidate: PathBuf,
    reference: PathBuf,

    /// Emit HTML with <mark> around differing text
    #[arg(long)]
    html: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let candidate = read_text(&args.candidate)?;
    let reference = read_text(&args.reference)?;

    let (cand_spans, ref_spans) = align(&candidate, &reference);
    let (cand_markup, ref_markup) = if args.html { (Markup::Html, Markup::Html) } else { (Markup::Removed, Markup::Added) };

    println!("== candidate: {}", args.candidate.display());
    println!("{}", render_highlight(&candidate, &cand_spans, cand_markup));
    println!("\n== reference: {}", args.reference.display());
    println!("{}", render_highlight(&reference, &ref_spans, ref_markup));
    println!("\nCandidate characters in equal spans: {:.2}%", equal_share(&candidate, &cand_spans));
    Ok(())
}
