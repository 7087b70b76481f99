//! Wires every component into the single sequential pipeline described by
//! the system overview: parse (optionally parallel), stage 1, stage 2,
//! reference load, stage 4, universalize, summarize.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::config::RunConfig;
use crate::container::{self, Container};
use crate::pairing::{self, Pairing};
use crate::reference;
use crate::stage1;
use crate::stage2;
use crate::stage4::VoteTally;
use crate::summary::{self, RunSummary};
use crate::translation::TranslationMap;
use crate::universalize;

struct Parsed {
    pairing: Pairing,
    old: Container,
    new: Container,
}

fn parse_pair(pairing: Pairing) -> Option<Parsed> {
    let old = match container::parse_container(&pairing.old_path) {
        Ok(c) => c,
        Err(err) => {
            tracing::warn!(pair = %pairing.name, error = %err, "skipping pair, old container parse failed");
            return None;
        }
    };
    let new = match container::parse_container(&pairing.new_path) {
        Ok(c) => c,
        Err(err) => {
            tracing::warn!(pair = %pairing.name, error = %err, "skipping pair, new container parse failed");
            return None;
        }
    };
    Some(Parsed { pairing, old, new })
}

/// Run the full pipeline described in the system overview and return the
/// accumulated [`RunSummary`]. Writes the crossmap output file as a side
/// effect.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let pairings = pairing::scan_pairs(&config.old_root, &config.new_root)
        .context("scanning for paired containers")?;
    tracing::info!(pairs = pairings.len(), "found container pairs");

    let total_pairs = pairings.len();
    let pb = ProgressBar::new(total_pairs as u64);
    pb.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} pairs {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    // Container parsing is the one embarrassingly parallel phase; folding
    // the results back happens in the fixed pairing order so the serial
    // stages that follow stay deterministic.
    let parsed: Vec<Parsed> = pairings
        .into_par_iter()
        .filter_map(|p| {
            let r = parse_pair(p);
            pb.inc(1);
            r
        })
        .collect();
    pb.finish_and_clear();

    let mut summary = RunSummary {
        containers_seen: parsed.len(),
        containers_skipped: total_pairs - parsed.len(),
        ..Default::default()
    };

    let mut map = TranslationMap::new();
    for p in &parsed {
        summary.stage1_translations += stage1::apply(&p.old, &p.new, &mut map);
    }
    stage1::finalize(&mut map);

    for p in &parsed {
        summary.stage2_translations += stage2::apply(
            &p.old,
            &p.new,
            &mut map,
            config.min_pattern_size,
            config.pattern_start_offset,
        );
    }

    let reference_map = reference::load_reference_map(&config.reference_path)
        .context("loading reference crossmap")?;
    summary.reference_size = reference_map.len();

    let mut tally = VoteTally::new();
    for p in &parsed {
        tally.tally_container(&p.old, &p.new, &reference_map, &map);
    }
    summary.stage4_translations = tally.accept(&mut map, config.fallback_vote_threshold);

    let lines = universalize::universalize(&map, &reference_map);
    universalize::write_crossmap(&config.output_path, &lines)
        .context("writing crossmap output")?;
    summary.output_lines = lines.len();
    summary.missing_count = reference_map.len().saturating_sub(lines.len());

    if let Some(verify_path) = &config.verify_path {
        let expected = reference::load_reference_map(verify_path)
            .context("loading verification crossmap")?;
        summary.wrong_count = Some(summary::count_wrong(&lines, &expected));
    }

    summary.log();
    Ok(summary)
}
