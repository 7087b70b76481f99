//! Joins the old->new translation map with the universal->old reference map
//! to produce the final universal->new crossmap.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::reference::ReferenceMap;
use crate::translation::TranslationMap;

/// Build the `(universal_hash, new_hash)` lines to emit, identity
/// translations excluded, sorted for a deterministic and diffable output.
pub fn universalize(map: &TranslationMap, reference: &ReferenceMap) -> Vec<(u64, u64)> {
    let mut lines: Vec<(u64, u64)> = map
        .pairs()
        .filter(|&(new_hash, old_hash)| old_hash != new_hash)
        .filter_map(|(new_hash, old_hash)| {
            reference
                .universal_for(old_hash)
                .map(|universal| (universal, new_hash))
        })
        .collect();
    lines.sort_unstable();
    lines
}

/// Write the crossmap in the fixed `"0x<UNIVERSAL16HEX>, 0x<NEW16HEX>,\n"`
/// line format, upper-case hex, sixteen digits per field.
pub fn write_crossmap(path: &Path, lines: &[(u64, u64)]) -> Result<()> {
    let mut out = std::fs::File::create(path)
        .with_context(|| format!("create crossmap output {}", path.display()))?;
    for &(universal, new_hash) in lines {
        writeln!(out, "0x{universal:016X}, 0x{new_hash:016X},")
            .with_context(|| format!("write crossmap output {}", path.display()))?;
    }
    Ok(())
}
