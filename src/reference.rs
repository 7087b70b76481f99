//! Loads the reference crossmap: a text file mapping universal hash to
//! old-release hash, used only at the final join.

use ahash::AHashMap;
use anyhow::{Context, Result};
use std::path::Path;

/// Total map `old_hash -> universal_hash`, inverted from the on-disk
/// `universal, old` pairs for fast lookup during universalization.
#[derive(Debug, Default)]
pub struct ReferenceMap {
    old_to_universal: AHashMap<u64, u64>,
}

impl ReferenceMap {
    pub fn len(&self) -> usize {
        self.old_to_universal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.old_to_universal.is_empty()
    }

    #[inline]
    pub fn universal_for(&self, old_hash: u64) -> Option<u64> {
        self.old_to_universal.get(&old_hash).copied()
    }

    #[inline]
    pub fn contains_old(&self, old_hash: u64) -> bool {
        self.old_to_universal.contains_key(&old_hash)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.old_to_universal.iter().map(|(&o, &u)| (o, u))
    }
}

/// Pull the first two `0x...` hex literals out of a line. Anything else on
/// the line (labels, trailing commas) is ignored.
fn first_two_hex_literals(line: &str) -> Option<(u64, u64)> {
    let mut found = line.match_indices("0x").filter_map(|(idx, _)| {
        let rest = &line[idx + 2..];
        let hex_len = rest
            .char_indices()
            .take_while(|(_, c)| c.is_ascii_hexdigit())
            .count();
        if hex_len == 0 {
            return None;
        }
        u64::from_str_radix(&rest[..hex_len], 16).ok()
    });

    let first = found.next()?;
    let second = found.next()?;
    Some((first, second))
}

/// Read a reference crossmap file: each line holds `0xUNIVERSAL, 0xOLD` (or
/// similar, trailing text ignored); lines with fewer than two hex literals
/// are skipped without error.
pub fn load_reference_map(path: &Path) -> Result<ReferenceMap> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read reference crossmap {}", path.display()))?;

    let mut map = ReferenceMap::default();
    for line in text.lines() {
        if let Some((universal, old)) = first_two_hex_literals(line) {
            map.old_to_universal.insert(old, universal);
        }
    }
    Ok(map)
}
