//! Stage 4: fallback recovery by per-hash call-count voting. For old hashes
//! that stages 1 and 2 never resolved, every container votes for new-hash
//! candidates that occur exactly as often as the old hash does; hashes that
//! accumulate enough votes across the whole corpus are accepted.

use ahash::AHashMap;

use crate::container::Container;
use crate::reference::ReferenceMap;
use crate::translation::TranslationMap;

/// `old_hash -> (new_hash -> vote count)`, accumulated across every paired
/// container before any acceptance decision is made.
#[derive(Debug, Default)]
pub struct VoteTally {
    votes: AHashMap<u64, AHashMap<u64, u32>>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cast votes from one paired container for every old hash that is in
    /// the reference map but still unmapped.
    pub fn tally_container(
        &mut self,
        old: &Container,
        new: &Container,
        reference: &ReferenceMap,
        map: &TranslationMap,
    ) {
        let mut new_counts: AHashMap<u16, u32> = AHashMap::new();
        for &(native_index, _) in &new.calls {
            *new_counts.entry(native_index).or_insert(0) += 1;
        }

        for &old_hash in &old.native_table {
            if !reference.contains_old(old_hash) || map.old_hash_known(old_hash) {
                continue;
            }

            let old_count = old
                .calls
                .iter()
                .filter(|&&(idx, _)| old.native_table[idx as usize] == old_hash)
                .count() as u32;

            for (&k, &count) in &new_counts {
                if count != old_count {
                    continue;
                }
                let new_hash = new.native_table[k as usize];
                if map.new_hash_known(new_hash) {
                    continue;
                }
                *self
                    .votes
                    .entry(old_hash)
                    .or_default()
                    .entry(new_hash)
                    .or_insert(0) += 1;
            }
        }
    }

    /// Accept every old hash whose top-voted candidate clears `threshold`.
    /// Ties are broken by the smaller new hash, for a result independent of
    /// hash map iteration order. Returns the number of translations added.
    pub fn accept(&self, map: &mut TranslationMap, threshold: u32) -> usize {
        let mut old_hashes: Vec<&u64> = self.votes.keys().collect();
        old_hashes.sort_unstable();

        let mut accepted = 0;
        for &old_hash in old_hashes {
            let candidates = &self.votes[&old_hash];
            let mut ranked: Vec<(u32, u64)> =
                candidates.iter().map(|(&h, &c)| (c, h)).collect();
            ranked.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

            let Some(&(count, new_hash)) = ranked.first() else {
                continue;
            };
            if count < threshold {
                continue;
            }

            match map.try_record(new_hash, old_hash) {
                Ok(true) => accepted += 1,
                Ok(false) => {}
                Err(existing) => {
                    tracing::warn!(
                        new_hash = format_args!("{new_hash:#018X}"),
                        existing_old = format_args!("{existing:#018X}"),
                        proposed_old = format_args!("{old_hash:#018X}"),
                        votes = count,
                        "stage-4 fallback conflict, skipping proposal"
                    );
                }
            }
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::ReferenceMap;

    fn container(table: &[u64], calls: &[(u16, u32)]) -> Container {
        Container {
            native_table: table.to_vec(),
            calls: calls.to_vec(),
        }
    }

    fn reference_with(old_hashes: &[u64]) -> ReferenceMap {
        let lines: String = old_hashes
            .iter()
            .enumerate()
            .map(|(i, h)| format!("0x{:016X}, 0x{:016X},\n", i as u64 + 1, h))
            .collect();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref.txt");
        std::fs::write(&path, lines).unwrap();
        crate::reference::load_reference_map(&path).unwrap()
    }

    #[test]
    fn unique_count_match_accumulates_votes_and_accepts_at_threshold() {
        const H: u64 = 0xDEAD_BEEF;
        const HP: u64 = 0xFACE_FEED;

        let reference = reference_with(&[H]);
        // old: H called 3 times; new: HP called 3 times, nothing else called 3 times
        let old = container(
            &[H],
            &[(0, 0), (0, 1), (0, 1)],
        );
        let new = container(
            &[HP, 0xAAAA],
            &[(0, 0), (0, 1), (0, 1), (1, 1)],
        );

        let map = TranslationMap::new();
        let mut tally = VoteTally::new();
        for _ in 0..10 {
            tally.tally_container(&old, &new, &reference, &map);
        }

        let mut map = TranslationMap::new();
        let accepted = tally.accept(&mut map, 10);
        assert_eq!(accepted, 1);
        assert_eq!(map.new_for(H), Some(HP));
    }

    #[test]
    fn tally_below_threshold_is_not_accepted() {
        const H: u64 = 0x1;
        const HP: u64 = 0x2;
        let reference = reference_with(&[H]);
        let old = container(&[H], &[(0, 0), (0, 1)]);
        let new = container(&[HP], &[(0, 0), (0, 1)]);

        let map = TranslationMap::new();
        let mut tally = VoteTally::new();
        for _ in 0..9 {
            tally.tally_container(&old, &new, &reference, &map);
        }

        let mut map = TranslationMap::new();
        let accepted = tally.accept(&mut map, 10);
        assert_eq!(accepted, 0);
        assert!(map.new_for(H).is_none());
    }

    #[test]
    fn hashes_outside_reference_are_never_voted_on() {
        let reference = reference_with(&[0xAAAA]);
        let old = container(&[0xBBBB], &[(0, 0)]);
        let new = container(&[0xCCCC], &[(0, 0)]);

        let map = TranslationMap::new();
        let mut tally = VoteTally::new();
        tally.tally_container(&old, &new, &reference, &map);
        assert!(tally.votes.is_empty());
    }
}
