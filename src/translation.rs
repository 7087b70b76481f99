//! The shared, bijective old-hash <-> new-hash map built up across stages 1,
//! 2 and 4.

use ahash::AHashMap;

/// A single slot in the forward map: either a confirmed old hash, or the
/// "ambiguous" sentinel left behind by a stage-1 collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Old(u64),
    Ambiguous,
}

/// Bijective partial map between new-release and old-release native hashes.
///
/// `fwd` and `rev` are kept in lockstep by construction: every mutator here
/// updates both sides, so `fwd[n] == Some(o)` iff `rev[o] == Some(n)` holds
/// at every observable point except mid-stage-1, where a collision is
/// visible only as the `Ambiguous` sentinel (never as a dangling `rev`
/// entry).
#[derive(Debug, Default)]
pub struct TranslationMap {
    fwd: AHashMap<u64, Slot>,
    rev: AHashMap<u64, u64>,
}

impl TranslationMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn new_hash_known(&self, new_hash: u64) -> bool {
        self.fwd.contains_key(&new_hash)
    }

    #[inline]
    pub fn old_hash_known(&self, old_hash: u64) -> bool {
        self.rev.contains_key(&old_hash)
    }

    #[inline]
    pub fn old_for(&self, new_hash: u64) -> Option<u64> {
        match self.fwd.get(&new_hash) {
            Some(Slot::Old(o)) => Some(*o),
            _ => None,
        }
    }

    #[inline]
    pub fn new_for(&self, old_hash: u64) -> Option<u64> {
        self.rev.get(&old_hash).copied()
    }

    /// Record `new_hash -> old_hash` unconditionally, assuming the caller has
    /// already checked there is no existing entry to conflict with.
    fn insert_pair(&mut self, new_hash: u64, old_hash: u64) {
        self.fwd.insert(new_hash, Slot::Old(old_hash));
        self.rev.insert(old_hash, new_hash);
    }

    /// Stage-1 style record: first writer wins, a later conflicting writer
    /// demotes the slot to ambiguous instead of overwriting it. Returns
    /// whether a *new* translation was recorded (for progress reporting).
    pub fn record_identity(&mut self, new_hash: u64, old_hash: u64) -> bool {
        match self.fwd.get(&new_hash).copied() {
            None => {
                self.insert_pair(new_hash, old_hash);
                true
            }
            Some(Slot::Ambiguous) => false,
            Some(Slot::Old(existing)) if existing == old_hash => false,
            Some(Slot::Old(existing)) => {
                self.rev.remove(&existing);
                self.fwd.insert(new_hash, Slot::Ambiguous);
                false
            }
        }
    }

    /// Drop every slot still holding the ambiguous sentinel. Call once after
    /// stage 1 finishes across all containers.
    pub fn purge_ambiguous(&mut self) {
        self.fwd.retain(|_, slot| !matches!(slot, Slot::Ambiguous));
    }

    /// Stage-2/stage-4 style record: only writes if `new_hash` is completely
    /// unknown. Returns `Ok(true)` if written, `Ok(false)` if `new_hash` was
    /// already mapped to the same `old_hash`, or `Err(existing_old_hash)` on
    /// a genuine conflict (existing mapping left untouched).
    pub fn try_record(&mut self, new_hash: u64, old_hash: u64) -> Result<bool, u64> {
        match self.fwd.get(&new_hash).copied() {
            None => {
                self.insert_pair(new_hash, old_hash);
                Ok(true)
            }
            Some(Slot::Old(existing)) if existing == old_hash => Ok(false),
            Some(Slot::Old(existing)) => Err(existing),
            Some(Slot::Ambiguous) => Err(old_hash), // unreachable post-purge, kept defensive
        }
    }

    pub fn len(&self) -> usize {
        self.fwd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fwd.is_empty()
    }

    /// Iterate `(new_hash, old_hash)` pairs — used by the universalizer.
    pub fn pairs(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.fwd.iter().filter_map(|(&n, slot)| match slot {
            Slot::Old(o) => Some((n, *o)),
            Slot::Ambiguous => None,
        })
    }

    /// Debug-only bijectivity check, used by tests.
    #[cfg(test)]
    fn is_bijective(&self) -> bool {
        for (&n, slot) in &self.fwd {
            if let Slot::Old(o) = slot {
                if self.rev.get(o) != Some(&n) {
                    return false;
                }
            }
        }
        for (&o, &n) in &self.rev {
            if self.old_for(n) != Some(o) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_identity_insert_is_bijective() {
        let mut tm = TranslationMap::new();
        assert!(tm.record_identity(0xAAAA, 0xBBBB));
        assert!(tm.is_bijective());
        assert_eq!(tm.old_for(0xAAAA), Some(0xBBBB));
        assert_eq!(tm.new_for(0xBBBB), Some(0xAAAA));
    }

    #[test]
    fn repeated_identical_identity_is_idempotent() {
        let mut tm = TranslationMap::new();
        assert!(tm.record_identity(1, 2));
        assert!(!tm.record_identity(1, 2));
        assert_eq!(tm.len(), 1);
        assert!(tm.is_bijective());
    }

    #[test]
    fn conflicting_identity_demotes_to_ambiguous_and_purges() {
        let mut tm = TranslationMap::new();
        assert!(tm.record_identity(1, 10));
        assert!(!tm.record_identity(1, 20));
        assert!(tm.old_for(1).is_none()); // ambiguous, not yet purged
        assert!(tm.new_for(10).is_none()); // rev entry removed on demotion
        tm.purge_ambiguous();
        assert_eq!(tm.len(), 0);
        assert!(tm.is_bijective());
    }

    #[test]
    fn stage1_twice_over_same_inputs_is_idempotent() {
        let mut once = TranslationMap::new();
        once.record_identity(1, 10);
        once.record_identity(2, 20);
        once.purge_ambiguous();

        let mut twice = TranslationMap::new();
        for _ in 0..2 {
            twice.record_identity(1, 10);
            twice.record_identity(2, 20);
        }
        twice.purge_ambiguous();

        assert_eq!(once.pairs().collect::<Vec<_>>().len(), twice.pairs().collect::<Vec<_>>().len());
    }

    #[test]
    fn try_record_refuses_conflicting_overwrite() {
        let mut tm = TranslationMap::new();
        assert_eq!(tm.try_record(1, 10), Ok(true));
        assert_eq!(tm.try_record(1, 10), Ok(false));
        assert_eq!(tm.try_record(1, 20), Err(10));
        assert_eq!(tm.old_for(1), Some(10)); // untouched
    }
}
