//! Stage 1: identity by call-count. When a paired container's old and new
//! call sequences are the same length, position `j` in one almost always
//! corresponds to position `j` in the other.

use crate::container::Container;
use crate::translation::TranslationMap;

/// Apply stage 1 to a single paired container, returning the number of new
/// translations it contributed (conflicts and idempotent repeats don't
/// count).
pub fn apply(old: &Container, new: &Container, map: &mut TranslationMap) -> usize {
    if old.calls.is_empty() || old.calls.len() != new.calls.len() {
        return 0;
    }

    let mut added = 0;
    for (old_call, new_call) in old.calls.iter().zip(new.calls.iter()) {
        let old_hash = old.call_hash(*old_call);
        let new_hash = new.call_hash(*new_call);
        if map.record_identity(new_hash, old_hash) {
            added += 1;
        }
    }
    added
}

/// Call once after every paired container has gone through [`apply`].
pub fn finalize(map: &mut TranslationMap) {
    map.purge_ambiguous();
}
