use crate::container::Container;
use crate::translation::TranslationMap;

// longest run at old[offset..] matching new by byte delta, anchored by map;
// returns the matched [new_start, new_end) in new.calls
fn generate_pattern(
    old: &Container,
    new: &Container,
    offset: usize,
    map: &TranslationMap,
) -> Option<(usize, usize)> {
    if offset >= old.calls.len() {
        return None;
    }

    let mut best: Option<(usize, usize)> = None; // (new_start, new_end)

    for i in 0..new.calls.len() {
        let mut j = 0usize;
        loop {
            if i + j >= new.calls.len() || offset + j >= old.calls.len() {
                break;
            }
            if new.calls[i + j].1 != old.calls[offset + j].1 {
                break;
            }
            let old_hash = old.call_hash(old.calls[offset + j]);
            if let Some(expected_new) = map.new_for(old_hash) {
                let actual_new = new.call_hash(new.calls[i + j]);
                if actual_new != expected_new {
                    break;
                }
            }
            j += 1;
        }

        if j == 0 {
            continue;
        }
        let better = match best {
            None => true,
            Some((bi, be)) => j > be - bi,
        };
        if better {
            best = Some((i, i + j));
        }
    }

    let (new_start, new_end) = best?;
    let length = new_end - new_start;

    // must occur exactly once in old.calls or the alignment is ambiguous
    if length == 0 || old.calls.len() < length {
        return None;
    }
    let pattern: Vec<u32> = (0..length).map(|k| old.calls[offset + k].1).collect();
    let mut occurrences = 0;
    for start in 0..=(old.calls.len() - length) {
        if (0..length).all(|k| old.calls[start + k].1 == pattern[k]) {
            occurrences += 1;
            if occurrences > 1 {
                break;
            }
        }
    }

    (occurrences == 1).then_some((new_start, new_end))
}

pub fn apply(
    old: &Container,
    new: &Container,
    map: &mut TranslationMap,
    min_pattern_size: usize,
    pattern_start_offset: usize,
) -> usize {
    let mut added = 0;
    let mut offset = 0usize;

    loop {
        if offset >= old.calls.len() {
            break;
        }

        let first_unmapped = (0..old.calls.len() - offset).find(|&i| {
            let hash = old.call_hash(old.calls[offset + i]);
            !map.old_hash_known(hash)
        });

        let Some(i) = first_unmapped else { break };
        let backoff = i.saturating_sub(pattern_start_offset);
        offset += backoff;

        if let Some((new_start, new_end)) = generate_pattern(old, new, offset, map) {
            if new_end - new_start >= min_pattern_size {
                for j in new_start..new_end {
                    let old_call = old.calls[offset + j - new_start];
                    let new_call = new.calls[j];
                    let o = old.call_hash(old_call);
                    let n = new.call_hash(new_call);
                    match map.try_record(n, o) {
                        Ok(true) => added += 1,
                        Ok(false) => {}
                        Err(existing) => {
                            tracing::warn!(
                                new_hash = format_args!("{n:#018X}"),
                                existing_old = format_args!("{existing:#018X}"),
                                proposed_old = format_args!("{o:#018X}"),
                                "stage-2 pattern conflict, keeping existing mapping"
                            );
                        }
                    }
                }
            }
        }

        offset += 1;
    }

    added
}
