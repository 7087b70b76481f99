//! Totals accumulated over a run, reported once at the end the way the
//! teacher reports its own pair/omega aggregate.

#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub containers_seen: usize,
    pub containers_skipped: usize,
    pub stage1_translations: usize,
    pub stage2_translations: usize,
    pub stage4_translations: usize,
    pub output_lines: usize,
    pub reference_size: usize,
    pub missing_count: usize,
    pub wrong_count: Option<usize>,
}

impl RunSummary {
    pub fn total_translations(&self) -> usize {
        self.stage1_translations + self.stage2_translations + self.stage4_translations
    }

    pub fn log(&self) {
        tracing::info!(
            containers_seen = self.containers_seen,
            containers_skipped = self.containers_skipped,
            stage1 = self.stage1_translations,
            stage2 = self.stage2_translations,
            stage4 = self.stage4_translations,
            total = self.total_translations(),
            output_lines = self.output_lines,
            reference_size = self.reference_size,
            missing_count = self.missing_count,
            wrong_count = ?self.wrong_count,
            "run summary"
        );
    }
}

/// Compare the produced `(universal, new)` lines against a verification
/// crossmap loaded the same way as the reference map (`new_hash -> universal`
/// keyed the other way around — see the driver for which side is which);
/// returns how many produced universal hashes disagree with the expected one.
pub fn count_wrong(
    produced: &[(u64, u64)],
    expected: &crate::reference::ReferenceMap,
) -> usize {
    produced
        .iter()
        .filter(|&&(universal, new_hash)| expected.universal_for(new_hash) != Some(universal))
        .count()
}
