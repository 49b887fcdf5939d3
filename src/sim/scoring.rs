//! Tiered scoring with a combo multiplier
//!
//! A timing delta (0 = perfect) is matched against an ordered tier table.
//! Non-zero tiers extend the combo, zero-point tiers break it, and awarded
//! points grow superlinearly with combo length.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// A named accuracy bracket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTier {
    pub label: String,
    /// Deltas strictly below this land in the tier
    pub threshold: f64,
    pub points: u32,
}

impl ScoreTier {
    pub fn new(label: impl Into<String>, threshold: f64, points: u32) -> Self {
        Self {
            label: label.into(),
            threshold,
            points,
        }
    }
}

/// Validated tier list: strictly increasing thresholds ending at exactly 1
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TierTable {
    tiers: Vec<ScoreTier>,
}

impl TierTable {
    pub fn new(tiers: Vec<ScoreTier>) -> ConfigResult<Self> {
        let Some(last) = tiers.last() else {
            return Err(ConfigError::EmptyTierTable);
        };

        let mut previous: Option<f64> = None;
        for tier in &tiers {
            if !(tier.threshold > 0.0 && tier.threshold <= 1.0) {
                return Err(ConfigError::ThresholdOutOfRange {
                    label: tier.label.clone(),
                    threshold: tier.threshold,
                });
            }
            if let Some(prev) = previous {
                if tier.threshold <= prev {
                    return Err(ConfigError::NonIncreasingThreshold {
                        label: tier.label.clone(),
                        threshold: tier.threshold,
                        previous: prev,
                    });
                }
            }
            previous = Some(tier.threshold);
        }

        if last.threshold != 1.0 {
            return Err(ConfigError::FinalThresholdNotOne {
                label: last.label.clone(),
                threshold: last.threshold,
            });
        }

        Ok(Self { tiers })
    }

    /// Index of the first tier whose threshold is strictly above `delta`
    pub fn select(&self, delta: f64) -> usize {
        self.tiers
            .iter()
            .position(|t| delta < t.threshold)
            .unwrap_or(self.tiers.len() - 1)
    }

    pub fn tiers(&self) -> &[ScoreTier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

/// When a combo length earns a delayed "<n>x Combo!!" announcement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboAnnounceRule {
    /// Lengths that always announce
    pub exact: Vec<u32>,
    /// Every length strictly above this announces
    pub above: Option<u32>,
    /// Delay between the scoring press and the announcement
    pub delay_ms: f64,
}

impl Default for ComboAnnounceRule {
    fn default() -> Self {
        Self {
            exact: vec![3],
            above: Some(4),
            delay_ms: crate::consts::COMBO_ANNOUNCE_DELAY_MS,
        }
    }
}

impl ComboAnnounceRule {
    pub fn triggers(&self, combo_len: u32) -> bool {
        combo_len > 0
            && (self.exact.contains(&combo_len) || self.above.is_some_and(|n| combo_len > n))
    }
}

/// Text shown for a combo announcement
pub fn combo_text(combo_len: u32) -> String {
    format!("{}x Combo!!", combo_len)
}

/// Result of one scoring attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreEvent {
    pub tier: ScoreTier,
    /// Position of `tier` in the table (0 = best)
    pub tier_index: usize,
    /// Delta after clamping
    pub delta: f64,
    pub points_awarded: u64,
    pub combo_length_after: u32,
    /// Caller should schedule a combo announcement
    pub announce_combo: bool,
}

/// Points earned since the last zero-point tier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComboState {
    points: Vec<u32>,
}

impl ComboState {
    pub fn len(&self) -> u32 {
        self.points.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn sum(&self) -> u64 {
        self.points.iter().map(|&p| p as u64).sum()
    }

    fn push(&mut self, points: u32) {
        self.points.push(points);
    }

    fn clear(&mut self) {
        self.points.clear();
    }
}

/// Owns combo and running total for one session
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    table: TierTable,
    combo_exponent: f64,
    announce: ComboAnnounceRule,
    combo: ComboState,
    total_score: u64,
    max_combo: u32,
}

impl ScoringEngine {
    pub fn new(table: TierTable, combo_exponent: f64, announce: ComboAnnounceRule) -> Self {
        Self {
            table,
            combo_exponent,
            announce,
            combo: ComboState::default(),
            total_score: 0,
            max_combo: 0,
        }
    }

    /// Score one attempt. Negative deltas are treated as perfect.
    ///
    /// Awards and the running total saturate at `u64::MAX`. Integer exponents
    /// are computed exactly; fractional ones go through `f64` and lose
    /// precision once an award passes 2^53.
    pub fn score(&mut self, delta: f64) -> ScoreEvent {
        let delta = if delta.is_nan() { 0.0 } else { delta.max(0.0) };
        let tier_index = self.table.select(delta);
        let tier = self.table.tiers()[tier_index].clone();

        let points_awarded = if tier.points == 0 {
            self.combo.clear();
            0
        } else {
            self.combo.push(tier.points);
            combo_award(tier.points, self.combo.len(), self.combo_exponent)
        };

        self.total_score = self.total_score.saturating_add(points_awarded);
        let combo_length_after = self.combo.len();
        self.max_combo = self.max_combo.max(combo_length_after);

        ScoreEvent {
            tier,
            tier_index,
            delta,
            points_awarded,
            combo_length_after,
            announce_combo: self.announce.triggers(combo_length_after),
        }
    }

    pub fn combo_sum(&self) -> u64 {
        self.combo.sum()
    }

    pub fn combo_len(&self) -> u32 {
        self.combo.len()
    }

    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    /// Longest combo reached so far
    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn table(&self) -> &TierTable {
        &self.table
    }

    pub fn announce_rule(&self) -> &ComboAnnounceRule {
        &self.announce
    }
}

/// `floor(points * combo_len ^ exponent)`, saturating
fn combo_award(points: u32, combo_len: u32, exponent: f64) -> u64 {
    if exponent.fract() == 0.0 && exponent <= u32::MAX as f64 {
        (combo_len as u64)
            .checked_pow(exponent as u32)
            .and_then(|m| m.checked_mul(points as u64))
            .unwrap_or(u64::MAX)
    } else {
        // `as` saturates at u64::MAX
        (points as f64 * (combo_len as f64).powf(exponent)).floor() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scenario_table() -> TierTable {
        TierTable::new(vec![
            ScoreTier::new("PERFECT", 0.001, 1000),
            ScoreTier::new("GOOD", 0.016, 300),
            ScoreTier::new("POOR", 1.0, 0),
        ])
        .unwrap()
    }

    fn engine() -> ScoringEngine {
        ScoringEngine::new(scenario_table(), 1.4, ComboAnnounceRule::default())
    }

    #[test]
    fn test_table_rejects_empty() {
        assert!(matches!(
            TierTable::new(Vec::new()),
            Err(ConfigError::EmptyTierTable)
        ));
    }

    #[test]
    fn test_table_rejects_non_increasing() {
        let result = TierTable::new(vec![
            ScoreTier::new("a", 0.5, 10),
            ScoreTier::new("b", 0.5, 5),
            ScoreTier::new("c", 1.0, 0),
        ]);
        assert!(matches!(
            result,
            Err(ConfigError::NonIncreasingThreshold { .. })
        ));
    }

    #[test]
    fn test_table_rejects_final_not_one() {
        let result = TierTable::new(vec![
            ScoreTier::new("a", 0.1, 10),
            ScoreTier::new("b", 0.9, 0),
        ]);
        assert!(matches!(
            result,
            Err(ConfigError::FinalThresholdNotOne { .. })
        ));
    }

    #[test]
    fn test_table_rejects_out_of_range() {
        let result = TierTable::new(vec![
            ScoreTier::new("a", 0.0, 10),
            ScoreTier::new("b", 1.0, 0),
        ]);
        assert!(matches!(
            result,
            Err(ConfigError::ThresholdOutOfRange { .. })
        ));
    }

    #[test]
    fn test_select_is_strict() {
        let table = scenario_table();
        assert_eq!(table.select(0.0), 0);
        assert_eq!(table.select(0.001), 1);
        assert_eq!(table.select(0.016), 2);
        assert_eq!(table.select(5.0), 2);
    }

    #[test]
    fn test_perfect_then_poor() {
        let mut engine = engine();
        let first = engine.score(0.0005);
        assert_eq!(first.tier.label, "PERFECT");
        assert_eq!(first.points_awarded, 1000);
        assert_eq!(first.combo_length_after, 1);
        assert_eq!(engine.total_score(), 1000);

        let second = engine.score(0.02);
        assert_eq!(second.tier.label, "POOR");
        assert_eq!(second.points_awarded, 0);
        assert_eq!(engine.combo_len(), 0);
        assert_eq!(engine.combo_sum(), 0);
        assert_eq!(engine.total_score(), 1000);
    }

    #[test]
    fn test_two_perfects_apply_multiplier() {
        let mut engine = engine();
        engine.score(0.0);
        let second = engine.score(0.0);
        assert_eq!(second.combo_length_after, 2);
        assert_eq!(second.points_awarded, 2639);
        assert_eq!(engine.total_score(), 3639);
        assert_eq!(engine.combo_sum(), 2000);
    }

    #[test]
    fn test_catch_all_clears_combo() {
        let mut engine = engine();
        engine.score(0.005);
        engine.score(0.0);
        let miss = engine.score(1.0);
        assert_eq!(miss.tier_index, 2);
        assert_eq!(miss.points_awarded, 0);
        assert_eq!(engine.combo_len(), 0);
        assert_eq!(engine.max_combo(), 2);
    }

    #[test]
    fn test_negative_delta_clamped() {
        let mut engine = engine();
        let event = engine.score(-0.3);
        assert_eq!(event.delta, 0.0);
        assert_eq!(event.tier_index, 0);
    }

    #[test]
    fn test_announce_rule() {
        let rule = ComboAnnounceRule::default();
        let hits: Vec<u32> = (0..8).filter(|&n| rule.triggers(n)).collect();
        assert_eq!(hits, vec![3, 5, 6, 7]);
        assert_eq!(combo_text(5), "5x Combo!!");
    }

    #[test]
    fn test_engine_flags_announcement() {
        let mut engine = engine();
        let flags: Vec<bool> = (0..6).map(|_| engine.score(0.0).announce_combo).collect();
        assert_eq!(flags, vec![false, false, true, false, true, true]);
        assert!(!engine.score(1.0).announce_combo);
    }

    #[test]
    fn test_integer_exponent_is_exact() {
        assert_eq!(combo_award(1000, 5, 20.0), 95_367_431_640_625_000);
        assert_eq!(combo_award(300, 4, 1.0), 1200);
        assert_eq!(combo_award(1000, 2, 1.4), 2639);
    }

    #[test]
    fn test_extreme_exponent_saturates() {
        let mut engine = ScoringEngine::new(scenario_table(), 20.0, ComboAnnounceRule::default());
        let mut last = 0;
        for _ in 0..10 {
            let event = engine.score(0.0);
            assert!(engine.total_score() >= last);
            last = engine.total_score();
            assert!(event.points_awarded > 0);
        }
        assert_eq!(engine.total_score(), u64::MAX);
        assert_eq!(engine.combo_len(), 10);
    }

    fn arbitrary_table() -> impl Strategy<Value = TierTable> {
        proptest::collection::vec((0.001f64..0.999, 0u32..2000), 0..8).prop_map(|mut cuts| {
            cuts.sort_by(|a, b| a.0.total_cmp(&b.0));
            cuts.dedup_by(|a, b| a.0 == b.0);
            let mut tiers: Vec<ScoreTier> = cuts
                .into_iter()
                .enumerate()
                .map(|(i, (threshold, points))| ScoreTier::new(format!("t{i}"), threshold, points))
                .collect();
            tiers.push(ScoreTier::new("miss", 1.0, 0));
            TierTable::new(tiers).unwrap()
        })
    }

    proptest! {
        #[test]
        fn select_picks_first_threshold_above(table in arbitrary_table(), d in 0.0f64..1.0, over in 1.0f64..10.0) {
            prop_assert_eq!(table.select(0.0), 0);
            prop_assert_eq!(table.select(over), table.len() - 1);
            let expected = table.tiers().iter().position(|t| d < t.threshold).unwrap();
            prop_assert_eq!(table.select(d), expected);
            prop_assert!(table.tiers()[..expected].iter().all(|t| t.threshold <= d));
        }

        #[test]
        fn combo_tracks_streak(deltas in proptest::collection::vec(0.0f64..0.016, 1..30)) {
            let mut engine = engine();
            let mut expected_sum = 0u64;
            for &d in &deltas {
                let event = engine.score(d);
                expected_sum += event.tier.points as u64;
            }
            prop_assert_eq!(engine.combo_len() as usize, deltas.len());
            prop_assert_eq!(engine.combo_sum(), expected_sum);
        }

        #[test]
        fn miss_resets_streak(before in 0usize..10, after in 0usize..10) {
            let mut engine = engine();
            for _ in 0..before {
                engine.score(0.0);
            }
            engine.score(1.0);
            prop_assert_eq!(engine.combo_len(), 0);
            for _ in 0..after {
                engine.score(0.005);
            }
            prop_assert_eq!(engine.combo_len() as usize, after);
            prop_assert_eq!(engine.combo_sum(), 300 * after as u64);
        }

        #[test]
        fn total_never_decreases(deltas in proptest::collection::vec(-1.0f64..2.0, 0..40)) {
            let mut engine = engine();
            let mut last = 0;
            for d in deltas {
                engine.score(d);
                prop_assert!(engine.total_score() >= last);
                last = engine.total_score();
            }
        }
    }
}
