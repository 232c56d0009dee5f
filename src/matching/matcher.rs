use ahash::AHashMap;
use serde::Serialize;
use smallvec::SmallVec;
use tracing::debug;

use crate::data::{BoundaryFeature, WardRecord};

use super::{normalize, similarity};

/// How a feature ended up paired with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMethod {
    Exact,
    Contains,
    Id,
    Fuzzy,
    /// Shared-token fallback, only produced when enabled in `MatcherConfig`.
    Token,
    None,
}

/// The match decision for a single boundary feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOutcome {
    pub method: MatchMethod,
    /// Confidence in [0, 1]; 0 exactly when `method` is `None`.
    pub score: f64,
    /// Index into the record collection, if matched.
    pub record: Option<usize>,
}

impl MatchOutcome {
    fn unmatched() -> Self {
        Self { method: MatchMethod::None, score: 0.0, record: None }
    }
}

/// Tuning knobs for the shared matcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherConfig {
    /// Minimum similarity for a fuzzy match to be accepted.
    pub threshold: f64,
    /// Enable the shared-token fallback tier after fuzzy fails.
    pub token_fallback: bool,
}

impl MatcherConfig {
    /// Stricter variant used by interactive hover lookups.
    pub const STRICT_THRESHOLD: f64 = 0.68;

    /// Confidence assigned to contains-tier matches.
    pub const CONTAINS_SCORE: f64 = 0.9;
    /// Confidence assigned to identifier-tier matches.
    pub const ID_SCORE: f64 = 0.95;
    /// Confidence assigned to token-fallback matches.
    pub const TOKEN_SCORE: f64 = 0.6;

    /// Tokens shorter than this never count towards token overlap.
    pub const MIN_TOKEN_LEN: usize = 4;

    pub fn strict() -> Self {
        Self { threshold: Self::STRICT_THRESHOLD, ..Self::default() }
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self { threshold: 0.5, token_fallback: false }
    }
}

/// Bidirectional feature/record mapping, computed once per dataset pair.
///
/// Holds only indices into the two loaded collections, never the data itself.
/// Every feature appears in `feature_to_record`; one record may legitimately
/// back several boundary features.
#[derive(Debug, Default)]
pub struct MatchIndex {
    pub feature_to_record: Vec<MatchOutcome>,
    pub record_to_features: AHashMap<usize, SmallVec<[usize; 2]>>,
}

impl MatchIndex {
    pub fn record_for(&self, feature: usize) -> Option<usize> {
        self.feature_to_record.get(feature).and_then(|o| o.record)
    }

    pub fn outcome(&self, feature: usize) -> Option<&MatchOutcome> {
        self.feature_to_record.get(feature)
    }

    /// Number of features with any match.
    pub fn matched_count(&self) -> usize {
        self.feature_to_record.iter().filter(|o| o.record.is_some()).count()
    }

    /// Number of distinct records backing at least one feature.
    pub fn unique_records(&self) -> usize {
        self.record_to_features.len()
    }
}

/// Tiered name matcher: exact, contains, identifier, fuzzy, then (optionally)
/// token overlap. The first tier that yields a candidate is final for that
/// feature; fuzzy is last among the scored tiers because it is the only one
/// that can produce false positives.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatcherConfig,
}

/// Normalized record fields, computed once per run.
struct RecordKeys {
    names: Vec<String>,
    ids: Vec<String>,
}

impl RecordKeys {
    fn new(records: &[WardRecord]) -> Self {
        Self {
            names: records.iter().map(|r| normalize(&r.name)).collect(),
            ids: records.iter().map(|r| r.id.to_lowercase()).collect(),
        }
    }
}

impl Matcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Match every feature in one synchronous pass.
    pub fn run(&self, features: &[BoundaryFeature], records: &[WardRecord]) -> MatchIndex {
        let mut run = self.start(features, records);
        while !run.step() {}
        run.into_index()
    }

    /// Begin a chunked match pass; drive it with [`MatchRun::step`].
    pub fn start<'a>(
        &self,
        features: &'a [BoundaryFeature],
        records: &'a [WardRecord],
    ) -> MatchRun<'a> {
        MatchRun {
            matcher: self.clone(),
            features,
            records,
            keys: RecordKeys::new(records),
            outcomes: Vec::with_capacity(features.len()),
            cursor: 0,
        }
    }

    fn match_feature(
        &self,
        feature: &BoundaryFeature,
        records: &[WardRecord],
        keys: &RecordKeys,
    ) -> MatchOutcome {
        if records.is_empty() {
            return MatchOutcome::unmatched();
        }
        let feature_name = normalize(&feature.ward_name);
        let ward_no = feature.ward_no.to_lowercase();

        // Tier 1: exact normalized-name equality.
        if !feature_name.is_empty() {
            if let Some(idx) = keys.names.iter().position(|n| *n == feature_name) {
                return MatchOutcome { method: MatchMethod::Exact, score: 1.0, record: Some(idx) };
            }
        }

        // Tier 2: substring containment either way. Empty names never
        // contain-match; every string trivially contains "".
        if !feature_name.is_empty() {
            let hit = keys.names.iter().position(|n| {
                !n.is_empty() && (n.contains(&feature_name) || feature_name.contains(n.as_str()))
            });
            if let Some(idx) = hit {
                return MatchOutcome {
                    method: MatchMethod::Contains,
                    score: MatcherConfig::CONTAINS_SCORE,
                    record: Some(idx),
                };
            }
        }

        // Tier 3: ward number appears in the record id or name.
        if !ward_no.is_empty() {
            let hit = (0..records.len())
                .find(|&i| keys.ids[i].contains(&ward_no) || keys.names[i].contains(&ward_no));
            if let Some(idx) = hit {
                return MatchOutcome {
                    method: MatchMethod::Id,
                    score: MatcherConfig::ID_SCORE,
                    record: Some(idx),
                };
            }
        }

        // Tier 4: best fuzzy score, first-encountered record wins ties.
        let mut best: Option<(usize, f64)> = None;
        for (idx, record) in records.iter().enumerate() {
            let score = similarity(&feature.ward_name, &record.name);
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((idx, score));
            }
        }
        if let Some((idx, score)) = best {
            if score >= self.config.threshold {
                return MatchOutcome { method: MatchMethod::Fuzzy, score, record: Some(idx) };
            }
        }

        // Tier 5 (optional): names share a meaningful whitespace token.
        if self.config.token_fallback && !feature_name.is_empty() {
            let feature_tokens: Vec<&str> = feature_name.split(' ').collect();
            let hit = keys.names.iter().position(|name| {
                name.split(' ').any(|token| {
                    token.len() >= MatcherConfig::MIN_TOKEN_LEN && feature_tokens.contains(&token)
                })
            });
            if let Some(idx) = hit {
                return MatchOutcome {
                    method: MatchMethod::Token,
                    score: MatcherConfig::TOKEN_SCORE,
                    record: Some(idx),
                };
            }
        }

        MatchOutcome::unmatched()
    }
}

/// In-progress chunked match pass. Each [`step`](Self::step) processes one
/// bounded batch of features so a host event loop stays responsive.
pub struct MatchRun<'a> {
    matcher: Matcher,
    features: &'a [BoundaryFeature],
    records: &'a [WardRecord],
    keys: RecordKeys,
    outcomes: Vec<MatchOutcome>,
    cursor: usize,
}

impl MatchRun<'_> {
    /// Features matched per step.
    pub const CHUNK: usize = 50;

    /// Process the next chunk; returns true when the pass is complete.
    pub fn step(&mut self) -> bool {
        let end = (self.cursor + Self::CHUNK).min(self.features.len());
        for feature in &self.features[self.cursor..end] {
            self.outcomes.push(self.matcher.match_feature(feature, self.records, &self.keys));
        }
        self.cursor = end;
        self.cursor >= self.features.len()
    }

    pub fn is_done(&self) -> bool {
        self.cursor >= self.features.len()
    }

    /// Finalize into the bidirectional index. Remaining features, if any, are
    /// matched synchronously first.
    pub fn into_index(mut self) -> MatchIndex {
        while !self.step() {}

        let mut record_to_features: AHashMap<usize, SmallVec<[usize; 2]>> = AHashMap::new();
        for (feature_idx, outcome) in self.outcomes.iter().enumerate() {
            if let Some(record_idx) = outcome.record {
                record_to_features.entry(record_idx).or_default().push(feature_idx);
            }
        }
        let index = MatchIndex { feature_to_record: self.outcomes, record_to_features };
        debug!(
            features = index.feature_to_record.len(),
            matched = index.matched_count(),
            unique_records = index.unique_records(),
            "match pass complete"
        );
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MetricBundle;
    use geo::MultiPolygon;

    fn feature(name: &str, no: &str) -> BoundaryFeature {
        BoundaryFeature { ward_name: name.into(), ward_no: no.into(), shape: MultiPolygon(vec![]) }
    }

    fn record(id: &str, name: &str) -> WardRecord {
        WardRecord {
            id: id.into(),
            name: name.into(),
            before: MetricBundle::default(),
            after: MetricBundle::default(),
            explanation: String::new(),
        }
    }

    fn names_fixture() -> (Vec<BoundaryFeature>, Vec<WardRecord>) {
        let features = vec![
            feature("Agaram", "57"),
            feature("H.A.L 2nd Stage", "88"),
            feature("K.R. Puram", "52"),
        ];
        let records = vec![
            record("ward_1", "Agaram"),
            record("ward_2", "HAL 2nd Stage"),
            record("ward_3", "KR Puram"),
        ];
        (features, records)
    }

    #[test]
    fn resolves_punctuation_variants() {
        let (features, records) = names_fixture();
        let index = Matcher::default().run(&features, &records);

        let agaram = &index.feature_to_record[0];
        assert_eq!(agaram.method, MatchMethod::Exact);
        assert_eq!(agaram.record, Some(0));
        assert_eq!(agaram.score, 1.0);

        // Normalization collapses the dotted names onto the record names.
        let hal = &index.feature_to_record[1];
        assert_eq!(hal.record, Some(1));
        assert!(matches!(hal.method, MatchMethod::Exact | MatchMethod::Contains | MatchMethod::Fuzzy));

        let krpuram = &index.feature_to_record[2];
        assert_eq!(krpuram.record, Some(2));
    }

    #[test]
    fn deterministic_across_runs() {
        let (features, records) = names_fixture();
        let matcher = Matcher::default();
        let a = matcher.run(&features, &records);
        let b = matcher.run(&features, &records);
        assert_eq!(a.feature_to_record, b.feature_to_record);
    }

    #[test]
    fn every_feature_appears_with_consistent_outcome() {
        let (mut features, records) = names_fixture();
        features.push(feature("Unmapped Zone 99", "99"));
        let index = Matcher::default().run(&features, &records);

        assert_eq!(index.feature_to_record.len(), features.len());
        for outcome in &index.feature_to_record {
            match outcome.method {
                MatchMethod::None => {
                    assert_eq!(outcome.score, 0.0);
                    assert!(outcome.record.is_none());
                }
                _ => {
                    assert!(outcome.score > 0.0);
                    assert!(outcome.record.is_some());
                }
            }
        }
        let zone = index.feature_to_record.last().unwrap();
        assert_eq!(zone.method, MatchMethod::None);
    }

    #[test]
    fn exact_tier_wins_even_when_fuzzy_would_score_higher_elsewhere() {
        // "North Ward" matches record 0 exactly; record 1 is a longer name
        // that would also contain-match. Exact must be reported.
        let features = vec![feature("North Ward", "1")];
        let records = vec![record("a", "North Ward"), record("b", "North Ward Extension")];
        let index = Matcher::default().run(&features, &records);
        let outcome = &index.feature_to_record[0];
        assert_eq!(outcome.method, MatchMethod::Exact);
        assert_eq!(outcome.record, Some(0));
    }

    #[test]
    fn id_tier_matches_ward_number() {
        let features = vec![feature("Totally Different Label", "73")];
        let records = vec![record("ward_12", "Alpha"), record("ward_73", "Beta")];
        let index = Matcher::default().run(&features, &records);
        let outcome = &index.feature_to_record[0];
        assert_eq!(outcome.method, MatchMethod::Id);
        assert_eq!(outcome.record, Some(1));
    }

    #[test]
    fn fuzzy_ties_break_to_first_record() {
        // Both records are one edit away from the feature name.
        let features = vec![feature("agarax", "")];
        let records = vec![record("a", "agaram"), record("b", "agaraz")];
        let index = Matcher::default().run(&features, &records);
        let outcome = &index.feature_to_record[0];
        assert_eq!(outcome.method, MatchMethod::Fuzzy);
        assert_eq!(outcome.record, Some(0));
    }

    #[test]
    fn empty_collections_yield_empty_indices() {
        let (features, records) = names_fixture();
        let matcher = Matcher::default();

        let index = matcher.run(&[], &records);
        assert!(index.feature_to_record.is_empty());
        assert!(index.record_to_features.is_empty());

        let index = matcher.run(&features, &[]);
        assert_eq!(index.feature_to_record.len(), features.len());
        assert_eq!(index.matched_count(), 0);
        assert!(index.record_to_features.is_empty());
    }

    #[test]
    fn one_record_may_back_multiple_features() {
        let features = vec![feature("Agaram", "1"), feature("Agaram East", "2")];
        let records = vec![record("w", "Agaram")];
        let index = Matcher::default().run(&features, &records);
        assert_eq!(index.record_to_features[&0].as_slice(), &[0, 1]);
        assert_eq!(index.unique_records(), 1);
    }

    #[test]
    fn token_fallback_only_when_enabled() {
        // Neither name contains the other and fuzzy scores far below 0.5,
        // but the two share the token "puram".
        let features = vec![feature("Devara Jeevanahalli Puram Sector", "")];
        let records = vec![record("w", "Puram West")];

        let default_index = Matcher::default().run(&features, &records);
        assert_eq!(default_index.feature_to_record[0].method, MatchMethod::None);

        let matcher =
            Matcher::new(MatcherConfig { token_fallback: true, ..MatcherConfig::default() });
        let index = matcher.run(&features, &records);
        let outcome = &index.feature_to_record[0];
        assert_eq!(outcome.method, MatchMethod::Token);
        assert_eq!(outcome.score, MatcherConfig::TOKEN_SCORE);
        assert_eq!(outcome.record, Some(0));
    }

    #[test]
    fn strict_threshold_rejects_borderline_fuzzy() {
        // similarity("agaxyz", "agaram") = 1 - 3/6 = 0.5.
        let features = vec![feature("agaxyz", "")];
        let records = vec![record("w", "agaram")];

        let default_index = Matcher::default().run(&features, &records);
        assert_eq!(default_index.feature_to_record[0].method, MatchMethod::Fuzzy);

        let strict = Matcher::new(MatcherConfig::strict()).run(&features, &records);
        assert_eq!(strict.feature_to_record[0].method, MatchMethod::None);
    }

    #[test]
    fn chunked_run_matches_synchronous_run() {
        let mut features = Vec::new();
        for i in 0..137 {
            features.push(feature(&format!("Ward {i}"), &i.to_string()));
        }
        let records: Vec<WardRecord> =
            (0..137).map(|i| record(&format!("w{i}"), &format!("Ward {i}"))).collect();

        let matcher = Matcher::default();
        let sync = matcher.run(&features, &records);

        let mut run = matcher.start(&features, &records);
        let mut steps = 0;
        while !run.step() {
            steps += 1;
        }
        assert!(steps >= 2, "expected multiple chunks for 137 features");
        let chunked = run.into_index();
        assert_eq!(sync.feature_to_record, chunked.feature_to_record);
    }
}
