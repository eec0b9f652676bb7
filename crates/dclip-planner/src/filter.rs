//! Per-candidate quality filter.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::debug;

use dclip_models::ClipCandidate;

use crate::aggregator::CandidatePool;
use crate::error::{PlannerError, PlannerResult};

/// Why the filter excluded a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    NonPositiveDuration,
    LocaleNotAccepted,
    BlacklistedTitle,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::NonPositiveDuration => "non_positive_duration",
            RejectReason::LocaleNotAccepted => "locale_not_accepted",
            RejectReason::BlacklistedTitle => "blacklisted_title",
        }
    }
}

/// Counters from filtering a pool. A candidate is counted under the first
/// failing check, in the order duration, locale, title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub accepted: usize,
    pub non_positive_duration: usize,
    pub locale_not_accepted: usize,
    pub blacklisted_title: usize,
}

impl FilterStats {
    pub fn rejected(&self) -> usize {
        self.non_positive_duration + self.locale_not_accepted + self.blacklisted_title
    }

    fn record(&mut self, reason: RejectReason) {
        match reason {
            RejectReason::NonPositiveDuration => self.non_positive_duration += 1,
            RejectReason::LocaleNotAccepted => self.locale_not_accepted += 1,
            RejectReason::BlacklistedTitle => self.blacklisted_title += 1,
        }
    }
}

/// Pure predicate over a single candidate.
///
/// No cross-candidate state, no I/O: the same candidate and configuration
/// always give the same answer.
#[derive(Debug, Clone)]
pub struct QualityFilter {
    accepted_locales: HashSet<String>,
    blacklist: Vec<Regex>,
}

impl QualityFilter {
    /// Build a filter, compiling the blacklist patterns.
    pub fn new<L, P>(accepted_locales: L, blacklist_patterns: P) -> PlannerResult<Self>
    where
        L: IntoIterator,
        L::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let accepted_locales = accepted_locales
            .into_iter()
            .map(|l| normalize_locale(l.as_ref()))
            .collect();

        let blacklist = blacklist_patterns
            .into_iter()
            .map(|p| {
                let pattern = p.as_ref();
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| PlannerError::InvalidPattern {
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .collect::<PlannerResult<Vec<_>>>()?;

        Ok(Self {
            accepted_locales,
            blacklist,
        })
    }

    /// Run every check, returning the first failing reason.
    pub fn evaluate(&self, candidate: &ClipCandidate) -> Result<(), RejectReason> {
        let duration = candidate.duration_seconds();
        // NaN fails this comparison too
        if !(duration.is_finite() && duration > 0.0) {
            return Err(RejectReason::NonPositiveDuration);
        }

        if !self
            .accepted_locales
            .contains(&normalize_locale(candidate.locale()))
        {
            return Err(RejectReason::LocaleNotAccepted);
        }

        if self.blacklist.iter().any(|re| re.is_match(candidate.title())) {
            return Err(RejectReason::BlacklistedTitle);
        }

        Ok(())
    }

    pub fn accepts(&self, candidate: &ClipCandidate) -> bool {
        self.evaluate(candidate).is_ok()
    }

    /// Drop rejected candidates from the pool.
    pub fn apply(&self, pool: &mut CandidatePool) -> FilterStats {
        let mut stats = FilterStats::default();
        pool.retain(|candidate| match self.evaluate(candidate) {
            Ok(()) => {
                stats.accepted += 1;
                true
            }
            Err(reason) => {
                debug!(
                    clip_id = %candidate.id(),
                    reason = reason.as_str(),
                    "Rejecting candidate"
                );
                stats.record(reason);
                false
            }
        });
        stats
    }
}

fn normalize_locale(locale: &str) -> String {
    locale.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> QualityFilter {
        QualityFilter::new(["fr", "EN"], [r"^test\b", r"\[placeholder\]"]).unwrap()
    }

    fn clip(id: &str, locale: &str, title: &str, duration: f64) -> ClipCandidate {
        ClipCandidate::new(id, "pub", duration)
            .with_locale(locale)
            .with_title(title)
    }

    #[test]
    fn test_accepts_valid_candidate() {
        assert!(filter().accepts(&clip("a", "fr", "Incroyable", 20.0)));
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let f = filter();
        assert_eq!(
            f.evaluate(&clip("a", "fr", "ok", 0.0)),
            Err(RejectReason::NonPositiveDuration)
        );
        assert_eq!(
            f.evaluate(&clip("a", "fr", "ok", -3.0)),
            Err(RejectReason::NonPositiveDuration)
        );
        assert_eq!(
            f.evaluate(&clip("a", "fr", "ok", f64::NAN)),
            Err(RejectReason::NonPositiveDuration)
        );
    }

    #[test]
    fn test_locale_case_insensitive() {
        let f = filter();
        assert!(f.accepts(&clip("a", "FR", "ok", 1.0)));
        assert!(f.accepts(&clip("a", " en ", "ok", 1.0)));
        assert_eq!(
            f.evaluate(&clip("a", "de", "ok", 1.0)),
            Err(RejectReason::LocaleNotAccepted)
        );
        assert_eq!(
            f.evaluate(&clip("a", "", "ok", 1.0)),
            Err(RejectReason::LocaleNotAccepted)
        );
    }

    #[test]
    fn test_blacklisted_title() {
        let f = filter();
        assert_eq!(
            f.evaluate(&clip("a", "fr", "TEST stream please ignore", 1.0)),
            Err(RejectReason::BlacklistedTitle)
        );
        assert_eq!(
            f.evaluate(&clip("a", "fr", "clip [placeholder]", 1.0)),
            Err(RejectReason::BlacklistedTitle)
        );
        assert!(f.accepts(&clip("a", "fr", "contest winner", 1.0)));
    }

    #[test]
    fn test_first_failing_reason_wins() {
        let f = filter();
        assert_eq!(
            f.evaluate(&clip("a", "de", "test", 0.0)),
            Err(RejectReason::NonPositiveDuration)
        );
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let err = QualityFilter::new(["fr"], ["(unclosed"]).unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn test_apply_counts_reasons() {
        let mut pool: CandidatePool = vec![
            clip("a", "fr", "good", 10.0),
            clip("b", "fr", "good", 0.0),
            clip("c", "de", "good", 10.0),
            clip("d", "fr", "test run", 10.0),
            clip("e", "en", "good", 10.0),
        ]
        .into_iter()
        .collect();

        let stats = filter().apply(&mut pool);

        assert_eq!(stats.accepted, 2);
        assert_eq!(stats.non_positive_duration, 1);
        assert_eq!(stats.locale_not_accepted, 1);
        assert_eq!(stats.blacklisted_title, 1);
        assert_eq!(stats.rejected(), 3);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_deterministic() {
        let f = filter();
        let c = clip("a", "fr", "Hello", 3.0);
        let first = f.evaluate(&c);
        for _ in 0..10 {
            assert_eq!(f.evaluate(&c), first);
        }
    }
}
