//! Weighted scores for balanced scorecards
//!
//! All scores are percentages in `[0, 100]`.

use docsync_schema::{Kpi, Perspective, Scorecard};
use serde::Serialize;

/// Tolerance when checking that weights sum to 100
pub const WEIGHT_EPSILON: f64 = 0.01;

/// Achievement threshold for [`KpiStatus::OnTrack`]
pub const ON_TRACK_THRESHOLD: f64 = 90.0;

/// Achievement threshold for [`KpiStatus::AtRisk`]
pub const AT_RISK_THRESHOLD: f64 = 70.0;

/// Colour band for a KPI's achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum KpiStatus {
    /// At least 90 %
    OnTrack,
    /// At least 70 %
    AtRisk,
    /// Below 70 %
    OffTrack,
}

impl KpiStatus {
    /// Band for an achievement percentage
    #[must_use]
    pub fn from_achievement(achievement: f64) -> Self {
        if achievement >= ON_TRACK_THRESHOLD {
            Self::OnTrack
        } else if achievement >= AT_RISK_THRESHOLD {
            Self::AtRisk
        } else {
            Self::OffTrack
        }
    }
}

/// Achievement of one KPI as a percentage, capped at 100
///
/// Any positive progress against a zero target counts as met. Non-finite
/// inputs, and zero progress against a zero target, yield 0.
#[must_use]
pub fn kpi_achievement(kpi: &Kpi) -> f64 {
    if !(kpi.target.is_finite() && kpi.current.is_finite()) {
        return 0.0;
    }
    if kpi.target == 0.0 {
        return if kpi.current > 0.0 { 100.0 } else { 0.0 };
    }
    (kpi.current / kpi.target * 100.0).clamp(0.0, 100.0)
}

/// Weighted mean achievement of a set of KPIs
///
/// Returns 0 when the total weight is not positive, which covers an empty set.
#[must_use]
pub fn perspective_score<'a>(kpis: impl IntoIterator<Item = &'a Kpi>) -> f64 {
    let (weighted, total) = kpis
        .into_iter()
        .filter(|k| k.weight.is_finite())
        .fold((0.0, 0.0), |(weighted, total), kpi| {
            (weighted + kpi_achievement(kpi) * kpi.weight, total + kpi.weight)
        });
    if total > 0.0 {
        (weighted / total).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Mean of perspective scores, `None` when there are no perspectives
#[must_use]
pub fn overall_score(scorecard: &Scorecard) -> Option<f64> {
    if scorecard.perspectives.is_empty() {
        return None;
    }
    let sum: f64 = scorecard
        .perspectives
        .iter()
        .map(|p| perspective_score(&p.kpis))
        .sum();
    #[allow(clippy::cast_precision_loss)]
    Some(sum / scorecard.perspectives.len() as f64)
}

/// Derived view of one KPI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiMetrics {
    /// KPI id
    pub id: String,
    /// Achievement percentage
    pub achievement: f64,
    /// Colour band
    pub status: KpiStatus,
}

/// Derived view of one perspective
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerspectiveMetrics {
    /// Perspective id
    pub id: String,
    /// Weighted score
    pub score: f64,
    /// Sum of KPI weights
    pub total_weight: f64,
    /// Whether weights sum to 100 (advisory)
    pub weights_balanced: bool,
    /// Per-KPI views in display order
    pub kpis: Vec<KpiMetrics>,
}

impl PerspectiveMetrics {
    /// Compute view for one perspective
    #[must_use]
    pub fn of(perspective: &Perspective) -> Self {
        let total_weight = perspective.total_weight();
        Self {
            id: perspective.id.clone(),
            score: perspective_score(&perspective.kpis),
            total_weight,
            weights_balanced: (total_weight - 100.0).abs() <= WEIGHT_EPSILON,
            kpis: perspective
                .kpis
                .iter()
                .map(|kpi| {
                    let achievement = kpi_achievement(kpi);
                    KpiMetrics {
                        id: kpi.id.clone(),
                        achievement,
                        status: KpiStatus::from_achievement(achievement),
                    }
                })
                .collect(),
        }
    }
}

/// Snapshot of all scorecard metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScorecardMetrics {
    /// Overall score, 0 when there are no perspectives
    pub overall: f64,
    /// Overall colour band
    pub status: KpiStatus,
    /// Per-perspective views in display order
    pub perspectives: Vec<PerspectiveMetrics>,
}

impl ScorecardMetrics {
    /// Compute snapshot
    #[must_use]
    pub fn of(scorecard: &Scorecard) -> Self {
        let overall = overall_score(scorecard).unwrap_or(0.0);
        Self {
            overall,
            status: KpiStatus::from_achievement(overall),
            perspectives: scorecard
                .perspectives
                .iter()
                .map(PerspectiveMetrics::of)
                .collect(),
        }
    }

    /// Ids of perspectives whose weights do not sum to 100
    #[must_use]
    pub fn unbalanced(&self) -> Vec<&str> {
        self.perspectives
            .iter()
            .filter(|p| !p.weights_balanced)
            .map(|p| p.id.as_str())
            .collect()
    }
}

/// A KPI below its target
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceGap {
    /// Owning perspective id
    pub perspective_id: String,
    /// Owning perspective name
    pub perspective_name: String,
    /// KPI id
    pub kpi_id: String,
    /// KPI name
    pub kpi_name: String,
    /// Goal value
    pub target: f64,
    /// Measured value
    pub current: f64,
    /// Unit label
    pub unit: String,
    /// Achievement percentage
    pub achievement: f64,
}

impl PerformanceGap {
    /// Distance to target in the KPI's unit
    #[must_use]
    pub fn shortfall(&self) -> f64 {
        self.target - self.current
    }
}

/// KPIs with `current < target`, weakest first
///
/// These seed the goals of a development plan derived from a scorecard.
#[must_use]
pub fn performance_gaps(scorecard: &Scorecard) -> Vec<PerformanceGap> {
    let mut gaps: Vec<PerformanceGap> = scorecard
        .perspectives
        .iter()
        .flat_map(|p| {
            p.kpis
                .iter()
                .filter(|k| k.current < k.target)
                .map(move |k| PerformanceGap {
                    perspective_id: p.id.clone(),
                    perspective_name: p.name.clone(),
                    kpi_id: k.id.clone(),
                    kpi_name: k.name.clone(),
                    target: k.target,
                    current: k.current,
                    unit: k.unit.clone(),
                    achievement: kpi_achievement(k),
                })
        })
        .collect();
    gaps.sort_by(|a, b| a.achievement.total_cmp(&b.achievement));
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kpi(id: &str, current: f64, target: f64, weight: f64) -> Kpi {
        Kpi {
            id: id.to_string(),
            name: id.to_uppercase(),
            target,
            current,
            unit: "%".to_string(),
            weight,
        }
    }

    #[test]
    fn weighted_example_scores_seventy() {
        let kpis = [kpi("a", 90.0, 100.0, 50.0), kpi("b", 50.0, 100.0, 50.0)];
        assert!((perspective_score(&kpis) - 70.0).abs() < 1e-9);
    }

    #[test]
    fn achievement_is_capped_and_zero_target_met_by_progress() {
        assert_eq!(kpi_achievement(&kpi("a", 150.0, 100.0, 1.0)), 100.0);
        assert_eq!(kpi_achievement(&kpi("a", 5.0, 0.0, 1.0)), 100.0);
        assert_eq!(kpi_achievement(&kpi("a", 0.0, 0.0, 1.0)), 0.0);
        assert_eq!(kpi_achievement(&kpi("a", -5.0, 0.0, 1.0)), 0.0);
        assert_eq!(kpi_achievement(&kpi("a", 5.0, -10.0, 1.0)), 0.0);
        assert_eq!(kpi_achievement(&kpi("a", -5.0, 10.0, 1.0)), 0.0);
        assert_eq!(kpi_achievement(&kpi("a", 5.0, f64::NAN, 1.0)), 0.0);
    }

    #[test]
    fn zero_weight_scores_zero() {
        let kpis = [kpi("a", 100.0, 100.0, 0.0)];
        assert_eq!(perspective_score(&kpis), 0.0);
        assert_eq!(perspective_score(std::iter::empty::<&Kpi>()), 0.0);
    }

    #[test]
    fn overall_is_mean_and_none_when_empty() {
        let mut card = Scorecard::default();
        assert_eq!(overall_score(&card), None);
        assert_eq!(ScorecardMetrics::of(&card).overall, 0.0);

        card.perspectives.push_back(Perspective {
            id: "financial".into(),
            name: "Financial".into(),
            kpis: im::vector![kpi("a", 80.0, 100.0, 100.0)],
        });
        card.perspectives.push_back(Perspective {
            id: "customer".into(),
            name: "Customer".into(),
            kpis: im::Vector::new(),
        });
        assert_eq!(overall_score(&card), Some(40.0));
    }

    #[test]
    fn status_bands() {
        assert_eq!(KpiStatus::from_achievement(95.0), KpiStatus::OnTrack);
        assert_eq!(KpiStatus::from_achievement(90.0), KpiStatus::OnTrack);
        assert_eq!(KpiStatus::from_achievement(70.0), KpiStatus::AtRisk);
        assert_eq!(KpiStatus::from_achievement(69.9), KpiStatus::OffTrack);
    }

    #[test]
    fn weight_balance_is_advisory() {
        let perspective = Perspective {
            id: "p".into(),
            name: "P".into(),
            kpis: im::vector![kpi("a", 1.0, 1.0, 60.0), kpi("b", 1.0, 1.0, 30.0)],
        };
        let metrics = PerspectiveMetrics::of(&perspective);
        assert_eq!(metrics.total_weight, 90.0);
        assert!(!metrics.weights_balanced);
        assert_eq!(metrics.score, 100.0);
    }

    #[test]
    fn gaps_sorted_weakest_first() {
        let card = Scorecard {
            employee_name: "Ada".into(),
            period: "Q1".into(),
            perspectives: im::vector![Perspective {
                id: "financial".into(),
                name: "Financial".into(),
                kpis: im::vector![
                    kpi("met", 100.0, 100.0, 30.0),
                    kpi("close", 80.0, 100.0, 30.0),
                    kpi("far", 20.0, 100.0, 40.0),
                ],
            }],
        };
        let gaps = performance_gaps(&card);
        let ids: Vec<_> = gaps.iter().map(|g| g.kpi_id.as_str()).collect();
        assert_eq!(ids, ["far", "close"]);
        assert_eq!(gaps[0].shortfall(), 80.0);
    }
}
