// ==========================================
// 产量计划仿真与分析系统 - 计划评分
// ==========================================
// 公式 (各分项截断到 [0,100]):
// - gap = 100 - (缺口周占比×100 + (100 - 缺口周平均达成率)), 无周时 100
// - ctb = 100 - 影响比例×3, 无约束时 100
// - stability = 100 - 波动率×2
// - ramp = healthy 100 / unknown 80 / suboptimal 60
// - overall = 0.4×gap + 0.2×ctb + 0.2×stability + 0.2×ramp
// ==========================================

use crate::domain::analysis::{
    AnalysisScores, CtbAnalysis, GapAnalysis, RampAnalysis, StabilityAnalysis,
};
use crate::domain::types::RampHealth;

/// 计算评分
pub fn score(
    gap: &GapAnalysis,
    ctb: &CtbAnalysis,
    stability: &StabilityAnalysis,
    ramp: &RampAnalysis,
) -> AnalysisScores {
    let gap_score = if gap.total_weeks == 0 {
        100.0
    } else {
        let gap_ratio = gap.weeks_with_gap as f64 / gap.total_weeks as f64 * 100.0;
        clamp_score(100.0 - (gap_ratio + (100.0 - gap.avg_attainment)))
    };

    let ctb_score = if ctb.has_constraints {
        clamp_score(100.0 - ctb.impact_percent * 3.0)
    } else {
        100.0
    };

    let stability_score = clamp_score(100.0 - stability.volatility * 2.0);

    let ramp_score = match ramp.ramp_health {
        RampHealth::Healthy => 100.0,
        RampHealth::Unknown => 80.0,
        RampHealth::Suboptimal => 60.0,
    };

    let overall = clamp_score(
        0.4 * gap_score + 0.2 * ctb_score + 0.2 * stability_score + 0.2 * ramp_score,
    );

    AnalysisScores {
        gap_score,
        ctb_score,
        stability_score,
        ramp_score,
        overall,
    }
}

/// 截断到 [0,100], NaN 视为 0
fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gap(weeks_with_gap: usize, total_weeks: usize, avg_attainment: f64) -> GapAnalysis {
        GapAnalysis {
            issues: Vec::new(),
            total_gap: 0.0,
            avg_attainment,
            weeks_with_gap,
            total_weeks,
        }
    }

    fn stability(volatility: f64) -> StabilityAnalysis {
        StabilityAnalysis {
            issues: Vec::new(),
            volatility,
            spikes: Vec::new(),
        }
    }

    fn ramp(ramp_health: RampHealth) -> RampAnalysis {
        RampAnalysis {
            issues: Vec::new(),
            ramp_health,
            ramp_ratio: None,
            first_window_output: 0.0,
            last_window_output: 0.0,
        }
    }

    #[test]
    fn test_perfect_plan() {
        let s = score(
            &gap(0, 5, 100.0),
            &CtbAnalysis::skipped(),
            &stability(0.0),
            &ramp(RampHealth::Healthy),
        );
        assert_eq!(s.gap_score, 100.0);
        assert_eq!(s.ctb_score, 100.0);
        assert_eq!(s.overall, 100.0);
    }

    #[test]
    fn test_weighted_overall() {
        let mut ctb = CtbAnalysis::skipped();
        ctb.has_constraints = true;
        ctb.impact_percent = 10.0;

        let s = score(&gap(1, 4, 80.0), &ctb, &stability(5.0), &ramp(RampHealth::Unknown));
        // gap = 100 - (25 + 20) = 55
        assert!((s.gap_score - 55.0).abs() < 1e-9);
        assert!((s.ctb_score - 70.0).abs() < 1e-9);
        assert!((s.stability_score - 90.0).abs() < 1e-9);
        assert_eq!(s.ramp_score, 80.0);
        assert!((s.overall - (0.4 * 55.0 + 0.2 * 70.0 + 0.2 * 90.0 + 0.2 * 80.0)).abs() < 1e-9);
    }

    #[test]
    fn test_scores_clamped() {
        let mut ctb = CtbAnalysis::skipped();
        ctb.has_constraints = true;
        ctb.impact_percent = 90.0;

        let s = score(&gap(3, 3, 10.0), &ctb, &stability(400.0), &ramp(RampHealth::Suboptimal));
        assert_eq!(s.gap_score, 0.0);
        assert_eq!(s.ctb_score, 0.0);
        assert_eq!(s.stability_score, 0.0);
        assert!((s.overall - 12.0).abs() < 1e-9);
    }
}
