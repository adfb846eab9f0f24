//! NBC-461 换算
//!
//! 5 分制平均 → 百分比（avg / 5 × 100）→ 加权分（百分比 × 权重）。
//! 学生评价（SET）权重 0.36，上级评价（SEF）权重 0.24。

use serde::Serialize;
use ts_rs::TS;

use super::score::Score;

pub const RATING_SCALE: f64 = 5.0;
pub const STUDENT_WEIGHT: f64 = 0.36;
pub const SUPERVISOR_WEIGHT: f64 = 0.24;
/// 3 个学年 × 2 个学期
pub const FIXED_DIVISOR: u32 = 6;

/// 评分分量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub enum Component {
    /// SET
    Student,
    /// SEF
    Supervisor,
}

impl Component {
    pub fn weight(self) -> f64 {
        match self {
            Component::Student => STUDENT_WEIGHT,
            Component::Supervisor => SUPERVISOR_WEIGHT,
        }
    }

    pub fn max_points(self) -> f64 {
        match self {
            Component::Student => 36.0,
            Component::Supervisor => 24.0,
        }
    }
}

/// 跨学期汇总时的除数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Divisor {
    Fixed(u32),
    /// 有数据的学期数
    Dynamic,
}

pub fn percentage(average: Score) -> Score {
    average.map(|avg| avg / RATING_SCALE * 100.0)
}

pub fn points_from_percentage(percentage: Score, weight: f64) -> Score {
    percentage.map(|pct| pct * weight)
}

pub fn points(average: Score, weight: f64) -> Score {
    points_from_percentage(percentage(average), weight)
}

/// 跨学期百分比
///
/// 有数据学期的百分比求和后除以除数；动态除数为 0 或固定除数下没有任何数据时均为 NoData。
pub fn across_periods(period_percentages: &[Score], divisor: Divisor) -> (Score, u32) {
    let with_data: Vec<f64> = period_percentages.iter().filter_map(|s| s.value()).collect();
    let divisor = match divisor {
        Divisor::Fixed(n) => n,
        Divisor::Dynamic => with_data.len() as u32,
    };
    if with_data.is_empty() || divisor == 0 {
        return (Score::NoData, divisor);
    }
    let sum: f64 = with_data.iter().sum();
    (Score::Value(sum / f64::from(divisor)), divisor)
}

/// 总分：各分量有数据的加总，全部无数据时为 NoData
pub fn total(components: &[Score]) -> Score {
    Score::sum(components.iter().copied())
}

/// 等级评定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub enum AdjectivalRating {
    Outstanding,
    #[serde(rename = "Very Satisfactory")]
    VerySatisfactory,
    Satisfactory,
    Fair,
    Poor,
}

impl AdjectivalRating {
    /// 按百分比折算回的 5 分制值（百分比 / 20）评定
    pub fn from_percentage(percentage: Score) -> Option<Self> {
        let equivalent = percentage.value()? / 20.0;
        Some(if equivalent >= 4.50 {
            AdjectivalRating::Outstanding
        } else if equivalent >= 3.50 {
            AdjectivalRating::VerySatisfactory
        } else if equivalent >= 2.50 {
            AdjectivalRating::Satisfactory
        } else if equivalent >= 1.50 {
            AdjectivalRating::Fair
        } else {
            AdjectivalRating::Poor
        })
    }

    /// 按加权分占满分的比例评定
    pub fn from_points(points: Score, max_points: f64) -> Option<Self> {
        if max_points <= 0.0 {
            return None;
        }
        Self::from_percentage(points.map(|p| p / max_points * 100.0))
    }
}

impl std::fmt::Display for AdjectivalRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AdjectivalRating::Outstanding => "Outstanding",
            AdjectivalRating::VerySatisfactory => "Very Satisfactory",
            AdjectivalRating::Satisfactory => "Satisfactory",
            AdjectivalRating::Fair => "Fair",
            AdjectivalRating::Poor => "Poor",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score::round2;

    fn assert_close(score: Score, expected: f64) {
        let v = score.value().expect("expected a value");
        assert!((v - expected).abs() < 1e-9, "{v} != {expected}");
    }

    #[test]
    fn test_perfect_student_score() {
        assert_close(percentage(Score::Value(5.0)), 100.0);
        assert_close(points(Score::Value(5.0), STUDENT_WEIGHT), 36.0);
    }

    #[test]
    fn test_dual_component_at_three() {
        let set = points(Score::Value(3.0), STUDENT_WEIGHT);
        let sef = points(Score::Value(3.0), SUPERVISOR_WEIGHT);
        assert_close(set, 21.6);
        assert_close(sef, 14.4);
        assert_eq!(total(&[set, sef]).map(round2), Score::Value(36.0));
    }

    #[test]
    fn test_supervisor_only_dynamic_divisor() {
        let mut periods = vec![Score::NoData; 6];
        periods[1] = percentage(Score::Value(4.0));
        periods[4] = percentage(Score::Value(4.0));

        let (pct, divisor) = across_periods(&periods, Divisor::Dynamic);
        assert_eq!(divisor, 2);
        assert_close(pct, 80.0);
        assert_close(points_from_percentage(pct, SUPERVISOR_WEIGHT), 19.2);
    }

    #[test]
    fn test_fixed_divisor_counts_missing_periods() {
        let periods = [Score::Value(90.0), Score::Value(60.0)];
        let (pct, divisor) = across_periods(&periods, Divisor::Fixed(FIXED_DIVISOR));
        assert_eq!(divisor, 6);
        assert_close(pct, 25.0);
    }

    #[test]
    fn test_no_data_propagates() {
        assert_eq!(percentage(Score::NoData), Score::NoData);
        assert_eq!(points(Score::NoData, STUDENT_WEIGHT), Score::NoData);
        assert_eq!(
            across_periods(&[Score::NoData; 6], Divisor::Fixed(6)).0,
            Score::NoData
        );
        assert_eq!(across_periods(&[], Divisor::Dynamic), (Score::NoData, 0));
        assert_eq!(total(&[Score::NoData, Score::NoData]), Score::NoData);
        assert_close(total(&[Score::NoData, Score::Value(19.2)]), 19.2);
    }

    #[test]
    fn test_adjectival_thresholds() {
        use AdjectivalRating::*;
        assert_eq!(AdjectivalRating::from_percentage(Score::Value(90.0)), Some(Outstanding));
        assert_eq!(AdjectivalRating::from_percentage(Score::Value(89.9)), Some(VerySatisfactory));
        assert_eq!(AdjectivalRating::from_percentage(Score::Value(70.0)), Some(VerySatisfactory));
        assert_eq!(AdjectivalRating::from_percentage(Score::Value(50.0)), Some(Satisfactory));
        assert_eq!(AdjectivalRating::from_percentage(Score::Value(30.0)), Some(Fair));
        assert_eq!(AdjectivalRating::from_percentage(Score::Value(29.0)), Some(Poor));
        assert_eq!(AdjectivalRating::from_percentage(Score::NoData), None);
        assert_eq!(AdjectivalRating::from_points(Score::Value(19.2), 24.0), Some(VerySatisfactory));
        assert_eq!(
            serde_json::to_string(&VerySatisfactory).unwrap(),
            "\"Very Satisfactory\""
        );
    }
}
