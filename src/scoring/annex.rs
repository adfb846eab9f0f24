//! Annex A–D 报表与结果汇总
//!
//! 所有报表都从同一组评教记录计算，服务层只负责取数、鉴权和缓存。

use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use super::average::{CategoryAverage, RatingSheet, RubricAverages, aggregate};
use super::nbc461::{self, AdjectivalRating, Component};
use super::period::{AcademicPeriod, projected_periods};
use super::role_policy::Track;
use super::rubric::{CategoryCode, RubricVersion};
use super::score::Score;

/// 报表计算使用的一份评教记录
#[derive(Debug, Clone)]
pub struct EvaluationRecord {
    pub evaluation_id: i64,
    pub population: Component,
    pub evaluator_role: String,
    pub evaluator_name: Option<String>,
    pub evaluator_position: Option<String>,
    pub evaluation_date: Option<DateTime<Utc>>,
    pub period: AcademicPeriod,
    pub subject_id: Option<i64>,
    pub section: Option<String>,
    pub comments: Option<String>,
    pub ratings: Vec<(CategoryCode, usize, u8)>,
}

fn population_averages<'a, I>(records: I) -> (RubricAverages, usize)
where
    I: IntoIterator<Item = &'a EvaluationRecord>,
{
    let mut sheet = RatingSheet::new();
    let mut respondents = 0;
    for record in records {
        respondents += 1;
        for &(category, index, value) in &record.ratings {
            sheet.add(category, index, value);
        }
    }
    (
        aggregate(RubricVersion::report_layout().categories(), &sheet),
        respondents,
    )
}

fn in_period<'a>(
    records: &'a [EvaluationRecord],
    period: &'a AcademicPeriod,
    population: Component,
) -> impl Iterator<Item = &'a EvaluationRecord> + 'a {
    records
        .iter()
        .filter(move |r| r.population == population && &r.period == period)
}

/// 报表中只展示类别平均的摘要
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct CategorySummary {
    pub code: CategoryCode,
    pub title: String,
    #[ts(type = "number | null")]
    pub average: Score,
}

impl From<&CategoryAverage> for CategorySummary {
    fn from(value: &CategoryAverage) -> Self {
        Self {
            code: value.code,
            title: value.title.clone(),
            average: value.average,
        }
    }
}

// ---------------------------------------------------------------------------
// Annex A：学生评价逐项明细
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct AnnexAFilter {
    pub subject_id: Option<i64>,
    pub section: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AnnexA {
    pub period: AcademicPeriod,
    pub subject_id: Option<i64>,
    pub section: Option<String>,
    /// 学生评价分量是否计入该被评人的总分
    pub applicable: bool,
    pub respondents: usize,
    pub categories: Vec<CategoryAverage>,
    #[ts(type = "number | null")]
    pub overall: Score,
    #[ts(type = "number | null")]
    pub percentage: Score,
    #[ts(type = "number | null")]
    pub points: Score,
    pub adjectival: Option<AdjectivalRating>,
}

pub fn build_annex_a(
    records: &[EvaluationRecord],
    period: &AcademicPeriod,
    filter: &AnnexAFilter,
    track: Track,
) -> AnnexA {
    let selected = in_period(records, period, Component::Student).filter(|r| {
        filter.subject_id.is_none_or(|id| r.subject_id == Some(id))
            && filter
                .section
                .as_deref()
                .is_none_or(|s| r.section.as_deref().is_some_and(|rs| rs.eq_ignore_ascii_case(s)))
    });
    let (averages, respondents) = population_averages(selected);

    let applicable = track.includes(Component::Student);
    let percentage = nbc461::percentage(averages.overall);
    AnnexA {
        period: period.clone(),
        subject_id: filter.subject_id,
        section: filter.section.clone(),
        applicable,
        respondents,
        overall: averages.overall,
        percentage,
        points: if applicable {
            nbc461::points_from_percentage(percentage, Component::Student.weight())
        } else {
            Score::NoData
        },
        adjectival: AdjectivalRating::from_percentage(percentage),
        categories: averages.categories,
    }
}

// ---------------------------------------------------------------------------
// Annex B：三个学年六个学期的汇总计算
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AnnexBPeriod {
    pub period: AcademicPeriod,
    pub set_respondents: usize,
    #[ts(type = "number | null")]
    pub set_average: Score,
    #[ts(type = "number | null")]
    pub set_percentage: Score,
    pub sef_respondents: usize,
    #[ts(type = "number | null")]
    pub sef_average: Score,
    #[ts(type = "number | null")]
    pub sef_percentage: Score,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AnnexBComponent {
    pub component: Component,
    pub weight: f64,
    pub divisor: u32,
    #[ts(type = "number | null")]
    pub percentage: Score,
    #[ts(type = "number | null")]
    pub points: Score,
    pub max_points: f64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AnnexB {
    pub track: Track,
    pub start_school_year: String,
    pub periods: Vec<AnnexBPeriod>,
    /// 仅上级评价的被评人没有学生评价分量
    pub set: Option<AnnexBComponent>,
    pub sef: AnnexBComponent,
    #[ts(type = "number | null")]
    pub total_points: Score,
    pub max_points: f64,
    pub adjectival: Option<AdjectivalRating>,
}

fn annex_b_component(component: Component, percentages: &[Score], track: Track) -> AnnexBComponent {
    let (percentage, divisor) = nbc461::across_periods(percentages, track.divisor());
    AnnexBComponent {
        component,
        weight: component.weight(),
        divisor,
        percentage,
        points: nbc461::points_from_percentage(percentage, component.weight()),
        max_points: component.max_points(),
    }
}

pub fn build_annex_b(records: &[EvaluationRecord], start_year: i32, track: Track) -> AnnexB {
    let include_set = track.includes(Component::Student);

    let periods: Vec<AnnexBPeriod> = projected_periods(start_year)
        .into_iter()
        .map(|period| {
            let (set, set_respondents) = if include_set {
                population_averages(in_period(records, &period, Component::Student))
            } else {
                population_averages(std::iter::empty())
            };
            let (sef, sef_respondents) =
                population_averages(in_period(records, &period, Component::Supervisor));
            AnnexBPeriod {
                set_respondents,
                set_average: set.overall,
                set_percentage: nbc461::percentage(set.overall),
                sef_respondents,
                sef_average: sef.overall,
                sef_percentage: nbc461::percentage(sef.overall),
                period,
            }
        })
        .collect();

    let set = include_set.then(|| {
        let percentages: Vec<Score> = periods.iter().map(|p| p.set_percentage).collect();
        annex_b_component(Component::Student, &percentages, track)
    });
    let sef_percentages: Vec<Score> = periods.iter().map(|p| p.sef_percentage).collect();
    let sef = annex_b_component(Component::Supervisor, &sef_percentages, track);

    let total_points = nbc461::total(&[set.as_ref().map_or(Score::NoData, |c| c.points), sef.points]);
    let max_points = track.max_points();

    AnnexB {
        track,
        start_school_year: super::period::format_school_year(start_year),
        periods,
        set,
        sef,
        total_points,
        max_points,
        adjectival: AdjectivalRating::from_points(total_points, max_points),
    }
}

// ---------------------------------------------------------------------------
// Annex C：上级评价与评语
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AnnexComment {
    pub evaluator_role: String,
    /// 学生评语匿名
    pub evaluator_name: Option<String>,
    pub evaluator_position: Option<String>,
    pub evaluation_date: Option<DateTime<Utc>>,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct AnnexC {
    pub period: AcademicPeriod,
    pub respondents: usize,
    pub categories: Vec<CategorySummary>,
    #[ts(type = "number | null")]
    pub overall: Score,
    #[ts(type = "number | null")]
    pub percentage: Score,
    #[ts(type = "number | null")]
    pub points: Score,
    pub adjectival: Option<AdjectivalRating>,
    pub comments: Vec<AnnexComment>,
}

pub fn build_annex_c(records: &[EvaluationRecord], period: &AcademicPeriod) -> AnnexC {
    let (averages, respondents) =
        population_averages(in_period(records, period, Component::Supervisor));
    let percentage = nbc461::percentage(averages.overall);

    let mut comments: Vec<AnnexComment> = records
        .iter()
        .filter(|r| &r.period == period)
        .filter_map(|r| {
            let comment = r.comments.as_deref()?.trim();
            if comment.is_empty() {
                return None;
            }
            let anonymous = r.population == Component::Student;
            Some(AnnexComment {
                evaluator_role: r.evaluator_role.clone(),
                evaluator_name: if anonymous { None } else { r.evaluator_name.clone() },
                evaluator_position: if anonymous {
                    None
                } else {
                    r.evaluator_position.clone()
                },
                evaluation_date: r.evaluation_date,
                comment: comment.to_string(),
            })
        })
        .collect();
    comments.sort_by(|a, b| a.evaluation_date.cmp(&b.evaluation_date));

    AnnexC {
        period: period.clone(),
        respondents,
        categories: averages.categories.iter().map(CategorySummary::from).collect(),
        overall: averages.overall,
        percentage,
        points: nbc461::points_from_percentage(percentage, Component::Supervisor.weight()),
        adjectival: AdjectivalRating::from_percentage(percentage),
        comments,
    }
}

// ---------------------------------------------------------------------------
// 单学期汇总（Annex D 与结果列表共用）
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct PeriodScores {
    pub track: Track,
    pub set_respondents: usize,
    #[ts(type = "number | null")]
    pub set_average: Score,
    #[ts(type = "number | null")]
    pub set_points: Score,
    pub sef_respondents: usize,
    #[ts(type = "number | null")]
    pub sef_average: Score,
    #[ts(type = "number | null")]
    pub sef_points: Score,
    #[ts(type = "number | null")]
    pub total_points: Score,
    pub max_points: f64,
    pub adjectival: Option<AdjectivalRating>,
}

pub fn period_scores(records: &[EvaluationRecord], period: &AcademicPeriod, track: Track) -> PeriodScores {
    let include_set = track.includes(Component::Student);
    let (set, set_respondents) = if include_set {
        population_averages(in_period(records, period, Component::Student))
    } else {
        population_averages(std::iter::empty())
    };
    let (sef, sef_respondents) =
        population_averages(in_period(records, period, Component::Supervisor));

    let set_points = nbc461::points(set.overall, Component::Student.weight());
    let sef_points = nbc461::points(sef.overall, Component::Supervisor.weight());
    let total_points = nbc461::total(&[set_points, sef_points]);
    let max_points = track.max_points();

    PeriodScores {
        track,
        set_respondents,
        set_average: set.overall,
        set_points,
        sef_respondents,
        sef_average: sef.overall,
        sef_points,
        total_points,
        max_points,
        adjectival: AdjectivalRating::from_points(total_points, max_points),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::period::Semester;

    fn record(
        id: i64,
        population: Component,
        period: &AcademicPeriod,
        value: u8,
        comment: Option<&str>,
    ) -> EvaluationRecord {
        let ratings = RubricVersion::Old
            .categories()
            .iter()
            .flat_map(|c| (0..c.indicators.len()).map(move |i| (c.code, i, value)))
            .collect();
        EvaluationRecord {
            evaluation_id: id,
            population,
            evaluator_role: match population {
                Component::Student => "student".to_string(),
                Component::Supervisor => "dean".to_string(),
            },
            evaluator_name: Some(format!("Evaluator {id}")),
            evaluator_position: Some("Dean".to_string()),
            evaluation_date: DateTime::<Utc>::from_timestamp(1_700_000_000 + id, 0),
            period: period.clone(),
            subject_id: Some(10),
            section: Some("BSIT-1A".to_string()),
            comments: comment.map(str::to_string),
            ratings,
        }
    }

    fn close(score: Score, expected: f64) -> bool {
        score.value().is_some_and(|v| (v - expected).abs() < 1e-9)
    }

    #[test]
    fn test_annex_a_itemizes_student_ratings() {
        let period = AcademicPeriod::new("2024-2025", Semester::First);
        let records = vec![
            record(1, Component::Student, &period, 5, None),
            record(2, Component::Student, &period, 3, None),
            record(3, Component::Supervisor, &period, 1, None),
        ];
        let annex = build_annex_a(&records, &period, &AnnexAFilter::default(), Track::Dual);

        assert_eq!(annex.respondents, 2);
        assert!(close(annex.overall, 4.0));
        assert!(close(annex.percentage, 80.0));
        assert!(close(annex.points, 28.8));
        assert_eq!(annex.adjectival, Some(AdjectivalRating::VerySatisfactory));

        // old 量表评分在合并布局下，new 独有的题项为无数据
        let a = &annex.categories[0];
        assert_eq!(a.indicators.len(), 6);
        assert_eq!(a.indicators[0].respondents, 2);
        assert_eq!(a.indicators[5].average, Score::NoData);
        assert!(close(a.average, 4.0));
    }

    #[test]
    fn test_annex_a_filter_by_section() {
        let period = AcademicPeriod::new("2024-2025", Semester::First);
        let mut other = record(2, Component::Student, &period, 1, None);
        other.section = Some("BSIT-1B".to_string());
        let records = vec![record(1, Component::Student, &period, 5, None), other];

        let filter = AnnexAFilter {
            subject_id: None,
            section: Some("bsit-1a".to_string()),
        };
        let annex = build_annex_a(&records, &period, &filter, Track::Dual);
        assert_eq!(annex.respondents, 1);
        assert!(close(annex.overall, 5.0));
    }

    #[test]
    fn test_annex_a_without_data() {
        let period = AcademicPeriod::new("2024-2025", Semester::Second);
        let annex = build_annex_a(&[], &period, &AnnexAFilter::default(), Track::Dual);
        assert_eq!(annex.respondents, 0);
        assert_eq!(annex.overall, Score::NoData);
        assert_eq!(annex.points, Score::NoData);
        assert_eq!(annex.adjectival, None);
    }

    #[test]
    fn test_annex_b_supervisor_only_dynamic_divisor() {
        let p1 = AcademicPeriod::new("2023-2024", Semester::Second);
        let p2 = AcademicPeriod::new("2025-2026", Semester::First);
        let records = vec![
            record(1, Component::Supervisor, &p1, 4, None),
            record(2, Component::Supervisor, &p2, 4, None),
            // 学生评分不计入仅上级评价的被评人
            record(3, Component::Student, &p1, 1, None),
        ];
        let annex = build_annex_b(&records, 2023, Track::SupervisorOnly);

        assert_eq!(annex.periods.len(), 6);
        assert!(annex.set.is_none());
        assert_eq!(annex.periods[1].set_average, Score::NoData);
        assert_eq!(annex.sef.divisor, 2);
        assert!(close(annex.sef.percentage, 80.0));
        assert!(close(annex.sef.points, 19.2));
        assert!(close(annex.total_points, 19.2));
        assert_eq!(annex.max_points, 24.0);
    }

    #[test]
    fn test_annex_b_dual_fixed_divisor() {
        let periods = projected_periods(2022);
        let records: Vec<EvaluationRecord> = periods
            .iter()
            .enumerate()
            .flat_map(|(i, p)| {
                [
                    record(i as i64 * 2, Component::Student, p, 3, None),
                    record(i as i64 * 2 + 1, Component::Supervisor, p, 3, None),
                ]
            })
            .collect();
        let annex = build_annex_b(&records, 2022, Track::Dual);

        let set = annex.set.as_ref().unwrap();
        assert_eq!(set.divisor, 6);
        assert!(close(set.points, 21.6));
        assert!(close(annex.sef.points, 14.4));
        assert!(close(annex.total_points, 36.0));
        assert_eq!(annex.max_points, 60.0);
        assert_eq!(annex.start_school_year, "2022-2023");
    }

    #[test]
    fn test_annex_b_without_any_data_is_not_zero() {
        let annex = build_annex_b(&[], 2024, Track::Dual);
        assert_eq!(annex.total_points, Score::NoData);
        assert_eq!(annex.sef.percentage, Score::NoData);
        assert_eq!(annex.adjectival, None);
    }

    #[test]
    fn test_annex_c_comments_and_anonymity() {
        let period = AcademicPeriod::new("2024-2025", Semester::First);
        let records = vec![
            record(1, Component::Supervisor, &period, 4, Some("Well prepared.")),
            record(2, Component::Student, &period, 5, Some("  Great teacher  ")),
            record(3, Component::Student, &period, 5, Some("   ")),
        ];
        let annex = build_annex_c(&records, &period);

        assert_eq!(annex.respondents, 1);
        assert!(close(annex.overall, 4.0));
        assert!(close(annex.points, 19.2));
        assert_eq!(annex.comments.len(), 2);
        assert_eq!(annex.comments[0].evaluator_name.as_deref(), Some("Evaluator 1"));
        assert_eq!(annex.comments[1].evaluator_name, None);
        assert_eq!(annex.comments[1].evaluator_position, None);
        assert_eq!(annex.comments[1].comment, "Great teacher");
    }

    #[test]
    fn test_period_scores_partial_total() {
        let period = AcademicPeriod::new("2024-2025", Semester::First);
        let records = vec![record(1, Component::Supervisor, &period, 3, None)];
        let scores = period_scores(&records, &period, Track::Dual);

        assert_eq!(scores.set_points, Score::NoData);
        assert!(close(scores.sef_points, 14.4));
        assert!(close(scores.total_points, 14.4));
        assert_eq!(scores.max_points, 60.0);
    }
}
