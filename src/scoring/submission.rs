//! 评教表提交校验与单份评教的分值计算

use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use ts_rs::TS;

use super::average::{RatingSheet, aggregate, is_valid_rating};
use super::rubric::{CategoryCode, RubricVersion};
use super::score::Score;

/// 提交的单项评分
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct RatingInput {
    pub category: CategoryCode,
    /// 从 0 开始
    pub index: usize,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionError {
    UnknownIndicator {
        category: CategoryCode,
        index: usize,
    },
    DuplicateRating {
        category: CategoryCode,
        index: usize,
    },
    RatingOutOfRange {
        category: CategoryCode,
        index: usize,
        value: u8,
    },
    Incomplete {
        missing: Vec<(CategoryCode, usize)>,
    },
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionError::UnknownIndicator { category, index } => {
                write!(f, "Indicator {category}{} does not exist in this rubric", index + 1)
            }
            SubmissionError::DuplicateRating { category, index } => {
                write!(f, "Indicator {category}{} was rated more than once", index + 1)
            }
            SubmissionError::RatingOutOfRange {
                category,
                index,
                value,
            } => write!(
                f,
                "Rating for {category}{} must be between 1 and 5, got {value}",
                index + 1
            ),
            SubmissionError::Incomplete { missing } => {
                let items: Vec<String> = missing
                    .iter()
                    .map(|(c, i)| format!("{c}{}", i + 1))
                    .collect();
                write!(
                    f,
                    "Rating incomplete: {} indicator(s) not rated ({})",
                    missing.len(),
                    items.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for SubmissionError {}

/// 单份评教的类别分与总分（总分为总平均）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationScores {
    pub commitment: Score,
    pub knowledge: Score,
    pub teaching: Score,
    pub management: Score,
    pub total: Score,
}

/// 校验评分覆盖量表每个题项且各一次，值为 1–5
pub fn validate_ratings(
    version: RubricVersion,
    ratings: &[RatingInput],
) -> Result<RatingSheet, SubmissionError> {
    let mut seen = HashSet::new();
    let mut sheet = RatingSheet::new();

    for rating in ratings {
        let exists = version
            .category(rating.category)
            .is_some_and(|c| rating.index < c.indicators.len());
        if !exists {
            return Err(SubmissionError::UnknownIndicator {
                category: rating.category,
                index: rating.index,
            });
        }
        if !is_valid_rating(rating.value) {
            return Err(SubmissionError::RatingOutOfRange {
                category: rating.category,
                index: rating.index,
                value: rating.value,
            });
        }
        if !seen.insert((rating.category, rating.index)) {
            return Err(SubmissionError::DuplicateRating {
                category: rating.category,
                index: rating.index,
            });
        }
        sheet.add(rating.category, rating.index, rating.value);
    }

    let missing: Vec<(CategoryCode, usize)> = version
        .categories()
        .iter()
        .flat_map(|c| (0..c.indicators.len()).map(move |i| (c.code, i)))
        .filter(|key| !seen.contains(key))
        .collect();
    if !missing.is_empty() {
        return Err(SubmissionError::Incomplete { missing });
    }

    Ok(sheet)
}

/// 计算单份评教的类别平均和总平均
pub fn score_evaluation(version: RubricVersion, sheet: &RatingSheet) -> EvaluationScores {
    let averages = aggregate(version.categories(), sheet);
    EvaluationScores {
        commitment: averages.category(CategoryCode::A),
        knowledge: averages.category(CategoryCode::B),
        teaching: averages.category(CategoryCode::C),
        management: averages.category(CategoryCode::D),
        total: averages.overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_sheet(version: RubricVersion, value: u8) -> Vec<RatingInput> {
        version
            .categories()
            .iter()
            .flat_map(|c| {
                (0..c.indicators.len()).map(move |index| RatingInput {
                    category: c.code,
                    index,
                    value,
                })
            })
            .collect()
    }

    #[test]
    fn test_complete_submission_scores() {
        let ratings = full_sheet(RubricVersion::Old, 4);
        let sheet = validate_ratings(RubricVersion::Old, &ratings).unwrap();
        let scores = score_evaluation(RubricVersion::Old, &sheet);
        assert_eq!(scores.commitment, Score::Value(4.0));
        assert_eq!(scores.management, Score::Value(4.0));
        assert_eq!(scores.total, Score::Value(4.0));
    }

    #[test]
    fn test_incomplete_submission_rejected() {
        let mut ratings = full_sheet(RubricVersion::New, 5);
        ratings.retain(|r| !(r.category == CategoryCode::D && r.index == 5));

        match validate_ratings(RubricVersion::New, &ratings) {
            Err(SubmissionError::Incomplete { missing }) => {
                assert_eq!(missing, vec![(CategoryCode::D, 5)]);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        // old 量表的 20 项不足以满足 new 量表
        let old = full_sheet(RubricVersion::Old, 5);
        assert!(matches!(
            validate_ratings(RubricVersion::New, &old),
            Err(SubmissionError::Incomplete { .. })
        ));
    }

    #[test]
    fn test_invalid_entries_rejected() {
        let mut ratings = full_sheet(RubricVersion::Old, 3);
        ratings[0].value = 0;
        assert!(matches!(
            validate_ratings(RubricVersion::Old, &ratings),
            Err(SubmissionError::RatingOutOfRange { value: 0, .. })
        ));

        let mut ratings = full_sheet(RubricVersion::Old, 3);
        ratings.push(RatingInput {
            category: CategoryCode::A,
            index: 5,
            value: 3,
        });
        assert!(matches!(
            validate_ratings(RubricVersion::Old, &ratings),
            Err(SubmissionError::UnknownIndicator { index: 5, .. })
        ));

        let mut ratings = full_sheet(RubricVersion::Old, 3);
        ratings.push(ratings[2]);
        assert!(matches!(
            validate_ratings(RubricVersion::Old, &ratings),
            Err(SubmissionError::DuplicateRating { .. })
        ));
    }

    #[test]
    fn test_incomplete_message_lists_items() {
        let err = SubmissionError::Incomplete {
            missing: vec![(CategoryCode::B, 0), (CategoryCode::C, 4)],
        };
        assert_eq!(
            err.to_string(),
            "Rating incomplete: 2 indicator(s) not rated (B1, C5)"
        );
    }
}
