//! 评分聚合：题项平均 → 类别平均 → 总平均

use serde::Serialize;
use std::collections::HashMap;
use ts_rs::TS;

use super::rubric::{CategoryCode, RubricCategory};
use super::score::Score;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

pub fn is_valid_rating(value: u8) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&value)
}

/// 按 (类别, 题项序号) 收集评分
#[derive(Debug, Clone, Default)]
pub struct RatingSheet {
    ratings: HashMap<(CategoryCode, usize), Vec<u8>>,
}

impl RatingSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一个评分，1–5 以外（包括 0）的值被忽略
    pub fn add(&mut self, category: CategoryCode, index: usize, value: u8) {
        if is_valid_rating(value) {
            self.ratings.entry((category, index)).or_default().push(value);
        }
    }

    pub fn ratings(&self, category: CategoryCode, index: usize) -> &[u8] {
        self.ratings
            .get(&(category, index))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct IndicatorAverage {
    pub index: usize,
    pub text: String,
    #[ts(type = "number | null")]
    pub average: Score,
    pub respondents: usize,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct CategoryAverage {
    pub code: CategoryCode,
    pub title: String,
    pub indicators: Vec<IndicatorAverage>,
    #[ts(type = "number | null")]
    pub average: Score,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct RubricAverages {
    pub categories: Vec<CategoryAverage>,
    #[ts(type = "number | null")]
    pub overall: Score,
}

impl RubricAverages {
    pub fn category(&self, code: CategoryCode) -> Score {
        self.categories
            .iter()
            .find(|c| c.code == code)
            .map(|c| c.average)
            .unwrap_or(Score::NoData)
    }
}

/// 单个题项的平均分，无评分时为 NoData
pub fn indicator_average(ratings: &[u8]) -> Score {
    Score::mean(
        ratings
            .iter()
            .copied()
            .filter(|v| is_valid_rating(*v))
            .map(|v| Score::Value(f64::from(v))),
    )
}

/// 聚合评分表
///
/// 类别平均为该类有数据题项平均的均值；总平均为有数据类别的等权均值。
pub fn aggregate(categories: &[RubricCategory], sheet: &RatingSheet) -> RubricAverages {
    let categories: Vec<CategoryAverage> = categories
        .iter()
        .map(|category| {
            let indicators: Vec<IndicatorAverage> = category
                .indicators
                .iter()
                .enumerate()
                .map(|(index, text)| {
                    let ratings = sheet.ratings(category.code, index);
                    IndicatorAverage {
                        index,
                        text: (*text).to_string(),
                        average: indicator_average(ratings),
                        respondents: ratings.len(),
                    }
                })
                .collect();
            let average = Score::mean(indicators.iter().map(|i| i.average));
            CategoryAverage {
                code: category.code,
                title: category.title.to_string(),
                indicators,
                average,
            }
        })
        .collect();

    let overall = Score::mean(categories.iter().map(|c| c.average));
    RubricAverages {
        categories,
        overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::rubric::RubricVersion;

    fn approx(score: Score, expected: f64) {
        let v = score.value().expect("expected a value");
        assert!((v - expected).abs() < 1e-9, "{v} != {expected}");
    }

    #[test]
    fn test_empty_indicator_is_no_data() {
        assert_eq!(indicator_average(&[]), Score::NoData);

        let result = aggregate(RubricVersion::Old.categories(), &RatingSheet::new());
        assert_eq!(result.overall, Score::NoData);
        for category in &result.categories {
            assert_eq!(category.average, Score::NoData);
            assert!(category.indicators.iter().all(|i| i.average == Score::NoData));
        }
    }

    #[test]
    fn test_all_fives() {
        let mut sheet = RatingSheet::new();
        for i in 0..5 {
            sheet.add(CategoryCode::A, i, 5);
        }
        let result = aggregate(RubricVersion::Old.categories(), &sheet);
        approx(result.category(CategoryCode::A), 5.0);
        assert_eq!(result.category(CategoryCode::B), Score::NoData);
        approx(result.overall, 5.0);
    }

    #[test]
    fn test_zero_and_out_of_range_ignored() {
        let mut sheet = RatingSheet::new();
        sheet.add(CategoryCode::B, 0, 0);
        sheet.add(CategoryCode::B, 0, 6);
        sheet.add(CategoryCode::B, 0, 4);
        assert_eq!(sheet.ratings(CategoryCode::B, 0), &[4]);
        approx(indicator_average(&[0, 2, 4]), 3.0);
    }

    #[test]
    fn test_overall_equal_category_weighting() {
        // A 有 6 项、B 有 5 项：总平均必须是类别平均的等权均值，而不是全部题项的均值
        let mut sheet = RatingSheet::new();
        for i in 0..6 {
            sheet.add(CategoryCode::A, i, 5);
        }
        for i in 0..5 {
            sheet.add(CategoryCode::B, i, 3);
        }
        for i in 0..5 {
            sheet.add(CategoryCode::C, i, 4);
        }
        for i in 0..6 {
            sheet.add(CategoryCode::D, i, 2);
        }
        sheet.add(CategoryCode::D, 0, 4);

        let result = aggregate(RubricVersion::New.categories(), &sheet);
        let direct = Score::mean(result.categories.iter().map(|c| c.average));
        assert_eq!(result.overall, direct);

        // D: 第 0 项平均 3，其余 2 → (3 + 2*5) / 6
        approx(result.category(CategoryCode::D), 13.0 / 6.0);
        approx(result.overall, (5.0 + 3.0 + 4.0 + 13.0 / 6.0) / 4.0);
    }
}
