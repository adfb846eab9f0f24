//! NBC-461 评分计算
//!
//! 纯函数模块，不涉及存储与 HTTP：
//! - `rubric`: 量表版本、类别与题项
//! - `average`: 题项 / 类别 / 总平均
//! - `nbc461`: 百分比、加权分、跨学期除数、等级评定
//! - `role_policy`: 按职务决定适用的评分分量
//! - `submission`: 评教表完整性校验
//! - `annex`: Annex A–D 与结果汇总

pub mod annex;
pub mod average;
pub mod nbc461;
pub mod period;
pub mod role_policy;
pub mod rubric;
mod score;
pub mod submission;

pub use average::{RatingSheet, RubricAverages, aggregate};
pub use nbc461::{AdjectivalRating, Component, Divisor};
pub use period::{AcademicPeriod, Semester};
pub use role_policy::{Track, is_supervisor_only};
pub use rubric::{CategoryCode, RubricVersion};
pub use score::{Score, round2};
pub use submission::{EvaluationScores, RatingInput, SubmissionError};
