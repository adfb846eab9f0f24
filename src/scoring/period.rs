//! 学年与学期

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 学期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/period.ts")]
pub enum Semester {
    First,
    Second,
    Summer,
}

impl std::fmt::Display for Semester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Semester::First => write!(f, "first"),
            Semester::Second => write!(f, "second"),
            Semester::Summer => write!(f, "summer"),
        }
    }
}

impl std::str::FromStr for Semester {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Semester::First),
            "second" => Ok(Semester::Second),
            "summer" => Ok(Semester::Summer),
            _ => Err(format!(
                "Invalid semester: '{s}'. Supported: first, second, summer"
            )),
        }
    }
}

/// 解析 `YYYY-YYYY` 学年，两个年份必须相邻；返回起始年
pub fn parse_school_year(value: &str) -> Result<i32, String> {
    let (start, end) = value
        .split_once('-')
        .ok_or_else(|| format!("School year must look like 2024-2025, got '{value}'"))?;
    if start.len() != 4 || end.len() != 4 {
        return Err(format!(
            "School year must look like 2024-2025, got '{value}'"
        ));
    }
    let start: i32 = start
        .parse()
        .map_err(|_| format!("Invalid school year start: '{start}'"))?;
    let end: i32 = end
        .parse()
        .map_err(|_| format!("Invalid school year end: '{end}'"))?;
    if end != start + 1 {
        return Err(format!(
            "School year years must be consecutive, got '{value}'"
        ));
    }
    Ok(start)
}

pub fn format_school_year(start_year: i32) -> String {
    format!("{}-{}", start_year, start_year + 1)
}

/// 学年 + 学期
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/period.ts")]
pub struct AcademicPeriod {
    pub school_year: String,
    pub semester: Semester,
}

impl AcademicPeriod {
    pub fn new(school_year: impl Into<String>, semester: Semester) -> Self {
        Self {
            school_year: school_year.into(),
            semester,
        }
    }
}

/// NBC-461 计算周期：3 个学年 × 2 个正常学期
pub const PROJECTED_YEARS: i32 = 3;

pub fn projected_periods(start_year: i32) -> Vec<AcademicPeriod> {
    (0..PROJECTED_YEARS)
        .flat_map(|offset| {
            let school_year = format_school_year(start_year + offset);
            [
                AcademicPeriod::new(school_year.clone(), Semester::First),
                AcademicPeriod::new(school_year, Semester::Second),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_school_year() {
        assert_eq!(parse_school_year("2024-2025"), Ok(2024));
        assert!(parse_school_year("2024-2026").is_err());
        assert!(parse_school_year("2024").is_err());
        assert!(parse_school_year("24-25").is_err());
        assert!(parse_school_year("abcd-efgh").is_err());
    }

    #[test]
    fn test_projected_periods() {
        let periods = projected_periods(2023);
        assert_eq!(periods.len(), 6);
        assert_eq!(periods[0], AcademicPeriod::new("2023-2024", Semester::First));
        assert_eq!(periods[1], AcademicPeriod::new("2023-2024", Semester::Second));
        assert_eq!(periods[5], AcademicPeriod::new("2025-2026", Semester::Second));
    }
}
