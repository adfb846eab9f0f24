//! 被评人适用的评分分量

use serde::Serialize;
use ts_rs::TS;

use super::nbc461::{Component, Divisor, FIXED_DIVISOR};

const SUPERVISOR_TITLES: [&str; 5] = ["dean", "president", "vpaa", "department chair", "chairman"];

/// 职务是否为仅由上级评价（不含学生评价分量）
pub fn is_supervisor_only(position: &str) -> bool {
    let position = position.to_lowercase();
    SUPERVISOR_TITLES
        .iter()
        .any(|title| position.contains(title))
}

/// 评分轨道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub enum Track {
    /// 学生评价 + 上级评价，满分 60
    Dual,
    /// 仅上级评价，满分 24
    SupervisorOnly,
}

impl Track {
    pub fn for_position(position: &str) -> Self {
        if is_supervisor_only(position) {
            Track::SupervisorOnly
        } else {
            Track::Dual
        }
    }

    pub fn components(self) -> &'static [Component] {
        match self {
            Track::Dual => &[Component::Student, Component::Supervisor],
            Track::SupervisorOnly => &[Component::Supervisor],
        }
    }

    pub fn includes(self, component: Component) -> bool {
        self.components().contains(&component)
    }

    pub fn divisor(self) -> Divisor {
        match self {
            Track::Dual => Divisor::Fixed(FIXED_DIVISOR),
            Track::SupervisorOnly => Divisor::Dynamic,
        }
    }

    pub fn max_points(self) -> f64 {
        self.components().iter().map(|c| c.max_points()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_classification() {
        assert!(is_supervisor_only("Department Chairperson"));
        assert!(!is_supervisor_only("Assistant Professor"));
        assert!(is_supervisor_only("Dean of the College"));
        assert!(is_supervisor_only("VPAA"));
        assert!(is_supervisor_only("University President"));
        assert!(is_supervisor_only("Chairman, Board of Examiners"));
        assert!(!is_supervisor_only("Instructor I"));
        assert!(!is_supervisor_only(""));
    }

    #[test]
    fn test_track_limits() {
        assert_eq!(Track::Dual.max_points(), 60.0);
        assert_eq!(Track::SupervisorOnly.max_points(), 24.0);
        assert!(!Track::SupervisorOnly.includes(Component::Student));
        assert_eq!(Track::Dual.divisor(), Divisor::Fixed(6));
        assert_eq!(Track::SupervisorOnly.divisor(), Divisor::Dynamic);
        assert_eq!(Track::for_position("Dean"), Track::SupervisorOnly);
    }
}
