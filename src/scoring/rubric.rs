//! 评教量表
//!
//! 两个版本共存：`old`（每类 5 项，共 20 项）与 `new`（6/5/5/6，共 22 项）。
//! `new` 在 A、D 两类末尾各追加一项，前 5 项与 `old` 完全一致，
//! 因此跨版本按 (类别, 序号) 合并评分是语义一致的。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 量表版本，评教记录创建后不可变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub enum RubricVersion {
    Old,
    New,
}

impl RubricVersion {
    /// 报表合并不同版本评分时使用的布局（覆盖所有版本的题项）
    pub fn report_layout() -> Self {
        RubricVersion::New
    }

    pub fn categories(self) -> &'static [RubricCategory] {
        match self {
            RubricVersion::Old => OLD_RUBRIC,
            RubricVersion::New => NEW_RUBRIC,
        }
    }

    pub fn indicator_count(self) -> usize {
        self.categories().iter().map(|c| c.indicators.len()).sum()
    }

    pub fn category(self, code: CategoryCode) -> Option<&'static RubricCategory> {
        self.categories().iter().find(|c| c.code == code)
    }
}

impl std::fmt::Display for RubricVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RubricVersion::Old => write!(f, "old"),
            RubricVersion::New => write!(f, "new"),
        }
    }
}

impl std::str::FromStr for RubricVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "old" => Ok(RubricVersion::Old),
            "new" => Ok(RubricVersion::New),
            _ => Err(format!("Invalid rubric version: {s}")),
        }
    }
}

/// 量表类别代码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/rubric.ts")]
pub enum CategoryCode {
    A,
    B,
    C,
    D,
}

impl CategoryCode {
    pub const ALL: [CategoryCode; 4] = [
        CategoryCode::A,
        CategoryCode::B,
        CategoryCode::C,
        CategoryCode::D,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryCode::A => "A",
            CategoryCode::B => "B",
            CategoryCode::C => "C",
            CategoryCode::D => "D",
        }
    }
}

impl std::fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CategoryCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" | "a" => Ok(CategoryCode::A),
            "B" | "b" => Ok(CategoryCode::B),
            "C" | "c" => Ok(CategoryCode::C),
            "D" | "d" => Ok(CategoryCode::D),
            _ => Err(format!("Invalid rubric category: {s}")),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct RubricCategory {
    pub code: CategoryCode,
    pub title: &'static str,
    pub indicators: &'static [&'static str],
}

const COMMITMENT_BASE: [&str; 5] = [
    "Demonstrates sensitivity to students' ability to attend and absorb content information.",
    "Integrates sensitively his/her learning objectives with those of the students in a collaborative process.",
    "Makes self available to students beyond official time.",
    "Regularly comes to class on time, well-groomed and well-prepared to complete assigned responsibilities.",
    "Keeps accurate records of students' performance and prompt submission of the same.",
];

const KNOWLEDGE: [&str; 5] = [
    "Demonstrates mastery of the subject matter (explains the subject matter without relying solely on the prescribed textbook).",
    "Draws and shares information on the state of the art of theory and practice in his/her discipline.",
    "Integrates subject to practical circumstances and learning intents/purposes of students.",
    "Explains the relevance of present topics to the previous lessons, and relates the subject matter to relevant current issues and/or daily life activities.",
    "Demonstrates up-to-date knowledge and/or awareness on current trends and issues of the subject.",
];

const INDEPENDENT_LEARNING: [&str; 5] = [
    "Creates teaching strategies that allow students to practice using concepts they need to understand (interactive discussion).",
    "Enhances student self-esteem and/or gives due recognition to students' performance/potentials.",
    "Allows students to create their own course with objectives and realistically defined student-professor rules and makes them accountable for their performance.",
    "Allows students to think independently and make their own decisions and holds them accountable for their performance based largely on their success in executing decisions.",
    "Encourages students to learn beyond what is required and helps/guides the students how to apply the concepts learned.",
];

const MANAGEMENT_BASE: [&str; 5] = [
    "Creates opportunities for intensive and/or extensive contribution of students in the class activities (e.g. breaks class into dyads, triads or buzz/task groups).",
    "Assumes roles as facilitator, resource person, coach, inquisitor, integrator, referee in drawing students to contribute to knowledge and understanding of the concepts at hand.",
    "Designs and implements learning conditions and experiences that promote healthy exchange and/or confrontations.",
    "Structures/re-structures learning and the teaching-learning context to enhance attainment of collective learning objectives.",
    "Uses instructional materials (audio/video materials, field trips, film showing, computer-aided instruction, etc.) to reinforce learning processes.",
];

const COMMITMENT_NEW: [&str; 6] = [
    COMMITMENT_BASE[0],
    COMMITMENT_BASE[1],
    COMMITMENT_BASE[2],
    COMMITMENT_BASE[3],
    COMMITMENT_BASE[4],
    "Shows genuine concern for the welfare and well-being of students inside and outside the classroom.",
];

const MANAGEMENT_NEW: [&str; 6] = [
    MANAGEMENT_BASE[0],
    MANAGEMENT_BASE[1],
    MANAGEMENT_BASE[2],
    MANAGEMENT_BASE[3],
    MANAGEMENT_BASE[4],
    "Uses assessment results to adjust instruction and gives timely feedback on student work.",
];

const COMMITMENT: &str = "Commitment";
const KNOWLEDGE_OF_SUBJECT: &str = "Knowledge of Subject";
const TEACHING_FOR_INDEPENDENT_LEARNING: &str = "Teaching for Independent Learning";
const MANAGEMENT_OF_LEARNING: &str = "Management of Learning";

static OLD_RUBRIC: &[RubricCategory] = &[
    RubricCategory {
        code: CategoryCode::A,
        title: COMMITMENT,
        indicators: &COMMITMENT_BASE,
    },
    RubricCategory {
        code: CategoryCode::B,
        title: KNOWLEDGE_OF_SUBJECT,
        indicators: &KNOWLEDGE,
    },
    RubricCategory {
        code: CategoryCode::C,
        title: TEACHING_FOR_INDEPENDENT_LEARNING,
        indicators: &INDEPENDENT_LEARNING,
    },
    RubricCategory {
        code: CategoryCode::D,
        title: MANAGEMENT_OF_LEARNING,
        indicators: &MANAGEMENT_BASE,
    },
];

static NEW_RUBRIC: &[RubricCategory] = &[
    RubricCategory {
        code: CategoryCode::A,
        title: COMMITMENT,
        indicators: &COMMITMENT_NEW,
    },
    RubricCategory {
        code: CategoryCode::B,
        title: KNOWLEDGE_OF_SUBJECT,
        indicators: &KNOWLEDGE,
    },
    RubricCategory {
        code: CategoryCode::C,
        title: TEACHING_FOR_INDEPENDENT_LEARNING,
        indicators: &INDEPENDENT_LEARNING,
    },
    RubricCategory {
        code: CategoryCode::D,
        title: MANAGEMENT_OF_LEARNING,
        indicators: &MANAGEMENT_NEW,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_counts() {
        assert_eq!(RubricVersion::Old.indicator_count(), 20);
        assert_eq!(RubricVersion::New.indicator_count(), 22);

        let counts: Vec<usize> = RubricVersion::New
            .categories()
            .iter()
            .map(|c| c.indicators.len())
            .collect();
        assert_eq!(counts, vec![6, 5, 5, 6]);
    }

    #[test]
    fn test_new_layout_extends_old() {
        for old in RubricVersion::Old.categories() {
            let new = RubricVersion::New.category(old.code).unwrap();
            assert_eq!(old.title, new.title);
            assert_eq!(&new.indicators[..old.indicators.len()], old.indicators);
        }
    }

    #[test]
    fn test_version_round_trip_through_str() {
        assert_eq!("old".parse::<RubricVersion>().unwrap(), RubricVersion::Old);
        assert_eq!(RubricVersion::New.to_string(), "new");
        assert!("v3".parse::<RubricVersion>().is_err());
        assert_eq!("c".parse::<CategoryCode>().unwrap(), CategoryCode::C);
    }
}
