use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 一个可能没有数据的分值
///
/// 没有数据与 0 分严格区分：JSON 中为 `null`，文本中为 `N/A`。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Score {
    #[default]
    NoData,
    Value(f64),
}

impl Score {
    pub fn value(self) -> Option<f64> {
        match self {
            Score::NoData => None,
            Score::Value(v) => Some(v),
        }
    }

    pub fn has_data(self) -> bool {
        matches!(self, Score::Value(_))
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Score {
        match self {
            Score::NoData => Score::NoData,
            Score::Value(v) => Score::Value(f(v)),
        }
    }

    /// 两位小数（用于入库和报表展示）
    pub fn rounded(self) -> Score {
        self.map(round2)
    }

    /// 对有数据的分值求算术平均，全部无数据时返回 NoData
    pub fn mean<I>(scores: I) -> Score
    where
        I: IntoIterator<Item = Score>,
    {
        let (sum, count) = scores
            .into_iter()
            .filter_map(Score::value)
            .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
        if count == 0 {
            Score::NoData
        } else {
            Score::Value(sum / count as f64)
        }
    }

    /// 对有数据的分值求和，全部无数据时返回 NoData
    pub fn sum<I>(scores: I) -> Score
    where
        I: IntoIterator<Item = Score>,
    {
        scores
            .into_iter()
            .filter_map(Score::value)
            .fold(Score::NoData, |acc, v| match acc {
                Score::NoData => Score::Value(v),
                Score::Value(s) => Score::Value(s + v),
            })
    }
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl From<Option<f64>> for Score {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) => Score::Value(v),
            None => Score::NoData,
        }
    }
}

impl From<Score> for Option<f64> {
    fn from(value: Score) -> Self {
        value.value()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::NoData => write!(f, "N/A"),
            Score::Value(v) => write!(f, "{v:.2}"),
        }
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Score::NoData => serializer.serialize_none(),
            Score::Value(v) => serializer.serialize_f64(round2(*v)),
        }
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Score::NoData.to_string(), "N/A");
        assert_eq!(Score::Value(4.0).to_string(), "4.00");
        assert_eq!(Score::Value(3.456).to_string(), "3.46");
    }

    #[test]
    fn test_json_null_is_not_zero() {
        assert_eq!(serde_json::to_string(&Score::NoData).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Score::Value(0.0)).unwrap(), "0.0");
        assert_eq!(serde_json::to_string(&Score::Value(19.2)).unwrap(), "19.2");

        let parsed: Score = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, Score::NoData);
    }

    #[test]
    fn test_mean_and_sum_skip_missing() {
        let scores = [Score::Value(4.0), Score::NoData, Score::Value(2.0)];
        assert_eq!(Score::mean(scores), Score::Value(3.0));
        assert_eq!(Score::sum(scores), Score::Value(6.0));
        assert_eq!(Score::mean([Score::NoData, Score::NoData]), Score::NoData);
        assert_eq!(Score::sum(Vec::new()), Score::NoData);
    }
}
