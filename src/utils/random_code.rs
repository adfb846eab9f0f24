//! 评教码生成与规范化
//!
//! 格式为 `XXX-XXX`，字符集为 `A-Z0-9`。

use rand::Rng;

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const GROUP_LEN: usize = 3;

/// 生成 `len` 位随机字符
pub fn generate_random_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

/// 生成一个 `XXX-XXX` 评教码
pub fn generate_evaluation_code() -> String {
    let raw = generate_random_code(GROUP_LEN * 2);
    format!("{}-{}", &raw[..GROUP_LEN], &raw[GROUP_LEN..])
}

/// 是否为合法的 `XXX-XXX` 评教码
pub fn is_valid_evaluation_code(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == GROUP_LEN * 2 + 1
        && bytes[GROUP_LEN] == b'-'
        && bytes
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != GROUP_LEN)
            .all(|(_, b)| CODE_CHARSET.contains(b))
}

/// 规范化用户输入的评教码：去空白、转大写、为 6 位裸码补上连字符
///
/// 格式不合法时返回 None。
pub fn normalize_evaluation_code(input: &str) -> Option<String> {
    let trimmed: String = input
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();
    if !trimmed.is_ascii() {
        return None;
    }

    let candidate = if trimmed.len() == GROUP_LEN * 2 && !trimmed.contains('-') {
        format!("{}-{}", &trimmed[..GROUP_LEN], &trimmed[GROUP_LEN..])
    } else {
        trimmed
    };

    is_valid_evaluation_code(&candidate).then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_format() {
        for _ in 0..100 {
            let code = generate_evaluation_code();
            assert!(is_valid_evaluation_code(&code), "{code}");
        }
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_evaluation_code(" abc-123 ").as_deref(), Some("ABC-123"));
        assert_eq!(normalize_evaluation_code("abc123").as_deref(), Some("ABC-123"));
        assert_eq!(normalize_evaluation_code("ab c12 3").as_deref(), Some("ABC-123"));
        assert_eq!(normalize_evaluation_code("ABC-12"), None);
        assert_eq!(normalize_evaluation_code("ABC_123"), None);
        assert_eq!(normalize_evaluation_code("ÄBC-123"), None);
        assert_eq!(normalize_evaluation_code("ABÄ12"), None);
        assert_eq!(normalize_evaluation_code(""), None);
    }
}
