use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static DIRECTORY_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]*$").expect("Invalid directory code regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：5 <= x <= 16
    if username.len() < 5 || username.len() > 16 {
        return Err("Username length must be between 5 and 16 characters");
    }
    // 用户名格式校验：只能包含字母、数字、下划线或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 学院/专业/课程代码：1-20 位字母数字或连字符，不能以连字符开头
pub fn validate_directory_code(code: &str) -> Result<(), &'static str> {
    if code.is_empty() || code.len() > 20 {
        return Err("Code length must be between 1 and 20 characters");
    }
    if !DIRECTORY_CODE_RE.is_match(code) {
        return Err("Code must contain only letters, numbers or hyphens");
    }
    Ok(())
}

/// 姓名、学院名称等展示文本
pub fn validate_display_text(value: &str, field: &'static str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if trimmed.chars().count() > 128 {
        return Err(format!("{field} must be at most 128 characters"));
    }
    Ok(())
}

/// 班级（section）标识
pub fn validate_section(section: &str) -> Result<(), &'static str> {
    let trimmed = section.trim();
    if trimmed.is_empty() || trimmed.chars().count() > 32 {
        return Err("Section must be between 1 and 32 characters");
    }
    Ok(())
}

/// 密码策略未满足的项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordIssue {
    TooShort,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
    TooCommon,
}

impl PasswordIssue {
    pub fn message(&self) -> &'static str {
        match self {
            PasswordIssue::TooShort => "Password must be at least 8 characters long",
            PasswordIssue::MissingUppercase => {
                "Password must contain at least one uppercase letter"
            }
            PasswordIssue::MissingLowercase => {
                "Password must contain at least one lowercase letter"
            }
            PasswordIssue::MissingDigit => "Password must contain at least one digit",
            PasswordIssue::TooCommon => {
                "Password is too common, please choose a stronger password"
            }
        }
    }
}

const COMMON_PASSWORDS: &[&str] = &[
    "password1",
    "qwerty123",
    "abcd1234",
    "admin1234",
    "student123",
    "faculty123",
    "welcome123",
];

/// 密码策略：至少 8 位，含大小写字母与数字，且不在常见密码表中
pub fn password_issues(password: &str) -> Vec<PasswordIssue> {
    let checks = [
        (password.chars().count() < 8, PasswordIssue::TooShort),
        (
            !password.chars().any(|c| c.is_ascii_uppercase()),
            PasswordIssue::MissingUppercase,
        ),
        (
            !password.chars().any(|c| c.is_ascii_lowercase()),
            PasswordIssue::MissingLowercase,
        ),
        (
            !password.chars().any(|c| c.is_ascii_digit()),
            PasswordIssue::MissingDigit,
        ),
        (
            COMMON_PASSWORDS
                .iter()
                .any(|weak| password.eq_ignore_ascii_case(weak)),
            PasswordIssue::TooCommon,
        ),
    ];
    checks
        .into_iter()
        .filter_map(|(failed, issue)| failed.then_some(issue))
        .collect()
}

/// 不满足时返回以分号连接的全部原因
pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let issues = password_issues(password);
    if issues.is_empty() {
        return Ok(());
    }
    Err(issues
        .iter()
        .map(PasswordIssue::message)
        .collect::<Vec<_>>()
        .join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_code() {
        assert!(validate_directory_code("CCS").is_ok());
        assert!(validate_directory_code("BSIT-2").is_ok());
        assert!(validate_directory_code("").is_err());
        assert!(validate_directory_code("-CS").is_err());
        assert!(validate_directory_code("CS 101").is_err());
        assert!(validate_directory_code(&"X".repeat(21)).is_err());
    }

    #[test]
    fn test_display_text_and_section() {
        assert!(validate_display_text("Maria Santos", "Full name").is_ok());
        assert_eq!(
            validate_display_text("   ", "Full name").unwrap_err(),
            "Full name must not be empty"
        );
        assert!(validate_section("BSIT 3-A").is_ok());
        assert!(validate_section(" ").is_err());
    }

    #[test]
    fn test_username_and_email() {
        assert!(validate_username("m.santos").is_err());
        assert!(validate_username("msantos_01").is_ok());
        assert!(validate_email("dean@college.edu.ph").is_ok());
        assert!(validate_email("dean@college").is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(password_issues("SecureP@ss1").is_empty());
        assert!(password_issues("Faculty2024x").is_empty());

        assert_eq!(password_issues("Ab1"), vec![PasswordIssue::TooShort]);
        assert_eq!(password_issues("abcd12345"), vec![PasswordIssue::MissingUppercase]);
        assert_eq!(password_issues("AbcdEfgh"), vec![PasswordIssue::MissingDigit]);
        assert_eq!(password_issues("Student123"), vec![PasswordIssue::TooCommon]);
    }

    #[test]
    fn test_password_message_joins_issues() {
        let err = validate_password_simple("abc").unwrap_err();
        assert_eq!(
            err,
            "Password must be at least 8 characters long; \
             Password must contain at least one uppercase letter; \
             Password must contain at least one digit"
        );
    }
}
