//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_faculty_eval_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum FacultyEvalError {
            $($variant(String),)*
        }

        impl FacultyEvalError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(FacultyEvalError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(FacultyEvalError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(FacultyEvalError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl FacultyEvalError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        FacultyEvalError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_faculty_eval_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    Serialization("E008", "Serialization Error"),
    // 唯一键或外键约束冲突
    Conflict("E009", "Conflict Error"),
    CodeGeneration("E010", "Code Generation Error"),
}

impl FacultyEvalError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for FacultyEvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for FacultyEvalError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for FacultyEvalError {
    fn from(err: sea_orm::DbErr) -> Self {
        FacultyEvalError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for FacultyEvalError {
    fn from(err: std::io::Error) -> Self {
        FacultyEvalError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for FacultyEvalError {
    fn from(err: serde_json::Error) -> Self {
        FacultyEvalError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FacultyEvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(FacultyEvalError::cache_connection("test").code(), "E001");
        assert_eq!(FacultyEvalError::database_config("test").code(), "E003");
        assert_eq!(FacultyEvalError::validation("test").code(), "E007");
        assert_eq!(FacultyEvalError::serialization("test").code(), "E008");
    }

    #[test]
    fn test_domain_error_codes() {
        assert_eq!(FacultyEvalError::conflict("test").code(), "E009");
        assert_eq!(FacultyEvalError::code_generation("test").code(), "E010");
        assert_eq!(
            FacultyEvalError::code_generation("exhausted").error_type(),
            "Code Generation Error"
        );
    }

    #[test]
    fn test_db_error_conversion() {
        let err: FacultyEvalError = sea_orm::DbErr::Custom("boom".into()).into();
        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("boom"));
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            FacultyEvalError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            FacultyEvalError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = FacultyEvalError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = FacultyEvalError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }
}
