pub mod auth;
pub mod colleges;
pub mod common;
pub mod evaluation_codes;
pub mod evaluations;
pub mod programs;
pub mod reports;
pub mod subjects;
pub mod users;

pub use common::{ApiResponse, PaginationInfo, PaginationQuery};

// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1000-1999
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1002,
    NotFound = 1003,
    InternalServerError = 1004,
    RateLimitExceeded = 1005,
    ValidationFailed = 1006,
    Conflict = 1007,

    // 认证错误 2000-2999
    AuthFailed = 2000,
    RegisterFailed = 2001,
    PasswordMismatch = 2002,
    AccountDisabled = 2003,

    // 用户错误 3000-3999
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    UserNameInvalid = 3002,
    UserEmailInvalid = 3003,
    UserPasswordInvalid = 3004,
    UserNameAlreadyExists = 3005,
    UserEmailAlreadyExists = 3006,
    UserCreationFailed = 3007,
    UserUpdateFailed = 3008,
    UserDeleteFailed = 3009,
    CanNotDeleteCurrentUser = 3010,

    // 学院/专业/课程错误 4000-4999
    CollegeNotFound = 4000,
    CollegeAlreadyExists = 4001,
    ProgramNotFound = 4002,
    ProgramAlreadyExists = 4003,
    SubjectNotFound = 4004,
    SubjectAlreadyExists = 4005,
    DirectoryInUse = 4006,

    // 评教码错误 5000-5999
    EvaluationCodeNotFound = 5000,
    EvaluationCodeInvalid = 5001,
    EvaluationCodeInactive = 5002,
    EvaluationCodeRoleMismatch = 5003,
    SelfEvaluationNotAllowed = 5004,
    AlreadyEvaluated = 5005,
    EvaluationCodeGenerationFailed = 5006,
    InvalidEvaluatee = 5007,
    InvalidPeriod = 5008,

    // 评教错误 6000-6999
    AssignmentNotFound = 6000,
    RatingIncomplete = 6001,
    RatingInvalid = 6002,
    EvaluationNotFound = 6003,
    EvaluationSubmitFailed = 6004,

    // 报表错误 7000-7999
    ReportScopeDenied = 7000,
}
