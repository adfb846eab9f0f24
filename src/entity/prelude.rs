//! 预导入模块，方便使用

pub use super::colleges::{
    ActiveModel as CollegeActiveModel, Entity as Colleges, Model as CollegeModel,
};
pub use super::evaluation_assignments::{
    ActiveModel as EvaluationAssignmentActiveModel, Entity as EvaluationAssignments,
    Model as EvaluationAssignmentModel,
};
pub use super::evaluation_codes::{
    ActiveModel as EvaluationCodeActiveModel, Entity as EvaluationCodes,
    Model as EvaluationCodeModel,
};
pub use super::evaluation_ratings_detail::{
    ActiveModel as RatingDetailActiveModel, Entity as EvaluationRatingsDetail,
    Model as RatingDetailModel,
};
pub use super::evaluations::{
    ActiveModel as EvaluationActiveModel, Entity as Evaluations, Model as EvaluationModel,
};
pub use super::programs::{
    ActiveModel as ProgramActiveModel, Entity as Programs, Model as ProgramModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
