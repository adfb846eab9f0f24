pub mod auth;
pub mod directory;
pub mod evaluation_codes;
pub mod evaluations;
pub mod frontend;
pub mod reports;
pub mod users;

pub use auth::configure_auth_routes;
pub use directory::configure_directory_routes;
pub use evaluation_codes::configure_evaluation_code_routes;
pub use evaluations::configure_evaluation_routes;
pub use frontend::configure_frontend_routes;
pub use reports::configure_report_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部路由，前端兜底路由放在最后
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    configure_auth_routes(cfg);
    configure_user_routes(cfg);
    configure_directory_routes(cfg);
    configure_evaluation_code_routes(cfg);
    configure_evaluation_routes(cfg);
    configure_report_routes(cfg);
    configure_frontend_routes(cfg);
}
