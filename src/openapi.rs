use utoipa::OpenApi;

/// OpenAPI document for the REST surface, served at
/// `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "QCTrack API",
        version = "0.1.0",
        description = "Inspection tracking backend: product quality inspections, quality-improvement items, comments and field-level change history. All endpoints except login require a bearer token."
    ),
    paths(
        crate::handlers::auth::login,
        crate::handlers::auth::change_password,
        crate::handlers::inspections::list_inspections,
        crate::handlers::inspections::list_my_inspections,
        crate::handlers::inspections::create_inspection,
        crate::handlers::inspections::get_inspection,
        crate::handlers::inspections::update_inspection,
        crate::handlers::inspections::delete_inspection,
        crate::handlers::quality::list_quality_improvements,
        crate::handlers::quality::list_my_quality_improvements,
        crate::handlers::quality::create_quality_improvement,
        crate::handlers::quality::get_quality_improvement,
        crate::handlers::quality::update_quality_improvement,
        crate::handlers::quality::delete_quality_improvement,
        crate::handlers::comments::list_comments,
        crate::handlers::comments::create_comment,
        crate::handlers::comments::update_comment,
        crate::handlers::comments::delete_comment,
        crate::handlers::histories::list_histories,
        crate::handlers::users::list_users,
        crate::handlers::users::create_user,
        crate::handlers::users::delete_user,
        crate::handlers::companies::list_companies,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::handlers::auth::LoginRequest,
        crate::handlers::auth::ChangePasswordRequest,
        crate::handlers::inspections::CreateInspectionRequest,
        crate::handlers::inspections::UpdateInspectionRequest,
        crate::handlers::quality::CreateQualityRequest,
        crate::handlers::quality::UpdateQualityRequest,
        crate::handlers::comments::CreateCommentRequest,
        crate::handlers::comments::UpdateCommentRequest,
        crate::handlers::users::CreateUserRequest,
        crate::services::inspections::InspectionRow,
        crate::services::quality::QualityRow,
        crate::services::comments::CommentRow,
        crate::services::histories::HistoryRow,
        crate::services::users::UserSummary,
    )),
    tags(
        (name = "auth", description = "Login and password management"),
        (name = "inspections", description = "Quality inspection records"),
        (name = "quality-improvements", description = "Quality-improvement action items"),
        (name = "comments", description = "Comments on inspections and quality-improvement items"),
        (name = "histories", description = "Field-level change history"),
        (name = "users", description = "User listing and administration"),
        (name = "companies", description = "Company listing"),
    )
)]
pub struct ApiDoc;
