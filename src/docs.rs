use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use eduplatform_auth::Role;
use eduplatform_models::MessageResponse;
use eduplatform_models::assignments::{
    Assignment, AssignmentAdminView, AssignmentWithInstructor, CreateAssignmentForm,
};
use eduplatform_models::auth::{AuthResponse, CurrentUser, LoginDto, RegisterDto};
use eduplatform_models::login_screens::LoginScreenImage;
use eduplatform_models::settings::{AppSetting, UpdateSettingsDto};
use eduplatform_models::submissions::{
    GradeSubmissionDto, Submission, SubmissionAdminView, SubmissionStatus, SubmissionWithStudent,
};
use eduplatform_models::users::{
    AdminResetPasswordDto, ChangePasswordDto, InstructorSummary, PasswordResetResponse,
    StudentSummary, UserSummary,
};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::login_screens::controller::LoginScreenUpload;
use crate::modules::settings::controller::LogoUpload;
use crate::modules::submissions::controller::SubmissionUpload;
use crate::modules::system::controller::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::login_usage,
        crate::modules::auth::controller::me,
        crate::modules::users::controller::list_users,
        crate::modules::users::controller::list_instructors,
        crate::modules::users::controller::list_my_students,
        crate::modules::users::controller::reset_password,
        crate::modules::users::controller::change_password,
        crate::modules::assignments::controller::create_assignment,
        crate::modules::assignments::controller::list_assignments,
        crate::modules::assignments::controller::my_assignments,
        crate::modules::assignments::controller::all_assignments,
        crate::modules::assignments::controller::assignment_submissions,
        crate::modules::submissions::controller::create_submission,
        crate::modules::submissions::controller::my_submissions,
        crate::modules::submissions::controller::grade_submission,
        crate::modules::submissions::controller::all_submissions,
        crate::modules::settings::controller::get_settings,
        crate::modules::settings::controller::update_settings,
        crate::modules::settings::controller::upload_logo,
        crate::modules::login_screens::controller::list_images,
        crate::modules::login_screens::controller::active_image,
        crate::modules::login_screens::controller::upload_image,
        crate::modules::login_screens::controller::activate_image,
        crate::modules::login_screens::controller::delete_image,
        crate::modules::system::controller::api_index,
        crate::modules::system::controller::health,
        crate::modules::system::controller::download_submission,
    ),
    components(
        schemas(
            Role,
            RegisterDto,
            LoginDto,
            AuthResponse,
            CurrentUser,
            UserSummary,
            InstructorSummary,
            StudentSummary,
            AdminResetPasswordDto,
            PasswordResetResponse,
            ChangePasswordDto,
            Assignment,
            AssignmentWithInstructor,
            AssignmentAdminView,
            CreateAssignmentForm,
            Submission,
            SubmissionStatus,
            SubmissionWithStudent,
            SubmissionAdminView,
            SubmissionUpload,
            GradeSubmissionDto,
            AppSetting,
            UpdateSettingsDto,
            LogoUpload,
            LoginScreenImage,
            LoginScreenUpload,
            MessageResponse,
            HealthResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and the current user"),
        (name = "Users", description = "User listings and password management"),
        (name = "Assignments", description = "Assignments and their submissions"),
        (name = "Submissions", description = "Submitting and grading work"),
        (name = "Settings", description = "Branding settings"),
        (name = "Login Screen Images", description = "Login screen backgrounds"),
        (name = "System", description = "Health and downloads")
    ),
    info(
        title = "EduPlatform API",
        version = "0.1.0",
        description = "Assignment management for instructors and students, with JWT authentication and role-based access.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

/// Both ways a client may present its token.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "x_auth_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-auth-token"))),
            );
        }
    }
}
