use learnhub_auth::{Role, TokenPair};
use learnhub_core::{PaginationMeta, PaginationParams};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    LoginRequest, LoginResponse, RefreshTokenRequest, RegisterRequestDto,
};
use crate::modules::branches::model::{
    Branch, CreateBranchDto, PaginatedBranchesResponse, UpdateBranchDto,
};
use crate::modules::centers::model::{
    CenterDetails, CenterSummary, CreateCenterDto, LearningCenter, PaginatedCentersResponse,
    UpdateCenterDto,
};
use crate::modules::comments::model::{
    Comment, CommentWithAuthor, CreateCommentDto, PaginatedCommentsResponse, UpdateCommentDto,
};
use crate::modules::likes::model::{CreateLikeDto, Like, LikedCenter};
use crate::modules::professions::model::{
    CreateProfessionDto, PaginatedProfessionsResponse, Profession, UpdateProfessionDto,
};
use crate::modules::regions::model::{
    CreateRegionDto, PaginatedRegionsResponse, Region, UpdateRegionDto,
};
use crate::modules::registrations::model::{
    CreateRegistrationDto, PaginatedRegistrationsResponse, Registration, RegistrationStatus,
    UpdateRegistrationStatusDto,
};
use crate::modules::resources::model::{
    CreateResourceCategoryDto, CreateResourceDto, PaginatedResourceCategoriesResponse,
    PaginatedResourcesResponse, Resource, ResourceCategory, UpdateResourceCategoryDto,
    UpdateResourceDto,
};
use crate::modules::subjects::model::{
    CreateSubjectDto, PaginatedSubjectsResponse, Subject, UpdateSubjectDto,
};
use crate::modules::users::model::{
    ChangePasswordDto, PaginatedUsersResponse, UpdateProfileDto, UpdateRoleDto, User,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_tokens,
        crate::modules::auth::controller::get_me,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_me,
        crate::modules::users::controller::change_my_password,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::update_user_role,
        crate::modules::users::controller::delete_user,
        crate::modules::regions::controller::create_region,
        crate::modules::regions::controller::get_regions,
        crate::modules::regions::controller::get_region,
        crate::modules::regions::controller::update_region,
        crate::modules::regions::controller::delete_region,
        crate::modules::centers::controller::create_center,
        crate::modules::centers::controller::get_centers,
        crate::modules::centers::controller::get_center,
        crate::modules::centers::controller::update_center,
        crate::modules::centers::controller::delete_center,
        crate::modules::branches::controller::create_branch,
        crate::modules::branches::controller::get_branches,
        crate::modules::branches::controller::get_branch,
        crate::modules::branches::controller::update_branch,
        crate::modules::branches::controller::delete_branch,
        crate::modules::subjects::controller::create_subject,
        crate::modules::subjects::controller::get_subjects,
        crate::modules::subjects::controller::get_subject,
        crate::modules::subjects::controller::update_subject,
        crate::modules::subjects::controller::delete_subject,
        crate::modules::professions::controller::create_profession,
        crate::modules::professions::controller::get_professions,
        crate::modules::professions::controller::get_profession,
        crate::modules::professions::controller::update_profession,
        crate::modules::professions::controller::delete_profession,
        crate::modules::comments::controller::get_comments,
        crate::modules::comments::controller::create_comment,
        crate::modules::comments::controller::update_comment,
        crate::modules::comments::controller::delete_comment,
        crate::modules::likes::controller::like_center,
        crate::modules::likes::controller::unlike_center,
        crate::modules::likes::controller::get_my_likes,
        crate::modules::registrations::controller::create_registration,
        crate::modules::registrations::controller::get_my_registrations,
        crate::modules::registrations::controller::get_registrations,
        crate::modules::registrations::controller::update_registration_status,
        crate::modules::registrations::controller::delete_registration,
        crate::modules::resources::controller::create_category,
        crate::modules::resources::controller::get_categories,
        crate::modules::resources::controller::get_category,
        crate::modules::resources::controller::update_category,
        crate::modules::resources::controller::delete_category,
        crate::modules::resources::controller::create_resource,
        crate::modules::resources::controller::get_resources,
        crate::modules::resources::controller::get_resource,
        crate::modules::resources::controller::update_resource,
        crate::modules::resources::controller::delete_resource,
    ),
    components(
        schemas(
            Role,
            TokenPair,
            ErrorResponse,
            PaginationMeta,
            PaginationParams,
            RegisterRequestDto,
            LoginRequest,
            LoginResponse,
            RefreshTokenRequest,
            User,
            UpdateProfileDto,
            ChangePasswordDto,
            UpdateRoleDto,
            PaginatedUsersResponse,
            Region,
            CreateRegionDto,
            UpdateRegionDto,
            PaginatedRegionsResponse,
            LearningCenter,
            CenterSummary,
            CenterDetails,
            CreateCenterDto,
            UpdateCenterDto,
            PaginatedCentersResponse,
            Branch,
            CreateBranchDto,
            UpdateBranchDto,
            PaginatedBranchesResponse,
            Subject,
            CreateSubjectDto,
            UpdateSubjectDto,
            PaginatedSubjectsResponse,
            Profession,
            CreateProfessionDto,
            UpdateProfessionDto,
            PaginatedProfessionsResponse,
            Comment,
            CommentWithAuthor,
            CreateCommentDto,
            UpdateCommentDto,
            PaginatedCommentsResponse,
            Like,
            CreateLikeDto,
            LikedCenter,
            Registration,
            RegistrationStatus,
            CreateRegistrationDto,
            UpdateRegistrationStatusDto,
            PaginatedRegistrationsResponse,
            ResourceCategory,
            CreateResourceCategoryDto,
            UpdateResourceCategoryDto,
            PaginatedResourceCategoriesResponse,
            Resource,
            CreateResourceDto,
            UpdateResourceDto,
            PaginatedResourcesResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and token refresh"),
        (name = "Users", description = "Profile and user administration"),
        (name = "Regions", description = "Geographic regions"),
        (name = "Learning Centers", description = "Learning center directory"),
        (name = "Branches", description = "Learning center branches"),
        (name = "Subjects", description = "Subjects taught at centers"),
        (name = "Professions", description = "Professions centers prepare for"),
        (name = "Comments", description = "Center reviews with star ratings"),
        (name = "Likes", description = "Favorite centers"),
        (name = "Registrations", description = "Visit registrations"),
        (name = "Resources", description = "Shared learning resources and their categories")
    ),
    info(
        title = "LearnHub API",
        version = "0.1.0",
        description = "Directory of learning centers with JWT-based role authorization, built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

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
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_gated_routes_with_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();

        assert!(json["components"]["securitySchemes"]["bearer_auth"].is_object());
        assert!(json["paths"]["/api/auth/login"]["post"].is_object());
        assert!(json["paths"]["/api/centers/{id}"]["get"].is_object());
        assert!(json["paths"]["/api/registrations/{id}/status"]["patch"].is_object());
    }
}
