use utoipa::OpenApi;

use crate::{
    api::models::{CreateUserRequest, ErrorResponse, LoginRequest, UpdateUserRequest},
    core::interactors::{auth::Token, users::UserOutput},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::list_users,
        super::handlers::get_user,
        super::handlers::current_user,
        super::handlers::create_user,
        super::handlers::update_user,
        super::handlers::delete_user,
        super::handlers::login
    ),
    components(schemas(
        CreateUserRequest,
        UpdateUserRequest,
        LoginRequest,
        ErrorResponse,
        UserOutput,
        Token
    )),
    info(
        title = "Userhub API",
        description = "User lifecycle management with bearer-token login",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
