// Access control for API handlers
//
// The authentication middleware only decodes the token; a handler that
// needs a user builds a `Secured` guard and awaits `authorize`, which checks
// the token row, loads the user and applies the requested access level.

use actix_web::{HttpMessage, HttpRequest, web};

use askme_auth::model::AuthContext;
use askme_auth::service::account;
use askme_common::AskError;
use askme_persistence::UserInfo;

use crate::error::AppError;
use crate::model::app_state::AppState;

/// Access level required by an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Access {
    /// Any logged in user
    #[default]
    Authenticated,
    /// Staff users only
    Admin,
}

/// The user behind an authorized request
#[derive(Debug, Clone)]
pub struct Principal {
    pub user: UserInfo,
    pub token: String,
    pub token_key: String,
}

impl Principal {
    pub fn id(&self) -> i32 {
        self.user.id
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_staff
    }

    /// Owners may change their own objects, staff may change anything
    pub fn ensure_owner_or_admin(&self, owner_id: i32) -> Result<(), AskError> {
        if self.user.id == owner_id || self.is_admin() {
            Ok(())
        } else {
            Err(AskError::permission_denied())
        }
    }
}

#[derive(Debug, Clone)]
pub struct Secured<'a> {
    pub req: &'a HttpRequest,
    pub data: &'a web::Data<AppState>,
    pub access: Access,
}

impl<'a> Secured<'a> {
    pub fn builder(req: &'a HttpRequest, data: &'a web::Data<AppState>) -> SecuredBuilder<'a> {
        SecuredBuilder::new(req, data)
    }

    pub async fn authorize(&self) -> Result<Principal, AppError> {
        let auth_context = self
            .req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .unwrap_or_default();

        if !auth_context.token_provided {
            return Err(AskError::not_authenticated().into());
        }
        if auth_context.jwt_error.is_some() {
            return Err(AskError::NotAuthenticated(auth_context.jwt_error_string()).into());
        }

        let user = account::resolve_user(
            self.data.persistence(),
            &auth_context.username,
            &auth_context.token_key,
        )
        .await?
        .ok_or_else(|| AskError::NotAuthenticated("Invalid token.".to_string()))?;

        if self.access == Access::Admin && !user.is_staff {
            tracing::debug!(user_id = user.id, path = self.req.path(), "admin access refused");
            return Err(AskError::permission_denied().into());
        }

        Ok(Principal {
            user,
            token: auth_context.token,
            token_key: auth_context.token_key,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SecuredBuilder<'a> {
    req: &'a HttpRequest,
    data: &'a web::Data<AppState>,
    access: Access,
}

impl<'a> SecuredBuilder<'a> {
    pub fn new(req: &'a HttpRequest, data: &'a web::Data<AppState>) -> Self {
        SecuredBuilder::<'a> {
            req,
            data,
            access: Access::default(),
        }
    }

    pub fn access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn admin(self) -> Self {
        self.access(Access::Admin)
    }

    pub fn build(self) -> Secured<'a> {
        Secured::<'a> {
            req: self.req,
            data: self.data,
            access: self.access,
        }
    }
}

/// Shorthand for the common case: any authenticated user
pub async fn authenticated(
    req: &HttpRequest,
    data: &web::Data<AppState>,
) -> Result<Principal, AppError> {
    Secured::builder(req, data).build().authorize().await
}

/// Shorthand for staff-only endpoints
pub async fn admin(req: &HttpRequest, data: &web::Data<AppState>) -> Result<Principal, AppError> {
    Secured::builder(req, data).admin().build().authorize().await
}
