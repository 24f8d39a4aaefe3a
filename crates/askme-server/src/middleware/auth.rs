// Authentication middleware for Actix-web
// Decodes the login token, if any, and stores an AuthContext for the handlers

use actix_service::forward_ready;
use actix_utils::future::{Ready, ok};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web::Data,
};

use futures::future::LocalBoxFuture;

use askme_auth::model::{
    ACCESS_TOKEN, AUTHORIZATION_HEADER, AuthContext, BEARER_PREFIX, TOKEN_PREFIX,
};
use askme_auth::service::auth::decode_jwt_token_cached;

use crate::model::AppState;

// Authentication middleware transformer
pub struct Authentication;

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthenticationMiddleware { service })
    }
}

pub struct AuthenticationMiddleware<S> {
    service: S,
}

/// Strip a `Token ` or `Bearer ` scheme from an Authorization header value
fn strip_scheme(value: &str) -> Option<&str> {
    value
        .strip_prefix(TOKEN_PREFIX)
        .or_else(|| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Extract token from request using 3 sources in priority order:
/// 1. `Authorization: Token <token>` or `Authorization: Bearer <token>` header
/// 2. `accessToken` HTTP header
/// 3. `accessToken` query parameter
fn extract_token(req: &ServiceRequest) -> Option<String> {
    if let Some(header_val) = req.headers().get(AUTHORIZATION_HEADER)
        && let Ok(s) = header_val.to_str()
        && let Some(token) = strip_scheme(s.trim())
    {
        return Some(token.to_string());
    }

    if let Some(header_val) = req.headers().get(ACCESS_TOKEN)
        && let Ok(s) = header_val.to_str()
    {
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }

    if let Some(query) = req.uri().query() {
        for pair in query.split('&') {
            if let Some((key, value)) = pair.split_once('=')
                && key == ACCESS_TOKEN
                && !value.is_empty()
            {
                return Some(value.to_string());
            }
        }
    }

    None
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if Method::OPTIONS != *req.method() {
            let mut auth_context = AuthContext::default();

            if let Some(token) = extract_token(&req) {
                auth_context.token_provided = true;

                if let Some(app_state) = req.app_data::<Data<AppState>>() {
                    match decode_jwt_token_cached(&token, app_state.token_secret_key()) {
                        Ok(token_data) => {
                            auth_context.username = token_data.claims.sub;
                            auth_context.token_key = token_data.claims.jti;
                        }
                        Err(err) => {
                            tracing::debug!("rejected token: {}", err);
                            auth_context.jwt_error = Some(err);
                        }
                    }
                } else {
                    tracing::error!("AppState not found in request app_data");
                }

                auth_context.token = token;
            }

            req.extensions_mut().insert(auth_context);
        }

        let res = self.service.call(req);

        Box::pin(async move { res.await.map(ServiceResponse::map_into_left_body) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_strip_scheme() {
        assert_eq!(strip_scheme("Token abc"), Some("abc"));
        assert_eq!(strip_scheme("Bearer abc"), Some("abc"));
        assert_eq!(strip_scheme("Basic abc"), None);
        assert_eq!(strip_scheme("Token "), None);
    }

    #[test]
    fn test_extract_token_sources() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION_HEADER, "Token from-auth"))
            .insert_header((ACCESS_TOKEN, "from-header"))
            .to_srv_request();
        assert_eq!(extract_token(&req).as_deref(), Some("from-auth"));

        let req = TestRequest::default()
            .insert_header((ACCESS_TOKEN, "from-header"))
            .to_srv_request();
        assert_eq!(extract_token(&req).as_deref(), Some("from-header"));

        let req = TestRequest::default()
            .uri("/questions/?pageNo=1&accessToken=from-query")
            .to_srv_request();
        assert_eq!(extract_token(&req).as_deref(), Some("from-query"));

        let req = TestRequest::default().uri("/questions/").to_srv_request();
        assert!(extract_token(&req).is_none());
    }
}
