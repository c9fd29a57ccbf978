use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::error::AppError;

use super::types::{Principal, Role};

/// What a route demands of the caller's role. `Unrestricted` admits
/// everyone, authenticated or not; an empty `AnyOf` admits no one.
#[derive(Debug, Clone)]
pub enum RoleRequirement {
    Unrestricted,
    AnyOf(Vec<Role>),
}

impl RoleRequirement {
    pub fn any_of<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        Self::AnyOf(roles.into_iter().collect())
    }
}

pub fn authorize(principal: Option<&Principal>, requirement: &RoleRequirement) -> bool {
    match requirement {
        RoleRequirement::Unrestricted => true,
        RoleRequirement::AnyOf(roles) => match principal {
            Some(principal) => roles.contains(&principal.role),
            None => false,
        },
    }
}

#[derive(Clone)]
pub struct RequireRolesLayer {
    requirement: RoleRequirement,
}

impl RequireRolesLayer {
    pub fn new(requirement: RoleRequirement) -> Self {
        Self { requirement }
    }
}

#[derive(Clone)]
pub struct RequireRoles<S> {
    inner: S,
    requirement: RoleRequirement,
}

impl<S> Layer<S> for RequireRolesLayer {
    type Service = RequireRoles<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequireRoles {
            inner,
            requirement: self.requirement.clone(),
        }
    }
}

impl<S> Service<Request<Body>> for RequireRoles<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let requirement = self.requirement.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let principal = req.extensions().get::<Principal>();

            if principal.is_none() && !matches!(requirement, RoleRequirement::Unrestricted) {
                return Ok(AppError::unauthorized("No authenticated principal").into_response());
            }

            if !authorize(principal, &requirement) {
                return Ok(AppError::forbidden("Missing required role").into_response());
            }

            inner.call(req).await
        })
    }
}
