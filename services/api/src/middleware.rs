//! Authentication middleware for JWT token validation

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::error;
use uuid::Uuid;

use crate::{error::ApiError, jwt::TokenType, models::ROLE_ADMIN, state::AppState};

/// Authenticated employee attached to the request by the auth middleware
#[derive(Debug, Clone)]
pub struct AuthEmployee {
    pub id: Uuid,
    pub email: String,
    pub roles: Vec<i32>,
}

impl AuthEmployee {
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&ROLE_ADMIN)
    }

    /// Admins see everything; employees only their own records
    pub fn can_access(&self, employee_id: Uuid) -> bool {
        self.is_admin() || self.id == employee_id
    }

    /// Guard for management-only operations
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "Access denied. Admin access required.".to_string(),
            ))
        }
    }

    /// The ownership filter applied to schedule reads: admins read
    /// unfiltered, employees only their own shifts
    pub fn schedule_filter(&self) -> Option<Uuid> {
        if self.is_admin() { None } else { Some(self.id) }
    }
}

/// Validate the Bearer access token and attach the employee identity to
/// the request
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract the Authorization header
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    let claims = state
        .jwt_service
        .validate_token(token)
        .map_err(|_| ApiError::Unauthorized)?;

    // Refresh tokens are not valid for API access
    if claims.token_type != TokenType::Access {
        return Err(ApiError::Unauthorized);
    }

    let is_blacklisted = state
        .jwt_service
        .is_token_blacklisted(&state.redis_pool, token)
        .await
        .map_err(|e| {
            error!("Failed to check token blacklist: {}", e);
            ApiError::InternalServerError
        })?;

    if is_blacklisted {
        return Err(ApiError::Unauthorized);
    }

    let employee = AuthEmployee {
        id: claims.sub,
        email: claims.email,
        roles: claims.roles,
    };

    req.extensions_mut().insert(employee);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ROLE_EMPLOYEE;

    fn auth(roles: Vec<i32>) -> AuthEmployee {
        AuthEmployee {
            id: Uuid::new_v4(),
            email: "ana@kiosk.example".to_string(),
            roles,
        }
    }

    #[test]
    fn admin_detection_uses_the_numeric_tag() {
        assert!(auth(vec![ROLE_EMPLOYEE, ROLE_ADMIN]).is_admin());
        assert!(!auth(vec![ROLE_EMPLOYEE]).is_admin());
        assert!(auth(vec![ROLE_EMPLOYEE]).require_admin().is_err());
    }

    #[test]
    fn ownership_rules() {
        let employee = auth(vec![ROLE_EMPLOYEE]);
        assert!(employee.can_access(employee.id));
        assert!(!employee.can_access(Uuid::new_v4()));
        assert_eq!(employee.schedule_filter(), Some(employee.id));

        let admin = auth(vec![ROLE_EMPLOYEE, ROLE_ADMIN]);
        assert!(admin.can_access(Uuid::new_v4()));
        assert_eq!(admin.schedule_filter(), None);
    }
}
