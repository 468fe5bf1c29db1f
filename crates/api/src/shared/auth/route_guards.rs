use crate::error::KlubbError;
use actix_web::HttpRequest;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use klubb_domain::{User, UserRole, ID};
use klubb_infra::KlubbContext;
use serde::{Deserialize, Serialize};

const TOKEN_LIFETIME_MILLIS: i64 = 1000 * 60 * 60 * 24 * 7; // 7 days

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub role: UserRole,
    /// Expiry, seconds since epoch
    pub exp: usize,
    /// Issued at, seconds since epoch
    pub iat: usize,
}

pub fn issue_token(user: &User, ctx: &KlubbContext) -> Result<String, KlubbError> {
    let now = ctx.sys.get_timestamp_millis();
    let claims = Claims {
        sub: user.id.as_string(),
        role: user.role.clone(),
        exp: ((now + TOKEN_LIFETIME_MILLIS) / 1000) as usize,
        iat: (now / 1000) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(ctx.config.jwt_secret.as_bytes()),
    )
    .map_err(|_| KlubbError::InternalError)
}

fn parse_bearer_token(req: &HttpRequest) -> Result<String, KlubbError> {
    let header = req
        .headers()
        .get("Authorization")
        .ok_or_else(|| KlubbError::Unauthorized("Missing Authorization header".into()))?;
    let header = header
        .to_str()
        .map_err(|_| KlubbError::Unauthorized("Malformed Authorization header".into()))?;
    match header.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(KlubbError::Unauthorized(
            "Expected Authorization header to be on the format: Bearer <token>".into(),
        )),
    }
}

/// Authenticates the request and resolves the calling `User`.
pub async fn protect_route(req: &HttpRequest, ctx: &KlubbContext) -> Result<User, KlubbError> {
    let token = parse_bearer_token(req)?;
    let token_data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(ctx.config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| KlubbError::Unauthorized("Invalid or expired token".into()))?;

    let user_id = token_data
        .claims
        .sub
        .parse::<ID>()
        .map_err(|_| KlubbError::Unauthorized("Invalid token subject".into()))?;

    let user = ctx
        .repos
        .users
        .find(&user_id)
        .await
        .ok_or_else(|| KlubbError::Unauthorized("Invalid or expired token".into()))?;

    if !user.active {
        return Err(KlubbError::Unauthorized("Account is deactivated".into()));
    }

    Ok(user)
}

/// Like `protect_route` but additionally requires the admin role.
pub async fn protect_admin_route(
    req: &HttpRequest,
    ctx: &KlubbContext,
) -> Result<User, KlubbError> {
    let user = protect_route(req, ctx).await?;
    if user.role != UserRole::Admin {
        return Err(KlubbError::Forbidden(
            "This action requires the admin role".into(),
        ));
    }
    Ok(user)
}
