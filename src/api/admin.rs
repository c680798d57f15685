use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::api::attendance::store_unavailable;
use crate::auth::jwt::generate_admin_token;
use crate::auth::otp;
use crate::auth::password::{hash_secret, verify_secret};
use crate::config::Config;
use crate::external::sms::SmsChannel;
use crate::store;

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin123")]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    #[schema(example = 3600)]
    pub expires_in: usize,
}

#[derive(Deserialize, ToSchema)]
pub struct ResetConfirmRequest {
    #[schema(example = "123456")]
    pub code: String,

    #[schema(example = "new-password")]
    pub new_password: String,
}

/// Administrator login with the shared portal password.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Empty password"),
        (status = 401, description = "Invalid credentials"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Auth"
)]
pub async fn login(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<LoginRequest>,
) -> actix_web::Result<impl Responder> {
    if payload.password.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Password required"
        })));
    }

    let credential = match store::admin::fetch(pool.get_ref()).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            error!("Admin credential row missing; bootstrap did not run");
            return Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Admin credential not initialized"
            })));
        }
        Err(e) => {
            error!(error = %e, "Failed to fetch admin credential");
            return Ok(store_unavailable());
        }
    };

    if verify_secret(&payload.password, &credential.password_hash).is_err() {
        info!("Admin login rejected: password mismatch");
        return Ok(HttpResponse::Unauthorized().json(json!({
            "message": "Invalid credentials"
        })));
    }

    info!("Admin login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token: generate_admin_token(&config.jwt_secret, config.access_token_ttl),
        expires_in: config.access_token_ttl,
    }))
}

/// Starts the OTP-gated password reset. On delivery failure the raw code is
/// returned as an on-screen fallback instead of blocking the flow.
#[utoipa::path(
    post,
    path = "/auth/reset/request",
    responses(
        (status = 200, description = "OTP issued", body = Object, example = json!({
            "message": "OTP sent",
            "delivered": true
        }))
    ),
    tag = "Auth"
)]
pub async fn reset_request(
    config: web::Data<Config>,
    sms: web::Data<SmsChannel>,
) -> actix_web::Result<impl Responder> {
    let code = otp::issue(&config.admin_mobile).await;

    match sms
        .send_code(&config.admin_mobile, &code, "Password reset")
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "message": "OTP sent",
            "delivered": true
        }))),
        Err(e) => {
            warn!(error = %e, "OTP delivery failed, falling back to on-screen code");
            Ok(HttpResponse::Ok().json(json!({
                "message": "SMS delivery failed, use the fallback code",
                "delivered": false,
                "fallback_code": code
            })))
        }
    }
}

/// Completes the reset: a valid one-time code replaces the admin password.
#[utoipa::path(
    post,
    path = "/auth/reset/confirm",
    request_body = ResetConfirmRequest,
    responses(
        (status = 200, description = "Password updated"),
        (status = 400, description = "Password too short"),
        (status = 401, description = "Invalid or expired code"),
        (status = 503, description = "Store unavailable")
    ),
    tag = "Auth"
)]
pub async fn reset_confirm(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<ResetConfirmRequest>,
) -> actix_web::Result<impl Responder> {
    if payload.new_password.len() < 6 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Password must be at least 6 characters"
        })));
    }

    if !otp::verify(&config.admin_mobile, &payload.code).await {
        return Ok(HttpResponse::Unauthorized().json(json!({
            "message": "Invalid or expired code"
        })));
    }

    let hash = hash_secret(&payload.new_password);
    match store::admin::update_password(pool.get_ref(), &hash).await {
        Ok(()) => {
            info!("Admin password updated via OTP reset");
            Ok(HttpResponse::Ok().json(json!({
                "message": "Password updated"
            })))
        }
        Err(e) => {
            error!(error = %e, "Failed to update admin password");
            Ok(store_unavailable())
        }
    }
}
