use crate::shared::handlers::postgres_handler::PostgresHandler;
use crate::shared::types::account::{Account, AccessLevel};
use crate::shared::types::app::{ErrorResponse, Response, login_fail};
use crate::shared::util::config;

use actix_identity::Identity;
use actix_web::{
    get, post, HttpResponse, web::{self, Data},
    HttpMessage as _, HttpRequest, Result
};

use serde::{Serialize, Deserialize};


/// Resolves the session to an account. Stale sessions whose user was
/// deleted resolve to `None`.
pub async fn current_account(handler: &PostgresHandler, identity: Option<Identity>) -> Option<(Account, AccessLevel)> {
    let id = identity?.id().ok()?;
    let account = handler.get_user(id.as_str()).await.ok()?;
    let level = account.access_level(&config::get_config().auth);
    Some((account, level))
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String
}

#[post("/v1/login")]
async fn login(handler: Data<PostgresHandler>, req: HttpRequest, info: web::Json<LoginForm>) -> Result<HttpResponse> {
    let can_login = handler.can_login(info.username.as_str(), info.password.as_str()).await
        .unwrap_or(false);
    if !can_login { login_fail!() }

    if Identity::login(&req.extensions(), info.username.to_lowercase()).is_err() {
        return Ok(HttpResponse::InternalServerError().json(ErrorResponse { error: "Could not start session".to_string() }));
    }
    log::info!("User {} logged in", info.username);
    Ok(HttpResponse::Ok().json(Response { msg: "You logged in".to_string() }))
}

#[post("/v1/logout")]
async fn logout(id: Option<Identity>) -> Result<HttpResponse> {
    if let Some(id) = id { id.logout(); }
    Ok(HttpResponse::Ok().json(Response { msg: "You logged out".to_string() }))
}

#[derive(Serialize)]
struct MeReturn {
    id: String,
    name: String,
    email: String,
    access: AccessLevel
}

#[get("/v1/me")]
async fn me(handler: Data<PostgresHandler>, identity: Option<Identity>) -> Result<HttpResponse> {
    if let Some((account, access)) = current_account(&handler, identity).await {
        return Ok(HttpResponse::Ok().json(MeReturn {
            id: account.id,
            name: account.name,
            email: account.email,
            access
        }));
    }
    login_fail!();
}
