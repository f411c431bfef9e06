use actix_web::{Responder, post, web};

use crate::context::AppContext;
use crate::repository::ApiRepository;
use crate::routes::{action_failure, redirect};
use crate::services::billing::{open_portal as open_portal_service, start_checkout};

#[post("/billing/checkout")]
pub async fn checkout(ctx: AppContext, api: web::Data<ApiRepository>) -> impl Responder {
    let repo = ctx.api(&api);
    match start_checkout(&ctx.user, &repo).await {
        Ok(url) => redirect(url.as_str()),
        Err(err) => action_failure(
            err,
            "/professional",
            "Não foi possível iniciar a assinatura.",
        ),
    }
}

#[post("/billing/portal")]
pub async fn portal(ctx: AppContext, api: web::Data<ApiRepository>) -> impl Responder {
    let repo = ctx.api(&api);
    match open_portal_service(&ctx.user, &repo).await {
        Ok(url) => redirect(url.as_str()),
        Err(err) => action_failure(
            err,
            "/professional",
            "Não foi possível abrir o portal de pagamento.",
        ),
    }
}
