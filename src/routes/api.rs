use actix_web::{HttpResponse, Responder, get, web};

use crate::context::AppContext;
use crate::repository::ApiRepository;
use crate::services::ServiceError;
use crate::services::api::{
    ApiV1CategoryTreeParams, ApiV1VideosParams,
    api_v1_categories_tree as api_v1_categories_tree_service,
    api_v1_videos as api_v1_videos_service,
};

fn api_failure(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized | ServiceError::Forbidden(_) => {
            HttpResponse::Unauthorized().finish()
        }
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Connection => HttpResponse::BadGateway().finish(),
        err => {
            log::error!("API request failed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/categories/tree")]
pub async fn api_v1_categories_tree(
    ctx: AppContext,
    params: web::Query<ApiV1CategoryTreeParams>,
    api: web::Data<ApiRepository>,
) -> impl Responder {
    let repo = ctx.api(&api);
    match api_v1_categories_tree_service(params.into_inner(), &ctx.user, &repo).await {
        Ok(tree) => HttpResponse::Ok().json(tree),
        Err(err) => api_failure(err),
    }
}

#[get("/v1/videos")]
pub async fn api_v1_videos(
    ctx: AppContext,
    params: web::Query<ApiV1VideosParams>,
    api: web::Data<ApiRepository>,
) -> impl Responder {
    let repo = ctx.api(&api);
    match api_v1_videos_service(params.into_inner(), &ctx.user, &repo).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => api_failure(err),
    }
}
