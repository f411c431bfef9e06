use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::context::AppContext;
use crate::domain::capability::Capability;
use crate::domain::video::VideoListQuery;
use crate::repository::{ApiRepository, DieselRepository};
use crate::routes::{base_context, page_failure, render_template};
use crate::services::auth::sync_profile;
use crate::services::main::show_professional;
use crate::services::videos::show_feed;

#[derive(Deserialize, Debug, Default)]
pub struct FeedQueryParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
}

impl From<FeedQueryParams> for VideoListQuery {
    fn from(value: FeedQueryParams) -> Self {
        VideoListQuery {
            category_slug: value.category.filter(|c| !c.trim().is_empty()),
            search: value.search.filter(|s| !s.trim().is_empty()),
            page: value.page,
        }
    }
}

#[get("/")]
pub async fn index(
    ctx: AppContext,
    params: web::Query<FeedQueryParams>,
    flash_messages: IncomingFlashMessages,
    api: web::Data<ApiRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = ctx.api(&api);
    match show_feed(&ctx.user, params.into_inner().into(), &repo).await {
        Ok(feed) => {
            let mut context = base_context(&flash_messages, Some(&ctx.current_user()), "index");
            context.insert("feed", &feed);
            render_template(&tera, "main/index.html", &context)
        }
        Err(err) => page_failure(err, "feed"),
    }
}

#[get("/na")]
pub async fn not_assigned(
    ctx: Option<AppContext>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let user = ctx.as_ref().map(AppContext::current_user);
    let context = base_context(&flash_messages, user.as_ref(), "index");
    render_template(&tera, "main/not_assigned.html", &context)
}

#[derive(Deserialize, Debug, Default)]
pub struct ProfessionalQueryParams {
    /// Set by the billing provider when it sends the user back.
    pub checkout: Option<String>,
}

#[get("/professional")]
pub async fn professional(
    mut ctx: AppContext,
    params: web::Query<ProfessionalQueryParams>,
    flash_messages: IncomingFlashMessages,
    api: web::Data<ApiRepository>,
    store: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = ctx.api(&api);

    let mut notice = None;
    if params.checkout.as_deref() == Some("success") {
        match sync_profile(&mut ctx, &repo, store.get_ref()).await {
            Ok(()) => notice = Some("Assinatura confirmada."),
            Err(err) => log::warn!("Failed to refresh profile after checkout: {err}"),
        }
    }

    match show_professional(&ctx.user, &repo).await {
        Ok(overview) => {
            let mut context =
                base_context(&flash_messages, Some(&ctx.current_user()), "professional");
            context.insert("overview", &overview);
            context.insert("notice", &notice);
            render_template(&tera, "main/professional.html", &context)
        }
        Err(err) => page_failure(err, "professional"),
    }
}

/// Landing route after sign-in, chosen by role.
pub fn home_for(ctx: &AppContext) -> &'static str {
    if ctx.can(Capability::ManageCatalog) {
        "/professional"
    } else {
        "/"
    }
}
