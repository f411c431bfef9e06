use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::context::AppContext;
use crate::dto::categories::CategoriesView;
use crate::forms::categories::{
    AddCategoryForm, AddCategoryFormPayload, CategoryFormError, DeleteCategoryForm,
    DeleteCategoryFormPayload, UpdateCategoryForm, UpdateCategoryFormPayload,
};
use crate::repository::{ApiRepository, FieldErrors};
use crate::routes::{base_context, inline_errors, page_failure, render_template};
use crate::services::ServiceResult;
use crate::services::categories::{
    add_category as add_category_service, delete_category as delete_category_service,
    show_categories as show_categories_service, update_category as update_category_service,
};

const SAVE_FAILED: &str = "Não foi possível salvar a categoria.";
const DELETE_FAILED: &str = "Não foi possível excluir a categoria.";

fn render_categories(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    ctx: &AppContext,
    view: &CategoriesView,
) -> HttpResponse {
    let mut context = base_context(flash_messages, Some(&ctx.current_user()), "categories");
    context.insert("view", view);
    render_template(tera, "categories/index.html", &context)
}

/// Render the outcome of a mutation. Rejected input and refused actions are
/// shown on the page; a missing capability or an unreachable backend is not.
async fn render_outcome(
    result: ServiceResult<CategoriesView>,
    failure: &str,
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    ctx: &AppContext,
    repo: &ApiRepository,
) -> HttpResponse {
    match result {
        Ok(view) => render_categories(tera, flash_messages, ctx, &view),
        Err(err) => match inline_errors(err, failure) {
            Ok(errors) => render_with_errors(errors, tera, flash_messages, ctx, repo).await,
            Err(response) => response,
        },
    }
}

async fn render_with_errors(
    errors: FieldErrors,
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    ctx: &AppContext,
    repo: &ApiRepository,
) -> HttpResponse {
    match show_categories_service(&ctx.user, repo).await {
        Ok(view) => render_categories(tera, flash_messages, ctx, &view.with_errors(errors)),
        Err(err) => page_failure(err, "categories"),
    }
}

async fn rejected_form(
    e: CategoryFormError,
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    ctx: &AppContext,
    repo: &ApiRepository,
) -> HttpResponse {
    render_with_errors(e.into_fields(), tera, flash_messages, ctx, repo).await
}

#[get("/categories")]
pub async fn show_categories(
    ctx: AppContext,
    flash_messages: IncomingFlashMessages,
    api: web::Data<ApiRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = ctx.api(&api);
    match show_categories_service(&ctx.user, &repo).await {
        Ok(view) => render_categories(&tera, &flash_messages, &ctx, &view),
        Err(err) => page_failure(err, "categories"),
    }
}

#[post("/categories")]
pub async fn add_category(
    ctx: AppContext,
    flash_messages: IncomingFlashMessages,
    api: web::Data<ApiRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<AddCategoryForm>,
) -> impl Responder {
    let repo = ctx.api(&api);
    let payload: AddCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return rejected_form(e, &tera, &flash_messages, &ctx, &repo).await,
    };

    let result = add_category_service(payload, &ctx.user, &repo).await;
    render_outcome(result, SAVE_FAILED, &tera, &flash_messages, &ctx, &repo).await
}

#[post("/categories/{category_id}/update")]
pub async fn update_category(
    category_id: web::Path<i32>,
    ctx: AppContext,
    flash_messages: IncomingFlashMessages,
    api: web::Data<ApiRepository>,
    tera: web::Data<Tera>,
    web::Form(mut form): web::Form<UpdateCategoryForm>,
) -> impl Responder {
    let repo = ctx.api(&api);
    form.category_id = category_id.into_inner();
    let payload: UpdateCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return rejected_form(e, &tera, &flash_messages, &ctx, &repo).await,
    };

    let result = update_category_service(payload, &ctx.user, &repo).await;
    render_outcome(result, SAVE_FAILED, &tera, &flash_messages, &ctx, &repo).await
}

#[post("/categories/{category_id}/delete")]
pub async fn delete_category(
    category_id: web::Path<i32>,
    ctx: AppContext,
    flash_messages: IncomingFlashMessages,
    api: web::Data<ApiRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = ctx.api(&api);
    let form = DeleteCategoryForm {
        category_id: category_id.into_inner(),
    };
    let payload: DeleteCategoryFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return rejected_form(e, &tera, &flash_messages, &ctx, &repo).await,
    };

    let result = delete_category_service(payload, &ctx.user, &repo).await;
    render_outcome(result, DELETE_FAILED, &tera, &flash_messages, &ctx, &repo).await
}
