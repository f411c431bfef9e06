use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::context::AppContext;
use crate::dto::videos::MyVideosView;
use crate::forms::videos::{
    DeleteVideoForm, DeleteVideoFormPayload, EditVideoForm, EditVideoFormPayload,
    UploadVideoForm, UploadVideoFormPayload, VideoFormError,
};
use crate::repository::{ApiRepository, FieldErrors};
use crate::routes::{base_context, inline_errors, page_failure, render_template};
use crate::services::ServiceResult;
use crate::services::videos::{
    delete_video as delete_video_service, edit_video as edit_video_service,
    show_my_videos as show_my_videos_service, upload_video as upload_video_service,
};

const SAVE_FAILED: &str = "Não foi possível salvar o vídeo.";
const DELETE_FAILED: &str = "Não foi possível excluir o vídeo.";

#[derive(Deserialize, Debug, Default)]
pub struct MyVideosQueryParams {
    pub page: Option<usize>,
}

fn render_videos(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    ctx: &AppContext,
    view: &MyVideosView,
) -> HttpResponse {
    let mut context = base_context(flash_messages, Some(&ctx.current_user()), "videos");
    context.insert("view", view);
    render_template(tera, "videos/mine.html", &context)
}

async fn render_with_errors(
    errors: FieldErrors,
    page: Option<usize>,
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    ctx: &AppContext,
    repo: &ApiRepository,
) -> HttpResponse {
    match show_my_videos_service(&ctx.user, page, repo).await {
        Ok(view) => render_videos(tera, flash_messages, ctx, &view.with_errors(errors)),
        Err(err) => page_failure(err, "videos"),
    }
}

async fn rejected_form(
    e: VideoFormError,
    page: Option<usize>,
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    ctx: &AppContext,
    repo: &ApiRepository,
) -> HttpResponse {
    render_with_errors(e.into_fields(), page, tera, flash_messages, ctx, repo).await
}

async fn render_outcome(
    result: ServiceResult<MyVideosView>,
    failure: &str,
    page: Option<usize>,
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    ctx: &AppContext,
    repo: &ApiRepository,
) -> HttpResponse {
    match result {
        Ok(view) => render_videos(tera, flash_messages, ctx, &view),
        Err(err) => match inline_errors(err, failure) {
            Ok(errors) => render_with_errors(errors, page, tera, flash_messages, ctx, repo).await,
            Err(response) => response,
        },
    }
}

#[get("/videos/mine")]
pub async fn show_my_videos(
    ctx: AppContext,
    params: web::Query<MyVideosQueryParams>,
    flash_messages: IncomingFlashMessages,
    api: web::Data<ApiRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = ctx.api(&api);
    match show_my_videos_service(&ctx.user, params.page, &repo).await {
        Ok(view) => render_videos(&tera, &flash_messages, &ctx, &view),
        Err(err) => page_failure(err, "videos"),
    }
}

#[post("/videos/upload")]
pub async fn upload_video(
    ctx: AppContext,
    flash_messages: IncomingFlashMessages,
    api: web::Data<ApiRepository>,
    tera: web::Data<Tera>,
    MultipartForm(form): MultipartForm<UploadVideoForm>,
) -> impl Responder {
    let repo = ctx.api(&api);
    let payload = match UploadVideoFormPayload::try_from(&form) {
        Ok(payload) => payload,
        Err(e) => return rejected_form(e, None, &tera, &flash_messages, &ctx, &repo).await,
    };

    // `form` owns the temporary file and must live until the upload is sent.
    let result = upload_video_service(payload, &ctx.user, &repo).await;
    drop(form);
    render_outcome(result, SAVE_FAILED, None, &tera, &flash_messages, &ctx, &repo).await
}

#[post("/videos/edit")]
pub async fn edit_video(
    ctx: AppContext,
    flash_messages: IncomingFlashMessages,
    api: web::Data<ApiRepository>,
    tera: web::Data<Tera>,
    MultipartForm(form): MultipartForm<EditVideoForm>,
) -> impl Responder {
    let repo = ctx.api(&api);
    let page = form.page.as_ref().map(|p| **p);
    let payload: EditVideoFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return rejected_form(e, page, &tera, &flash_messages, &ctx, &repo).await,
    };

    let result = edit_video_service(payload, &ctx.user, &repo).await;
    render_outcome(result, SAVE_FAILED, page, &tera, &flash_messages, &ctx, &repo).await
}

#[post("/videos/delete")]
pub async fn delete_video(
    ctx: AppContext,
    flash_messages: IncomingFlashMessages,
    api: web::Data<ApiRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<DeleteVideoForm>,
) -> impl Responder {
    let repo = ctx.api(&api);
    let page = form.page;
    let payload: DeleteVideoFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => return rejected_form(e, page, &tera, &flash_messages, &ctx, &repo).await,
    };

    let result = delete_video_service(payload, &ctx.user, &repo).await;
    render_outcome(result, DELETE_FAILED, page, &tera, &flash_messages, &ctx, &repo).await
}
