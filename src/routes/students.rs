use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::context::AppContext;
use crate::dto::students::StudentsView;
use crate::forms::students::{
    AddStudentForm, AddStudentFormPayload, RemoveStudentForm, RemoveStudentFormPayload,
};
use crate::repository::ApiRepository;
use crate::routes::{action_failure, base_context, inline_errors, page_failure, render_template};
use crate::services::students::{
    add_student as add_student_service, remove_student as remove_student_service,
    show_students as show_students_service,
};

fn render_students(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    ctx: &AppContext,
    view: &StudentsView,
) -> HttpResponse {
    let mut context = base_context(flash_messages, Some(&ctx.current_user()), "students");
    context.insert("view", view);
    render_template(tera, "students/index.html", &context)
}

#[get("/students")]
pub async fn show_students(
    ctx: AppContext,
    flash_messages: IncomingFlashMessages,
    api: web::Data<ApiRepository>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let repo = ctx.api(&api);
    match show_students_service(&ctx.user, &repo).await {
        Ok(view) => render_students(&tera, &flash_messages, &ctx, &view),
        Err(err) => page_failure(err, "students"),
    }
}

#[post("/students")]
pub async fn add_student(
    ctx: AppContext,
    flash_messages: IncomingFlashMessages,
    api: web::Data<ApiRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<AddStudentForm>,
) -> impl Responder {
    let repo = ctx.api(&api);
    let errors = match AddStudentFormPayload::try_from(form) {
        Ok(payload) => match add_student_service(payload, &ctx.user, &repo).await {
            Ok(view) => return render_students(&tera, &flash_messages, &ctx, &view),
            Err(err) => match inline_errors(err, "Não foi possível vincular o aluno.") {
                Ok(errors) => errors,
                Err(response) => return response,
            },
        },
        Err(e) => e.into_fields(),
    };

    match show_students_service(&ctx.user, &repo).await {
        Ok(mut view) => {
            view.errors = errors;
            render_students(&tera, &flash_messages, &ctx, &view)
        }
        Err(err) => page_failure(err, "students"),
    }
}

#[post("/students/remove")]
pub async fn remove_student(
    ctx: AppContext,
    flash_messages: IncomingFlashMessages,
    api: web::Data<ApiRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<RemoveStudentForm>,
) -> impl Responder {
    const FAILED: &str = "Não foi possível desvincular o aluno.";

    let repo = ctx.api(&api);
    let payload = match RemoveStudentFormPayload::try_from(form) {
        Ok(payload) => payload,
        Err(e) => return action_failure(e.into(), "/students", FAILED),
    };

    match remove_student_service(payload, &ctx.user, &repo).await {
        Ok(view) => render_students(&tera, &flash_messages, &ctx, &view),
        Err(err) => action_failure(err, "/students", FAILED),
    }
}
