use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Serialize;
use tera::Tera;

use crate::context::AppContext;
use crate::domain::user::{Credentials, NewAccount};
use crate::forms::auth::{LoginForm, RegisterForm};
use crate::repository::{ApiRepository, DieselRepository, FieldErrors};
use crate::routes::main::home_for;
use crate::routes::{base_context, inline_errors, redirect, render_template};
use crate::services::ServiceResult;
use crate::services::auth::{
    login as login_service, logout as logout_service, register as register_service,
};

const LOGIN_FAILED: &str = "Não foi possível entrar.";
const REGISTER_FAILED: &str = "Não foi possível criar a conta.";

/// Values echoed back into a re-rendered form.
#[derive(Serialize, Default)]
struct Echo<'a> {
    email: &'a str,
    username: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    role: &'a str,
    full_name: &'a str,
    bio: &'a str,
    cref: &'a str,
}

fn render_form(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    template: &str,
    page: &str,
    form: &Echo<'_>,
    errors: &FieldErrors,
) -> HttpResponse {
    let mut context = base_context(flash_messages, None, page);
    context.insert("form", form);
    context.insert("errors", errors);
    render_template(tera, template, &context)
}

/// Store the session key in the identity cookie and go to the home page.
fn sign_in(
    req: &HttpRequest,
    result: ServiceResult<AppContext>,
    failure: &str,
) -> Result<HttpResponse, FieldErrors> {
    let ctx = match result {
        Ok(ctx) => ctx,
        Err(err) => {
            return match inline_errors(err, failure) {
                Ok(errors) => Err(errors),
                Err(response) => Ok(response),
            };
        }
    };
    if let Err(e) = Identity::login(&req.extensions(), ctx.session_key.to_string()) {
        log::error!("Failed to attach identity: {e}");
        return Ok(HttpResponse::InternalServerError().finish());
    }
    Ok(redirect(home_for(&ctx)))
}

#[get("/login")]
pub async fn show_login(
    ctx: Option<AppContext>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if let Some(ctx) = ctx {
        return redirect(home_for(&ctx));
    }
    render_form(
        &tera,
        &flash_messages,
        "auth/login.html",
        "login",
        &Echo::default(),
        &FieldErrors::new(),
    )
}

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    flash_messages: IncomingFlashMessages,
    api: web::Data<ApiRepository>,
    store: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let email = form.email.clone();
    let echo = Echo {
        email: &email,
        ..Default::default()
    };

    let credentials = match Credentials::try_from(form) {
        Ok(credentials) => credentials,
        Err(e) => {
            return render_form(
                &tera,
                &flash_messages,
                "auth/login.html",
                "login",
                &echo,
                &e.into_fields(),
            );
        }
    };

    let result = login_service(credentials, api.get_ref(), store.get_ref()).await;
    match sign_in(&req, result, LOGIN_FAILED) {
        Ok(response) => response,
        Err(errors) => render_form(
            &tera,
            &flash_messages,
            "auth/login.html",
            "login",
            &echo,
            &errors,
        ),
    }
}

#[get("/register")]
pub async fn show_register(
    ctx: Option<AppContext>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if let Some(ctx) = ctx {
        return redirect(home_for(&ctx));
    }
    let echo = Echo {
        role: "user",
        ..Default::default()
    };
    render_form(
        &tera,
        &flash_messages,
        "auth/register.html",
        "register",
        &echo,
        &FieldErrors::new(),
    )
}

#[post("/register")]
pub async fn register(
    req: HttpRequest,
    flash_messages: IncomingFlashMessages,
    api: web::Data<ApiRepository>,
    store: web::Data<DieselRepository>,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<RegisterForm>,
) -> impl Responder {
    let email = form.email.clone();
    let username = form.username.clone();
    let first_name = form.first_name.clone();
    let last_name = form.last_name.clone();
    let role = form.role;
    let full_name = form.full_name.clone();
    let bio = form.bio.clone();
    let cref = form.cref.clone();
    let echo = Echo {
        email: &email,
        username: &username,
        first_name: &first_name,
        last_name: &last_name,
        role: role.as_str(),
        full_name: &full_name,
        bio: &bio,
        cref: &cref,
    };

    let account = match NewAccount::try_from(form) {
        Ok(account) => account,
        Err(e) => {
            return render_form(
                &tera,
                &flash_messages,
                "auth/register.html",
                "register",
                &echo,
                &e.into_fields(),
            );
        }
    };

    let result = register_service(account, api.get_ref(), store.get_ref()).await;
    match sign_in(&req, result, REGISTER_FAILED) {
        Ok(response) => {
            FlashMessage::success("Conta criada.").send();
            response
        }
        Err(errors) => render_form(
            &tera,
            &flash_messages,
            "auth/register.html",
            "register",
            &echo,
            &errors,
        ),
    }
}

#[post("/logout")]
pub async fn logout(
    ctx: AppContext,
    identity: Identity,
    store: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(err) = logout_service(ctx, store.get_ref()) {
        log::error!("Failed to end session: {err}");
    }
    identity.logout();
    redirect("/login")
}
