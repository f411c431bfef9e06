use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::context::CurrentUser;
use crate::forms::NON_FIELD_ERRORS;
use crate::repository::FieldErrors;
use crate::services::ServiceError;

pub mod api;
pub mod auth;
pub mod billing;
pub mod categories;
pub mod main;
pub mod students;
pub mod videos;

pub const CONNECTION_MESSAGE: &str =
    "Não foi possível falar com o servidor. Verifique sua conexão.";

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    HttpResponse::Ok().body(tera.render(template, context).unwrap_or_else(|e| {
        log::error!("Failed to render template '{template}': {e}");
        String::new()
    }))
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Bootstrap class for a flash level.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&CurrentUser<'_>>,
    current_page: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &user);
    context.insert("current_page", current_page);
    context
}

/// Response for a page that could not be loaded at all.
pub fn page_failure(err: ServiceError, page: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized | ServiceError::Forbidden(_) => redirect("/na"),
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Connection => HttpResponse::ServiceUnavailable().body(CONNECTION_MESSAGE),
        err => {
            log::error!("Failed to render {page} page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Report a failed action with a flash message and send the user back.
pub fn action_failure(err: ServiceError, back: &str, failure: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => return redirect("/na"),
        ServiceError::Forbidden(_) | ServiceError::NotFound => {
            FlashMessage::error(failure).send();
        }
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            FlashMessage::error(message).send();
        }
        ServiceError::Validation(fields) => {
            let message = fields
                .values()
                .flatten()
                .next()
                .cloned()
                .unwrap_or_else(|| failure.to_string());
            FlashMessage::error(message).send();
        }
        ServiceError::Connection => {
            FlashMessage::warning(CONNECTION_MESSAGE).send();
        }
        ServiceError::Internal => return HttpResponse::InternalServerError().finish(),
    }
    redirect(back)
}

/// Messages a re-rendered form shows next to its inputs, or the response to
/// send instead when the failure is not about the submitted data.
pub fn inline_errors(err: ServiceError, failure: &str) -> Result<FieldErrors, HttpResponse> {
    let message = match err.into_field_errors() {
        Ok(fields) => return Ok(fields),
        Err(ServiceError::Connection) => CONNECTION_MESSAGE.to_string(),
        Err(ServiceError::Forbidden(_)) | Err(ServiceError::NotFound) => failure.to_string(),
        Err(ServiceError::Unauthorized) => return Err(redirect("/na")),
        Err(err) => {
            log::error!("Failed to process form: {err}");
            return Err(HttpResponse::InternalServerError().finish());
        }
    };
    let mut fields = FieldErrors::new();
    fields.insert(NON_FIELD_ERRORS.to_string(), vec![message]);
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_uses_see_other() {
        let response = redirect("/categories");
        assert_eq!(response.status(), actix_web::http::StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/categories"
        );
    }

    #[test]
    fn connection_failures_become_form_messages() {
        let fields = inline_errors(ServiceError::Connection, "Não foi possível salvar.").unwrap();
        assert_eq!(fields[NON_FIELD_ERRORS], vec![CONNECTION_MESSAGE.to_string()]);
    }

    #[test]
    fn backend_refusal_uses_action_message() {
        let fields = inline_errors(
            ServiceError::Forbidden("not yours".into()),
            "Não foi possível salvar.",
        )
        .unwrap();
        assert_eq!(
            fields[NON_FIELD_ERRORS],
            vec!["Não foi possível salvar.".to_string()]
        );
    }

    #[test]
    fn missing_capability_redirects() {
        let response = inline_errors(ServiceError::Unauthorized, "x").unwrap_err();
        assert_eq!(response.status(), actix_web::http::StatusCode::SEE_OTHER);
    }
}
