//! REST backend client.
//!
//! Every catalog operation is one request against the backend. Responses are
//! either wrapped in a `{"data": ...}` envelope or returned bare; failures are
//! any non-2xx status and are mapped onto [`RepositoryError`].

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::domain::page::Page;
use crate::domain::types::AccessToken;
use crate::repository::{FieldErrors, MediaLocator, RepositoryError, RepositoryResult};

mod account;
mod billing;
mod category;
mod student;
mod video;

/// Backend client carrying the bearer token of the current request, if any.
#[derive(Clone)]
pub struct ApiRepository {
    client: Client,
    base_url: Url,
    token: Option<AccessToken>,
}

impl ApiRepository {
    /// Create an anonymous client for `base_url`.
    pub fn new(client: Client, base_url: &str) -> RepositoryResult<Self> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized)
            .map_err(|e| RepositoryError::ValidationError(format!("backend url: {e}")))?;
        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Clone of this client authenticating as the holder of `token`.
    pub fn with_token(&self, token: AccessToken) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of `path`, relative to the backend base.
    fn endpoint(&self, path: &str) -> RepositoryResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| RepositoryError::ValidationError(format!("endpoint {path}: {e}")))
    }

    fn request(&self, method: Method, path: &str) -> RepositoryResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        })
    }
}

impl MediaLocator for ApiRepository {
    /// Absolute URLs are returned unchanged; relative paths are joined to the
    /// backend origin.
    fn media_url(&self, path: &str) -> String {
        resolve_media_url(&self.base_url, path)
    }
}

pub(crate) fn resolve_media_url(base: &Url, path: &str) -> String {
    let path = path.trim();
    if path.is_empty() || Url::parse(path).is_ok() {
        return path.to_string();
    }
    match base.join(&format!("/{}", path.trim_start_matches('/'))) {
        Ok(url) => url.to_string(),
        Err(_) => path.to_string(),
    }
}

/// Send a request and decode the (possibly enveloped) JSON body.
async fn fetch<T: DeserializeOwned>(builder: RequestBuilder) -> RepositoryResult<T> {
    let response = check(builder.send().await?).await?;
    let body = response.text().await?;
    decode_body(&body)
}

/// Send a request whose response body is irrelevant.
async fn execute(builder: RequestBuilder) -> RepositoryResult<()> {
    check(builder.send().await?).await?;
    Ok(())
}

async fn check(response: Response) -> RepositoryResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(backend_error(status, &body))
}

/// Strip the optional `data` envelope and deserialize the payload.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &str) -> RepositoryResult<T> {
    let value: Value = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).map_err(|e| RepositoryError::Decode(e.to_string()))?
    };
    let payload = match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) => data,
            None => Value::Object(map),
        },
        other => other,
    };
    serde_json::from_value(payload).map_err(|e| RepositoryError::Decode(e.to_string()))
}

/// List responses come either paginated or as a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ListBody<T> {
    Paged(Page<T>),
    Plain(Vec<T>),
}

impl<T> ListBody<T> {
    pub(crate) fn into_page(self) -> Page<T> {
        match self {
            ListBody::Paged(page) => page,
            ListBody::Plain(items) => Page::single(items),
        }
    }
}

fn message_from(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .or_else(|| body.get("detail").and_then(Value::as_str))
        .map(str::to_string)
}

fn fields_from(body: &Value) -> FieldErrors {
    let source = body
        .get("error")
        .and_then(|e| e.get("details"))
        .unwrap_or(body);

    let mut fields = FieldErrors::new();
    let Some(map) = source.as_object() else {
        return fields;
    };
    for (field, value) in map {
        if field == "detail" {
            continue;
        }
        let messages: Vec<String> = match value {
            Value::String(message) => vec![message.clone()],
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };
        if !messages.is_empty() {
            fields.insert(field.clone(), messages);
        }
    }
    fields
}

/// Map a failed response onto the error taxonomy.
pub(crate) fn backend_error(status: StatusCode, body: &str) -> RepositoryError {
    let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let message = message_from(&parsed)
        .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => RepositoryError::Validation {
            message,
            fields: fields_from(&parsed),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RepositoryError::Unauthorized(message),
        StatusCode::NOT_FOUND => RepositoryError::NotFound,
        other => RepositoryError::Backend {
            status: other.as_u16(),
            message,
        },
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            RepositoryError::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            RepositoryError::Backend {
                status: status.as_u16(),
                message: error.to_string(),
            }
        } else {
            RepositoryError::Connection(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Category;

    #[test]
    fn validation_errors_keep_field_messages() {
        let body = r#"{"error":{"message":"Dados inválidos.","details":{"name":["Nome é obrigatório."],"parent":"Categoria inválida."}}}"#;
        match backend_error(StatusCode::BAD_REQUEST, body) {
            RepositoryError::Validation { message, fields } => {
                assert_eq!(message, "Dados inválidos.");
                assert_eq!(fields["name"], vec!["Nome é obrigatório.".to_string()]);
                assert_eq!(fields["parent"], vec!["Categoria inválida.".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bare_field_errors_are_read_from_body() {
        let body = r#"{"title":["This field is required."],"detail":"ignored"}"#;
        match backend_error(StatusCode::UNPROCESSABLE_ENTITY, body) {
            RepositoryError::Validation { message, fields } => {
                assert_eq!(message, "ignored");
                assert_eq!(fields.len(), 1);
                assert!(fields.contains_key("title"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn status_codes_map_to_taxonomy() {
        assert!(matches!(
            backend_error(StatusCode::FORBIDDEN, r#"{"detail":"Sem permissão."}"#),
            RepositoryError::Unauthorized(m) if m == "Sem permissão."
        ));
        assert!(matches!(
            backend_error(StatusCode::NOT_FOUND, ""),
            RepositoryError::NotFound
        ));
        assert!(matches!(
            backend_error(StatusCode::BAD_GATEWAY, "<html>"),
            RepositoryError::Backend { status: 502, message } if message == "request failed with status 502"
        ));
    }

    #[test]
    fn decodes_enveloped_and_bare_payloads() {
        let record = r#"{"id":1,"name":"Legs","slug":"legs","parent":null,"created_at":"2026-01-01T00:00:00Z"}"#;
        let bare: Category = decode_body(record).unwrap();
        let wrapped: Category = decode_body(&format!(r#"{{"data":{record}}}"#)).unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare.name, "Legs");
    }

    #[test]
    fn list_body_accepts_pages_and_arrays() {
        let page: ListBody<u32> =
            decode_body(r#"{"count":3,"next":null,"previous":null,"results":[1,2,3]}"#).unwrap();
        assert_eq!(page.into_page().count, 3);
        let plain: ListBody<u32> = decode_body("[4,5]").unwrap();
        assert_eq!(plain.into_page().results, vec![4, 5]);
    }

    #[test]
    fn media_paths_join_backend_origin() {
        let base = Url::parse("http://localhost:8000/api/").unwrap();
        assert_eq!(
            resolve_media_url(&base, "/media/videos/a.mp4"),
            "http://localhost:8000/media/videos/a.mp4"
        );
        assert_eq!(
            resolve_media_url(&base, "https://cdn.example.com/a.mp4"),
            "https://cdn.example.com/a.mp4"
        );
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let repo = ApiRepository::new(Client::new(), "http://localhost:8000/api").unwrap();
        assert_eq!(
            repo.endpoint("categories/").unwrap().as_str(),
            "http://localhost:8000/api/categories/"
        );
    }
}
