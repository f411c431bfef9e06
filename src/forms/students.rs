use serde::Deserialize;
use validator::Validate;

use crate::domain::student::NewStudentLink;
use crate::domain::types::{Email, StudentLinkId};

form_error!(StudentFormError, "Student");

#[derive(Deserialize, Validate)]
pub struct AddStudentForm {
    #[validate(email(message = "Informe um e-mail válido."))]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddStudentFormPayload {
    pub email: Email,
}

impl AddStudentFormPayload {
    pub fn into_link(self) -> NewStudentLink {
        NewStudentLink { email: self.email }
    }
}

impl TryFrom<AddStudentForm> for AddStudentFormPayload {
    type Error = StudentFormError;

    fn try_from(mut value: AddStudentForm) -> Result<Self, Self::Error> {
        value.email = value.email.trim().to_string();
        value.validate()?;
        Ok(Self {
            email: Email::new(value.email)?,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct RemoveStudentForm {
    #[validate(range(min = 1))]
    pub student_link_id: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoveStudentFormPayload {
    pub student_link_id: StudentLinkId,
}

impl TryFrom<RemoveStudentForm> for RemoveStudentFormPayload {
    type Error = StudentFormError;

    fn try_from(value: RemoveStudentForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            student_link_id: StudentLinkId::new(value.student_link_id)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        let form = AddStudentForm {
            email: " Aluno@Example.com ".into(),
        };
        let payload = AddStudentFormPayload::try_from(form).unwrap();
        assert_eq!(payload.email.as_str(), "aluno@example.com");
    }

    #[test]
    fn invalid_email_is_reported_on_field() {
        let form = AddStudentForm {
            email: "not-an-email".into(),
        };
        let fields = AddStudentFormPayload::try_from(form)
            .unwrap_err()
            .into_fields();
        assert_eq!(fields["email"], vec!["Informe um e-mail válido.".to_string()]);
    }
}
