use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::student::LinkedStudent;
use crate::repository::FieldErrors;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StudentDto {
    pub id: i32,
    pub student_id: i32,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&LinkedStudent> for StudentDto {
    fn from(value: &LinkedStudent) -> Self {
        let name = format!("{} {}", value.first_name, value.last_name)
            .trim()
            .to_string();
        Self {
            id: value.id.get(),
            student_id: value.student_id.get(),
            email: value.email.as_str().to_string(),
            name,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct StudentsView {
    pub students: Vec<StudentDto>,
    pub errors: FieldErrors,
    pub notice: Option<String>,
}

impl StudentsView {
    pub fn new(students: &[LinkedStudent]) -> Self {
        Self {
            students: students.iter().map(StudentDto::from).collect(),
            ..Default::default()
        }
    }
}
