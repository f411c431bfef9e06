use crate::domain::capability::{Capability, can};
use crate::domain::student::LinkedStudent;
use crate::domain::user::UserProfile;
use crate::dto::students::StudentsView;
use crate::forms::students::{AddStudentFormPayload, RemoveStudentFormPayload};
use crate::repository::{StudentReader, StudentWriter};

use super::{ServiceError, ServiceResult};

async fn load_students<R>(repo: &R) -> ServiceResult<Vec<LinkedStudent>>
where
    R: StudentReader,
{
    repo.list_students()
        .await
        .map_err(|e| ServiceError::from_repository("list students", e))
}

pub async fn show_students<R>(user: &UserProfile, repo: &R) -> ServiceResult<StudentsView>
where
    R: StudentReader,
{
    if !can(user, Capability::ManageStudents) {
        return Err(ServiceError::Unauthorized);
    }

    let students = load_students(repo).await?;
    Ok(StudentsView::new(&students))
}

/// Grant a consumer account access to the professional's videos.
pub async fn add_student<R>(
    payload: AddStudentFormPayload,
    user: &UserProfile,
    repo: &R,
) -> ServiceResult<StudentsView>
where
    R: StudentReader + StudentWriter,
{
    if !can(user, Capability::ManageStudents) {
        return Err(ServiceError::Unauthorized);
    }

    let mut students = load_students(repo).await?;
    match repo.add_student(&payload.into_link()).await {
        Ok(student) => {
            students.push(student);
            let mut view = StudentsView::new(&students);
            view.notice = Some("Aluno vinculado.".to_string());
            Ok(view)
        }
        Err(e) => {
            let errors = ServiceError::from_repository("add student", e).into_field_errors()?;
            let mut view = StudentsView::new(&students);
            view.errors = errors;
            Ok(view)
        }
    }
}

pub async fn remove_student<R>(
    payload: RemoveStudentFormPayload,
    user: &UserProfile,
    repo: &R,
) -> ServiceResult<StudentsView>
where
    R: StudentReader + StudentWriter,
{
    if !can(user, Capability::ManageStudents) {
        return Err(ServiceError::Unauthorized);
    }

    let mut students = load_students(repo).await?;
    match repo.remove_student(payload.student_link_id).await {
        Ok(()) => {
            students.retain(|s| s.id != payload.student_link_id);
            let mut view = StudentsView::new(&students);
            view.notice = Some("Aluno desvinculado.".to_string());
            Ok(view)
        }
        Err(e) => Err(ServiceError::from_repository("remove student", e)),
    }
}
