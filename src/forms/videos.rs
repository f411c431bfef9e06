use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use serde::Deserialize;
use validator::Validate;

use crate::domain::types::{CategoryId, VideoId, VideoTitle, VideoUrl};
use crate::domain::video::{
    CategorySelection, NewVideo, UploadedVideo, VideoPatch, VideoSource,
};
use crate::repository::FieldErrors;

form_error!(VideoFormError, "Video");

const SOURCE_REQUIRED: &str = "Envie um arquivo ou informe uma URL.";
const SOURCE_EXCLUSIVE: &str = "Envie um arquivo ou informe uma URL, não ambos.";

/// Text fields shared by the upload and edit forms.
#[derive(Validate)]
struct VideoFields {
    #[validate(length(min = 1, max = 255, message = "Informe um título de até 255 caracteres."))]
    title: String,
    description: String,
}

impl VideoFields {
    fn new(title: &Text<String>, description: Option<&Text<String>>) -> Self {
        Self {
            title: title.trim().to_string(),
            description: description
                .map(|d| d.trim().to_string())
                .unwrap_or_default(),
        }
    }
}

fn selection(ids: &[Text<i32>]) -> Result<CategorySelection, VideoFormError> {
    ids.iter()
        .map(|id| CategoryId::new(**id).map_err(VideoFormError::from))
        .collect()
}

/// Multipart body of the upload form.
#[derive(MultipartForm)]
pub struct UploadVideoForm {
    pub title: Text<String>,
    pub description: Option<Text<String>>,
    /// Browsers send an empty part when no file was picked.
    pub video_file: Option<TempFile>,
    pub video_url: Option<Text<String>>,
    pub categories: Vec<Text<i32>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadVideoFormPayload {
    pub title: VideoTitle,
    pub description: String,
    pub source: VideoSource,
    pub categories: CategorySelection,
}

impl UploadVideoFormPayload {
    pub fn into_new_video(self) -> NewVideo {
        NewVideo {
            title: self.title,
            description: self.description,
            source: self.source,
            categories: self.categories,
        }
    }
}

/// Pick the single source supplied with the form.
fn video_source(
    file: Option<UploadedVideo>,
    url: Option<&str>,
) -> Result<VideoSource, VideoFormError> {
    let url = url.map(str::trim).filter(|u| !u.is_empty());
    match (file, url) {
        (Some(file), None) => Ok(VideoSource::Upload(file)),
        (None, Some(url)) => Ok(VideoSource::External(VideoUrl::new(url)?)),
        (Some(_), Some(_)) => {
            let mut fields = FieldErrors::new();
            fields.insert("video_file".into(), vec![SOURCE_EXCLUSIVE.into()]);
            fields.insert("video_url".into(), vec![SOURCE_EXCLUSIVE.into()]);
            Err(VideoFormError::Validation(fields))
        }
        (None, None) => {
            let mut fields = FieldErrors::new();
            fields.insert("video_file".into(), vec![SOURCE_REQUIRED.into()]);
            Err(VideoFormError::Validation(fields))
        }
    }
}

fn uploaded_file(file: &TempFile) -> Option<UploadedVideo> {
    let file_name = file.file_name.clone().unwrap_or_default();
    if file.size == 0 || file_name.trim().is_empty() {
        return None;
    }
    Some(UploadedVideo {
        path: file.file.path().to_path_buf(),
        file_name,
        content_type: file.content_type.as_ref().map(ToString::to_string),
    })
}

/// Borrows the form so the temporary file outlives the forwarded request.
impl TryFrom<&UploadVideoForm> for UploadVideoFormPayload {
    type Error = VideoFormError;

    fn try_from(value: &UploadVideoForm) -> Result<Self, Self::Error> {
        let fields = VideoFields::new(&value.title, value.description.as_ref());
        fields.validate()?;

        let file = value.video_file.as_ref().and_then(uploaded_file);
        let source = video_source(file, value.video_url.as_ref().map(|u| u.as_str()))?;

        Ok(Self {
            title: VideoTitle::new(fields.title)?,
            description: fields.description,
            source,
            categories: selection(&value.categories)?,
        })
    }
}

/// Multipart body of the edit form. The category set is replaced, not merged.
#[derive(MultipartForm)]
pub struct EditVideoForm {
    pub video_id: Text<i32>,
    pub title: Text<String>,
    pub description: Option<Text<String>>,
    pub categories: Vec<Text<i32>>,
    pub page: Option<Text<usize>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditVideoFormPayload {
    pub video_id: VideoId,
    pub title: VideoTitle,
    pub description: String,
    pub categories: CategorySelection,
    pub page: Option<usize>,
}

impl EditVideoFormPayload {
    pub fn to_patch(&self) -> VideoPatch {
        VideoPatch {
            title: self.title.clone(),
            description: self.description.clone(),
            categories: self.categories.clone(),
        }
    }
}

impl TryFrom<EditVideoForm> for EditVideoFormPayload {
    type Error = VideoFormError;

    fn try_from(value: EditVideoForm) -> Result<Self, Self::Error> {
        let fields = VideoFields::new(&value.title, value.description.as_ref());
        fields.validate()?;

        Ok(Self {
            video_id: VideoId::new(*value.video_id)?,
            title: VideoTitle::new(fields.title)?,
            description: fields.description,
            categories: selection(&value.categories)?,
            page: value.page.map(Text::into_inner),
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct DeleteVideoForm {
    #[validate(range(min = 1))]
    pub video_id: i32,
    #[serde(default)]
    pub page: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteVideoFormPayload {
    pub video_id: VideoId,
    pub page: Option<usize>,
}

impl TryFrom<DeleteVideoForm> for DeleteVideoFormPayload {
    type Error = VideoFormError;

    fn try_from(value: DeleteVideoForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            video_id: VideoId::new(value.video_id)?,
            page: value.page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_file() -> UploadedVideo {
        UploadedVideo {
            path: PathBuf::from("/tmp/upload"),
            file_name: "squat.mp4".into(),
            content_type: Some("video/mp4".into()),
        }
    }

    #[test]
    fn file_alone_is_an_upload() {
        let source = video_source(Some(sample_file()), Some("  ")).unwrap();
        assert!(matches!(source, VideoSource::Upload(_)));
    }

    #[test]
    fn url_alone_is_external() {
        let source = video_source(None, Some("https://youtu.be/abc")).unwrap();
        assert_eq!(
            source,
            VideoSource::External(VideoUrl::new("https://youtu.be/abc").unwrap())
        );
    }

    #[test]
    fn both_sources_are_rejected() {
        let fields = video_source(Some(sample_file()), Some("https://youtu.be/abc"))
            .unwrap_err()
            .into_fields();
        assert!(fields.contains_key("video_file"));
        assert!(fields.contains_key("video_url"));
    }

    #[test]
    fn missing_source_is_rejected() {
        let fields = video_source(None, None).unwrap_err().into_fields();
        assert_eq!(fields["video_file"], vec![SOURCE_REQUIRED.to_string()]);
    }

    #[test]
    fn invalid_url_is_reported_on_url_field() {
        let fields = video_source(None, Some("not a url"))
            .unwrap_err()
            .into_fields();
        assert!(fields.contains_key("video_url"));
    }

    #[test]
    fn edit_selection_collapses_duplicates() {
        let form = EditVideoForm {
            video_id: Text(4),
            title: Text(" Deadlift ".into()),
            description: None,
            categories: vec![Text(2), Text(2), Text(3)],
            page: Some(Text(2)),
        };

        let payload = EditVideoFormPayload::try_from(form).unwrap();

        assert_eq!(payload.title.as_str(), "Deadlift");
        assert_eq!(payload.categories.len(), 2);
        assert_eq!(payload.page, Some(2));
    }

    #[test]
    fn edit_rejects_blank_title() {
        let form = EditVideoForm {
            video_id: Text(4),
            title: Text("   ".into()),
            description: None,
            categories: vec![],
            page: None,
        };
        let fields = EditVideoFormPayload::try_from(form).unwrap_err().into_fields();
        assert!(fields.contains_key("title"));
    }
}
