use actix_web::web;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Serialize;

use crate::domain::page::Page;
use crate::domain::types::VideoId;
use crate::domain::video::{
    CategorySelection, NewVideo, UploadedVideo, Video, VideoListQuery, VideoPatch, VideoRecord,
    VideoSource,
};
use crate::repository::api::{ApiRepository, ListBody, execute, fetch};
use crate::repository::{RepositoryError, RepositoryResult, VideoReader, VideoWriter};

/// JSON body for registering an external video URL.
#[derive(Serialize)]
struct ExternalVideoBody<'a> {
    title: &'a str,
    description: &'a str,
    video_url: &'a str,
    categories: &'a CategorySelection,
}

/// Read the spooled upload on the blocking pool, off the worker thread.
async fn read_upload(file: &UploadedVideo) -> RepositoryResult<Vec<u8>> {
    let path = file.path.clone();
    web::block(move || std::fs::read(path))
        .await
        .map_err(|e| RepositoryError::ValidationError(format!("upload read cancelled: {e}")))?
        .map_err(|e| RepositoryError::ValidationError(format!("cannot read uploaded file: {e}")))
}

async fn upload_form(video: &NewVideo, file: &UploadedVideo) -> RepositoryResult<Form> {
    let bytes = read_upload(file).await?;
    let mut part = Part::bytes(bytes).file_name(file.file_name.clone());
    if let Some(content_type) = &file.content_type {
        part = part.mime_str(content_type)?;
    }

    let mut form = Form::new()
        .text("title", video.title.as_str().to_string())
        .text("description", video.description.clone())
        .part("video_file", part);
    for id in video.categories.iter() {
        form = form.text("categories", id.to_string());
    }
    Ok(form)
}

fn into_page(body: ListBody<VideoRecord>) -> Page<Video> {
    body.into_page().map(Video::from)
}

impl VideoReader for ApiRepository {
    async fn list_videos(&self, query: &VideoListQuery) -> RepositoryResult<Page<Video>> {
        let request = self
            .request(Method::GET, "videos/")?
            .query(&query.to_pairs());
        Ok(into_page(fetch(request).await?))
    }

    async fn list_my_videos(&self, page: Option<usize>) -> RepositoryResult<Page<Video>> {
        let mut request = self.request(Method::GET, "videos/me/")?;
        if let Some(page) = page.filter(|p| *p > 1) {
            request = request.query(&[("page", page)]);
        }
        Ok(into_page(fetch(request).await?))
    }
}

impl VideoWriter for ApiRepository {
    async fn create_video(&self, video: &NewVideo) -> RepositoryResult<Video> {
        let request = self.request(Method::POST, "videos/upload/")?;
        let request = match &video.source {
            VideoSource::Upload(file) => request.multipart(upload_form(video, file).await?),
            VideoSource::External(url) => request.json(&ExternalVideoBody {
                title: video.title.as_str(),
                description: &video.description,
                video_url: url.as_str(),
                categories: &video.categories,
            }),
        };
        let record: VideoRecord = fetch(request).await?;
        Ok(record.into())
    }

    async fn update_video(&self, id: VideoId, patch: &VideoPatch) -> RepositoryResult<Video> {
        let request = self
            .request(Method::PATCH, &format!("videos/{id}/edit/"))?
            .json(patch);
        let record: VideoRecord = fetch(request).await?;
        Ok(record.into())
    }

    async fn delete_video(&self, id: VideoId) -> RepositoryResult<()> {
        execute(self.request(Method::DELETE, &format!("videos/{id}/edit/"))?).await
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::*;
    use crate::domain::types::{CategoryId, VideoTitle};

    fn upload(path: PathBuf) -> UploadedVideo {
        UploadedVideo {
            path,
            file_name: "squat.mp4".into(),
            content_type: Some("video/mp4".into()),
        }
    }

    fn new_video(file: UploadedVideo) -> NewVideo {
        NewVideo {
            title: VideoTitle::new("Squat").unwrap(),
            description: String::new(),
            source: VideoSource::Upload(file),
            categories: [CategoryId::new(2).unwrap()].into_iter().collect(),
        }
    }

    #[actix_web::test]
    async fn spooled_upload_is_read_in_full() {
        let mut spooled = tempfile::NamedTempFile::new().unwrap();
        spooled.write_all(b"not really mp4").unwrap();
        let file = upload(spooled.path().to_path_buf());

        let bytes = read_upload(&file).await.unwrap();
        assert_eq!(bytes, b"not really mp4");
        assert!(upload_form(&new_video(file.clone()), &file).await.is_ok());
    }

    #[actix_web::test]
    async fn missing_upload_is_reported() {
        let file = upload(PathBuf::from("/nonexistent/fitvideo/upload.mp4"));
        let err = read_upload(&file).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError(_)));
    }
}
