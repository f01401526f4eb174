use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;

use log::error;

use crate::api::{get_shared_client, ApiClient};
use crate::models::CreatePostInput;

use super::messages::AppMessage;
use super::state::LoadedImage;

pub fn load_feed_page(client: ApiClient, tx: Sender<AppMessage>, cursor: Option<i64>) {
    thread::spawn(move || {
        let result = client.list_posts(cursor);
        if tx.send(AppMessage::FeedPageLoaded { cursor, result }).is_err() {
            error!("failed to send FeedPageLoaded message");
        }
    });
}

pub fn load_post(client: ApiClient, tx: Sender<AppMessage>, post_id: i64) {
    thread::spawn(move || {
        let result = client.get_post(post_id);
        if tx.send(AppMessage::PostLoaded { post_id, result }).is_err() {
            error!("failed to send PostLoaded message");
        }
    });
}

pub fn submit_post(client: ApiClient, tx: Sender<AppMessage>, payload: CreatePostInput) {
    thread::spawn(move || {
        let result = client.create_post(&payload);
        if tx.send(AppMessage::PostSubmitted(result)).is_err() {
            error!("failed to send PostSubmitted message");
        }
    });
}

pub fn pick_screenshots(tx: Sender<AppMessage>) {
    thread::spawn(move || {
        if let Some(files) = rfd::FileDialog::new()
            .add_filter("images", &["jpg", "jpeg", "png", "gif", "bmp", "webp"])
            .pick_files()
        {
            if tx.send(AppMessage::ScreenshotFilesSelected(files)).is_err() {
                error!("failed to send ScreenshotFilesSelected message");
            }
        }
    });
}

/// Uploads each picked file to the external object-storage endpoint and
/// reports the returned URLs; the post submission itself only ever carries
/// URLs, never bytes.
pub fn upload_screenshots(
    tx: Sender<AppMessage>,
    upload_url: String,
    upload_preset: String,
    paths: Vec<PathBuf>,
) {
    thread::spawn(move || {
        let result = (|| {
            let client = get_shared_client().map_err(|e| e.to_string())?;
            let mut urls = Vec::new();
            for path in paths {
                let form = reqwest::blocking::multipart::Form::new()
                    .file("file", &path)
                    .map_err(|e| format!("failed to read {}: {e}", path.display()))?
                    .text("upload_preset", upload_preset.clone());
                let response = client
                    .post(&upload_url)
                    .multipart(form)
                    .send()
                    .map_err(|e| e.to_string())?
                    .error_for_status()
                    .map_err(|e| e.to_string())?;
                let body: serde_json::Value = response.json().map_err(|e| e.to_string())?;
                let url = body
                    .get("secure_url")
                    .and_then(|u| u.as_str())
                    .ok_or_else(|| "upload response missing secure_url".to_string())?;
                urls.push(url.to_string());
            }
            Ok(urls)
        })();

        if tx.send(AppMessage::ScreenshotsUploaded(result)).is_err() {
            error!("failed to send ScreenshotsUploaded message");
        }
    });
}

pub fn load_repo_root(
    client: ApiClient,
    tx: Sender<AppMessage>,
    generation: u64,
    repo_url: String,
) {
    thread::spawn(move || {
        let result = client.repo_tree(&repo_url).map_err(|e| e.to_string());
        if tx
            .send(AppMessage::RepoRootLoaded { generation, result })
            .is_err()
        {
            error!("failed to send RepoRootLoaded message");
        }
    });
}

pub fn load_repo_folder(
    client: ApiClient,
    tx: Sender<AppMessage>,
    generation: u64,
    path: String,
    api_url: String,
) {
    thread::spawn(move || {
        let result = client.repo_folder(&api_url).map_err(|e| e.to_string());
        let message = AppMessage::RepoFolderLoaded {
            generation,
            path,
            result,
        };
        if tx.send(message).is_err() {
            error!("failed to send RepoFolderLoaded message");
        }
    });
}

/// Raw file content straight from the download URL; the proxy is not
/// involved for already-resolved asset links.
pub fn download_file_content(tx: Sender<AppMessage>, generation: u64, path: String, url: String) {
    thread::spawn(move || {
        let result = (|| {
            let client = get_shared_client().map_err(|e| e.to_string())?;
            let resp = client.get(&url).send().map_err(|e| e.to_string())?;
            let resp = resp.error_for_status().map_err(|e| e.to_string())?;
            resp.text().map_err(|e| e.to_string())
        })();

        let message = AppMessage::FileContentLoaded {
            generation,
            path,
            result,
        };
        if tx.send(message).is_err() {
            error!("failed to send FileContentLoaded message");
        }
    });
}

pub fn download_image(tx: Sender<AppMessage>, key: String, url: String) {
    thread::spawn(move || {
        let result = (|| {
            let client = get_shared_client().map_err(|e| format!("HTTP client error: {e}"))?;
            let resp = client
                .get(&url)
                .send()
                .map_err(|e| format!("Request error: {e}"))?;
            let bytes = resp.bytes().map_err(|e| format!("Download error: {e}"))?;
            let dyn_img = image::load_from_memory(&bytes)
                .map_err(|e| format!("Image decode error: {e}"))?;
            let rgba = dyn_img.to_rgba8();
            let size = [dyn_img.width() as usize, dyn_img.height() as usize];
            Ok(LoadedImage {
                size,
                pixels: rgba.as_flat_samples().as_slice().to_vec(),
            })
        })();

        let message = AppMessage::ImageLoaded { key, result };

        if tx.send(message).is_err() {
            error!("failed to send ImageLoaded message");
        }
    });
}
