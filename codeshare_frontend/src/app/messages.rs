use std::path::PathBuf;

use crate::models::{CreatePostAck, FeedPage, PostView, RepoNode};

use super::state::{LoadedImage, ViewState};
use super::CodeshareApp;

pub enum AppMessage {
    FeedPageLoaded {
        cursor: Option<i64>,
        result: Result<FeedPage, anyhow::Error>,
    },
    PostLoaded {
        post_id: i64,
        result: Result<PostView, anyhow::Error>,
    },
    PostSubmitted(Result<CreatePostAck, anyhow::Error>),
    ScreenshotFilesSelected(Vec<PathBuf>),
    ScreenshotsUploaded(Result<Vec<String>, String>),
    RepoRootLoaded {
        generation: u64,
        result: Result<Vec<RepoNode>, String>,
    },
    RepoFolderLoaded {
        generation: u64,
        path: String,
        result: Result<Vec<RepoNode>, String>,
    },
    FileContentLoaded {
        generation: u64,
        path: String,
        result: Result<String, String>,
    },
    ImageLoaded {
        key: String,
        result: Result<LoadedImage, String>,
    },
}

pub(super) fn process_messages(app: &mut CodeshareApp) {
    while let Ok(message) = app.rx.try_recv() {
        match message {
            AppMessage::FeedPageLoaded { cursor, result } => {
                app.feed.is_loading = false;
                match result {
                    Ok(page) => {
                        app.feed.loaded_once = true;
                        // A first-page response replaces the feed; later
                        // pages append.
                        if cursor.is_none() {
                            app.feed.posts = page.posts;
                        } else {
                            app.feed.posts.extend(page.posts);
                        }
                        app.feed.next_cursor = page.next_cursor;
                        app.feed.error = None;
                    }
                    Err(err) => {
                        app.feed.error = Some(err.to_string());
                    }
                }
            }
            AppMessage::PostLoaded { post_id, result } => {
                let mut explorer_request = None;
                if let ViewState::Detail(state) = &mut app.view {
                    if state.post_id == post_id {
                        state.is_loading = false;
                        match result {
                            Ok(post) => {
                                if let Some(github) = post.github.clone() {
                                    app.explorer_generation += 1;
                                    let (explorer, request) = super::explorer::RepoExplorer::new(
                                        github,
                                        app.explorer_generation,
                                    );
                                    state.explorer = Some(explorer);
                                    explorer_request = Some(request);
                                }
                                state.post = Some(post);
                                state.error = None;
                            }
                            Err(err) => {
                                if err.to_string().contains("not found") {
                                    state.not_found = true;
                                } else {
                                    state.error = Some(err.to_string());
                                }
                            }
                        }
                    }
                }
                if let Some(request) = explorer_request {
                    app.spawn_explorer_request(request);
                }
            }
            AppMessage::PostSubmitted(result) => {
                app.compose.submitting = false;
                match result {
                    Ok(ack) => {
                        app.compose = Default::default();
                        app.info_banner = Some(if ack.message.is_empty() {
                            "Your code has been uploaded successfully.".into()
                        } else {
                            ack.message
                        });
                        // New post belongs at the feed's tail; refetch from
                        // the start so the next visit shows it.
                        app.feed = Default::default();
                        app.spawn_load_next_page();
                    }
                    Err(err) => {
                        app.compose.submit_error = Some(err.to_string());
                    }
                }
            }
            AppMessage::ScreenshotFilesSelected(paths) => {
                app.spawn_upload_screenshots(paths);
            }
            AppMessage::ScreenshotsUploaded(result) => {
                app.compose.uploading = false;
                match result {
                    Ok(urls) => {
                        app.compose.screenshots = urls;
                        app.compose.upload_error = None;
                    }
                    Err(err) => {
                        app.compose.upload_error = Some(err);
                    }
                }
            }
            AppMessage::RepoRootLoaded { generation, result } => {
                if let Some(explorer) = app.active_explorer_mut() {
                    explorer.on_root_loaded(generation, result);
                }
            }
            AppMessage::RepoFolderLoaded {
                generation,
                path,
                result,
            } => {
                if let Some(explorer) = app.active_explorer_mut() {
                    explorer.on_folder_loaded(generation, &path, result);
                }
            }
            AppMessage::FileContentLoaded {
                generation,
                path,
                result,
            } => {
                if let Some(explorer) = app.active_explorer_mut() {
                    explorer.on_file_content(generation, &path, result);
                }
            }
            AppMessage::ImageLoaded { key, result } => {
                app.on_download_complete();
                app.image_loading.remove(&key);
                match result {
                    Ok(image) => {
                        app.image_pending.insert(key, image);
                    }
                    Err(err) => {
                        app.image_errors.insert(key, err);
                    }
                }
            }
        }
    }
}
