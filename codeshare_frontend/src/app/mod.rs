use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::mpsc::{self, Receiver, Sender};

use chrono::{DateTime, Utc};
use eframe::egui::{self, Context, TextureHandle};
use log::error;

use crate::api::ApiClient;
use crate::models::CreatePostInput;

pub mod explorer;
mod messages;
mod state;
mod tasks;
mod ui;

use explorer::{ExplorerRequest, RepoExplorer};
use messages::AppMessage;
use state::{ComposeState, FeedState, LoadedImage, ViewState};

// Maximum number of concurrent image downloads to avoid overwhelming the
// image host.
const MAX_CONCURRENT_DOWNLOADS: usize = 4;

pub struct CodeshareApp {
    api: ApiClient,
    tx: Sender<AppMessage>,
    rx: Receiver<AppMessage>,
    view: ViewState,
    feed: FeedState,
    compose: ComposeState,
    base_url_input: String,
    info_banner: Option<String>,
    upload_url: Option<String>,
    upload_preset: String,
    explorer_generation: u64,
    image_textures: HashMap<String, TextureHandle>,
    image_loading: HashSet<String>,
    image_pending: HashMap<String, LoadedImage>,
    image_errors: HashMap<String, String>,
    // Download queue for rate limiting
    download_queue: VecDeque<(String, String)>, // (key, url)
    active_downloads: usize,
}

impl CodeshareApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let default_url = std::env::var("CODESHARE_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
        let api = ApiClient::new(default_url.clone()).unwrap_or_else(|err| {
            error!("failed to initialise API client: {err}");
            ApiClient::new("http://127.0.0.1:8080").expect("fallback API client")
        });
        let (tx, rx) = mpsc::channel();

        let upload_url = std::env::var("CODESHARE_UPLOAD_URL").ok();
        let upload_preset = std::env::var("CODESHARE_UPLOAD_PRESET").unwrap_or_default();

        let mut app = Self {
            api,
            tx,
            rx,
            view: ViewState::Feed,
            feed: FeedState::default(),
            compose: ComposeState::default(),
            base_url_input: default_url,
            info_banner: None,
            upload_url,
            upload_preset,
            explorer_generation: 0,
            image_textures: HashMap::new(),
            image_loading: HashSet::new(),
            image_pending: HashMap::new(),
            image_errors: HashMap::new(),
            download_queue: VecDeque::new(),
            active_downloads: 0,
        };
        app.spawn_load_next_page();
        app
    }

    /// Requests the next feed page (the first one when nothing is loaded
    /// yet). A short page ends the feed; in-flight requests are never
    /// duplicated.
    fn spawn_load_next_page(&mut self) {
        if self.feed.is_loading {
            return;
        }
        if self.feed.loaded_once && self.feed.next_cursor.is_none() {
            return;
        }
        self.feed.is_loading = true;
        self.feed.error = None;
        tasks::load_feed_page(self.api.clone(), self.tx.clone(), self.feed.next_cursor);
    }

    fn reload_feed(&mut self) {
        self.feed = FeedState::default();
        self.spawn_load_next_page();
    }

    fn open_post(&mut self, post_id: i64) {
        self.view = ViewState::Detail(state::DetailState::new(post_id));
        tasks::load_post(self.api.clone(), self.tx.clone(), post_id);
    }

    fn open_feed(&mut self) {
        self.view = ViewState::Feed;
    }

    fn open_compose(&mut self) {
        self.view = ViewState::Compose;
    }

    fn spawn_submit_post(&mut self) {
        let Some(payload) = self.compose.validate() else {
            return;
        };
        self.compose.submitting = true;
        self.compose.submit_error = None;
        self.spawn_submit_payload(payload);
    }

    fn spawn_submit_payload(&mut self, payload: CreatePostInput) {
        tasks::submit_post(self.api.clone(), self.tx.clone(), payload);
    }

    fn spawn_pick_screenshots(&mut self) {
        if self.upload_url.is_none() {
            self.compose.upload_error =
                Some("No upload endpoint configured (CODESHARE_UPLOAD_URL).".into());
            return;
        }
        tasks::pick_screenshots(self.tx.clone());
    }

    fn spawn_upload_screenshots(&mut self, paths: Vec<std::path::PathBuf>) {
        let Some(upload_url) = self.upload_url.clone() else {
            return;
        };
        self.compose.uploading = true;
        self.compose.upload_error = None;
        tasks::upload_screenshots(
            self.tx.clone(),
            upload_url,
            self.upload_preset.clone(),
            paths,
        );
    }

    fn next_explorer_generation(&mut self) -> u64 {
        self.explorer_generation += 1;
        self.explorer_generation
    }

    /// The explorer owned by whichever view is currently on screen. Results
    /// for a dismissed view have nowhere to land and are dropped.
    fn active_explorer_mut(&mut self) -> Option<&mut RepoExplorer> {
        match &mut self.view {
            ViewState::Detail(state) => state.explorer.as_mut(),
            ViewState::Compose => self.compose.explorer.as_mut(),
            ViewState::Feed => None,
        }
    }

    fn spawn_explorer_request(&mut self, request: ExplorerRequest) {
        match request {
            ExplorerRequest::RootListing {
                repo_url,
                generation,
            } => {
                tasks::load_repo_root(self.api.clone(), self.tx.clone(), generation, repo_url);
            }
            ExplorerRequest::FolderListing {
                path,
                api_url,
                generation,
            } => {
                tasks::load_repo_folder(
                    self.api.clone(),
                    self.tx.clone(),
                    generation,
                    path,
                    api_url,
                );
            }
            ExplorerRequest::FileContent {
                path,
                url,
                generation,
            } => {
                tasks::download_file_content(self.tx.clone(), generation, path, url);
            }
        }
    }

    fn process_messages(&mut self) {
        messages::process_messages(self);
    }

    fn spawn_download_image(&mut self, key: &str, url: &str) {
        // Mark as loading
        self.image_loading.insert(key.to_string());

        // Add to queue
        self.download_queue.push_back((key.to_string(), url.to_string()));

        // Process queue
        self.process_download_queue();
    }

    fn process_download_queue(&mut self) {
        // Start downloads up to the limit
        while self.active_downloads < MAX_CONCURRENT_DOWNLOADS {
            if let Some((key, url)) = self.download_queue.pop_front() {
                self.active_downloads += 1;
                tasks::download_image(self.tx.clone(), key, url);
            } else {
                break;
            }
        }
    }

    fn on_download_complete(&mut self) {
        // Decrement counter and process next item in queue
        if self.active_downloads > 0 {
            self.active_downloads -= 1;
        }
        self.process_download_queue();
    }

    /// Draws a remotely-hosted image keyed by its URL: texture when ready,
    /// spinner while decoding, error label on failure. Downloads are
    /// started lazily on first paint.
    fn render_remote_image(&mut self, ui: &mut egui::Ui, url: &str, max_size: egui::Vec2) {
        if let Some(texture) = self.image_textures.get(url) {
            let size = texture.size_vec2();
            let scale = (max_size.x / size.x).min(max_size.y / size.y).min(1.0);
            ui.add(egui::Image::from_texture(texture).fit_to_exact_size(size * scale));
        } else if let Some(pending) = self.image_pending.remove(url) {
            let color = egui::ColorImage::from_rgba_unmultiplied(pending.size, &pending.pixels);
            let tex = ui
                .ctx()
                .load_texture(url, color, egui::TextureOptions::default());
            self.image_textures.insert(url.to_string(), tex.clone());
            let size = tex.size_vec2();
            let scale = (max_size.x / size.x).min(max_size.y / size.y).min(1.0);
            ui.add(egui::Image::from_texture(&tex).fit_to_exact_size(size * scale));
        } else if let Some(err) = self.image_errors.get(url) {
            ui.colored_label(egui::Color32::RED, format!("Error: {err}"));
        } else {
            ui.spinner();
            if !self.image_loading.contains(url) {
                self.spawn_download_image(url, url);
            }
        }
    }
}

impl eframe::App for CodeshareApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.process_messages();

        egui::TopBottomPanel::top("top_controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Codeshare");
                ui.separator();
                if ui
                    .selectable_label(matches!(self.view, ViewState::Feed), "Feed")
                    .clicked()
                {
                    self.open_feed();
                }
                if ui
                    .selectable_label(matches!(self.view, ViewState::Compose), "Post Code")
                    .clicked()
                {
                    self.open_compose();
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Apply").clicked() {
                        match self.api.set_base_url(self.base_url_input.clone()) {
                            Ok(()) => {
                                self.info_banner = Some("API URL updated".into());
                                self.reload_feed();
                            }
                            Err(err) => {
                                self.info_banner = Some(format!("Failed to update URL: {err}"));
                            }
                        }
                    }
                    ui.text_edit_singleline(&mut self.base_url_input);
                    ui.label("API Base URL");
                });
            });

            if let Some(message) = self.info_banner.clone() {
                let mut dismiss = false;
                egui::Frame::group(ui.style())
                    .fill(ui.visuals().extreme_bg_color)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(message.as_str());
                            if ui.button("Dismiss").clicked() {
                                dismiss = true;
                            }
                        });
                    });
                if dismiss {
                    self.info_banner = None;
                }
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| match &self.view {
            ViewState::Feed => self.render_feed(ui),
            ViewState::Detail(_) => self.render_detail(ui),
            ViewState::Compose => self.render_compose(ui),
        });

        // Worker threads finish between frames; keep painting while any
        // request or download is outstanding.
        if self.feed.is_loading
            || self.compose.submitting
            || self.compose.uploading
            || self.active_downloads > 0
        {
            ctx.request_repaint_after(std::time::Duration::from_millis(150));
        }
    }
}

fn format_timestamp(ts: &str) -> String {
    DateTime::parse_from_rfc3339(ts)
        .map(|dt| {
            dt.with_timezone(&Utc)
                .format("%Y-%m-%d %H:%M UTC")
                .to_string()
        })
        .unwrap_or_else(|_| ts.to_string())
}
