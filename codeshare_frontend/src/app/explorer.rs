use std::collections::{HashMap, HashSet};

use crate::models::{NodeKind, RepoNode};
use crate::technologies::{is_image_file, language_for_file};

/// Session state for one browsed repository. Owns every cache the tree view
/// relies on; nothing lives in ambient component state. Folder children are
/// cached by path for the lifetime of the session and never refetched —
/// staleness is accepted.
///
/// Methods that need data return an [`ExplorerRequest`] for the caller to
/// run on a worker thread; completions come back through the `on_*`
/// handlers. Every request carries the generation current at spawn time, so
/// results that arrive after the repository URL changed are dropped instead
/// of corrupting the new session.
pub struct RepoExplorer {
    repo_url: String,
    generation: u64,
    root: RootListing,
    folder_contents: HashMap<String, Vec<RepoNode>>,
    open_folders: HashSet<String>,
    folders_loading: HashSet<String>,
    active_path: Option<String>,
    selected: Option<SelectedFile>,
}

pub enum RootListing {
    Loading,
    Loaded(Vec<RepoNode>),
    Failed(String),
}

pub struct SelectedFile {
    pub name: String,
    pub path: String,
    pub language: &'static str,
    pub content: FileContent,
}

pub enum FileContent {
    /// Rendered by the image viewer straight from the asset URL.
    Image { url: String },
    Loading,
    Text(String),
    Failed(String),
}

/// A fetch the caller should perform for this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplorerRequest {
    RootListing {
        repo_url: String,
        generation: u64,
    },
    FolderListing {
        path: String,
        api_url: String,
        generation: u64,
    },
    /// Raw content fetch from the node's direct-download URL; bypasses the
    /// proxy, the URL is already a fully-resolved asset link.
    FileContent {
        path: String,
        url: String,
        generation: u64,
    },
}

impl RepoExplorer {
    /// Starts a session for `repo_url`; the returned request loads the root
    /// listing. `generation` must be unique among live sessions.
    pub fn new(repo_url: impl Into<String>, generation: u64) -> (Self, ExplorerRequest) {
        let repo_url = repo_url.into();
        let request = ExplorerRequest::RootListing {
            repo_url: repo_url.clone(),
            generation,
        };
        (
            Self {
                repo_url,
                generation,
                root: RootListing::Loading,
                folder_contents: HashMap::new(),
                open_folders: HashSet::new(),
                folders_loading: HashSet::new(),
                active_path: None,
                selected: None,
            },
            request,
        )
    }

    /// Switches to a different repository: all cached state is discarded and
    /// the root is refetched under a fresh generation.
    pub fn set_repo_url(&mut self, repo_url: impl Into<String>, generation: u64) -> ExplorerRequest {
        let (fresh, request) = Self::new(repo_url, generation);
        *self = fresh;
        request
    }

    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    pub fn root(&self) -> &RootListing {
        &self.root
    }

    pub fn active_path(&self) -> Option<&str> {
        self.active_path.as_deref()
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn is_open(&self, path: &str) -> bool {
        self.open_folders.contains(path)
    }

    pub fn is_folder_loading(&self, path: &str) -> bool {
        self.folders_loading.contains(path)
    }

    pub fn children_of(&self, path: &str) -> Option<&[RepoNode]> {
        self.folder_contents.get(path).map(Vec::as_slice)
    }

    /// Opens or closes a directory. Expansion is idempotent: children
    /// already cached (or already being fetched) produce no new request,
    /// and collapsing retains the cache.
    pub fn toggle_folder(&mut self, node: &RepoNode) -> Option<ExplorerRequest> {
        debug_assert_eq!(node.kind, NodeKind::Dir);
        self.active_path = Some(node.path.clone());

        if self.open_folders.remove(&node.path) {
            return None;
        }
        self.open_folders.insert(node.path.clone());

        if self.folder_contents.contains_key(&node.path) || self.folders_loading.contains(&node.path)
        {
            return None;
        }
        self.folders_loading.insert(node.path.clone());
        Some(ExplorerRequest::FolderListing {
            path: node.path.clone(),
            api_url: node.url.clone(),
            generation: self.generation,
        })
    }

    /// Selects a file for viewing. Image extensions render directly from
    /// the download URL; everything else needs a content fetch.
    pub fn select_file(&mut self, node: &RepoNode) -> Option<ExplorerRequest> {
        self.active_path = Some(node.path.clone());

        if is_image_file(&node.name) {
            let content = match &node.download_url {
                Some(url) => FileContent::Image { url: url.clone() },
                None => FileContent::Failed("file has no download URL".into()),
            };
            self.selected = Some(SelectedFile {
                name: node.name.clone(),
                path: node.path.clone(),
                language: "plaintext",
                content,
            });
            return None;
        }

        let language = language_for_file(&node.name);
        let Some(url) = node.download_url.clone() else {
            self.selected = Some(SelectedFile {
                name: node.name.clone(),
                path: node.path.clone(),
                language,
                content: FileContent::Failed("file has no download URL".into()),
            });
            return None;
        };
        self.selected = Some(SelectedFile {
            name: node.name.clone(),
            path: node.path.clone(),
            language,
            content: FileContent::Loading,
        });
        Some(ExplorerRequest::FileContent {
            path: node.path.clone(),
            url,
            generation: self.generation,
        })
    }

    pub fn on_root_loaded(&mut self, generation: u64, result: Result<Vec<RepoNode>, String>) {
        if generation != self.generation {
            log::debug!("dropping stale root listing (generation {generation})");
            return;
        }
        match result {
            Ok(nodes) => self.root = RootListing::Loaded(nodes),
            Err(err) => {
                log::error!("failed to load repository tree: {err}");
                self.root = RootListing::Failed(err);
            }
        }
    }

    pub fn on_folder_loaded(
        &mut self,
        generation: u64,
        path: &str,
        result: Result<Vec<RepoNode>, String>,
    ) {
        if generation != self.generation {
            log::debug!("dropping stale folder listing for {path}");
            return;
        }
        self.folders_loading.remove(path);
        match result {
            Ok(children) => {
                self.folder_contents.insert(path.to_string(), children);
            }
            Err(err) => {
                // Collapse back to the pre-expansion state; no retry.
                log::error!("failed to load folder {path}: {err}");
                self.open_folders.remove(path);
            }
        }
    }

    pub fn on_file_content(&mut self, generation: u64, path: &str, result: Result<String, String>) {
        if generation != self.generation {
            log::debug!("dropping stale file content for {path}");
            return;
        }
        let Some(selected) = self.selected.as_mut() else {
            return;
        };
        // The selection may have moved on while the fetch was in flight.
        if selected.path != path || !matches!(selected.content, FileContent::Loading) {
            return;
        }
        selected.content = match result {
            Ok(text) => FileContent::Text(text),
            Err(err) => {
                log::error!("failed to load file {path}: {err}");
                FileContent::Failed(err)
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(path: &str) -> RepoNode {
        RepoNode {
            name: path.rsplit('/').next().unwrap().to_string(),
            kind: NodeKind::Dir,
            path: path.to_string(),
            url: format!("https://api.github.com/repos/o/r/contents/{path}"),
            download_url: None,
        }
    }

    fn file(path: &str) -> RepoNode {
        RepoNode {
            name: path.rsplit('/').next().unwrap().to_string(),
            kind: NodeKind::File,
            path: path.to_string(),
            url: format!("https://api.github.com/repos/o/r/contents/{path}"),
            download_url: Some(format!("https://raw.example/{path}")),
        }
    }

    fn explorer() -> RepoExplorer {
        let (mut explorer, _) = RepoExplorer::new("https://github.com/o/r", 1);
        explorer.on_root_loaded(1, Ok(vec![dir("src"), file("README.md")]));
        explorer
    }

    #[test]
    fn expanding_a_cached_folder_issues_no_second_fetch() {
        let mut explorer = explorer();
        let src = dir("src");

        let request = explorer.toggle_folder(&src);
        assert!(matches!(
            request,
            Some(ExplorerRequest::FolderListing { ref path, .. }) if path == "src"
        ));
        explorer.on_folder_loaded(1, "src", Ok(vec![file("src/main.go")]));
        assert!(explorer.is_open("src"));
        assert_eq!(explorer.children_of("src").map(<[_]>::len), Some(1));

        // Collapse keeps the cache; re-expansion is a pure visibility toggle.
        assert!(explorer.toggle_folder(&src).is_none());
        assert!(!explorer.is_open("src"));
        assert!(explorer.toggle_folder(&src).is_none());
        assert!(explorer.is_open("src"));
        assert_eq!(explorer.children_of("src").map(<[_]>::len), Some(1));
    }

    #[test]
    fn expansion_while_a_fetch_is_in_flight_does_not_refetch() {
        let mut explorer = explorer();
        let src = dir("src");

        assert!(explorer.toggle_folder(&src).is_some());
        // Collapse and re-expand before the listing arrives.
        assert!(explorer.toggle_folder(&src).is_none());
        assert!(explorer.toggle_folder(&src).is_none());
        assert!(explorer.is_folder_loading("src"));
    }

    #[test]
    fn failed_folder_fetch_restores_the_collapsed_state() {
        let mut explorer = explorer();
        let src = dir("src");

        explorer.toggle_folder(&src);
        explorer.on_folder_loaded(1, "src", Err("boom".into()));
        assert!(!explorer.is_open("src"));
        assert!(explorer.children_of("src").is_none());

        // The next expansion retries the fetch.
        assert!(explorer.toggle_folder(&src).is_some());
    }

    #[test]
    fn results_from_a_previous_repository_are_discarded() {
        let (mut explorer, _) = RepoExplorer::new("https://github.com/o/r", 1);
        let _ = explorer.set_repo_url("https://github.com/o/other", 2);

        explorer.on_root_loaded(1, Ok(vec![file("stale.txt")]));
        assert!(matches!(explorer.root(), RootListing::Loading));

        explorer.on_root_loaded(2, Ok(vec![file("fresh.txt")]));
        match explorer.root() {
            RootListing::Loaded(nodes) => assert_eq!(nodes[0].name, "fresh.txt"),
            _ => panic!("root should be loaded"),
        }
    }

    #[test]
    fn image_files_route_to_the_image_viewer_without_a_fetch() {
        let mut explorer = explorer();
        let request = explorer.select_file(&file("logo.png"));
        assert!(request.is_none());
        let selected = explorer.selected().expect("selection");
        assert!(matches!(
            selected.content,
            FileContent::Image { ref url } if url.ends_with("logo.png")
        ));
    }

    #[test]
    fn code_files_route_to_the_text_viewer_with_inferred_language() {
        let mut explorer = explorer();

        let request = explorer.select_file(&file("src/main.go"));
        assert!(matches!(request, Some(ExplorerRequest::FileContent { .. })));
        assert_eq!(explorer.selected().unwrap().language, "go");

        explorer.on_file_content(1, "src/main.go", Ok("package main".into()));
        assert!(matches!(
            explorer.selected().unwrap().content,
            FileContent::Text(ref text) if text == "package main"
        ));

        explorer.select_file(&file("build.zig"));
        assert_eq!(explorer.selected().unwrap().language, "plaintext");
    }

    #[test]
    fn content_for_a_superseded_selection_is_dropped() {
        let mut explorer = explorer();

        explorer.select_file(&file("a.go"));
        explorer.select_file(&file("b.go"));

        explorer.on_file_content(1, "a.go", Ok("stale".into()));
        assert!(matches!(
            explorer.selected().unwrap().content,
            FileContent::Loading
        ));

        explorer.on_file_content(1, "b.go", Ok("fresh".into()));
        assert!(matches!(
            explorer.selected().unwrap().content,
            FileContent::Text(ref text) if text == "fresh"
        ));
    }
}
