use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

pub type FolderId = i64;

/// Identifier of the top-level folder. The root panel is always open and is
/// never part of the highlighted chain.
pub const ROOT_ID: FolderId = 1;

/// Bookmark export used when no source URL is configured.
pub const DEFAULT_SOURCE_URL: &str = "https://gist.githubusercontent.com/ayushsrawat/25062ec55d234974c2b3ea7a02a65b8f/raw/d084191041fc1c4a9702ba4eed6aeabaf080a6e9/chrome_bookmark.json";

/// A leaf bookmark entry pointing at a URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(rename = "parentId")]
    pub parent_id: FolderId,
}

/// A container node in the bookmark tree. May hold child folders and
/// bookmarks via their `parent_id` references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub title: String,
    #[serde(rename = "parentId")]
    pub parent_id: FolderId,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The source responded with a non-success HTTP status.
    #[error("fetch failed with status {0}")]
    Fetch(reqwest::StatusCode),

    /// The request itself failed (connection, timeout, TLS).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not a valid bookmark document.
    #[error("malformed bookmark document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Wire shape of the remote export. Either key may be absent, in which case
/// the collection is simply empty.
#[derive(Debug, Default, Deserialize)]
struct BookmarkDocument {
    #[serde(default)]
    files: Vec<Bookmark>,
    #[serde(default)]
    folders: Vec<Folder>,
}

/// In-memory bookmark collections, populated once by [`BookmarkStore::load`]
/// and immutable afterwards.
#[derive(Debug, Default)]
pub struct BookmarkStore {
    files: Vec<Bookmark>,
    folders: Vec<Folder>,
}

impl BookmarkStore {
    /// A store with no folders and no bookmarks. This is what the UI browses
    /// when the initial fetch fails: only the root panel, nothing inside.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a store from already-parsed collections. The remote path goes
    /// through [`BookmarkStore::load`]; this mainly serves in-process
    /// fixtures.
    pub fn from_parts(folders: Vec<Folder>, files: Vec<Bookmark>) -> Self {
        Self { files, folders }
    }

    /// Fetches the bookmark document from `url`. Performed exactly once per
    /// application lifetime; there is no retry and no re-fetch on later state
    /// changes.
    pub async fn load(url: &str, timeout: Duration) -> Result<Self, StoreError> {
        tracing::info!(url, "fetching bookmark document");

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let response = client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Fetch(status));
        }

        let body = response.text().await?;
        let document: BookmarkDocument = serde_json::from_str(&body)?;

        tracing::info!(
            folders = document.folders.len(),
            files = document.files.len(),
            "bookmark document loaded"
        );

        Ok(Self {
            files: document.files,
            folders: document.folders,
        })
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn files(&self) -> &[Bookmark] {
        &self.files
    }

    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Direct child folders of one panel, in document order.
    pub fn folders_under(&self, panel: FolderId) -> Vec<&Folder> {
        self.folders.iter().filter(|f| f.parent_id == panel).collect()
    }

    /// Direct child bookmarks of one panel, in document order.
    pub fn files_under(&self, panel: FolderId) -> Vec<&Bookmark> {
        self.files.iter().filter(|f| f.parent_id == panel).collect()
    }
}

/// Lookup indexes derived from the folder list. Rebuilt whole whenever the
/// folder list changes, never patched in place, so they cannot go stale
/// against the list they were derived from.
#[derive(Debug, Default)]
pub struct TreeIndex {
    parents: HashMap<FolderId, FolderId>,
    children: HashMap<FolderId, Vec<FolderId>>,
}

impl TreeIndex {
    pub fn build(folders: &[Folder]) -> Self {
        Self {
            parents: parent_index(folders),
            children: children_index(folders),
        }
    }

    /// Parent of `id`, or `None` when `id` is not a known folder. Callers
    /// doing ancestor walks substitute the root on a miss rather than
    /// treating it as an error.
    pub fn parent_of(&self, id: FolderId) -> Option<FolderId> {
        self.parents.get(&id).copied()
    }

    pub fn children_of(&self, id: FolderId) -> &[FolderId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Maps each folder id to its parent id. Duplicate folder ids overwrite
/// earlier entries (last write wins); the input is taken as-is, not
/// validated.
pub fn parent_index(folders: &[Folder]) -> HashMap<FolderId, FolderId> {
    folders.iter().map(|f| (f.id, f.parent_id)).collect()
}

/// Maps each parent id to its child folder ids in document order. Built once
/// per folder-list change so descendant traversals need not rescan the list.
pub fn children_index(folders: &[Folder]) -> HashMap<FolderId, Vec<FolderId>> {
    let mut children: HashMap<FolderId, Vec<FolderId>> = HashMap::new();
    for folder in folders {
        children.entry(folder.parent_id).or_default().push(folder.id);
    }
    children
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn folder(id: FolderId, parent_id: FolderId) -> Folder {
        Folder {
            id,
            title: format!("folder-{id}"),
            parent_id,
        }
    }

    #[test]
    fn parent_index_maps_each_folder() {
        let folders = vec![folder(2, 1), folder(3, 2), folder(4, 2)];
        let index = parent_index(&folders);

        assert_eq!(index.len(), 3);
        assert_eq!(index[&2], 1);
        assert_eq!(index[&3], 2);
        assert_eq!(index[&4], 2);
    }

    #[test]
    fn parent_index_duplicate_ids_last_write_wins() {
        let folders = vec![folder(2, 1), folder(2, 5)];
        let index = parent_index(&folders);

        assert_eq!(index.len(), 1);
        assert_eq!(index[&2], 5);
    }

    #[test]
    fn children_index_groups_by_parent_in_document_order() {
        let folders = vec![folder(4, 2), folder(2, 1), folder(3, 2)];
        let index = children_index(&folders);

        assert_eq!(index[&1], vec![2]);
        assert_eq!(index[&2], vec![4, 3]);
        assert!(index.get(&4).is_none());
    }

    #[test]
    fn tree_index_parent_miss_is_none() {
        let index = TreeIndex::build(&[folder(2, 1)]);
        assert_eq!(index.parent_of(2), Some(1));
        assert_eq!(index.parent_of(99), None);
        assert!(index.children_of(99).is_empty());
    }

    #[test]
    fn document_defaults_missing_collections_to_empty() {
        let document: BookmarkDocument = serde_json::from_str("{}").unwrap();
        assert!(document.files.is_empty());
        assert!(document.folders.is_empty());
    }

    #[test]
    fn direct_children_accessors_filter_by_parent() {
        let store = BookmarkStore {
            folders: vec![folder(2, 1), folder(3, 2)],
            files: vec![Bookmark {
                id: 10,
                title: "a".to_string(),
                url: "http://x".to_string(),
                parent_id: 2,
            }],
        };

        let root_folders: Vec<FolderId> = store.folders_under(1).iter().map(|f| f.id).collect();
        assert_eq!(root_folders, vec![2]);

        let panel_folders: Vec<FolderId> = store.folders_under(2).iter().map(|f| f.id).collect();
        assert_eq!(panel_folders, vec![3]);
        assert_eq!(store.files_under(2).len(), 1);
        assert!(store.files_under(1).is_empty());
    }

    #[tokio::test]
    async fn load_parses_remote_document() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/bookmarks.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "folders": [{"id": 2, "title": "work", "parentId": 1}],
                    "files": [{"id": 10, "title": "a", "url": "http://x", "parentId": 2}]
                }"#,
            )
            .create_async()
            .await;

        let url = format!("{}/bookmarks.json", server.url());
        let store = BookmarkStore::load(&url, Duration::from_secs(5))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(store.folders().len(), 1);
        assert_eq!(store.folders()[0].title, "work");
        assert_eq!(store.files().len(), 1);
        assert_eq!(store.files()[0].parent_id, 2);
    }

    #[tokio::test]
    async fn load_defaults_absent_keys_to_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/bookmarks.json")
            .with_status(200)
            .with_body(r#"{"folders": [{"id": 2, "title": "work", "parentId": 1}]}"#)
            .create_async()
            .await;

        let url = format!("{}/bookmarks.json", server.url());
        let store = BookmarkStore::load(&url, Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(store.folders().len(), 1);
        assert!(store.files().is_empty());
    }

    #[tokio::test]
    async fn load_reports_http_failure_as_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/bookmarks.json")
            .with_status(404)
            .create_async()
            .await;

        let url = format!("{}/bookmarks.json", server.url());
        let err = BookmarkStore::load(&url, Duration::from_secs(5))
            .await
            .unwrap_err();

        match err {
            StoreError::Fetch(status) => assert_eq!(status.as_u16(), 404),
            other => panic!("expected Fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn load_reports_malformed_body_as_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/bookmarks.json")
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let url = format!("{}/bookmarks.json", server.url());
        let err = BookmarkStore::load(&url, Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Parse(_)));
    }
}
