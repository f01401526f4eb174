mod posts;

use super::models::{NewPostRecord, PostRecord};
use anyhow::Result;
use rusqlite::Connection;

pub trait PostRepository {
    /// Inserts the candidate, assigning id and timestamps, and returns the
    /// stored record.
    fn insert(&self, record: &NewPostRecord) -> Result<PostRecord>;
    fn get(&self, id: i64) -> Result<Option<PostRecord>>;
    /// Posts with id strictly greater than `cursor` (all posts when absent),
    /// ascending by id, at most `limit` rows.
    fn list_after(&self, cursor: Option<i64>, limit: usize) -> Result<Vec<PostRecord>>;
    fn count(&self) -> Result<i64>;
}

/// Thin wrapper hosting the rusqlite-backed repository implementations.
pub struct SqliteRepositories<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRepositories<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub fn posts(&self) -> impl PostRepository + '_ {
        posts::SqlitePostRepository { conn: self.conn }
    }

    pub fn conn(&self) -> &'conn Connection {
        self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::ExternalLink;
    use crate::database::MIGRATIONS;

    fn setup_conn() -> Connection {
        let conn = Connection::open_in_memory().expect("in-memory db");
        conn.execute_batch(MIGRATIONS).expect("base migrations");
        conn
    }

    fn sample(title: &str) -> NewPostRecord {
        NewPostRecord {
            username: "ada".into(),
            title: title.into(),
            description: "A responsive nav bar example".into(),
            technologies: vec!["HTML5".into(), "CSS3".into()],
            screenshots: vec!["https://x/1.png".into()],
            github: None,
            code: None,
            external_links: Vec::new(),
        }
    }

    #[test]
    fn insert_assigns_monotonic_ids_and_timestamps() {
        let conn = setup_conn();
        let repos = SqliteRepositories::new(&conn);

        let first = repos.posts().insert(&sample("Nav Bar")).unwrap();
        let second = repos.posts().insert(&sample("Footer")).unwrap();
        assert!(second.id > first.id);
        assert!(!first.created_at.is_empty());
        assert_eq!(first.created_at, first.updated_at);

        let fetched = repos.posts().get(first.id).unwrap().unwrap();
        assert_eq!(fetched.title, "Nav Bar");
        assert_eq!(fetched.technologies, vec!["HTML5", "CSS3"]);
    }

    #[test]
    fn external_links_round_trip() {
        let conn = setup_conn();
        let repos = SqliteRepositories::new(&conn);

        let mut record = sample("Linked");
        record.github = Some("https://github.com/ada/navbar".into());
        record.external_links = vec![ExternalLink {
            platform: "GitHub".into(),
            url: "https://github.com/ada".into(),
        }];
        let stored = repos.posts().insert(&record).unwrap();
        let fetched = repos.posts().get(stored.id).unwrap().unwrap();
        assert_eq!(fetched.external_links, record.external_links);
        assert_eq!(fetched.github.as_deref(), Some("https://github.com/ada/navbar"));
    }

    #[test]
    fn list_after_pages_in_ascending_id_order() {
        let conn = setup_conn();
        let repos = SqliteRepositories::new(&conn);
        for i in 0..5 {
            repos.posts().insert(&sample(&format!("post {i}"))).unwrap();
        }

        let all = repos.posts().list_after(None, 10).unwrap();
        assert_eq!(all.len(), 5);
        assert!(all.windows(2).all(|w| w[0].id < w[1].id));

        let cursor = all[1].id;
        let rest = repos.posts().list_after(Some(cursor), 10).unwrap();
        assert_eq!(rest.len(), 3);
        assert!(rest.iter().all(|p| p.id > cursor));

        assert_eq!(repos.posts().count().unwrap(), 5);
    }
}
