use crate::database::models::{ExternalLink, NewPostRecord, PostRecord};
use crate::utils::now_utc_iso;
use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub(super) struct SqlitePostRepository<'conn> {
    pub(super) conn: &'conn Connection,
}

const POST_COLUMNS: &str = "id, username, title, description, technologies, screenshots, \
                            github, code, external_links, created_at, updated_at";

impl<'conn> super::PostRepository for SqlitePostRepository<'conn> {
    fn insert(&self, record: &NewPostRecord) -> Result<PostRecord> {
        let now = now_utc_iso();
        let technologies = serde_json::to_string(&record.technologies)?;
        let screenshots = serde_json::to_string(&record.screenshots)?;
        let external_links = if record.external_links.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&record.external_links)?)
        };
        self.conn.execute(
            r#"
            INSERT INTO posts (username, title, description, technologies, screenshots,
                               github, code, external_links, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
            "#,
            params![
                record.username,
                record.title,
                record.description,
                technologies,
                screenshots,
                record.github,
                record.code,
                external_links,
                now,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        Ok(PostRecord {
            id,
            username: record.username.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            technologies: record.technologies.clone(),
            screenshots: record.screenshots.clone(),
            github: record.github.clone(),
            code: record.code.clone(),
            external_links: record.external_links.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    fn get(&self, id: i64) -> Result<Option<PostRecord>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
                params![id],
                map_post_row,
            )
            .optional()?;
        row.map(finish_post_row).transpose()
    }

    fn list_after(&self, cursor: Option<i64>, limit: usize) -> Result<Vec<PostRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE id > ?1
            ORDER BY id ASC
            LIMIT ?2
            "#
        ))?;
        let rows = stmt.query_map(params![cursor.unwrap_or(0), limit as i64], map_post_row)?;

        let mut posts = Vec::new();
        for row in rows {
            posts.push(finish_post_row(row?)?);
        }
        Ok(posts)
    }

    fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// Raw row with the JSON columns still undecoded; rusqlite's row callback
/// cannot return arbitrary errors, so decoding happens in a second step.
struct RawPostRow {
    id: i64,
    username: String,
    title: String,
    description: String,
    technologies: String,
    screenshots: String,
    github: Option<String>,
    code: Option<String>,
    external_links: Option<String>,
    created_at: String,
    updated_at: String,
}

fn map_post_row(row: &Row<'_>) -> rusqlite::Result<RawPostRow> {
    Ok(RawPostRow {
        id: row.get(0)?,
        username: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        technologies: row.get(4)?,
        screenshots: row.get(5)?,
        github: row.get(6)?,
        code: row.get(7)?,
        external_links: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn finish_post_row(raw: RawPostRow) -> Result<PostRecord> {
    let technologies: Vec<String> =
        serde_json::from_str(&raw.technologies).context("invalid technologies column")?;
    let screenshots: Vec<String> =
        serde_json::from_str(&raw.screenshots).context("invalid screenshots column")?;
    let external_links: Vec<ExternalLink> = match raw.external_links.as_deref() {
        Some(json) => serde_json::from_str(json).context("invalid external_links column")?,
        None => Vec::new(),
    };
    Ok(PostRecord {
        id: raw.id,
        username: raw.username,
        title: raw.title,
        description: raw.description,
        technologies,
        screenshots,
        github: raw.github,
        code: raw.code,
        external_links,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
    })
}
