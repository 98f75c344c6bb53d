//! [`SqliteStore`], the SQLite implementation of [`MatchRepository`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use swipe_core::{
  UserId,
  matches::{MatchRecord, NewMatch},
  media::{DISPLAY_ORDER, ProfileMedia},
  repository::{MatchRepository, RepoResult},
};

use crate::{
  Error, Result,
  encode::{MATCH_COLUMNS, RawMatch, RawMedia, encode_dt, encode_match_type},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A match repository backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    tracing::debug!(path = %path.as_ref().display(), "opening match store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Media ───────────────────────────────────────────────────────────────

  /// Record a media item for `user_id`. Profile media management lives
  /// elsewhere; this exists to seed the table the enrichment path reads.
  pub async fn add_media(
    &self,
    user_id:  UserId,
    url:      &str,
    order_id: i64,
  ) -> Result<ProfileMedia> {
    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let url_owned  = url.to_owned();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profile_media (user_id, url, order_id, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![user_id, url_owned, order_id, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(ProfileMedia {
      id,
      user_id,
      url: url.to_owned(),
      order_id,
      created_at,
    })
  }

  /// Soft-delete a media item. Returns `false` if it was missing or already
  /// deleted.
  pub async fn remove_media(&self, media_id: i64) -> Result<bool> {
    let at_str = encode_dt(Utc::now());
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE profile_media SET deleted_at = ?2
           WHERE id = ?1 AND deleted_at IS NULL",
          rusqlite::params![media_id, at_str],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  // ── Matches ─────────────────────────────────────────────────────────────

  async fn insert_pair(&self, a: NewMatch, b: NewMatch) -> Result<(MatchRecord, MatchRecord)> {
    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let rows       = [a.clone(), b.clone()];

    let ids: [i64; 2] = self
      .conn
      .call(move |conn| {
        // Dropping `tx` without commit rolls back the first row if the
        // second insert fails.
        let tx = conn.transaction()?;
        let mut ids = [0_i64; 2];
        {
          let mut stmt = tx.prepare(
            "INSERT INTO user_match (user_id, matched_user_id, match_type, chat_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
          )?;
          for (slot, m) in ids.iter_mut().zip(rows.iter()) {
            stmt.execute(rusqlite::params![
              m.user_id,
              m.matched_user_id,
              encode_match_type(m.match_type),
              m.chat_id,
              at_str,
            ])?;
            *slot = tx.last_insert_rowid();
          }
        }
        tx.commit()?;
        Ok(ids)
      })
      .await
      .map_err(|e| classify_insert_error(e, &a))?;

    let record = |id: i64, m: NewMatch| MatchRecord {
      id,
      user_id: m.user_id,
      matched_user_id: m.matched_user_id,
      match_type: m.match_type,
      chat_id: m.chat_id,
      created_at,
      updated_at: None,
    };

    Ok((record(ids[0], a), record(ids[1], b)))
  }

  async fn matches_for(&self, user_id: UserId) -> Result<Vec<MatchRecord>> {
    let raws: Vec<RawMatch> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {MATCH_COLUMNS} FROM user_match WHERE user_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user_id], RawMatch::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMatch::into_record).collect()
  }

  async fn match_between(&self, user_id: UserId, other_id: UserId) -> Result<Option<MatchRecord>> {
    let raw: Option<RawMatch> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {MATCH_COLUMNS} FROM user_match
                 WHERE user_id = ?1 AND matched_user_id = ?2"
              ),
              rusqlite::params![user_id, other_id],
              RawMatch::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMatch::into_record).transpose()
  }

  async fn delete_pair(&self, user_id: UserId, other_id: UserId) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM user_match
           WHERE (user_id = ?1 AND matched_user_id = ?2)
              OR (user_id = ?2 AND matched_user_id = ?1)",
          rusqlite::params![user_id, other_id],
        )?)
      })
      .await?;
    Ok(deleted > 0)
  }

  async fn display_media_for(&self, user_ids: &[UserId]) -> Result<Vec<ProfileMedia>> {
    if user_ids.is_empty() {
      return Ok(Vec::new());
    }

    let placeholders = vec!["?"; user_ids.len()].join(", ");
    let mut params   = Vec::with_capacity(user_ids.len() + 1);
    params.push(DISPLAY_ORDER);
    params.extend_from_slice(user_ids);

    let raws: Vec<RawMedia> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT id, user_id, url, order_id, created_at
           FROM profile_media
           WHERE deleted_at IS NULL AND order_id = ? AND user_id IN ({placeholders})
           ORDER BY user_id, id DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| {
            Ok(RawMedia {
              id:         row.get(0)?,
              user_id:    row.get(1)?,
              url:        row.get(2)?,
              order_id:   row.get(3)?,
              created_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    // Newest row wins when a user has more than one at the display slot.
    let mut media: Vec<ProfileMedia> = Vec::with_capacity(raws.len());
    for raw in raws {
      if media.last().is_some_and(|m| m.user_id == raw.user_id) {
        continue;
      }
      media.push(raw.into_media()?);
    }
    Ok(media)
  }
}

/// Map a failed pair insert to a domain error. A unique-constraint hit means
/// the pair already exists; any other constraint is a rejected write.
fn classify_insert_error(e: tokio_rusqlite::Error, first: &NewMatch) -> Error {
  let constraint = match &e {
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(f, msg))
      if f.code == rusqlite::ErrorCode::ConstraintViolation =>
    {
      Some((f.extended_code, msg.clone().unwrap_or_else(|| f.to_string())))
    }
    _ => None,
  };

  match constraint {
    Some((code, _)) if code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => Error::AlreadyMatched {
      user_id:         first.user_id,
      matched_user_id: first.matched_user_id,
    },
    Some((_, msg)) => Error::Constraint(msg),
    None => Error::Database(e),
  }
}

// ─── MatchRepository impl ────────────────────────────────────────────────────

impl MatchRepository for SqliteStore {
  async fn insert_match_pair(&self, a: NewMatch, b: NewMatch) -> RepoResult<(MatchRecord, MatchRecord)> {
    Ok(self.insert_pair(a, b).await?)
  }

  async fn find_matches_for_user(&self, user_id: UserId) -> RepoResult<Vec<MatchRecord>> {
    Ok(self.matches_for(user_id).await?)
  }

  async fn find_match_between(
    &self,
    user_id:  UserId,
    other_id: UserId,
  ) -> RepoResult<Option<MatchRecord>> {
    Ok(self.match_between(user_id, other_id).await?)
  }

  async fn delete_match_pair(&self, user_id: UserId, other_id: UserId) -> RepoResult<bool> {
    Ok(self.delete_pair(user_id, other_id).await?)
  }

  async fn first_media_for_users<'a>(&'a self, user_ids: &'a [UserId]) -> RepoResult<Vec<ProfileMedia>> {
    Ok(self.display_media_for(user_ids).await?)
  }
}
