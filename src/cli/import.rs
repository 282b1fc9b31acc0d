use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};
use tracing::{debug, info};

use crate::db::SocialStore;
use crate::error::{Result, WitterError};
use crate::model::{Post, Timestamp, User};

/// Locations of the CSV files making up a dataset. Any of them may be absent.
#[derive(Debug, Clone, Default)]
pub struct DatasetPaths {
    /// `id,name,joined`
    pub users: Option<PathBuf>,
    /// `follower,followed,at`
    pub follows: Option<PathBuf>,
    /// `id,author,message,at`
    pub weets: Option<PathBuf>,
}

impl DatasetPaths {
    /// `true` when no file is configured.
    pub fn is_empty(&self) -> bool {
        self.users.is_none() && self.follows.is_none() && self.weets.is_none()
    }
}

/// Row counts from a [`load_dataset`] run.
///
/// A row is skipped when the store rejects it (duplicate id, duplicate or
/// self follow). Malformed rows abort the load instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Users added to the registry.
    pub users_imported: u64,
    /// User rows rejected by the registry.
    pub users_skipped: u64,
    /// Follow edges created.
    pub follows_imported: u64,
    /// Follow rows rejected by the graph.
    pub follows_skipped: u64,
    /// Posts stored.
    pub weets_imported: u64,
    /// Post rows rejected by the timeline.
    pub weets_skipped: u64,
}

/// Loads every configured file of `paths` into `store`.
///
/// Users are read first, then follows, then posts. Headers are matched by
/// name, ignoring case, so column order is free.
pub fn load_dataset(store: &mut SocialStore, paths: &DatasetPaths) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    if let Some(path) = &paths.users {
        let (imported, skipped) = import_users(store, path)?;
        summary.users_imported = imported;
        summary.users_skipped = skipped;
    }
    if let Some(path) = &paths.follows {
        let (imported, skipped) = import_follows(store, path)?;
        summary.follows_imported = imported;
        summary.follows_skipped = skipped;
    }
    if let Some(path) = &paths.weets {
        let (imported, skipped) = import_weets(store, path)?;
        summary.weets_imported = imported;
        summary.weets_skipped = skipped;
    }

    info!(
        users = summary.users_imported,
        follows = summary.follows_imported,
        weets = summary.weets_imported,
        "import.dataset.loaded"
    );
    Ok(summary)
}

fn import_users(store: &mut SocialStore, path: &Path) -> Result<(u64, u64)> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let headers = reader.headers()?.clone();
    let id_index = find_column(path, &headers, "id")?;
    let name_index = find_column(path, &headers, "name")?;
    let joined_index = find_column(path, &headers, "joined")?;

    let (mut imported, mut skipped) = (0, 0);
    for result in reader.records() {
        let record = result?;
        let field = Field::new(path, &record);
        let user = User::new(
            field.id(id_index, "id")?,
            field.text(name_index, "name")?,
            field.timestamp(joined_index, "joined")?,
        );
        if store.add_user(user) {
            imported += 1;
        } else {
            skipped += 1;
        }
    }
    debug!(path = %path.display(), imported, skipped, "import.users");
    Ok((imported, skipped))
}

fn import_follows(store: &mut SocialStore, path: &Path) -> Result<(u64, u64)> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let headers = reader.headers()?.clone();
    let follower_index = find_column(path, &headers, "follower")?;
    let followed_index = find_column(path, &headers, "followed")?;
    let at_index = find_column(path, &headers, "at")?;

    let (mut imported, mut skipped) = (0, 0);
    for result in reader.records() {
        let record = result?;
        let field = Field::new(path, &record);
        let follower = field.id(follower_index, "follower")?;
        let followed = field.id(followed_index, "followed")?;
        let at = field.timestamp(at_index, "at")?;
        if store.follow(follower, followed, at) {
            imported += 1;
        } else {
            skipped += 1;
        }
    }
    debug!(path = %path.display(), imported, skipped, "import.follows");
    Ok((imported, skipped))
}

fn import_weets(store: &mut SocialStore, path: &Path) -> Result<(u64, u64)> {
    let mut reader = ReaderBuilder::new().from_path(path)?;
    let headers = reader.headers()?.clone();
    let id_index = find_column(path, &headers, "id")?;
    let author_index = find_column(path, &headers, "author")?;
    let message_index = find_column(path, &headers, "message")?;
    let at_index = find_column(path, &headers, "at")?;

    let (mut imported, mut skipped) = (0, 0);
    for result in reader.records() {
        let record = result?;
        let field = Field::new(path, &record);
        let post = Post::new(
            field.id(id_index, "id")?,
            field.id(author_index, "author")?,
            field.raw(message_index, "message")?,
            field.timestamp(at_index, "at")?,
        );
        if store.add_post(post) {
            imported += 1;
        } else {
            skipped += 1;
        }
    }
    debug!(path = %path.display(), imported, skipped, "import.weets");
    Ok((imported, skipped))
}

fn find_column(path: &Path, headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            WitterError::parse(
                path.display().to_string(),
                format!("column '{name}' not found"),
            )
        })
}

/// Field accessor for one CSV record that reports file, line and column on
/// failure.
struct Field<'a> {
    path: &'a Path,
    record: &'a StringRecord,
}

impl<'a> Field<'a> {
    fn new(path: &'a Path, record: &'a StringRecord) -> Self {
        Self { path, record }
    }

    fn context(&self, column: &str) -> String {
        let line = self.record.position().map_or(0, |pos| pos.line());
        format!("{}:{} column '{}'", self.path.display(), line, column)
    }

    fn raw(&self, index: usize, column: &str) -> Result<&'a str> {
        self.record
            .get(index)
            .ok_or_else(|| WitterError::parse(self.context(column), "missing value"))
    }

    fn text(&self, index: usize, column: &str) -> Result<&'a str> {
        let value = self.raw(index, column)?.trim();
        if value.is_empty() {
            return Err(WitterError::parse(self.context(column), "missing value"));
        }
        Ok(value)
    }

    fn id(&self, index: usize, column: &str) -> Result<i64> {
        let value = self.text(index, column)?;
        value.parse::<i64>().map_err(|err| {
            WitterError::parse(self.context(column), format!("invalid id '{value}': {err}"))
        })
    }

    fn timestamp(&self, index: usize, column: &str) -> Result<Timestamp> {
        let value = self.text(index, column)?;
        parse_timestamp(value)
            .map_err(|err| WitterError::parse(self.context(column), err.to_string()))
    }
}

/// Parses an RFC 3339 timestamp, `YYYY-MM-DD HH:MM:SS` (taken as UTC) or a
/// bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(value: &str) -> Result<Timestamp> {
    let value = value.trim();
    if let Ok(at) = OffsetDateTime::parse(value, &Rfc3339) {
        return Ok(at);
    }
    let spaced = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    if let Ok(at) = PrimitiveDateTime::parse(value, spaced) {
        return Ok(at.assume_utc());
    }
    if let Ok(day) = parse_date(value) {
        return Ok(day.midnight().assume_utc());
    }
    Err(WitterError::InvalidArgument(format!(
        "unrecognised timestamp '{value}'"
    )))
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<Date> {
    let value = value.trim();
    Date::parse(value, format_description!("[year]-[month]-[day]")).map_err(|err| {
        WitterError::InvalidArgument(format!("invalid date '{value}': {err}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn timestamps_accept_three_layouts() {
        assert_eq!(
            parse_timestamp("2020-01-02T03:04:05+01:00").expect("rfc3339"),
            datetime!(2020-01-02 03:04:05 +01:00)
        );
        assert_eq!(
            parse_timestamp("2020-01-02 03:04:05").expect("spaced"),
            datetime!(2020-01-02 03:04:05 UTC)
        );
        assert_eq!(
            parse_timestamp(" 2020-01-02 ").expect("date only"),
            datetime!(2020-01-02 0:00 UTC)
        );
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn dates_reject_times() {
        assert_eq!(parse_date("2021-12-31").expect("date"), date!(2021-12-31));
        assert!(parse_date("2021-12-31 10:00:00").is_err());
    }
}
