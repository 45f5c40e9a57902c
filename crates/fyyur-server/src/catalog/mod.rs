//! Store queries shaped into view models, and the write commands behind
//! the create/edit/delete forms.
//!
//! Every write opens a `DatabaseTransaction` and commits only on the
//! success path. Any early return drops the transaction, which rolls it
//! back, so no exit path leaves a partial write behind.

pub mod artists;
pub mod shows;
pub mod venues;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait, QueryFilter};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::forms::FieldErrors;
use crate::schedule;
use fyyur_db::entities::show;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("invalid submission: {0}")]
    Invalid(FieldErrors),

    #[error("artist {0} still has shows booked")]
    ArtistHasShows(i32),

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl CatalogError {
    pub fn venue_not_found(id: i32) -> Self {
        Self::NotFound { entity: "venue", id }
    }

    pub fn artist_not_found(id: i32) -> Self {
        Self::NotFound { entity: "artist", id }
    }
}

/// One row of a venue/artist listing or search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<ListingEntry>,
}

impl SearchResults {
    fn from_entries(data: Vec<ListingEntry>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Case-insensitive substring match of `column` against `term`. LIKE
/// wildcards typed by the user are matched literally.
///
/// The term is folded the way the backend's `LOWER` folds the column:
/// SQLite only folds ASCII, PostgreSQL folds full Unicode.
pub(crate) fn name_contains<C>(column: C, term: &str, backend: DbBackend) -> SimpleExpr
where
    C: ColumnTrait,
{
    let term = term.trim();
    let folded = match backend {
        DbBackend::Sqlite => term.to_ascii_lowercase(),
        _ => term.to_lowercase(),
    };
    let escaped = folded
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Expr::expr(Func::lower(Expr::col(column)))
        .like(LikeExpr::new(format!("%{escaped}%")).escape('\\'))
}

/// Upcoming-show counts keyed by the id `key` extracts from each show.
/// Ids without upcoming shows are absent from the map.
pub(crate) async fn upcoming_counts(
    db: &DatabaseConnection,
    column: show::Column,
    ids: &[i32],
    key: fn(&show::Model) -> i32,
    now: DateTime<Utc>,
) -> Result<HashMap<i32, usize>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let shows = show::Entity::find()
        .filter(column.is_in(ids.to_vec()))
        .all(db)
        .await?;

    let mut by_owner: HashMap<i32, Vec<show::Model>> = HashMap::new();
    for s in shows {
        by_owner.entry(key(&s)).or_default().push(s);
    }

    Ok(by_owner
        .into_iter()
        .map(|(id, owned)| (id, schedule::count_upcoming(&owned, now)))
        .filter(|(_, count)| *count > 0)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fyyur_db::entities::venue;
    use sea_orm::sea_query::{PostgresQueryBuilder, Query, SqliteQueryBuilder};

    fn render_pg(expr: SimpleExpr) -> String {
        Query::select()
            .column(venue::Column::Id)
            .from(venue::Entity)
            .and_where(expr)
            .to_string(PostgresQueryBuilder)
    }

    #[test]
    fn test_name_contains_lowercases_term() {
        let sql = render_pg(name_contains(venue::Column::Name, "  Music ", DbBackend::Postgres));
        assert!(sql.contains(r#"LOWER("name") LIKE '%music%'"#), "{sql}");
    }

    #[test]
    fn test_name_contains_escapes_wildcards() {
        let sql = Query::select()
            .column(venue::Column::Id)
            .from(venue::Entity)
            .and_where(name_contains(venue::Column::Name, "100%_off", DbBackend::Sqlite))
            .to_string(SqliteQueryBuilder);
        assert!(sql.contains(r"100\%\_off"), "{sql}");
        assert!(sql.contains("ESCAPE"), "{sql}");
    }

    #[test]
    fn test_name_contains_folds_like_the_backend() {
        let pg = render_pg(name_contains(venue::Column::Name, "Éclair", DbBackend::Postgres));
        assert!(pg.contains("'%éclair%'"), "{pg}");

        let sqlite = Query::select()
            .column(venue::Column::Id)
            .from(venue::Entity)
            .and_where(name_contains(venue::Column::Name, "Éclair", DbBackend::Sqlite))
            .to_string(SqliteQueryBuilder);
        assert!(sqlite.contains("'%Éclair%'"), "{sqlite}");
    }

    #[test]
    fn test_catalog_error_messages() {
        assert_eq!(CatalogError::venue_not_found(7).to_string(), "venue 7 not found");
        assert_eq!(CatalogError::artist_not_found(3).to_string(), "artist 3 not found");
        assert_eq!(
            CatalogError::ArtistHasShows(2).to_string(),
            "artist 2 still has shows booked"
        );
        let err: CatalogError = DbErr::Custom("boom".into()).into();
        assert!(matches!(err, CatalogError::Database(_)));
    }

    #[test]
    fn test_search_results_count_matches_data() {
        let results = SearchResults::from_entries(vec![ListingEntry {
            id: 1,
            name: "The Musical Hop".into(),
            num_upcoming_shows: 0,
        }]);
        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["data"][0]["num_upcoming_shows"], 0);

        let empty = SearchResults::from_entries(vec![]);
        let json = serde_json::to_value(&empty).unwrap();
        assert_eq!(json["count"], 0);
        assert!(json["data"].as_array().unwrap().is_empty());
    }
}
