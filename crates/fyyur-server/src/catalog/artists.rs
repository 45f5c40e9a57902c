use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;

use super::{name_contains, upcoming_counts, CatalogError, ListingEntry, SearchResults};
use crate::forms::{ArtistForm, ValidArtist};
use crate::schedule::{self, format_start_time};
use fyyur_db::entities::{artist, show, venue};
use fyyur_db::State;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistSummary {
    pub id: i32,
    pub name: String,
}

/// A show as seen from its artist's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistShow {
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistDetail {
    pub id: i32,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: State,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<ArtistShow>,
    pub upcoming_shows: Vec<ArtistShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl ArtistDetail {
    fn assemble(a: artist::Model, past_shows: Vec<ArtistShow>, upcoming_shows: Vec<ArtistShow>) -> Self {
        Self {
            id: a.id,
            name: a.name,
            genres: a.genres.labels(),
            city: a.city,
            state: a.state,
            phone: a.phone,
            website: a.website,
            facebook_link: a.facebook_link,
            seeking_venue: a.seeking_venue,
            seeking_description: a.seeking_description,
            image_link: a.image_link,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<ArtistSummary>, CatalogError> {
    let artists = artist::Entity::find()
        .order_by_asc(artist::Column::Name)
        .all(db)
        .await?;

    Ok(artists
        .into_iter()
        .map(|a| ArtistSummary {
            id: a.id,
            name: a.name,
        })
        .collect())
}

pub async fn search(
    db: &DatabaseConnection,
    term: &str,
    now: DateTime<Utc>,
) -> Result<SearchResults, CatalogError> {
    let matches = artist::Entity::find()
        .filter(name_contains(artist::Column::Name, term, db.get_database_backend()))
        .order_by_asc(artist::Column::Id)
        .all(db)
        .await?;

    let ids: Vec<i32> = matches.iter().map(|a| a.id).collect();
    let counts = upcoming_counts(db, show::Column::ArtistId, &ids, |s| s.artist_id, now).await?;

    Ok(SearchResults::from_entries(
        matches
            .into_iter()
            .map(|a| ListingEntry {
                num_upcoming_shows: counts.get(&a.id).copied().unwrap_or(0),
                id: a.id,
                name: a.name,
            })
            .collect(),
    ))
}

pub async fn detail(
    db: &DatabaseConnection,
    id: i32,
    now: DateTime<Utc>,
) -> Result<ArtistDetail, CatalogError> {
    let artist_model = artist::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| CatalogError::artist_not_found(id))?;

    let rows = show::Entity::find()
        .filter(show::Column::ArtistId.eq(id))
        .order_by_asc(show::Column::StartTime)
        .find_also_related(venue::Entity)
        .all(db)
        .await?;

    let booked: Vec<(show::Model, venue::Model)> = rows
        .into_iter()
        .filter_map(|(s, v)| match v {
            Some(v) => Some((s, v)),
            None => {
                tracing::warn!(show_id = s.id, venue_id = s.venue_id, "show without venue");
                None
            }
        })
        .collect();

    let schedule = schedule::split_shows(booked, now, |(s, _)| s.start_time);
    let to_view = |(s, v): (show::Model, venue::Model)| ArtistShow {
        venue_id: s.venue_id,
        venue_name: v.name,
        venue_image_link: v.image_link,
        start_time: format_start_time(s.start_time),
    };

    Ok(ArtistDetail::assemble(
        artist_model,
        schedule.past.into_iter().map(to_view).collect(),
        schedule.upcoming.into_iter().map(to_view).collect(),
    ))
}

pub async fn edit_form(db: &DatabaseConnection, id: i32) -> Result<ArtistForm, CatalogError> {
    artist::Entity::find_by_id(id)
        .one(db)
        .await?
        .map(ArtistForm::from)
        .ok_or_else(|| CatalogError::artist_not_found(id))
}

pub async fn create(db: &DatabaseConnection, input: ValidArtist) -> Result<artist::Model, CatalogError> {
    let txn = db.begin().await?;

    let new_artist = artist::ActiveModel {
        name: Set(input.name),
        city: Set(input.city),
        state: Set(input.state),
        phone: Set(input.phone),
        genres: Set(input.genres),
        image_link: Set(input.image_link),
        facebook_link: Set(input.facebook_link),
        website: Set(input.website),
        seeking_venue: Set(input.seeking_venue),
        seeking_description: Set(input.seeking_description),
        ..Default::default()
    };
    let created = new_artist.insert(&txn).await?;

    txn.commit().await?;
    Ok(created)
}

pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    input: ValidArtist,
) -> Result<artist::Model, CatalogError> {
    let txn = db.begin().await?;

    let existing = artist::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| CatalogError::artist_not_found(id))?;

    let mut active: artist::ActiveModel = existing.into();
    active.name = Set(input.name);
    active.city = Set(input.city);
    active.state = Set(input.state);
    active.phone = Set(input.phone);
    active.genres = Set(input.genres);
    active.image_link = Set(input.image_link);
    active.facebook_link = Set(input.facebook_link);
    active.website = Set(input.website);
    active.seeking_venue = Set(input.seeking_venue);
    active.seeking_description = Set(input.seeking_description);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Delete an artist that has no shows. Shows are never removed along
/// with their artist; a booked artist is refused with `ArtistHasShows`.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<u64, CatalogError> {
    let txn = db.begin().await?;

    let booked = show::Entity::find()
        .filter(show::Column::ArtistId.eq(id))
        .count(&txn)
        .await?;
    if booked > 0 {
        return Err(CatalogError::ArtistHasShows(id));
    }

    let removed = artist::Entity::delete_by_id(id).exec(&txn).await?.rows_affected;

    txn.commit().await?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fyyur_db::{Genre, GenreList};

    fn make_artist() -> artist::Model {
        artist::Model {
            id: 4,
            name: "Guns N Petals".into(),
            city: "San Francisco".into(),
            state: State::Ca,
            phone: Some("326-123-5000".into()),
            genres: GenreList(vec![Genre::RockNRoll]),
            image_link: None,
            facebook_link: None,
            website: Some("https://www.gunsnpetalsband.com".into()),
            seeking_venue: true,
            seeking_description: Some("Looking for shows to perform at in the San Francisco Bay Area!".into()),
        }
    }

    #[test]
    fn test_detail_counts_follow_lists() {
        let upcoming = ArtistShow {
            venue_id: 1,
            venue_name: "The Musical Hop".into(),
            venue_image_link: None,
            start_time: "2035-04-01T20:00:00.000000Z".into(),
        };
        let detail = ArtistDetail::assemble(make_artist(), vec![], vec![upcoming]);
        assert_eq!(detail.past_shows_count, 0);
        assert_eq!(detail.upcoming_shows_count, 1);
        assert_eq!(detail.upcoming_shows[0].venue_name, "The Musical Hop");
    }

    #[test]
    fn test_detail_serialization() {
        let detail = ArtistDetail::assemble(make_artist(), vec![], vec![]);
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["genres"], serde_json::json!(["Rock n Roll"]));
        assert_eq!(json["seeking_venue"], true);
        assert_eq!(json["past_shows_count"], 0);
    }

    #[test]
    fn test_summary_serialization() {
        let summary = ArtistSummary {
            id: 5,
            name: "Matt Quevedo".into(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 5, "name": "Matt Quevedo" }));
    }
}
