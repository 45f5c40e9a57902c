use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;

use super::{name_contains, upcoming_counts, CatalogError, ListingEntry, SearchResults};
use crate::forms::{ValidVenue, VenueForm};
use crate::schedule::{self, format_start_time};
use fyyur_db::entities::{artist, show, venue};
use fyyur_db::State;

/// Venues sharing one (city, state) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityGroup {
    pub city: String,
    pub state: State,
    pub venues: Vec<ListingEntry>,
}

/// A show as seen from its venue's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueShow {
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueDetail {
    pub id: i32,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: State,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<VenueShow>,
    pub upcoming_shows: Vec<VenueShow>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl VenueDetail {
    fn assemble(v: venue::Model, past_shows: Vec<VenueShow>, upcoming_shows: Vec<VenueShow>) -> Self {
        Self {
            id: v.id,
            name: v.name,
            genres: v.genres.labels(),
            address: v.address,
            city: v.city,
            state: v.state,
            phone: v.phone,
            website: v.website,
            facebook_link: v.facebook_link,
            seeking_talent: v.seeking_talent,
            seeking_description: v.seeking_description,
            image_link: v.image_link,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

async fn listing_entries(
    db: &DatabaseConnection,
    venues: Vec<venue::Model>,
    now: DateTime<Utc>,
) -> Result<Vec<ListingEntry>, CatalogError> {
    let ids: Vec<i32> = venues.iter().map(|v| v.id).collect();
    let counts = upcoming_counts(db, show::Column::VenueId, &ids, |s| s.venue_id, now).await?;

    Ok(venues
        .into_iter()
        .map(|v| ListingEntry {
            num_upcoming_shows: counts.get(&v.id).copied().unwrap_or(0),
            id: v.id,
            name: v.name,
        })
        .collect())
}

/// Every venue, grouped under its distinct (city, state) pair.
pub async fn group_by_city(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
) -> Result<Vec<CityGroup>, CatalogError> {
    let pairs: Vec<(String, State)> = venue::Entity::find()
        .select_only()
        .column(venue::Column::City)
        .column(venue::Column::State)
        .distinct()
        .order_by_asc(venue::Column::State)
        .order_by_asc(venue::Column::City)
        .into_tuple()
        .all(db)
        .await?;

    let mut groups = Vec::with_capacity(pairs.len());
    for (city, state) in pairs {
        let members = venue::Entity::find()
            .filter(venue::Column::City.eq(city.as_str()))
            .filter(venue::Column::State.eq(state))
            .order_by_asc(venue::Column::Id)
            .all(db)
            .await?;

        groups.push(CityGroup {
            venues: listing_entries(db, members, now).await?,
            city,
            state,
        });
    }

    Ok(groups)
}

pub async fn search(
    db: &DatabaseConnection,
    term: &str,
    now: DateTime<Utc>,
) -> Result<SearchResults, CatalogError> {
    let matches = venue::Entity::find()
        .filter(name_contains(venue::Column::Name, term, db.get_database_backend()))
        .order_by_asc(venue::Column::Id)
        .all(db)
        .await?;

    Ok(SearchResults::from_entries(
        listing_entries(db, matches, now).await?,
    ))
}

pub async fn detail(
    db: &DatabaseConnection,
    id: i32,
    now: DateTime<Utc>,
) -> Result<VenueDetail, CatalogError> {
    let venue_model = venue::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| CatalogError::venue_not_found(id))?;

    let rows = show::Entity::find()
        .filter(show::Column::VenueId.eq(id))
        .order_by_asc(show::Column::StartTime)
        .find_also_related(artist::Entity)
        .all(db)
        .await?;

    let booked: Vec<(show::Model, artist::Model)> = rows
        .into_iter()
        .filter_map(|(s, a)| match a {
            Some(a) => Some((s, a)),
            None => {
                tracing::warn!(show_id = s.id, artist_id = s.artist_id, "show without artist");
                None
            }
        })
        .collect();

    let schedule = schedule::split_shows(booked, now, |(s, _)| s.start_time);
    let to_view = |(s, a): (show::Model, artist::Model)| VenueShow {
        artist_id: s.artist_id,
        artist_name: a.name,
        artist_image_link: a.image_link,
        start_time: format_start_time(s.start_time),
    };

    Ok(VenueDetail::assemble(
        venue_model,
        schedule.past.into_iter().map(to_view).collect(),
        schedule.upcoming.into_iter().map(to_view).collect(),
    ))
}

/// Current values of a venue, for pre-filling its edit form.
pub async fn edit_form(db: &DatabaseConnection, id: i32) -> Result<VenueForm, CatalogError> {
    venue::Entity::find_by_id(id)
        .one(db)
        .await?
        .map(VenueForm::from)
        .ok_or_else(|| CatalogError::venue_not_found(id))
}

pub async fn create(db: &DatabaseConnection, input: ValidVenue) -> Result<venue::Model, CatalogError> {
    let txn = db.begin().await?;

    let new_venue = venue::ActiveModel {
        name: Set(input.name),
        city: Set(input.city),
        state: Set(input.state),
        address: Set(input.address),
        phone: Set(input.phone),
        image_link: Set(input.image_link),
        facebook_link: Set(input.facebook_link),
        website: Set(input.website),
        genres: Set(input.genres),
        seeking_talent: Set(input.seeking_talent),
        seeking_description: Set(input.seeking_description),
        ..Default::default()
    };
    let created = new_venue.insert(&txn).await?;

    txn.commit().await?;
    Ok(created)
}

pub async fn update(
    db: &DatabaseConnection,
    id: i32,
    input: ValidVenue,
) -> Result<venue::Model, CatalogError> {
    let txn = db.begin().await?;

    let existing = venue::Entity::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| CatalogError::venue_not_found(id))?;

    let mut active: venue::ActiveModel = existing.into();
    active.name = Set(input.name);
    active.city = Set(input.city);
    active.state = Set(input.state);
    active.address = Set(input.address);
    active.phone = Set(input.phone);
    active.image_link = Set(input.image_link);
    active.facebook_link = Set(input.facebook_link);
    active.website = Set(input.website);
    active.genres = Set(input.genres);
    active.seeking_talent = Set(input.seeking_talent);
    active.seeking_description = Set(input.seeking_description);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Delete a venue together with its shows. Returns the number of venues
/// removed (0 when the id did not exist).
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<u64, CatalogError> {
    let txn = db.begin().await?;

    let shows_removed = show::Entity::delete_many()
        .filter(show::Column::VenueId.eq(id))
        .exec(&txn)
        .await?
        .rows_affected;
    let venues_removed = venue::Entity::delete_by_id(id).exec(&txn).await?.rows_affected;

    txn.commit().await?;

    tracing::debug!(venue_id = id, shows_removed, venues_removed, "venue deleted");
    Ok(venues_removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fyyur_db::{Genre, GenreList};

    fn make_venue() -> venue::Model {
        venue::Model {
            id: 1,
            name: "The Musical Hop".into(),
            city: "San Francisco".into(),
            state: State::Ca,
            address: "1015 Folsom Street".into(),
            phone: Some("123-123-1234".into()),
            image_link: None,
            facebook_link: Some("https://www.facebook.com/TheMusicalHop".into()),
            website: None,
            genres: GenreList(vec![Genre::Jazz, Genre::Reggae]),
            seeking_talent: true,
            seeking_description: None,
        }
    }

    #[test]
    fn test_detail_counts_follow_lists() {
        let show = VenueShow {
            artist_id: 4,
            artist_name: "Guns N Petals".into(),
            artist_image_link: None,
            start_time: "2019-05-21T21:30:00.000000Z".into(),
        };
        let detail = VenueDetail::assemble(make_venue(), vec![show.clone(), show], vec![]);
        assert_eq!(detail.past_shows_count, 2);
        assert_eq!(detail.upcoming_shows_count, 0);
        assert_eq!(detail.genres, vec!["Jazz", "Reggae"]);
    }

    #[test]
    fn test_detail_serialization() {
        let detail = VenueDetail::assemble(make_venue(), vec![], vec![]);
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["state"], "CA");
        assert_eq!(json["seeking_talent"], true);
        assert!(json["past_shows"].as_array().unwrap().is_empty());
        assert!(json["upcoming_shows"].as_array().unwrap().is_empty());
        assert_eq!(json["upcoming_shows_count"], 0);
        assert!(json["website"].is_null());
    }

    #[test]
    fn test_city_group_serialization() {
        let group = CityGroup {
            city: "New York".into(),
            state: State::Ny,
            venues: vec![ListingEntry {
                id: 2,
                name: "The Dueling Pianos Bar".into(),
                num_upcoming_shows: 0,
            }],
        };
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["state"], "NY");
        assert_eq!(json["venues"][0]["name"], "The Dueling Pianos Bar");
    }
}
