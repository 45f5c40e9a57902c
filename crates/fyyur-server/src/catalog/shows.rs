use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::CatalogError;
use crate::forms::{FieldErrors, ValidShow};
use crate::schedule::format_start_time;
use fyyur_db::entities::{artist, show, venue};

/// A show joined with the names of its venue and artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowListing {
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<ShowListing>, CatalogError> {
    let shows = show::Entity::find()
        .order_by_asc(show::Column::StartTime)
        .order_by_asc(show::Column::Id)
        .all(db)
        .await?;

    if shows.is_empty() {
        return Ok(Vec::new());
    }

    let venue_ids: Vec<i32> = shows
        .iter()
        .map(|s| s.venue_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let artist_ids: Vec<i32> = shows
        .iter()
        .map(|s| s.artist_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let venues: HashMap<i32, venue::Model> = venue::Entity::find()
        .filter(venue::Column::Id.is_in(venue_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|v| (v.id, v))
        .collect();
    let artists: HashMap<i32, artist::Model> = artist::Entity::find()
        .filter(artist::Column::Id.is_in(artist_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    Ok(shows
        .into_iter()
        .filter_map(|s| {
            let (Some(v), Some(a)) = (venues.get(&s.venue_id), artists.get(&s.artist_id)) else {
                tracing::warn!(show_id = s.id, "show references a missing venue or artist");
                return None;
            };
            Some(ShowListing {
                venue_id: s.venue_id,
                venue_name: v.name.clone(),
                artist_id: s.artist_id,
                artist_name: a.name.clone(),
                artist_image_link: a.image_link.clone(),
                start_time: format_start_time(s.start_time),
            })
        })
        .collect())
}

/// Book a show. The artist and venue must both exist; a missing one is
/// reported as a field error and nothing is written.
pub async fn create(db: &DatabaseConnection, input: ValidShow) -> Result<show::Model, CatalogError> {
    let txn = db.begin().await?;

    let mut errors = FieldErrors::new();
    if artist::Entity::find_by_id(input.artist_id)
        .one(&txn)
        .await?
        .is_none()
    {
        errors.add("artist_id", format!("Artist {} does not exist.", input.artist_id));
    }
    if venue::Entity::find_by_id(input.venue_id)
        .one(&txn)
        .await?
        .is_none()
    {
        errors.add("venue_id", format!("Venue {} does not exist.", input.venue_id));
    }
    if !errors.is_empty() {
        return Err(CatalogError::Invalid(errors));
    }

    let new_show = show::ActiveModel {
        start_time: Set(input.start_time),
        artist_id: Set(input.artist_id),
        venue_id: Set(input.venue_id),
        ..Default::default()
    };
    let created = new_show.insert(&txn).await?;

    txn.commit().await?;
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_listing_serialization() {
        let listing = ShowListing {
            venue_id: 1,
            venue_name: "The Musical Hop".into(),
            artist_id: 4,
            artist_name: "Guns N Petals".into(),
            artist_image_link: Some("https://images.example.com/gnp.jpg".into()),
            start_time: "2019-05-21T21:30:00.000000Z".into(),
        };
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["venue_name"], "The Musical Hop");
        assert_eq!(json["artist_id"], 4);
        assert_eq!(json["start_time"], "2019-05-21T21:30:00.000000Z");
    }
}
