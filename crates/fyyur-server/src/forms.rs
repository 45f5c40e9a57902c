//! Submitted venue, artist and show forms and their validation.
//!
//! Validation is pure: `validate()` turns a raw form into a typed
//! `Valid*` value or a `FieldErrors` map, and never touches the store.

use chrono::{DateTime, NaiveDateTime, Utc};
use fyyur_db::entities::{artist, venue};
use fyyur_db::{Genre, GenreList, State};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_URL: &str = "Invalid URL.";

/// Field name → messages, in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {}", messages.join(" "))?;
        }
        Ok(())
    }
}

// ── Raw forms ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub genres: Vec<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowForm {
    #[serde(deserialize_with = "text_or_number")]
    pub artist_id: String,
    #[serde(deserialize_with = "text_or_number")]
    pub venue_id: String,
    pub start_time: String,
}

impl From<venue::Model> for VenueForm {
    fn from(v: venue::Model) -> Self {
        Self {
            name: v.name,
            city: v.city,
            state: v.state.as_str().to_string(),
            address: v.address,
            phone: v.phone,
            image_link: v.image_link,
            genres: v.genres.labels(),
            facebook_link: v.facebook_link,
            website: v.website,
            seeking_talent: v.seeking_talent,
            seeking_description: v.seeking_description,
        }
    }
}

impl From<artist::Model> for ArtistForm {
    fn from(a: artist::Model) -> Self {
        Self {
            name: a.name,
            city: a.city,
            state: a.state.as_str().to_string(),
            phone: a.phone,
            image_link: a.image_link,
            genres: a.genres.labels(),
            facebook_link: a.facebook_link,
            website: a.website,
            seeking_venue: a.seeking_venue,
            seeking_description: a.seeking_description,
        }
    }
}

impl ShowForm {
    /// Empty show form with the start time preset to `now`.
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            start_time: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            ..Self::default()
        }
    }
}

/// Ids may arrive as JSON numbers or as the strings an HTML form posts.
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
        Missing(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
        Raw::Missing(()) => String::new(),
    })
}

// ── Validated forms ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidVenue {
    pub name: String,
    pub city: String,
    pub state: State,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub genres: GenreList,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidArtist {
    pub name: String,
    pub city: String,
    pub state: State,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub genres: GenreList,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidShow {
    pub artist_id: i32,
    pub venue_id: i32,
    pub start_time: DateTime<Utc>,
}

impl VenueForm {
    pub fn validate(&self) -> Result<ValidVenue, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required(&mut errors, "name", &self.name);
        let city = required(&mut errors, "city", &self.city);
        let state = state_choice(&mut errors, &self.state);
        let address = required(&mut errors, "address", &self.address);
        let genres = genre_choices(&mut errors, &self.genres);
        let image_link = optional_url(&mut errors, "image_link", self.image_link.as_deref());
        let facebook_link =
            optional_url(&mut errors, "facebook_link", self.facebook_link.as_deref());
        let website = optional_url(&mut errors, "website", self.website.as_deref());

        let valid = match (name, city, state, address, genres) {
            (Some(name), Some(city), Some(state), Some(address), Some(genres)) => ValidVenue {
                name,
                city,
                state,
                address,
                phone: optional_text(self.phone.as_deref()),
                image_link,
                genres,
                facebook_link,
                website,
                seeking_talent: self.seeking_talent,
                seeking_description: optional_text(self.seeking_description.as_deref()),
            },
            _ => return Err(errors),
        };
        errors.finish(valid)
    }
}

impl ArtistForm {
    pub fn validate(&self) -> Result<ValidArtist, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required(&mut errors, "name", &self.name);
        let city = required(&mut errors, "city", &self.city);
        let state = state_choice(&mut errors, &self.state);
        let genres = genre_choices(&mut errors, &self.genres);
        let image_link = optional_url(&mut errors, "image_link", self.image_link.as_deref());
        let facebook_link =
            optional_url(&mut errors, "facebook_link", self.facebook_link.as_deref());
        let website = optional_url(&mut errors, "website", self.website.as_deref());

        let valid = match (name, city, state, genres) {
            (Some(name), Some(city), Some(state), Some(genres)) => ValidArtist {
                name,
                city,
                state,
                phone: optional_text(self.phone.as_deref()),
                image_link,
                genres,
                facebook_link,
                website,
                seeking_venue: self.seeking_venue,
                seeking_description: optional_text(self.seeking_description.as_deref()),
            },
            _ => return Err(errors),
        };
        errors.finish(valid)
    }
}

impl ShowForm {
    pub fn validate(&self) -> Result<ValidShow, FieldErrors> {
        let mut errors = FieldErrors::new();

        let artist_id = record_id(&mut errors, "artist_id", &self.artist_id);
        let venue_id = record_id(&mut errors, "venue_id", &self.venue_id);
        let start_time = start_time(&mut errors, &self.start_time);

        match (artist_id, venue_id, start_time) {
            (Some(artist_id), Some(venue_id), Some(start_time)) => errors.finish(ValidShow {
                artist_id,
                venue_id,
                start_time,
            }),
            _ => Err(errors),
        }
    }
}

// ── Field validators ──────────────────────────────────────────────

fn required(errors: &mut FieldErrors, field: &str, value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, REQUIRED);
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn state_choice(errors: &mut FieldErrors, value: &str) -> Option<State> {
    let code = value.trim();
    if code.is_empty() {
        errors.add("state", REQUIRED);
        return None;
    }
    match code.parse::<State>() {
        Ok(state) => Some(state),
        Err(_) => {
            let valid: Vec<&str> = State::choices().into_iter().map(|(v, _)| v).collect();
            errors.add(
                "state",
                format!("Invalid value, must be one of: {}.", valid.join(", ")),
            );
            None
        }
    }
}

fn genre_choices(errors: &mut FieldErrors, values: &[String]) -> Option<GenreList> {
    let labels: Vec<&str> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();
    if labels.is_empty() {
        errors.add("genres", REQUIRED);
        return None;
    }

    let mut genres = Vec::with_capacity(labels.len());
    for label in labels {
        match label.parse::<Genre>() {
            Ok(genre) if genres.contains(&genre) => {}
            Ok(genre) => genres.push(genre),
            Err(_) => {
                errors.add(
                    "genres",
                    format!("'{label}' is not a valid genre. Valid genres are {}", Genre::valid_labels()),
                );
                return None;
            }
        }
    }
    Some(GenreList(genres))
}

/// Absent or blank is accepted; anything else must be an absolute
/// http(s) URL with a host.
fn optional_url(errors: &mut FieldErrors, field: &str, value: Option<&str>) -> Option<String> {
    let raw = optional_text(value)?;
    match url::Url::parse(&raw) {
        Ok(parsed)
            if matches!(parsed.scheme(), "http" | "https")
                && parsed.host_str().is_some_and(|h| !h.is_empty()) =>
        {
            Some(raw)
        }
        _ => {
            errors.add(field, INVALID_URL);
            None
        }
    }
}

fn record_id(errors: &mut FieldErrors, field: &str, value: &str) -> Option<i32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    match trimmed.parse::<i32>() {
        Ok(id) if id > 0 => Some(id),
        _ => {
            errors.add(field, "Not a valid record id.");
            None
        }
    }
}

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse a submitted start time. Values without an offset are taken as UTC.
pub fn parse_start_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn start_time(errors: &mut FieldErrors, value: &str) -> Option<DateTime<Utc>> {
    if value.trim().is_empty() {
        errors.add("start_time", REQUIRED);
        return None;
    }
    let parsed = parse_start_time(value);
    if parsed.is_none() {
        errors.add("start_time", "Not a valid datetime value.");
    }
    parsed
}

// ── Form population ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormChoices {
    pub states: Vec<Choice>,
    pub genres: Vec<Choice>,
}

impl FormChoices {
    pub fn all() -> Self {
        let to_choices = |pairs: Vec<(&'static str, &'static str)>| {
            pairs
                .into_iter()
                .map(|(value, label)| Choice { value, label })
                .collect()
        };
        Self {
            states: to_choices(State::choices()),
            genres: to_choices(Genre::choices()),
        }
    }
}

/// A form ready to render: current values plus the selectable choices.
#[derive(Debug, Clone, Serialize)]
pub struct FormSchema<F: Serialize> {
    pub form: F,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<FormChoices>,
}

impl<F: Serialize> FormSchema<F> {
    pub fn with_choices(form: F) -> Self {
        Self {
            form,
            choices: Some(FormChoices::all()),
        }
    }

    pub fn plain(form: F) -> Self {
        Self {
            form,
            choices: None,
        }
    }
}
