//! Closed value sets used by venue and artist records.
//!
//! `State` is persisted as its two-letter code through a sea-orm active
//! enum. `Genre` values travel inside a JSON array column (`GenreList`)
//! so the same schema works on PostgreSQL and SQLite.

use sea_orm::entity::prelude::*;
use sea_orm::{FromJsonQueryResult, Iterable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
#[serde(rename_all = "UPPERCASE")]
pub enum State {
    #[sea_orm(string_value = "AL")]
    Al,
    #[sea_orm(string_value = "AK")]
    Ak,
    #[sea_orm(string_value = "AZ")]
    Az,
    #[sea_orm(string_value = "AR")]
    Ar,
    #[sea_orm(string_value = "CA")]
    Ca,
    #[sea_orm(string_value = "CO")]
    Co,
    #[sea_orm(string_value = "CT")]
    Ct,
    #[sea_orm(string_value = "DE")]
    De,
    #[sea_orm(string_value = "DC")]
    Dc,
    #[sea_orm(string_value = "FL")]
    Fl,
    #[sea_orm(string_value = "GA")]
    Ga,
    #[sea_orm(string_value = "HI")]
    Hi,
    #[sea_orm(string_value = "ID")]
    Id,
    #[sea_orm(string_value = "IL")]
    Il,
    #[sea_orm(string_value = "IN")]
    In,
    #[sea_orm(string_value = "IA")]
    Ia,
    #[sea_orm(string_value = "KS")]
    Ks,
    #[sea_orm(string_value = "KY")]
    Ky,
    #[sea_orm(string_value = "LA")]
    La,
    #[sea_orm(string_value = "ME")]
    Me,
    #[sea_orm(string_value = "MT")]
    Mt,
    #[sea_orm(string_value = "NE")]
    Ne,
    #[sea_orm(string_value = "NV")]
    Nv,
    #[sea_orm(string_value = "NH")]
    Nh,
    #[sea_orm(string_value = "NJ")]
    Nj,
    #[sea_orm(string_value = "NM")]
    Nm,
    #[sea_orm(string_value = "NY")]
    Ny,
    #[sea_orm(string_value = "NC")]
    Nc,
    #[sea_orm(string_value = "ND")]
    Nd,
    #[sea_orm(string_value = "OH")]
    Oh,
    #[sea_orm(string_value = "OK")]
    Ok,
    #[sea_orm(string_value = "OR")]
    Or,
    #[sea_orm(string_value = "MD")]
    Md,
    #[sea_orm(string_value = "MA")]
    Ma,
    #[sea_orm(string_value = "MI")]
    Mi,
    #[sea_orm(string_value = "MN")]
    Mn,
    #[sea_orm(string_value = "MS")]
    Ms,
    #[sea_orm(string_value = "MO")]
    Mo,
    #[sea_orm(string_value = "PA")]
    Pa,
    #[sea_orm(string_value = "RI")]
    Ri,
    #[sea_orm(string_value = "SC")]
    Sc,
    #[sea_orm(string_value = "SD")]
    Sd,
    #[sea_orm(string_value = "TN")]
    Tn,
    #[sea_orm(string_value = "TX")]
    Tx,
    #[sea_orm(string_value = "UT")]
    Ut,
    #[sea_orm(string_value = "VT")]
    Vt,
    #[sea_orm(string_value = "VA")]
    Va,
    #[sea_orm(string_value = "WA")]
    Wa,
    #[sea_orm(string_value = "WV")]
    Wv,
    #[sea_orm(string_value = "WI")]
    Wi,
    #[sea_orm(string_value = "WY")]
    Wy,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Al => "AL",
            State::Ak => "AK",
            State::Az => "AZ",
            State::Ar => "AR",
            State::Ca => "CA",
            State::Co => "CO",
            State::Ct => "CT",
            State::De => "DE",
            State::Dc => "DC",
            State::Fl => "FL",
            State::Ga => "GA",
            State::Hi => "HI",
            State::Id => "ID",
            State::Il => "IL",
            State::In => "IN",
            State::Ia => "IA",
            State::Ks => "KS",
            State::Ky => "KY",
            State::La => "LA",
            State::Me => "ME",
            State::Mt => "MT",
            State::Ne => "NE",
            State::Nv => "NV",
            State::Nh => "NH",
            State::Nj => "NJ",
            State::Nm => "NM",
            State::Ny => "NY",
            State::Nc => "NC",
            State::Nd => "ND",
            State::Oh => "OH",
            State::Ok => "OK",
            State::Or => "OR",
            State::Md => "MD",
            State::Ma => "MA",
            State::Mi => "MI",
            State::Mn => "MN",
            State::Ms => "MS",
            State::Mo => "MO",
            State::Pa => "PA",
            State::Ri => "RI",
            State::Sc => "SC",
            State::Sd => "SD",
            State::Tn => "TN",
            State::Tx => "TX",
            State::Ut => "UT",
            State::Vt => "VT",
            State::Va => "VA",
            State::Wa => "WA",
            State::Wv => "WV",
            State::Wi => "WI",
            State::Wy => "WY",
        }
    }

    /// `(value, label)` pairs for populating a select input.
    pub fn choices() -> Vec<(&'static str, &'static str)> {
        Self::iter().map(|s| (s.as_str(), s.as_str())).collect()
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for State {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| UnknownChoice(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum Genre {
    Alternative,
    Blues,
    Classical,
    Country,
    Electronic,
    Folk,
    Funk,
    #[serde(rename = "Hip-Hop")]
    HipHop,
    #[serde(rename = "Heavy Metal")]
    HeavyMetal,
    Instrumental,
    Jazz,
    #[serde(rename = "Musical Theatre")]
    MusicalTheatre,
    Pop,
    Punk,
    #[serde(rename = "R&B")]
    RnB,
    Reggae,
    #[serde(rename = "Rock n Roll")]
    RockNRoll,
    Soul,
    Other,
}

impl Genre {
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Alternative => "Alternative",
            Genre::Blues => "Blues",
            Genre::Classical => "Classical",
            Genre::Country => "Country",
            Genre::Electronic => "Electronic",
            Genre::Folk => "Folk",
            Genre::Funk => "Funk",
            Genre::HipHop => "Hip-Hop",
            Genre::HeavyMetal => "Heavy Metal",
            Genre::Instrumental => "Instrumental",
            Genre::Jazz => "Jazz",
            Genre::MusicalTheatre => "Musical Theatre",
            Genre::Pop => "Pop",
            Genre::Punk => "Punk",
            Genre::RnB => "R&B",
            Genre::Reggae => "Reggae",
            Genre::RockNRoll => "Rock n Roll",
            Genre::Soul => "Soul",
            Genre::Other => "Other",
        }
    }

    pub fn choices() -> Vec<(&'static str, &'static str)> {
        Self::iter().map(|g| (g.as_str(), g.as_str())).collect()
    }

    /// Every label joined with `", "`, used in validation messages.
    pub fn valid_labels() -> String {
        Self::iter().map(|g| g.as_str()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::iter()
            .find(|genre| genre.as_str() == s)
            .ok_or_else(|| UnknownChoice(s.to_string()))
    }
}

/// Genre tags of a venue or artist, stored as a JSON array of labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct GenreList(pub Vec<Genre>);

impl GenreList {
    pub fn labels(&self) -> Vec<String> {
        self.0.iter().map(|g| g.as_str().to_string()).collect()
    }
}

/// A value outside a closed choice set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid choice")]
pub struct UnknownChoice(pub String);
