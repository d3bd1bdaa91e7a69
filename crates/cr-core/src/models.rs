//! # Domain Models
//!
//! These structs represent the historical records the application curates:
//! cities, the nobles and clergy who granted their rights, and everything
//! hanging off them. We use UUID v7 for time-ordered, globally unique
//! identification.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::eligibility::has_classical_city_rights;
use crate::error::{AppError, Result};

/// Rejects `value` when it is longer than `max` characters.
pub(crate) fn check_len(entity: &str, field: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(AppError::ValidationError(format!(
            "{entity}.{field} exceeds {max} characters"
        )));
    }
    Ok(())
}

/// A noble or clerical title, such as Duke or Bishop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub id: Uuid,
    pub name: String,
    /// Image name of the crown that belongs to the title
    pub crown: String,
    pub copyright: String,
}

impl Title {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            crown: String::new(),
            copyright: String::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_len("title", "name", &self.name, 100)?;
        check_len("title", "crown", &self.crown, 100)?;
        check_len("title", "copyright", &self.copyright, 50)
    }
}

/// The authority that granted city rights. Usually the ruling noble or
/// clergyman of the land; the authority ultimately derives from the emperor
/// or the pope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Granter {
    pub id: Uuid,
    /// Full name without title(s)
    pub name: String,
    /// URL of a portrait
    pub portrait: Option<String>,
    pub main_img: String,
    /// Very short description for the index page
    pub synopsis: String,
    pub title_id: Option<Uuid>,
    pub coat_of_arms: String,
    /// Short biography from an accepted source
    pub description: String,
    pub copyright: String,
}

impl Granter {
    pub fn new(name: impl Into<String>, title_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            portrait: None,
            main_img: String::new(),
            synopsis: String::new(),
            title_id,
            coat_of_arms: String::new(),
            description: String::new(),
            copyright: String::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_len("granter", "name", &self.name, 250)?;
        check_len("granter", "main_img", &self.main_img, 100)?;
        check_len("granter", "synopsis", &self.synopsis, 50)?;
        check_len("granter", "coat_of_arms", &self.coat_of_arms, 100)?;
        check_len("granter", "copyright", &self.copyright, 50)
    }
}

/// The land a city belonged to when its rights were granted. Most of these
/// no longer exist as a separate legal entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: Uuid,
    pub name: String,
    /// A country may have had several rulers over time
    pub ruler_ids: Vec<Uuid>,
}

impl Country {
    pub fn new(name: impl Into<String>, ruler_ids: Vec<Uuid>) -> Self {
        Self { id: Uuid::now_v7(), name: name.into(), ruler_ids }
    }

    pub fn validate(&self) -> Result<()> {
        check_len("country", "name", &self.name, 250)
    }
}

/// A present-day (Dutch) province.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Province {
    pub id: Uuid,
    pub name: String,
}

impl Province {
    pub fn new(name: impl Into<String>) -> Self {
        Self { id: Uuid::now_v7(), name: name.into() }
    }

    pub fn validate(&self) -> Result<()> {
        check_len("province", "name", &self.name, 50)
    }
}

/// A settlement that received city rights: high justice, markets,
/// taxation and the right to build a wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: Uuid,
    pub name: String,
    /// First known, officially recorded date of the grant
    pub grant_date: Option<NaiveDate>,
    pub granter_id: Option<Uuid>,
    pub province_id: Option<Uuid>,
    pub main_img: String,
    pub synopsis: String,
    /// The settlement is a city by the formal definition
    pub is_city: Option<bool>,
    /// Listed in the register, but does not meet the definition
    pub banned: Option<bool>,
    pub coat_of_arms: String,
    pub description: String,
    /// Latin form of the name
    pub latin: String,
}

impl City {
    /// A new record dated today, not yet marked as a city.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            grant_date: Some(Utc::now().date_naive()),
            granter_id: None,
            province_id: None,
            main_img: String::new(),
            synopsis: String::new(),
            is_city: Some(false),
            banned: Some(false),
            coat_of_arms: String::new(),
            description: String::new(),
            latin: String::new(),
        }
    }

    pub fn has_classical_city_rights(&self) -> bool {
        has_classical_city_rights(self.is_city, self.banned, self.grant_date)
    }

    pub fn validate(&self) -> Result<()> {
        check_len("city", "name", &self.name, 100)?;
        check_len("city", "main_img", &self.main_img, 100)?;
        check_len("city", "synopsis", &self.synopsis, 50)?;
        check_len("city", "coat_of_arms", &self.coat_of_arms, 100)?;
        check_len("city", "latin", &self.latin, 100)
    }
}

/// A visit to a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub id: Uuid,
    pub date: Option<NaiveDate>,
    pub rating: Option<f64>,
    pub city_id: Option<Uuid>,
    pub main_img: String,
}

impl Visit {
    pub fn new(city_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            date: Some(Utc::now().date_naive()),
            rating: Some(6.0),
            city_id: Some(city_id),
            main_img: String::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_len("visit", "main_img", &self.main_img, 100)
    }
}

/// A remnant from the era in which the city received its rights,
/// roughly 800 to 1800.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub id: Uuid,
    pub name: String,
    pub city_id: Option<Uuid>,
    pub image: String,
    pub description: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl Trace {
    pub fn new(name: impl Into<String>, city_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            city_id: Some(city_id),
            image: String::new(),
            description: String::new(),
            lat: None,
            lon: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_len("trace", "name", &self.name, 100)?;
        check_len("trace", "image", &self.image, 100)
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lon)
    }
}

/// A granter together with its title, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitledGranter {
    pub granter: Granter,
    pub title: Option<Title>,
}

impl TitledGranter {
    /// "Duke Jan I", or just the name when there is no title.
    pub fn display_name(&self) -> String {
        match &self.title {
            Some(title) => format!("{} {}", title.name, self.granter.name),
            None => self.granter.name.clone(),
        }
    }
}

/// Everything the city detail page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityDetail {
    pub city: City,
    pub granter: Option<TitledGranter>,
    pub province: Option<Province>,
    /// The first recorded visit
    pub visit: Option<Visit>,
    /// Countries ruled by the granter
    pub countries: Vec<Country>,
    pub traces: Vec<Trace>,
}

/// Everything the granter detail page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GranterDetail {
    pub granter: TitledGranter,
    pub cities: Vec<City>,
}
