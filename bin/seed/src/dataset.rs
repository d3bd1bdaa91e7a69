//! JSON dataset format and its import through the repository ports.
//!
//! Records refer to each other by name; ids are assigned on import.

use chrono::NaiveDate;
use cr_core::{
    AppError, City, CityRightsRepo, Country, Granter, Province, Result, Title, Todo, TodoRepo,
    Trace, Visit,
};
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub titles: Vec<TitleRecord>,
    pub provinces: Vec<String>,
    pub granters: Vec<GranterRecord>,
    pub countries: Vec<CountryRecord>,
    pub cities: Vec<CityRecord>,
    pub visits: Vec<VisitRecord>,
    pub traces: Vec<TraceRecord>,
    pub todos: Vec<TodoRecord>,
}

#[derive(Debug, Deserialize)]
pub struct TitleRecord {
    pub name: String,
    #[serde(default)]
    pub crown: String,
    #[serde(default)]
    pub copyright: String,
}

/// A granter is identified by its name and optional title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct GranterRef {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GranterRecord {
    #[serde(flatten)]
    pub key: GranterRef,
    #[serde(default)]
    pub portrait: Option<String>,
    #[serde(default)]
    pub main_img: String,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub coat_of_arms: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub copyright: String,
}

#[derive(Debug, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    #[serde(default)]
    pub rulers: Vec<GranterRef>,
}

fn not_false() -> Option<bool> {
    Some(false)
}

#[derive(Debug, Deserialize)]
pub struct CityRecord {
    pub name: String,
    /// Absent means unknown
    #[serde(default)]
    pub grant_date: Option<NaiveDate>,
    #[serde(default)]
    pub granter: Option<GranterRef>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default = "not_false")]
    pub is_city: Option<bool>,
    #[serde(default = "not_false")]
    pub banned: Option<bool>,
    #[serde(default)]
    pub main_img: String,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub coat_of_arms: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub latin: String,
}

#[derive(Debug, Deserialize)]
pub struct VisitRecord {
    pub city: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub main_img: String,
}

#[derive(Debug, Deserialize)]
pub struct TraceRecord {
    pub city: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct TodoRecord {
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reminder: bool,
}

/// What an import created.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub titles: usize,
    pub provinces: usize,
    pub granters: usize,
    pub countries: usize,
    pub cities: usize,
    pub visits: usize,
    pub traces: usize,
    pub todos: usize,
}

fn lookup<K, Q>(map: &HashMap<K, Uuid>, key: &Q, kind: &str) -> Result<Uuid>
where
    K: std::borrow::Borrow<Q> + std::hash::Hash + Eq,
    Q: std::hash::Hash + Eq + std::fmt::Debug + ?Sized,
{
    map.get(key)
        .copied()
        .ok_or_else(|| AppError::ValidationError(format!("unknown {kind} {key:?}")))
}

/// Persists the dataset in dependency order.
pub async fn import(
    dataset: Dataset,
    repo: &dyn CityRightsRepo,
    todos: &dyn TodoRepo,
) -> Result<Summary> {
    let mut summary = Summary::default();

    let mut titles = HashMap::new();
    for record in dataset.titles {
        let title = Title { crown: record.crown, copyright: record.copyright, ..Title::new(record.name) };
        titles.insert(title.name.clone(), title.id);
        repo.create_title(title).await?;
        summary.titles += 1;
    }

    let mut provinces = HashMap::new();
    for name in dataset.provinces {
        let province = Province::new(name);
        provinces.insert(province.name.clone(), province.id);
        repo.create_province(province).await?;
        summary.provinces += 1;
    }

    let mut granters: HashMap<GranterRef, Uuid> = HashMap::new();
    for record in dataset.granters {
        let title_id = match &record.key.title {
            Some(title) => Some(lookup(&titles, title.as_str(), "title")?),
            None => None,
        };
        let granter = Granter {
            portrait: record.portrait,
            main_img: record.main_img,
            synopsis: record.synopsis,
            coat_of_arms: record.coat_of_arms,
            description: record.description,
            copyright: record.copyright,
            ..Granter::new(record.key.name.clone(), title_id)
        };
        granters.insert(record.key, granter.id);
        repo.create_granter(granter).await?;
        summary.granters += 1;
    }

    for record in dataset.countries {
        let rulers = record
            .rulers
            .iter()
            .map(|ruler| lookup(&granters, ruler, "granter"))
            .collect::<Result<Vec<_>>>()?;
        repo.create_country(Country::new(record.name, rulers)).await?;
        summary.countries += 1;
    }

    let mut cities = HashMap::new();
    for record in dataset.cities {
        let granter_id = match &record.granter {
            Some(granter) => Some(lookup(&granters, granter, "granter")?),
            None => None,
        };
        let province_id = match &record.province {
            Some(province) => Some(lookup(&provinces, province.as_str(), "province")?),
            None => None,
        };
        let city = City {
            grant_date: record.grant_date,
            granter_id,
            province_id,
            main_img: record.main_img,
            synopsis: record.synopsis,
            is_city: record.is_city,
            banned: record.banned,
            coat_of_arms: record.coat_of_arms,
            description: record.description,
            latin: record.latin,
            ..City::new(record.name)
        };
        cities.insert(city.name.clone(), city.id);
        repo.create_city(city).await?;
        summary.cities += 1;
    }

    for record in dataset.visits {
        let city_id = lookup(&cities, record.city.as_str(), "city")?;
        let visit = Visit {
            date: record.date,
            rating: record.rating,
            main_img: record.main_img,
            ..Visit::new(city_id)
        };
        repo.create_visit(visit).await?;
        summary.visits += 1;
    }

    for record in dataset.traces {
        let city_id = lookup(&cities, record.city.as_str(), "city")?;
        let trace = Trace {
            image: record.image,
            description: record.description,
            lat: record.lat,
            lon: record.lon,
            ..Trace::new(record.name, city_id)
        };
        repo.create_trace(trace).await?;
        summary.traces += 1;
    }

    for record in dataset.todos {
        let todo = Todo { reminder: record.reminder, ..Todo::new(record.subject, record.description) };
        todos.create_todo(todo).await?;
        summary.todos += 1;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cr_db_sqlite::{connect, SqliteCityRightsRepo, SqliteTodoRepo};

    const REGISTER: &str = r#"{
        "titles": [{ "name": "Graaf" }],
        "provinces": ["Noord-Holland", "Drenthe"],
        "granters": [{ "name": "Willem II", "title": "Graaf", "synopsis": "Rooms-koning" }],
        "countries": [{ "name": "Graafschap Holland", "rulers": [{ "name": "Willem II", "title": "Graaf" }] }],
        "cities": [
            { "name": "Haarlem", "grant_date": "1245-11-23", "is_city": true,
              "granter": { "name": "Willem II", "title": "Graaf" }, "province": "Noord-Holland" },
            { "name": "Assen", "grant_date": "1809-03-13", "is_city": true, "province": "Drenthe" },
            { "name": "Onbekend", "is_city": true, "banned": null }
        ],
        "visits": [{ "city": "Haarlem", "date": "2019-05-04", "rating": 8.0 }],
        "traces": [{ "city": "Haarlem", "name": "Sint-Bavokerk", "lat": 52.381, "lon": 4.637 }],
        "todos": [{ "subject": "Archief", "description": "Repertorium doorlopen" }]
    }"#;

    async fn repos() -> (SqliteCityRightsRepo, SqliteTodoRepo) {
        let pool = connect("sqlite::memory:", 1).await.unwrap();
        (SqliteCityRightsRepo::new(pool.clone()), SqliteTodoRepo::new(pool))
    }

    #[tokio::test]
    async fn test_import_register() {
        let (repo, todos) = repos().await;
        let dataset: Dataset = serde_json::from_str(REGISTER).unwrap();

        let summary = import(dataset, &repo, &todos).await.unwrap();
        assert_eq!(summary.cities, 3);
        assert_eq!(summary.todos, 1);

        let haarlem = repo.get_city_by_name("Haarlem").await.unwrap().unwrap();
        assert!(haarlem.has_classical_city_rights());
        let detail = repo.get_city_detail(haarlem.id).await.unwrap().unwrap();
        assert_eq!(detail.granter.unwrap().display_name(), "Graaf Willem II");
        assert_eq!(detail.countries.len(), 1);
        assert_eq!(detail.traces.len(), 1);
        assert_eq!(detail.visit.unwrap().rating, Some(8.0));

        let assen = repo.get_city_by_name("Assen").await.unwrap().unwrap();
        assert!(!assen.has_classical_city_rights());

        let undated = repo.get_city_by_name("Onbekend").await.unwrap().unwrap();
        assert_eq!(undated.grant_date, None);
        assert_eq!(undated.banned, None);
        assert!(!undated.has_classical_city_rights());
    }

    #[tokio::test]
    async fn test_unknown_reference_is_rejected() {
        let (repo, todos) = repos().await;
        let dataset: Dataset =
            serde_json::from_str(r#"{ "visits": [{ "city": "Atlantis" }] }"#).unwrap();

        let err = import(dataset, &repo, &todos).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
