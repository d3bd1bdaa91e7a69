//! # Core Traits (Ports)
//!
//! Any storage plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{City, CityDetail, Country, Granter, GranterDetail, Province, Title, Trace, Visit};
use crate::todo::{History, Selection, Timeblock, TimeblockPlan, Todo};

/// Data persistence contract for the city-rights register.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CityRightsRepo: Send + Sync {
    // Title Operations
    async fn create_title(&self, title: Title) -> Result<()>;
    async fn list_titles(&self) -> Result<Vec<Title>>;
    async fn delete_title(&self, id: Uuid) -> Result<bool>;

    // Granter Operations
    async fn create_granter(&self, granter: Granter) -> Result<()>;
    async fn get_granter(&self, id: Uuid) -> Result<Option<Granter>>;
    async fn list_granters(&self) -> Result<Vec<Granter>>;
    async fn delete_granter(&self, id: Uuid) -> Result<bool>;
    /// The granter, its title and the cities it granted rights to.
    async fn get_granter_detail(&self, id: Uuid) -> Result<Option<GranterDetail>>;

    // Country Operations
    /// Inserts the country and its rulers atomically.
    async fn create_country(&self, country: Country) -> Result<()>;
    async fn add_country_ruler(&self, country_id: Uuid, granter_id: Uuid) -> Result<()>;

    // Province Operations
    async fn create_province(&self, province: Province) -> Result<()>;
    async fn list_provinces(&self) -> Result<Vec<Province>>;
    async fn delete_province(&self, id: Uuid) -> Result<bool>;

    // City Operations
    async fn create_city(&self, city: City) -> Result<()>;
    async fn update_city(&self, city: City) -> Result<()>;
    async fn delete_city(&self, id: Uuid) -> Result<bool>;
    async fn get_city(&self, id: Uuid) -> Result<Option<City>>;
    async fn get_city_by_name(&self, name: &str) -> Result<Option<City>>;
    /// All cities, oldest grant first.
    async fn list_cities_by_grant_date(&self) -> Result<Vec<City>>;
    /// Cities whose name starts with `prefix`, ignoring case.
    async fn find_cities_by_prefix(&self, prefix: &str) -> Result<Vec<City>>;
    /// Cities explicitly marked as not banned, ordered by name.
    async fn list_unbanned_cities(&self) -> Result<Vec<City>>;
    /// The city with its granter, province, first visit, countries and traces.
    async fn get_city_detail(&self, id: Uuid) -> Result<Option<CityDetail>>;

    // Visit and Trace Operations
    async fn create_visit(&self, visit: Visit) -> Result<()>;
    async fn create_trace(&self, trace: Trace) -> Result<()>;
}

/// Data persistence contract for the personal to-do list.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait TodoRepo: Send + Sync {
    async fn create_todo(&self, todo: Todo) -> Result<()>;
    /// Persists changes and refreshes the start and end times.
    async fn save_todo(&self, todo: Todo) -> Result<Todo>;
    async fn get_todo(&self, id: Uuid) -> Result<Option<Todo>>;
    /// Open todos first, then by subject.
    async fn list_todos(&self) -> Result<Vec<Todo>>;
    async fn mark_done(&self, id: Uuid) -> Result<bool>;
    async fn delete_todo(&self, id: Uuid) -> Result<bool>;

    /// Inserts the timeblock and its todo links atomically.
    async fn create_timeblock(&self, timeblock: Timeblock) -> Result<()>;
    async fn list_timeblocks(&self) -> Result<Vec<TimeblockPlan>>;

    async fn record_selection(&self, selection: Selection) -> Result<()>;
    async fn latest_selection(&self) -> Result<Option<Selection>>;
    async fn record_history(&self, entry: History) -> Result<()>;
    /// History entries by ascending rank.
    async fn list_history(&self) -> Result<Vec<History>>;
}
