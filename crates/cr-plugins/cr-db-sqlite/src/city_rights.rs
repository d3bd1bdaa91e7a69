//! `CityRightsRepo` on SQLite.

use async_trait::async_trait;
use cr_core::error::{AppError, Result};
use cr_core::models::{
    City, CityDetail, Country, Granter, GranterDetail, Province, Title, TitledGranter, Trace, Visit,
};
use cr_core::traits::CityRightsRepo;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

use crate::{blob_to_uuid, db_err, opt_uuid_to_blob, starts_with_ignore_case, uuid_to_blob};

macro_rules! select_cities {
    ($tail:literal) => {
        concat!(
            "SELECT id, name, grant_date, granter_id, province_id, main_img, synopsis, ",
            "is_city, banned, coat_of_arms, description, latin FROM cities ",
            $tail
        )
    };
}

macro_rules! select_granters {
    ($tail:literal) => {
        concat!(
            "SELECT id, name, portrait, main_img, synopsis, title_id, coat_of_arms, ",
            "description, copyright FROM granters ",
            $tail
        )
    };
}

pub struct SqliteCityRightsRepo {
    pool: SqlitePool,
}

impl SqliteCityRightsRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn get_title(&self, id: Uuid) -> Result<Option<Title>> {
        let row = sqlx::query("SELECT id, name, crown, copyright FROM titles WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(title_from_row).transpose().map_err(db_err)
    }

    async fn get_province(&self, id: Uuid) -> Result<Option<Province>> {
        let row = sqlx::query("SELECT id, name FROM provinces WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(province_from_row).transpose().map_err(db_err)
    }

    async fn titled(&self, granter: Granter) -> Result<TitledGranter> {
        let title = match granter.title_id {
            Some(title_id) => self.get_title(title_id).await?,
            None => None,
        };
        Ok(TitledGranter { granter, title })
    }

    async fn ruler_ids(&self, country_id: Uuid) -> Result<Vec<Uuid>> {
        let rows = sqlx::query("SELECT granter_id FROM country_rulers WHERE country_id = ?")
            .bind(uuid_to_blob(country_id))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter()
            .map(|row| row.try_get::<Vec<u8>, _>("granter_id").map(|b| blob_to_uuid(&b)))
            .collect::<sqlx::Result<_>>()
            .map_err(db_err)
    }

    /// Countries that had `granter_id` among their rulers.
    async fn countries_ruled_by(&self, granter_id: Uuid) -> Result<Vec<Country>> {
        let rows = sqlx::query(
            "SELECT c.id, c.name FROM countries c \
             JOIN country_rulers r ON r.country_id = c.id \
             WHERE r.granter_id = ? ORDER BY c.name",
        )
        .bind(uuid_to_blob(granter_id))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut countries = Vec::with_capacity(rows.len());
        for row in rows {
            let id = blob_to_uuid(&row.try_get::<Vec<u8>, _>("id").map_err(db_err)?);
            countries.push(Country {
                id,
                name: row.try_get("name").map_err(db_err)?,
                ruler_ids: self.ruler_ids(id).await?,
            });
        }
        Ok(countries)
    }

    async fn first_visit(&self, city_id: Uuid) -> Result<Option<Visit>> {
        // v7 ids sort in creation order
        let row = sqlx::query(
            "SELECT id, date, rating, city_id, main_img FROM visits \
             WHERE city_id = ? ORDER BY id ASC LIMIT 1",
        )
        .bind(uuid_to_blob(city_id))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.as_ref().map(visit_from_row).transpose().map_err(db_err)
    }

    async fn traces_for_city(&self, city_id: Uuid) -> Result<Vec<Trace>> {
        let rows = sqlx::query(
            "SELECT id, name, city_id, image, description, lat, lon FROM traces \
             WHERE city_id = ? ORDER BY name",
        )
        .bind(uuid_to_blob(city_id))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(trace_from_row).collect::<sqlx::Result<_>>().map_err(db_err)
    }

    async fn cities_granted_by(&self, granter_id: Uuid) -> Result<Vec<City>> {
        let rows = sqlx::query(select_cities!("WHERE granter_id = ? ORDER BY grant_date, name"))
            .bind(uuid_to_blob(granter_id))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        cities_from_rows(&rows)
    }

    async fn delete_by_id(&self, sql: &str, id: Uuid) -> Result<bool> {
        let result = sqlx::query(sql)
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}

fn title_from_row(row: &SqliteRow) -> sqlx::Result<Title> {
    Ok(Title {
        id: blob_to_uuid(&row.try_get::<Vec<u8>, _>("id")?),
        name: row.try_get("name")?,
        crown: row.try_get("crown")?,
        copyright: row.try_get("copyright")?,
    })
}

fn province_from_row(row: &SqliteRow) -> sqlx::Result<Province> {
    Ok(Province {
        id: blob_to_uuid(&row.try_get::<Vec<u8>, _>("id")?),
        name: row.try_get("name")?,
    })
}

fn granter_from_row(row: &SqliteRow) -> sqlx::Result<Granter> {
    Ok(Granter {
        id: blob_to_uuid(&row.try_get::<Vec<u8>, _>("id")?),
        name: row.try_get("name")?,
        portrait: row.try_get("portrait")?,
        main_img: row.try_get("main_img")?,
        synopsis: row.try_get("synopsis")?,
        title_id: row.try_get::<Option<Vec<u8>>, _>("title_id")?.as_deref().map(blob_to_uuid),
        coat_of_arms: row.try_get("coat_of_arms")?,
        description: row.try_get("description")?,
        copyright: row.try_get("copyright")?,
    })
}

fn city_from_row(row: &SqliteRow) -> sqlx::Result<City> {
    Ok(City {
        id: blob_to_uuid(&row.try_get::<Vec<u8>, _>("id")?),
        name: row.try_get("name")?,
        grant_date: row.try_get("grant_date")?,
        granter_id: row.try_get::<Option<Vec<u8>>, _>("granter_id")?.as_deref().map(blob_to_uuid),
        province_id: row.try_get::<Option<Vec<u8>>, _>("province_id")?.as_deref().map(blob_to_uuid),
        main_img: row.try_get("main_img")?,
        synopsis: row.try_get("synopsis")?,
        is_city: row.try_get("is_city")?,
        banned: row.try_get("banned")?,
        coat_of_arms: row.try_get("coat_of_arms")?,
        description: row.try_get("description")?,
        latin: row.try_get("latin")?,
    })
}

fn cities_from_rows(rows: &[SqliteRow]) -> Result<Vec<City>> {
    rows.iter().map(city_from_row).collect::<sqlx::Result<_>>().map_err(db_err)
}

fn visit_from_row(row: &SqliteRow) -> sqlx::Result<Visit> {
    Ok(Visit {
        id: blob_to_uuid(&row.try_get::<Vec<u8>, _>("id")?),
        date: row.try_get("date")?,
        rating: row.try_get("rating")?,
        city_id: row.try_get::<Option<Vec<u8>>, _>("city_id")?.as_deref().map(blob_to_uuid),
        main_img: row.try_get("main_img")?,
    })
}

fn trace_from_row(row: &SqliteRow) -> sqlx::Result<Trace> {
    Ok(Trace {
        id: blob_to_uuid(&row.try_get::<Vec<u8>, _>("id")?),
        name: row.try_get("name")?,
        city_id: row.try_get::<Option<Vec<u8>>, _>("city_id")?.as_deref().map(blob_to_uuid),
        image: row.try_get("image")?,
        description: row.try_get("description")?,
        lat: row.try_get("lat")?,
        lon: row.try_get("lon")?,
    })
}

#[async_trait]
impl CityRightsRepo for SqliteCityRightsRepo {
    async fn create_title(&self, title: Title) -> Result<()> {
        title.validate()?;
        sqlx::query("INSERT INTO titles (id, name, crown, copyright) VALUES (?, ?, ?, ?)")
            .bind(uuid_to_blob(title.id))
            .bind(title.name)
            .bind(title.crown)
            .bind(title.copyright)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn list_titles(&self) -> Result<Vec<Title>> {
        let rows = sqlx::query("SELECT id, name, crown, copyright FROM titles ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(title_from_row).collect::<sqlx::Result<_>>().map_err(db_err)
    }

    async fn delete_title(&self, id: Uuid) -> Result<bool> {
        self.delete_by_id("DELETE FROM titles WHERE id = ?", id).await
    }

    async fn create_granter(&self, granter: Granter) -> Result<()> {
        granter.validate()?;
        sqlx::query(
            "INSERT INTO granters (id, name, portrait, main_img, synopsis, title_id, coat_of_arms, description, copyright) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(granter.id))
        .bind(granter.name)
        .bind(granter.portrait)
        .bind(granter.main_img)
        .bind(granter.synopsis)
        .bind(opt_uuid_to_blob(granter.title_id))
        .bind(granter.coat_of_arms)
        .bind(granter.description)
        .bind(granter.copyright)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get_granter(&self, id: Uuid) -> Result<Option<Granter>> {
        let row = sqlx::query(select_granters!("WHERE id = ?"))
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(granter_from_row).transpose().map_err(db_err)
    }

    async fn list_granters(&self) -> Result<Vec<Granter>> {
        let rows = sqlx::query(select_granters!("ORDER BY name"))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(granter_from_row).collect::<sqlx::Result<_>>().map_err(db_err)
    }

    async fn delete_granter(&self, id: Uuid) -> Result<bool> {
        self.delete_by_id("DELETE FROM granters WHERE id = ?", id).await
    }

    async fn get_granter_detail(&self, id: Uuid) -> Result<Option<GranterDetail>> {
        let Some(granter) = self.get_granter(id).await? else {
            return Ok(None);
        };
        let cities = self.cities_granted_by(id).await?;
        Ok(Some(GranterDetail { granter: self.titled(granter).await?, cities }))
    }

    /// Atomic operation to create a country and its rulers.
    async fn create_country(&self, country: Country) -> Result<()> {
        country.validate()?;
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query("INSERT INTO countries (id, name) VALUES (?, ?)")
            .bind(uuid_to_blob(country.id))
            .bind(&country.name)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        for ruler in &country.ruler_ids {
            sqlx::query("INSERT OR IGNORE INTO country_rulers (country_id, granter_id) VALUES (?, ?)")
                .bind(uuid_to_blob(country.id))
                .bind(uuid_to_blob(*ruler))
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn add_country_ruler(&self, country_id: Uuid, granter_id: Uuid) -> Result<()> {
        sqlx::query("INSERT OR IGNORE INTO country_rulers (country_id, granter_id) VALUES (?, ?)")
            .bind(uuid_to_blob(country_id))
            .bind(uuid_to_blob(granter_id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn create_province(&self, province: Province) -> Result<()> {
        province.validate()?;
        sqlx::query("INSERT INTO provinces (id, name) VALUES (?, ?)")
            .bind(uuid_to_blob(province.id))
            .bind(province.name)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn list_provinces(&self) -> Result<Vec<Province>> {
        let rows = sqlx::query("SELECT id, name FROM provinces ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(province_from_row).collect::<sqlx::Result<_>>().map_err(db_err)
    }

    async fn delete_province(&self, id: Uuid) -> Result<bool> {
        self.delete_by_id("DELETE FROM provinces WHERE id = ?", id).await
    }

    async fn create_city(&self, city: City) -> Result<()> {
        city.validate()?;
        sqlx::query(
            "INSERT INTO cities (id, name, grant_date, granter_id, province_id, main_img, synopsis, \
             is_city, banned, coat_of_arms, description, latin) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(city.id))
        .bind(city.name)
        .bind(city.grant_date)
        .bind(opt_uuid_to_blob(city.granter_id))
        .bind(opt_uuid_to_blob(city.province_id))
        .bind(city.main_img)
        .bind(city.synopsis)
        .bind(city.is_city)
        .bind(city.banned)
        .bind(city.coat_of_arms)
        .bind(city.description)
        .bind(city.latin)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn update_city(&self, city: City) -> Result<()> {
        city.validate()?;
        let id = city.id;
        let result = sqlx::query(
            "UPDATE cities SET name = ?, grant_date = ?, granter_id = ?, province_id = ?, main_img = ?, \
             synopsis = ?, is_city = ?, banned = ?, coat_of_arms = ?, description = ?, latin = ? \
             WHERE id = ?",
        )
        .bind(city.name)
        .bind(city.grant_date)
        .bind(opt_uuid_to_blob(city.granter_id))
        .bind(opt_uuid_to_blob(city.province_id))
        .bind(city.main_img)
        .bind(city.synopsis)
        .bind(city.is_city)
        .bind(city.banned)
        .bind(city.coat_of_arms)
        .bind(city.description)
        .bind(city.latin)
        .bind(uuid_to_blob(id))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("City".into(), id.to_string()));
        }
        Ok(())
    }

    async fn delete_city(&self, id: Uuid) -> Result<bool> {
        self.delete_by_id("DELETE FROM cities WHERE id = ?", id).await
    }

    async fn get_city(&self, id: Uuid) -> Result<Option<City>> {
        let row = sqlx::query(select_cities!("WHERE id = ?"))
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(city_from_row).transpose().map_err(db_err)
    }

    async fn get_city_by_name(&self, name: &str) -> Result<Option<City>> {
        let row = sqlx::query(select_cities!("WHERE name = ?"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(city_from_row).transpose().map_err(db_err)
    }

    async fn list_cities_by_grant_date(&self) -> Result<Vec<City>> {
        let rows = sqlx::query(select_cities!("ORDER BY grant_date ASC, name ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        cities_from_rows(&rows)
    }

    /// Matching happens here rather than in SQL, whose LIKE folds ASCII case only.
    async fn find_cities_by_prefix(&self, prefix: &str) -> Result<Vec<City>> {
        let rows = sqlx::query(select_cities!("ORDER BY name"))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        let mut cities = cities_from_rows(&rows)?;
        cities.retain(|city| starts_with_ignore_case(&city.name, prefix));
        Ok(cities)
    }

    async fn list_unbanned_cities(&self) -> Result<Vec<City>> {
        // NULL is neither banned nor explicitly unbanned, so it is left out.
        let rows = sqlx::query(select_cities!("WHERE banned = 0 ORDER BY name"))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        cities_from_rows(&rows)
    }

    /// Gathers everything the detail page needs in one logical operation.
    async fn get_city_detail(&self, id: Uuid) -> Result<Option<CityDetail>> {
        let Some(city) = self.get_city(id).await? else {
            return Ok(None);
        };

        let granter = match city.granter_id {
            Some(granter_id) => match self.get_granter(granter_id).await? {
                Some(granter) => Some(self.titled(granter).await?),
                None => None,
            },
            None => None,
        };
        let countries = match &granter {
            Some(g) => self.countries_ruled_by(g.granter.id).await?,
            None => Vec::new(),
        };
        let province = match city.province_id {
            Some(province_id) => self.get_province(province_id).await?,
            None => None,
        };
        let visit = self.first_visit(id).await?;
        let traces = self.traces_for_city(id).await?;

        Ok(Some(CityDetail { city, granter, province, visit, countries, traces }))
    }

    async fn create_visit(&self, visit: Visit) -> Result<()> {
        visit.validate()?;
        sqlx::query("INSERT INTO visits (id, date, rating, city_id, main_img) VALUES (?, ?, ?, ?, ?)")
            .bind(uuid_to_blob(visit.id))
            .bind(visit.date)
            .bind(visit.rating)
            .bind(opt_uuid_to_blob(visit.city_id))
            .bind(visit.main_img)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn create_trace(&self, trace: Trace) -> Result<()> {
        trace.validate()?;
        sqlx::query(
            "INSERT INTO traces (id, name, city_id, image, description, lat, lon) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(trace.id))
        .bind(trace.name)
        .bind(opt_uuid_to_blob(trace.city_id))
        .bind(trace.image)
        .bind(trace.description)
        .bind(trace.lat)
        .bind(trace.lon)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}
