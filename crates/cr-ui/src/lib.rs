//! # cr-ui
//!
//! Askama page templates. Handlers fill these structs; the markup lives in
//! `templates/`.

use askama::Template;
use chrono::NaiveDate;
use cr_core::{BannerItem, City, CityDetail, GranterDetail, Trace, Visit};

/// Homepage: the banner and every city in grant order.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate<'a> {
    pub title: &'a str,
    pub cities: &'a [City],
    pub banner: &'a [BannerItem],
}

/// City listing, shared by the full list and the search results.
#[derive(Template)]
#[template(path = "cities.html")]
pub struct CityListTemplate<'a> {
    pub title: &'a str,
    pub cities: &'a [City],
    /// The search prefix, when this is a result page
    pub query: &'a str,
}

#[derive(Template)]
#[template(path = "city.html")]
pub struct CityTemplate<'a> {
    pub title: &'a str,
    pub detail: &'a CityDetail,
}

#[derive(Template)]
#[template(path = "granter.html")]
pub struct GranterTemplate<'a> {
    pub title: &'a str,
    pub detail: &'a GranterDetail,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub title: &'a str,
    pub status: u16,
    pub message: &'a str,
}

fn date_label(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%-d %B %Y").to_string(),
        None => "unknown".to_string(),
    }
}

/// Display helpers used by the templates.
pub trait Labels {
    fn date_label(&self) -> String;
}

impl Labels for City {
    fn date_label(&self) -> String {
        date_label(self.grant_date)
    }
}

impl Labels for Visit {
    fn date_label(&self) -> String {
        date_label(self.date)
    }
}

/// Extra labels for visits and traces.
pub trait DetailLabels {
    fn detail_label(&self) -> String;
}

impl DetailLabels for Visit {
    /// The rating with one decimal, e.g. "7.5".
    fn detail_label(&self) -> String {
        match self.rating {
            Some(rating) => format!("{rating:.1}"),
            None => "not rated".to_string(),
        }
    }
}

impl DetailLabels for Trace {
    fn detail_label(&self) -> String {
        match self.coordinates() {
            Some((lat, lon)) => format!("{lat:.5}, {lon:.5}"),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cr_core::{Granter, TitledGranter, Title};

    fn haarlem() -> City {
        City {
            grant_date: NaiveDate::from_ymd_opt(1245, 11, 23),
            is_city: Some(true),
            ..City::new("Haarlem")
        }
    }

    #[test]
    fn test_date_labels() {
        assert_eq!(haarlem().date_label(), "23 November 1245");
        let undated = City { grant_date: None, ..City::new("Onbekend") };
        assert_eq!(undated.date_label(), "unknown");
    }

    #[test]
    fn test_city_list_marks_classical_rights() {
        let assen = City {
            grant_date: NaiveDate::from_ymd_opt(1809, 3, 13),
            is_city: Some(true),
            ..City::new("Assen")
        };
        let cities = vec![assen, haarlem()];
        let html = CityListTemplate { title: "Cities", cities: &cities, query: "" }
            .render()
            .unwrap();
        assert!(html.contains("Haarlem"));
        assert!(html.contains("Assen"));
        assert_eq!(html.matches("class=\"flag\"").count(), 1);
        assert_eq!(html.matches("class=\"circle\"").count(), 1);
    }

    #[test]
    fn test_city_page_escapes_and_shows_granter() {
        let title = Title::new("Graaf");
        let mut granter = Granter::new("Willem II", Some(title.id));
        granter.synopsis = "<b>Rooms-koning</b>".into();
        let mut city = haarlem();
        city.description = "<script>alert(1)</script>".into();
        let detail = CityDetail {
            granter: Some(TitledGranter { granter, title: Some(title) }),
            city,
            province: None,
            visit: None,
            countries: Vec::new(),
            traces: Vec::new(),
        };

        let html = CityTemplate { title: "Haarlem", detail: &detail }.render().unwrap();
        assert!(html.contains("Graaf Willem II"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_index_renders_banner_links() {
        let cities = vec![haarlem()];
        let banner = vec![BannerItem::City(cities[0].clone())];
        let html = IndexTemplate { title: "City rights", cities: &cities, banner: &banner }
            .render()
            .unwrap();
        assert!(html.contains(&format!("/city/{}", cities[0].id)));
    }

    #[test]
    fn test_rating_and_coordinates_labels() {
        let city = haarlem();
        let visit = Visit { rating: Some(7.5), ..Visit::new(city.id) };
        assert_eq!(visit.detail_label(), "7.5");
        let trace = Trace { lat: Some(52.38), lon: Some(4.6368), ..Trace::new("Wal", city.id) };
        assert_eq!(trace.detail_label(), "52.38000, 4.63680");
    }
}
