//! # Banner
//!
//! The homepage header shows three random records, drawn from cities and
//! granters together.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{City, Granter};

/// Number of records shown in the banner.
pub const BANNER_SIZE: usize = 3;

/// A record that can appear in the banner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BannerItem {
    City(City),
    Granter(Granter),
}

impl BannerItem {
    pub fn id(&self) -> Uuid {
        match self {
            BannerItem::City(city) => city.id,
            BannerItem::Granter(granter) => granter.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            BannerItem::City(city) => &city.name,
            BannerItem::Granter(granter) => &granter.name,
        }
    }

    pub fn main_img(&self) -> &str {
        match self {
            BannerItem::City(city) => &city.main_img,
            BannerItem::Granter(granter) => &granter.main_img,
        }
    }

    pub fn synopsis(&self) -> &str {
        match self {
            BannerItem::City(city) => &city.synopsis,
            BannerItem::Granter(granter) => &granter.synopsis,
        }
    }

    /// Route segment of the detail page ("city" or "granter").
    pub fn object_name(&self) -> &'static str {
        match self {
            BannerItem::City(_) => "city",
            BannerItem::Granter(_) => "granter",
        }
    }
}

/// Draws `BANNER_SIZE` distinct records uniformly, or nothing when fewer
/// are available.
pub fn sample_banner<R: Rng + ?Sized>(
    granters: &[Granter],
    cities: &[City],
    rng: &mut R,
) -> Vec<BannerItem> {
    if granters.len() + cities.len() < BANNER_SIZE {
        return Vec::new();
    }

    let pool: Vec<BannerItem> = granters
        .iter()
        .cloned()
        .map(BannerItem::Granter)
        .chain(cities.iter().cloned().map(BannerItem::City))
        .collect();

    pool.choose_multiple(rng, BANNER_SIZE).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_too_few_records_gives_empty_banner() {
        let mut rng = StdRng::seed_from_u64(7);
        let cities = vec![City::new("Haarlem")];
        let granters = vec![Granter::new("Willem II", None)];
        assert!(sample_banner(&granters, &cities, &mut rng).is_empty());
        assert!(sample_banner(&[], &[], &mut rng).is_empty());
    }

    #[test]
    fn test_banner_draws_three_distinct_records() {
        let cities: Vec<City> = ["Haarlem", "Delft", "Leiden", "Dordrecht"]
            .into_iter()
            .map(City::new)
            .collect();
        let granters = vec![Granter::new("Willem II", None)];

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let banner = sample_banner(&granters, &cities, &mut rng);
            assert_eq!(banner.len(), BANNER_SIZE);
            let ids: HashSet<Uuid> = banner.iter().map(BannerItem::id).collect();
            assert_eq!(ids.len(), BANNER_SIZE);
        }
    }

    #[test]
    fn test_exactly_three_records_are_all_used() {
        let mut rng = StdRng::seed_from_u64(1);
        let cities = vec![City::new("Haarlem"), City::new("Assen")];
        let granters = vec![Granter::new("Floris V", None)];
        let banner = sample_banner(&granters, &cities, &mut rng);
        let names: HashSet<&str> = banner.iter().map(BannerItem::name).collect();
        assert_eq!(names, HashSet::from(["Haarlem", "Assen", "Floris V"]));
    }

    #[test]
    fn test_object_names_match_routes() {
        assert_eq!(BannerItem::City(City::new("Assen")).object_name(), "city");
        assert_eq!(BannerItem::Granter(Granter::new("Floris V", None)).object_name(), "granter");
    }
}
