use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::model::Table;

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Headline numbers for a filtered table. Means are `None` for an empty table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub brand_count: usize,
    pub avg_price: Option<f64>,
    pub avg_carbon_footprint: Option<f64>,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

pub fn summarize(table: &Table) -> SummaryStats {
    let brands: HashSet<&str> = table.iter().map(|r| r.brand_name.as_str()).collect();
    SummaryStats {
        brand_count: brands.len(),
        avg_price: mean(table.iter().map(|r| r.average_price_usd)),
        avg_carbon_footprint: mean(table.iter().map(|r| r.carbon_footprint_mt)),
    }
}

// ---------------------------------------------------------------------------
// Chart datasets
// ---------------------------------------------------------------------------

/// Number of records per `Sustainability_Rating`, ordered by rating.
pub fn group_by_rating(table: &Table) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for r in table {
        *counts.entry(r.sustainability_rating.clone()).or_insert(0) += 1;
    }
    counts
}

/// One grouped-bar entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandImpact {
    pub brand_name: String,
    pub carbon_footprint_mt: f64,
    pub water_usage_liters: f64,
}

/// One entry per record in table order. Brands are not merged.
pub fn per_brand_impact(table: &Table) -> Vec<BrandImpact> {
    table
        .iter()
        .map(|r| BrandImpact {
            brand_name: r.brand_name.clone(),
            carbon_footprint_mt: r.carbon_footprint_mt,
            water_usage_liters: r.water_usage_liters,
        })
        .collect()
}

/// One bubble of the market-trend scatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub average_price_usd: f64,
    pub market_trend: String,
    /// Marker size; never negative.
    pub waste_production_kg: f64,
    pub material_type: String,
    pub brand_name: String,
    pub certifications: String,
}

/// Missing, negative and non-finite waste values become zero-size markers.
fn marker_size(waste: Option<f64>) -> f64 {
    match waste {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// One entry per record in table order.
pub fn scatter_attributes(table: &Table) -> Vec<ScatterPoint> {
    table
        .iter()
        .map(|r| ScatterPoint {
            average_price_usd: r.average_price_usd,
            market_trend: r.market_trend.clone(),
            waste_production_kg: marker_size(r.waste_production_kg),
            material_type: r.material_type.clone(),
            brand_name: r.brand_name.clone(),
            certifications: r.certifications.clone(),
        })
        .collect()
}

/// Everything the charts need for one filtered table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartDatasets {
    pub rating_counts: BTreeMap<String, usize>,
    pub brand_impact: Vec<BrandImpact>,
    pub scatter: Vec<ScatterPoint>,
}

impl ChartDatasets {
    pub fn from_table(table: &Table) -> Self {
        ChartDatasets {
            rating_counts: group_by_rating(table),
            brand_impact: per_brand_impact(table),
            scatter: scatter_attributes(table),
        }
    }
}
