//! End-to-end tests for the load → filter → summarise → export pipeline,
//! driven through the public library API with on-disk fixtures.

use std::io::Write;

use fabric_dashboard::data::{
    export_csv, filter, group_by_rating, load_csv_reader, load_file, summarize, year_bounds,
    CriteriaError, Dashboard, DataError, FilterCriteria,
};
use tempfile::NamedTempFile;

const DATASET: &str = "\
Country,Year,Brand_Name,Sustainability_Rating,Carbon_Footprint_MT,Water_Usage_Liters,Average_Price_USD,Market_Trend,Waste_Production_KG,Material_Type,Certifications
USA,2022,BrandA,A+,1.2,500,40.0,Growing,120.5,Organic Cotton,GOTS
USA,2023,BrandB,B,2.0,800,55.0,Stable,80,Recycled Polyester,\"Fair Trade, OEKO-TEX\"
France,2022,BrandC,A,0.5,300,60.0,Growing,,Hemp,
USA,2024,BrandA,A,1.0,450,42.5,Declining,-3,Tencel,B Corp
";

fn dataset_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("create temp file");
    file.write_all(DATASET.as_bytes()).expect("write fixture");
    file
}

#[test]
fn usa_2022_example() {
    let file = dataset_file();
    let table = load_file(file.path()).unwrap();
    assert_eq!(table.len(), 4);
    assert_eq!(year_bounds(&table).unwrap(), (2022, 2024));

    let criteria = FilterCriteria::new("USA", 2022, 2022).unwrap();
    criteria.validate(&table).unwrap();
    let filtered = filter(&table, &criteria);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered.records()[0].brand_name, "BrandA");

    let stats = summarize(&filtered);
    assert_eq!(stats.brand_count, 1);
    assert_eq!(stats.avg_price, Some(40.0));
    assert_eq!(stats.avg_carbon_footprint, Some(1.2));
}

#[test]
fn invalid_criteria_examples() {
    let table = load_file(dataset_file().path()).unwrap();

    let germany = FilterCriteria::new("Germany", 2022, 2024).unwrap();
    assert!(matches!(
        germany.validate(&table),
        Err(DataError::InvalidCriteria(CriteriaError::UnknownCountry(_)))
    ));

    assert!(matches!(
        FilterCriteria::new("USA", 2025, 2020),
        Err(DataError::InvalidCriteria(CriteriaError::InvertedYearRange { .. }))
    ));
}

#[test]
fn every_filtered_record_satisfies_the_criteria() {
    let table = load_file(dataset_file().path()).unwrap();
    for (country, lo, hi) in [("USA", 2022, 2024), ("USA", 2023, 2024), ("France", 2023, 2024)] {
        let criteria = FilterCriteria::new(country, lo, hi).unwrap();
        let filtered = filter(&table, &criteria);

        assert!(filtered
            .iter()
            .all(|r| r.country == country && (lo..=hi).contains(&r.year)));
        let expected = table
            .iter()
            .filter(|r| r.country == country && (lo..=hi).contains(&r.year))
            .count();
        assert_eq!(filtered.len(), expected);
        assert_eq!(filter(&filtered, &criteria), filtered);
        assert_eq!(
            group_by_rating(&filtered).values().sum::<usize>(),
            filtered.len()
        );
    }
}

#[test]
fn empty_selection_has_no_means() {
    let table = load_file(dataset_file().path()).unwrap();
    let criteria = FilterCriteria::new("France", 2023, 2024).unwrap();
    let stats = summarize(&filter(&table, &criteria));
    assert_eq!(stats.brand_count, 0);
    assert!(stats.avg_price.is_none());
    assert!(stats.avg_carbon_footprint.is_none());
}

#[test]
fn dashboard_export_round_trips() {
    let table = load_file(dataset_file().path()).unwrap();
    let mut dashboard = Dashboard::new(table).unwrap();
    assert_eq!(dashboard.criteria().country(), "USA");

    dashboard.set_year_range(2023, 2024).unwrap();
    let bytes = dashboard.export_csv().unwrap();
    let reloaded = load_csv_reader(bytes.as_slice()).unwrap();
    assert_eq!(reloaded, dashboard.filtered_table());

    // Negative waste is kept in the table but clamped for the scatter.
    let charts = dashboard.chart_datasets();
    assert_eq!(charts.scatter.len(), 2);
    assert_eq!(charts.scatter[1].waste_production_kg, 0.0);
    assert_eq!(reloaded.records()[1].waste_production_kg, Some(-3.0));
}

#[test]
fn export_of_whole_table_reloads_identically() {
    let table = load_file(dataset_file().path()).unwrap();
    let reloaded = load_csv_reader(export_csv(&table).unwrap().as_slice()).unwrap();
    assert_eq!(reloaded, table);
}
