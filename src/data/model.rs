use std::fmt;

// ---------------------------------------------------------------------------
// Column – the fixed dataset schema
// ---------------------------------------------------------------------------

/// The eleven columns of the dataset. Declaration order is the canonical
/// column order used when exporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Country,
    Year,
    BrandName,
    SustainabilityRating,
    CarbonFootprintMt,
    WaterUsageLiters,
    AveragePriceUsd,
    MarketTrend,
    WasteProductionKg,
    MaterialType,
    Certifications,
}

impl Column {
    pub const ALL: [Column; 11] = [
        Column::Country,
        Column::Year,
        Column::BrandName,
        Column::SustainabilityRating,
        Column::CarbonFootprintMt,
        Column::WaterUsageLiters,
        Column::AveragePriceUsd,
        Column::MarketTrend,
        Column::WasteProductionKg,
        Column::MaterialType,
        Column::Certifications,
    ];

    /// Header name as it appears in the data file.
    pub fn name(self) -> &'static str {
        match self {
            Column::Country => "Country",
            Column::Year => "Year",
            Column::BrandName => "Brand_Name",
            Column::SustainabilityRating => "Sustainability_Rating",
            Column::CarbonFootprintMt => "Carbon_Footprint_MT",
            Column::WaterUsageLiters => "Water_Usage_Liters",
            Column::AveragePriceUsd => "Average_Price_USD",
            Column::MarketTrend => "Market_Trend",
            Column::WasteProductionKg => "Waste_Production_KG",
            Column::MaterialType => "Material_Type",
            Column::Certifications => "Certifications",
        }
    }

    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Position in [`Column::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Cell – a raw value as read from a source file, before typing
// ---------------------------------------------------------------------------

/// Untyped cell value. CSV yields only `Text`; JSON and Parquet keep their
/// native number types so they can be coerced without a round trip through
/// strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Null => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the dataset
// ---------------------------------------------------------------------------

/// One brand/year observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub country: String,
    pub year: i32,
    pub brand_name: String,
    pub sustainability_rating: String,
    pub carbon_footprint_mt: f64,
    pub water_usage_liters: f64,
    pub average_price_usd: f64,
    /// Either a category ("Growing", "Stable", …) or a number kept as text.
    pub market_trend: String,
    /// Absent when the source cell was empty.
    pub waste_production_kg: Option<f64>,
    pub material_type: String,
    pub certifications: String,
}

impl Record {
    /// Render a single field the way it is written to CSV.
    pub fn field_text(&self, column: Column) -> String {
        match column {
            Column::Country => self.country.clone(),
            Column::Year => self.year.to_string(),
            Column::BrandName => self.brand_name.clone(),
            Column::SustainabilityRating => self.sustainability_rating.clone(),
            Column::CarbonFootprintMt => self.carbon_footprint_mt.to_string(),
            Column::WaterUsageLiters => self.water_usage_liters.to_string(),
            Column::AveragePriceUsd => self.average_price_usd.to_string(),
            Column::MarketTrend => self.market_trend.clone(),
            Column::WasteProductionKg => self
                .waste_production_kg
                .map(|v| v.to_string())
                .unwrap_or_default(),
            Column::MaterialType => self.material_type.clone(),
            Column::Certifications => self.certifications.clone(),
        }
    }

    /// All fields in canonical column order.
    pub fn to_row(&self) -> Vec<String> {
        Column::ALL.iter().map(|&c| self.field_text(c)).collect()
    }
}

// ---------------------------------------------------------------------------
// Table – the loaded dataset (and every filtered view of it)
// ---------------------------------------------------------------------------

/// An ordered collection of records. Never mutated once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn new(records: Vec<Record>) -> Self {
        Table { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<Record> for Table {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Table::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
