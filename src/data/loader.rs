use std::fs::File;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{DataError, Result};
use super::model::{Cell, Column, Record, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the sustainability dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming the eleven dataset columns
/// * `.json`    – `[{ "Country": "USA", "Year": 2022, ... }, ...]`
/// * `.parquet` – one column per dataset column (pandas / polars output)
///
/// Either the whole file loads or an error is returned; there are no
/// partial tables.
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::load(format!("Unsupported file extension: .{other}"))),
    };

    log::info!("Loaded {} records from {}", table.len(), path.display());
    Ok(table)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Header / column layout
// ---------------------------------------------------------------------------

/// Where each schema column sits in the source file.
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    positions: [usize; 11],
}

impl ColumnLayout {
    /// Match source column names against the schema. The names must cover
    /// every column exactly once; order is free.
    fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut positions: [Option<usize>; 11] = [None; 11];

        for (idx, raw_name) in names.into_iter().enumerate() {
            let name = raw_name.trim_start_matches('\u{feff}');
            let column = Column::from_name(name)
                .ok_or_else(|| DataError::load(format!("unexpected column {name:?}")))?;
            if positions[column.index()].replace(idx).is_some() {
                return Err(DataError::load(format!("duplicate column {name:?}")));
            }
        }

        let missing: Vec<&str> = Column::ALL
            .iter()
            .filter(|c| positions[c.index()].is_none())
            .map(|c| c.name())
            .collect();
        if !missing.is_empty() {
            return Err(DataError::load(format!(
                "missing columns: {}",
                missing.join(", ")
            )));
        }

        Ok(ColumnLayout {
            positions: positions.map(Option::unwrap_or_default),
        })
    }

    fn position(&self, column: Column) -> usize {
        self.positions[column.index()]
    }
}

// ---------------------------------------------------------------------------
// Cell → typed Record
// ---------------------------------------------------------------------------

/// Assemble a typed record from a cell accessor. `row` is the 1-based data
/// record number reported in parse errors.
fn build_record(row: usize, mut cell: impl FnMut(Column) -> Result<Cell>) -> Result<Record> {
    Ok(Record {
        country: text(cell(Column::Country)?),
        year: parse_year(row, cell(Column::Year)?)?,
        brand_name: text(cell(Column::BrandName)?),
        sustainability_rating: text(cell(Column::SustainabilityRating)?),
        carbon_footprint_mt: parse_float(
            row,
            Column::CarbonFootprintMt,
            cell(Column::CarbonFootprintMt)?,
        )?,
        water_usage_liters: parse_float(
            row,
            Column::WaterUsageLiters,
            cell(Column::WaterUsageLiters)?,
        )?,
        average_price_usd: parse_float(
            row,
            Column::AveragePriceUsd,
            cell(Column::AveragePriceUsd)?,
        )?,
        market_trend: text(cell(Column::MarketTrend)?),
        waste_production_kg: parse_optional_float(
            row,
            Column::WasteProductionKg,
            cell(Column::WasteProductionKg)?,
        )?,
        material_type: text(cell(Column::MaterialType)?),
        certifications: text(cell(Column::Certifications)?),
    })
}

fn text(cell: Cell) -> String {
    match cell {
        Cell::Text(s) => s,
        other => other.to_string(),
    }
}

fn parse_error(row: usize, column: Column, cell: &Cell, expected: &'static str) -> DataError {
    DataError::Parse {
        row,
        column,
        value: cell.to_string(),
        expected,
    }
}

fn parse_year(row: usize, cell: Cell) -> Result<i32> {
    let fail = |cell: &Cell| parse_error(row, Column::Year, cell, "an integer year");

    let from_float = |v: f64| -> Option<i32> {
        let in_range = v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX);
        (v.is_finite() && v.fract() == 0.0 && in_range).then_some(v as i32)
    };

    let year = match &cell {
        Cell::Integer(i) => i32::try_from(*i).ok(),
        Cell::Float(v) => from_float(*v),
        Cell::Text(s) => {
            let s = s.trim();
            s.parse::<i32>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(from_float))
        }
        Cell::Null => None,
    };
    year.ok_or_else(|| fail(&cell))
}

fn parse_float(row: usize, column: Column, cell: Cell) -> Result<f64> {
    let value = match &cell {
        Cell::Integer(i) => Some(*i as f64),
        Cell::Float(v) => Some(*v),
        Cell::Text(s) => s.trim().parse::<f64>().ok(),
        Cell::Null => None,
    };
    value
        .filter(|v| v.is_finite())
        .ok_or_else(|| parse_error(row, column, &cell, "a number"))
}

/// Like [`parse_float`] but an empty cell is a missing value, not an error.
fn parse_optional_float(row: usize, column: Column, cell: Cell) -> Result<Option<f64>> {
    match &cell {
        Cell::Null => Ok(None),
        Cell::Text(s) if s.trim().is_empty() => Ok(None),
        _ => parse_float(row, column, cell).map(Some),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Table> {
    load_csv_reader(open(path)?)
}

/// Parse CSV text from any reader. The export path feeds its own output back
/// through here, so this is the single definition of the accepted format.
pub fn load_csv_reader<R: Read>(input: R) -> Result<Table> {
    let mut reader = csv::Reader::from_reader(input);
    let layout = ColumnLayout::from_names(reader.headers()?.iter())?;

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row = idx + 1;
        let raw = result?;
        let record = build_record(row, |column| {
            let value = raw.get(layout.position(column)).unwrap_or_default();
            Ok(Cell::Text(value.to_string()))
        })?;
        records.push(record);
    }

    Ok(Table::new(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Country": "USA", "Year": 2022, "Brand_Name": "BrandA", ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Table> {
    let mut text = String::new();
    open(path)?
        .read_to_string(&mut text)
        .map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let rows = root
        .as_array()
        .ok_or_else(|| DataError::load("expected a top-level JSON array of records"))?;

    let mut records = Vec::with_capacity(rows.len());
    for (idx, value) in rows.iter().enumerate() {
        let row = idx + 1;
        let obj = value
            .as_object()
            .ok_or_else(|| DataError::load(format!("record {row} is not a JSON object")))?;
        ColumnLayout::from_names(obj.keys().map(String::as_str))?;

        let record = build_record(row, |column| {
            Ok(obj.get(column.name()).map(json_to_cell).unwrap_or(Cell::Null))
        })?;
        records.push(record);
    }

    Ok(Table::new(records))
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Cell::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Cell::Float(f)
            } else {
                Cell::Text(n.to_string())
            }
        }
        JsonValue::Null => Cell::Null,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per dataset column.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`) as long as string columns are plain
/// (not dictionary/categorical).
fn load_parquet(path: &Path) -> Result<Table> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let layout = ColumnLayout::from_names(
        builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().as_str()),
    )?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            let row_no = records.len() + 1;
            let record = build_record(row_no, |column| {
                arrow_cell(batch.column(layout.position(column)), row)
            })?;
            records.push(record);
        }
    }

    Ok(Table::new(records))
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> Result<Cell> {
    if col.is_null(row) {
        return Ok(Cell::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => Cell::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Cell::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => Cell::Integer(i64::from(col.as_primitive::<Int32Type>().value(row))),
        DataType::Int64 => Cell::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => Cell::Float(f64::from(col.as_primitive::<Float32Type>().value(row))),
        DataType::Float64 => Cell::Float(col.as_primitive::<Float64Type>().value(row)),
        other => {
            return Err(DataError::load(format!(
                "unsupported Parquet column type {other:?}"
            )))
        }
    };
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    const HEADER: &str = "Country,Year,Brand_Name,Sustainability_Rating,Carbon_Footprint_MT,\
Water_Usage_Liters,Average_Price_USD,Market_Trend,Waste_Production_KG,Material_Type,Certifications";

    fn csv_with_rows(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.push('\n');
        text
    }

    #[test]
    fn loads_typed_records_from_csv() {
        let text = csv_with_rows(&[
            "USA,2022,BrandA,A+,1.2,500,40.0,Growing,120.5,Organic Cotton,GOTS",
            "France,2023,BrandC,A,0.5,300.25,60,Stable,,Recycled Polyester,\"Fair Trade, OEKO-TEX\"",
        ]);
        let table = load_csv_reader(text.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        let first = &table.records()[0];
        assert_eq!(first.country, "USA");
        assert_eq!(first.year, 2022);
        assert_eq!(first.sustainability_rating, "A+");
        assert_eq!(first.carbon_footprint_mt, 1.2);
        assert_eq!(first.water_usage_liters, 500.0);
        assert_eq!(first.waste_production_kg, Some(120.5));

        let second = &table.records()[1];
        assert_eq!(second.average_price_usd, 60.0);
        assert_eq!(second.waste_production_kg, None);
        assert_eq!(second.certifications, "Fair Trade, OEKO-TEX");
    }

    #[test]
    fn header_order_is_free() {
        let text = "Year,Country,Certifications,Material_Type,Waste_Production_KG,Market_Trend,\
Average_Price_USD,Water_Usage_Liters,Carbon_Footprint_MT,Sustainability_Rating,Brand_Name
2024,Japan,None,Bamboo Fabric,10,Declining,99.5,1000,3.5,C,BrandZ
";
        let table = load_csv_reader(text.as_bytes()).unwrap();
        let rec = &table.records()[0];
        assert_eq!(rec.country, "Japan");
        assert_eq!(rec.year, 2024);
        assert_eq!(rec.brand_name, "BrandZ");
        assert_eq!(rec.material_type, "Bamboo Fabric");
        assert_eq!(rec.carbon_footprint_mt, 3.5);
    }

    #[test]
    fn rejects_missing_and_unexpected_columns() {
        let missing = "Country,Year\nUSA,2022\n";
        let err = load_csv_reader(missing.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Load { ref reason } if reason.contains("Brand_Name")));

        let extra = format!("{HEADER},Brand_ID\n");
        let err = load_csv_reader(extra.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Load { ref reason } if reason.contains("Brand_ID")));

        let duplicated = format!("{HEADER},Country\n");
        let err = load_csv_reader(duplicated.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Load { ref reason } if reason.contains("duplicate")));
    }

    #[test]
    fn empty_input_is_a_load_error() {
        let err = load_csv_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Load { .. }));
    }

    #[test]
    fn header_only_yields_empty_table() {
        let table = load_csv_reader(csv_with_rows(&[]).as_bytes()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn parse_error_locates_row_and_column() {
        let text = csv_with_rows(&[
            "USA,2022,BrandA,A+,1.2,500,40.0,Growing,120.5,Organic Cotton,GOTS",
            "USA,2023,BrandB,B,2.0,800,cheap,Growing,10,Hemp,GOTS",
        ]);
        match load_csv_reader(text.as_bytes()).unwrap_err() {
            DataError::Parse { row, column, value, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, Column::AveragePriceUsd);
                assert_eq!(value, "cheap");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn year_must_be_integral() {
        let ok = csv_with_rows(&["USA,2022.0,BrandA,A+,1.2,500,40.0,Growing,1,Hemp,GOTS"]);
        assert_eq!(load_csv_reader(ok.as_bytes()).unwrap().records()[0].year, 2022);

        let bad = csv_with_rows(&["USA,2022.5,BrandA,A+,1.2,500,40.0,Growing,1,Hemp,GOTS"]);
        let err = load_csv_reader(bad.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Parse { column: Column::Year, row: 1, .. }));
    }

    #[test]
    fn required_numbers_cannot_be_empty_or_nan() {
        let empty = csv_with_rows(&["USA,2022,BrandA,A+,,500,40.0,Growing,1,Hemp,GOTS"]);
        let err = load_csv_reader(empty.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Parse { column: Column::CarbonFootprintMt, .. }));

        let nan = csv_with_rows(&["USA,2022,BrandA,A+,1.0,NaN,40.0,Growing,1,Hemp,GOTS"]);
        let err = load_csv_reader(nan.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Parse { column: Column::WaterUsageLiters, .. }));
    }

    #[test]
    fn ragged_rows_fail_the_whole_load() {
        let text = csv_with_rows(&[
            "USA,2022,BrandA,A+,1.2,500,40.0,Growing,120.5,Organic Cotton,GOTS",
            "USA,2023,BrandB",
        ]);
        let err = load_csv_reader(text.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::Csv(_)));
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(
            csv_with_rows(&["USA,2022,BrandA,A+,1.2,500,40.0,Growing,120.5,Organic Cotton,GOTS"])
                .as_bytes(),
        )
        .unwrap();
        assert_eq!(load_file(file.path()).unwrap().len(), 1);

        let other = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let err = load_file(other.path()).unwrap_err();
        assert!(matches!(err, DataError::Load { ref reason } if reason.contains(".xlsx")));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_file(Path::new("/nonexistent/fashion.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io { ref path, .. } if path.ends_with("fashion.csv")));
    }

    #[test]
    fn loads_records_oriented_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[
                {{"Country": "USA", "Year": 2022, "Brand_Name": "BrandA",
                  "Sustainability_Rating": "A+", "Carbon_Footprint_MT": 1.2,
                  "Water_Usage_Liters": 500, "Average_Price_USD": 40.0,
                  "Market_Trend": "Growing", "Waste_Production_KG": null,
                  "Material_Type": "Hemp", "Certifications": "GOTS"}}
            ]"#
        )
        .unwrap();

        let table = load_file(file.path()).unwrap();
        let rec = &table.records()[0];
        assert_eq!(rec.year, 2022);
        assert_eq!(rec.water_usage_liters, 500.0);
        assert_eq!(rec.waste_production_kg, None);
    }

    #[test]
    fn json_record_with_wrong_type_is_parse_error() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"Country": "USA", "Year": "soon", "Brand_Name": "BrandA",
                 "Sustainability_Rating": "A+", "Carbon_Footprint_MT": 1.2,
                 "Water_Usage_Liters": 500, "Average_Price_USD": 40.0,
                 "Market_Trend": "Growing", "Waste_Production_KG": 3,
                 "Material_Type": "Hemp", "Certifications": "GOTS"}}]"#
        )
        .unwrap();

        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, DataError::Parse { column: Column::Year, row: 1, .. }));
    }

    #[test]
    fn loads_flat_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fashion.parquet");

        let utf8 = |name: &str| Field::new(name, DataType::Utf8, false);
        let float = |name: &str| Field::new(name, DataType::Float64, true);
        let schema = Arc::new(Schema::new(vec![
            utf8("Country"),
            Field::new("Year", DataType::Int64, false),
            utf8("Brand_Name"),
            utf8("Sustainability_Rating"),
            float("Carbon_Footprint_MT"),
            float("Water_Usage_Liters"),
            float("Average_Price_USD"),
            utf8("Market_Trend"),
            float("Waste_Production_KG"),
            utf8("Material_Type"),
            utf8("Certifications"),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["USA", "France"])),
                Arc::new(Int64Array::from(vec![2022, 2023])),
                Arc::new(StringArray::from(vec!["BrandA", "BrandC"])),
                Arc::new(StringArray::from(vec!["A+", "A"])),
                Arc::new(Float64Array::from(vec![Some(1.2), Some(0.5)])),
                Arc::new(Float64Array::from(vec![Some(500.0), Some(300.0)])),
                Arc::new(Float64Array::from(vec![Some(40.0), Some(60.0)])),
                Arc::new(StringArray::from(vec!["Growing", "Stable"])),
                Arc::new(Float64Array::from(vec![Some(120.5), None])),
                Arc::new(StringArray::from(vec!["Hemp", "Tencel"])),
                Arc::new(StringArray::from(vec!["GOTS", "B Corp"])),
            ],
        )
        .unwrap();

        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].year, 2022);
        assert_eq!(table.records()[1].country, "France");
        assert_eq!(table.records()[1].waste_production_kg, None);
        assert_eq!(table.records()[1].certifications, "B Corp");
    }
}
