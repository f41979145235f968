use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fabric_dashboard::data::{write_csv, Record, Table};

/// Write a deterministic synthetic sustainable-fashion dataset as CSV.
#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output file
    #[arg(default_value = "sustainable_fashion_trends_2024.csv")]
    output: PathBuf,

    /// Number of records to generate
    #[arg(long, default_value_t = 500)]
    rows: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`, rounded to two decimals.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        ((lo + (hi - lo) * self.next_f64()) * 100.0).round() / 100.0
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[(self.next_u64() % options.len() as u64) as usize]
    }
}

const COUNTRIES: &[&str] = &[
    "Australia", "Brazil", "China", "France", "Germany", "India", "Italy", "Japan", "UK", "USA",
];
const RATINGS: &[&str] = &["A", "B", "C", "D"];
const TRENDS: &[&str] = &["Growing", "Stable", "Declining"];
const MATERIALS: &[&str] = &[
    "Organic Cotton",
    "Recycled Polyester",
    "Hemp",
    "Bamboo Fabric",
    "Tencel",
    "Vegan Leather",
];
const CERTIFICATIONS: &[&str] = &["GOTS", "Fair Trade", "OEKO-TEX", "B Corp", "None"];

fn generate(rng: &mut SimpleRng, rows: usize) -> Table {
    (0..rows)
        .map(|i| {
            // A brand keeps its home country across years.
            let brand_id = i % (rows / 4).max(1);
            let country = COUNTRIES[brand_id % COUNTRIES.len()];
            Record {
                country: country.to_string(),
                year: 2010 + (rng.next_u64() % 15) as i32,
                brand_name: format!("Brand_{}", brand_id + 1),
                sustainability_rating: rng.pick(RATINGS).to_string(),
                carbon_footprint_mt: rng.uniform(1.0, 500.0),
                water_usage_liters: rng.uniform(100_000.0, 5_000_000.0),
                average_price_usd: rng.uniform(20.0, 500.0),
                market_trend: rng.pick(TRENDS).to_string(),
                waste_production_kg: Some(rng.uniform(1_000.0, 100_000.0)),
                material_type: rng.pick(MATERIALS).to_string(),
                certifications: rng.pick(CERTIFICATIONS).to_string(),
            }
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = SimpleRng::new(args.seed);
    let table = generate(&mut rng, args.rows);
    write_csv(&table, &args.output)?;

    println!("Wrote {} records to {}", table.len(), args.output.display());
    Ok(())
}
