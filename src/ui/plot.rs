use std::collections::{BTreeMap, BTreeSet};
use std::f32::consts::TAU;

use eframe::egui::{self, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, Legend, MarkerShape, Plot, PlotPoint, Points};

use fabric_dashboard::data::{BrandImpact, ScatterPoint};

use crate::color::{generate_palette, ColorMap};

/// Inner radius of the rating donut as a fraction of the outer radius.
const DONUT_HOLE: f32 = 0.4;
const DONUT_SIZE: f32 = 240.0;

/// Largest scatter marker radius, in points.
const MAX_BUBBLE_RADIUS: f32 = 10.0;

// ---------------------------------------------------------------------------
// Rating donut
// ---------------------------------------------------------------------------

/// One wedge of the rating donut. Angles are radians clockwise from
/// twelve o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub count: usize,
    pub start: f32,
    pub sweep: f32,
}

impl Slice {
    fn fraction(&self) -> f32 {
        self.sweep / TAU
    }
}

/// Lay rating counts out around the circle, in rating order.
pub fn pie_slices(counts: &BTreeMap<String, usize>) -> Vec<Slice> {
    let total: usize = counts.values().sum();
    if total == 0 {
        return Vec::new();
    }
    let mut start = 0.0;
    counts
        .iter()
        .map(|(label, &count)| {
            let sweep = TAU * count as f32 / total as f32;
            let slice = Slice {
                label: label.clone(),
                count,
                start,
                sweep,
            };
            start += sweep;
            slice
        })
        .collect()
}

/// Wedge under `offset` (pointer position relative to the centre), if the
/// pointer is on the ring.
fn slice_at(slices: &[Slice], offset: Vec2, inner: f32, outer: f32) -> Option<&Slice> {
    let r = offset.length();
    if r < inner || r > outer {
        return None;
    }
    let angle = offset.x.atan2(-offset.y).rem_euclid(TAU);
    slices
        .iter()
        .find(|s| angle >= s.start && angle < s.start + s.sweep)
}

/// Render the sustainability rating distribution as a donut with a legend.
pub fn rating_donut(ui: &mut Ui, counts: &BTreeMap<String, usize>, colors: &ColorMap) {
    let slices = pie_slices(counts);
    if slices.is_empty() {
        ui.label("No ratings to show.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(DONUT_SIZE, DONUT_SIZE), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let outer = DONUT_SIZE * 0.5 - 4.0;
        let inner = outer * DONUT_HOLE;
        let at =
            |radius: f32, angle: f32| center + radius * egui::vec2(angle.sin(), -angle.cos());

        for slice in &slices {
            let color = colors.color_for(&slice.label);
            // Ring segments are not convex; draw each wedge as thin quads.
            let steps = (slice.fraction() * 120.0).ceil().max(1.0) as usize;
            for i in 0..steps {
                let a0 = slice.start + slice.sweep * i as f32 / steps as f32;
                let a1 = slice.start + slice.sweep * (i + 1) as f32 / steps as f32;
                painter.add(Shape::convex_polygon(
                    vec![at(outer, a0), at(outer, a1), at(inner, a1), at(inner, a0)],
                    color,
                    Stroke::NONE,
                ));
            }
        }

        if let Some(pos) = response.hover_pos() {
            if let Some(slice) = slice_at(&slices, pos - center, inner, outer) {
                let text = format!(
                    "{}: {} ({:.1}%)",
                    slice.label,
                    slice.count,
                    slice.fraction() * 100.0
                );
                response.on_hover_text(text);
            }
        }

        ui.vertical(|ui: &mut Ui| {
            for slice in &slices {
                ui.horizontal(|ui: &mut Ui| {
                    let (swatch, _) =
                        ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
                    ui.painter()
                        .rect_filled(swatch, 2.0, colors.color_for(&slice.label));
                    ui.label(format!(
                        "{}  {} ({:.1}%)",
                        slice.label,
                        slice.count,
                        slice.fraction() * 100.0
                    ));
                });
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Grouped bars: carbon footprint and water usage
// ---------------------------------------------------------------------------

/// Brand label for an x-axis grid mark; only whole positions are labelled.
fn brand_label(brands: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    brands.get(idx as usize).cloned().unwrap_or_default()
}

/// Render carbon footprint and water usage side by side for every record.
pub fn impact_bars(ui: &mut Ui, impact: &[BrandImpact]) {
    let palette = generate_palette(2);
    let (carbon_color, water_color) = (palette[0], palette[1]);

    let carbon: Vec<Bar> = impact
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::new(i as f64 - 0.2, b.carbon_footprint_mt)
                .width(0.4)
                .name(&b.brand_name)
        })
        .collect();
    let water: Vec<Bar> = impact
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::new(i as f64 + 0.2, b.water_usage_liters)
                .width(0.4)
                .name(&b.brand_name)
        })
        .collect();
    let brands: Vec<String> = impact.iter().map(|b| b.brand_name.clone()).collect();

    Plot::new("impact_bars")
        .height(320.0)
        .legend(Legend::default())
        .x_axis_label("Brand_Name")
        .y_axis_label("Impact Value")
        .x_axis_formatter(move |mark, _range| brand_label(&brands, mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(carbon)
                    .name("Carbon_Footprint_MT")
                    .color(carbon_color),
            );
            plot_ui.bar_chart(
                BarChart::new(water)
                    .name("Water_Usage_Liters")
                    .color(water_color),
            );
        });
}

// ---------------------------------------------------------------------------
// Market trend scatter
// ---------------------------------------------------------------------------

/// How `Market_Trend` values are placed on the y axis: numerically when every
/// value is a number, otherwise one row per category in sorted order.
#[derive(Debug, Clone, PartialEq)]
pub enum TrendAxis {
    Numeric,
    Categorical(Vec<String>),
}

impl TrendAxis {
    pub fn for_points(points: &[ScatterPoint]) -> Self {
        let numeric = points
            .iter()
            .all(|p| p.market_trend.trim().parse::<f64>().is_ok_and(f64::is_finite));
        if numeric {
            return TrendAxis::Numeric;
        }
        let categories: BTreeSet<&str> = points.iter().map(|p| p.market_trend.as_str()).collect();
        TrendAxis::Categorical(categories.into_iter().map(String::from).collect())
    }

    pub fn position(&self, trend: &str) -> f64 {
        match self {
            TrendAxis::Numeric => trend.trim().parse().unwrap_or(0.0),
            TrendAxis::Categorical(categories) => categories
                .iter()
                .position(|c| c == trend)
                .map_or(-1.0, |i| i as f64),
        }
    }

    pub fn label(&self, value: f64) -> String {
        match self {
            TrendAxis::Numeric => format!("{}", (value * 100.0).round() / 100.0),
            TrendAxis::Categorical(categories) => brand_label(categories, value),
        }
    }
}

/// Marker radius scaled so marker area tracks waste production.
pub fn bubble_radius(waste: f64, max_waste: f64) -> f32 {
    if waste <= 0.0 || max_waste <= 0.0 {
        return 0.0;
    }
    MAX_BUBBLE_RADIUS * (waste / max_waste).sqrt() as f32
}

/// Render price against market trend, sized by waste and coloured by material.
pub fn market_scatter(ui: &mut Ui, points: &[ScatterPoint], colors: &ColorMap) {
    let axis = TrendAxis::for_points(points);
    let max_waste = points
        .iter()
        .map(|p| p.waste_production_kg)
        .fold(0.0, f64::max);

    let hover: Vec<(PlotPoint, String)> = points
        .iter()
        .map(|p| {
            let at = PlotPoint::new(p.average_price_usd, axis.position(&p.market_trend));
            let text = format!(
                "{}\nCertifications: {}\nPrice: ${:.2}\nTrend: {}\nWaste: {} kg",
                p.brand_name,
                p.certifications,
                p.average_price_usd,
                p.market_trend,
                p.waste_production_kg
            );
            (at, text)
        })
        .collect();
    let y_axis = axis.clone();

    Plot::new("market_scatter")
        .height(360.0)
        .legend(Legend::default())
        .x_axis_label("Average_Price_USD")
        .y_axis_label("Market_Trend")
        .y_axis_formatter(move |mark, _range| y_axis.label(mark.value))
        .label_formatter(move |name, value| {
            if name.is_empty() {
                return format!("x: {:.2}", value.x);
            }
            hover
                .iter()
                .min_by(|(a, _), (b, _)| {
                    let da = (a.x - value.x).powi(2) + (a.y - value.y).powi(2);
                    let db = (b.x - value.x).powi(2) + (b.y - value.y).powi(2);
                    da.total_cmp(&db)
                })
                .map(|(_, text)| format!("{name}\n{text}"))
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for p in points {
                let position = [p.average_price_usd, axis.position(&p.market_trend)];
                plot_ui.points(
                    Points::new(vec![position])
                        .name(&p.material_type)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(bubble_radius(p.waste_production_kg, max_waste))
                        .color(colors.color_for(&p.material_type)),
                );
            }
        });
}
