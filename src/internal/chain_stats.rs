#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use std::{
    collections::hash_map::DefaultHasher,
    error::Error,
    hash::{BuildHasher, BuildHasherDefault},
    sync::Once,
};

use env_logger::Builder;
use hashchain::{
    ChainStats, ChainedHashTable,
    hashing::{BuildDjb2, BuildFnv1a, Xxh64Builder, djb2_hash, fnv1a_hash, xxh64_hash},
};
use log::{LevelFilter, info};
use plotters::prelude::*;
use rand::{Rng, distr::Alphanumeric};

// Fixed bucket count for every experiment
const TABLE_CAPACITY: usize = 1_000;
// Load factors from 0.25 to 4.0
const NUM_LOAD_FACTORS: usize = 16;
const MAX_LOAD_FACTOR: f64 = 4.0;
const KEY_LENGTH: usize = 12;

// Hashers to compare
const METHODS: [&str; 4] = ["FNV-1a", "djb2", "xxh64", "SipHash"];

static INIT: Once = Once::new();

fn initialize_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Info)
            .filter_module("hashchain", LevelFilter::Info)
            .format_timestamp_millis()
            .parse_default_env();

        if let Err(err) = builder.try_init() {
            eprintln!("Logger already initialized: {err}");
        }
    });
}

fn random_key(rng: &mut impl Rng) -> String {
    rng.sample_iter(Alphanumeric).take(KEY_LENGTH).map(char::from).collect()
}

// Fill a fresh table with `keys` and report how the chains came out
fn measure<S: BuildHasher>(build_hasher: S, keys: &[String]) -> hashchain::Result<ChainStats> {
    let mut table = ChainedHashTable::with_capacity_and_hasher(TABLE_CAPACITY, build_hasher)?;
    for key in keys {
        table.insert(key.as_str(), ());
    }
    Ok(table.stats())
}

fn measure_method(method: &str, keys: &[String]) -> hashchain::Result<ChainStats> {
    match method {
        "FNV-1a" => measure(BuildFnv1a::default(), keys),
        "djb2" => measure(BuildDjb2::default(), keys),
        "xxh64" => measure(Xxh64Builder::new(0), keys),
        _ => measure(BuildHasherDefault::<DefaultHasher>::default(), keys),
    }
}

fn draw_chart(
    path: &str,
    caption: &str,
    y_desc: &str,
    load_factors: &[f64],
    series: &[Vec<f64>],
) -> Result<(), Box<dyn Error>> {
    let font_family = "sans-serif";
    let colors = [
        RGBColor(220, 50, 50),  // Bright red
        RGBColor(50, 90, 220),  // Bright blue
        RGBColor(50, 180, 50),  // Bright green
        RGBColor(180, 50, 180), // Bright magenta
    ];

    let root = SVGBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_x = load_factors.last().copied().unwrap_or(1.0);
    let max_y = series
        .iter()
        .flat_map(|v| v.iter())
        .fold(0.0, |max: f64, &y| max.max(y)) *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..max_x, 0.0..max_y.max(1.0))?;

    chart
        .configure_mesh()
        .x_desc("Load Factor (entries per bucket)")
        .y_desc(y_desc)
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (method_idx, &method) in METHODS.iter().enumerate() {
        let color = colors[method_idx % colors.len()];
        let line_style = ShapeStyle::from(color).stroke_width(2);
        let points: Vec<(f64, f64)> =
            load_factors.iter().copied().zip(series[method_idx].iter().copied()).collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), line_style))?
            .label(method)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(points.iter().map(|&point| Circle::new(point, 4, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    initialize_logger();

    let load_factors: Vec<f64> = (1..=NUM_LOAD_FACTORS)
        .map(|i| MAX_LOAD_FACTOR * (i as f64) / (NUM_LOAD_FACTORS as f64))
        .collect();
    let num_keys: Vec<usize> =
        load_factors.iter().map(|&load| (TABLE_CAPACITY as f64 * load) as usize).collect();

    info!("Load factors: {load_factors:?}");
    info!("Number of keys: {num_keys:?}");

    // Generate keys once so every hasher sees the same input
    let mut rng = rand::rng();
    let max_keys_needed = num_keys.iter().copied().max().unwrap_or(0);
    let keys: Vec<String> = (0..max_keys_needed).map(|_| random_key(&mut rng)).collect();

    if let Some(sample) = keys.first() {
        info!(
            "Sample key {sample:?}: FNV-1a = {:#018x}, djb2 = {:#018x}, xxh64 = {:#018x}",
            fnv1a_hash(sample),
            djb2_hash(sample),
            xxh64_hash(sample)
        );
    }

    let mut average_probes: Vec<Vec<f64>> = vec![Vec::new(); METHODS.len()];
    let mut longest_chain: Vec<Vec<f64>> = vec![Vec::new(); METHODS.len()];

    for &n_keys in &num_keys {
        info!("Testing with {n_keys} keys");

        for (method_idx, &method) in METHODS.iter().enumerate() {
            let stats = measure_method(method, &keys[..n_keys])?;

            average_probes[method_idx].push(stats.average_successful_probes());
            longest_chain[method_idx].push(stats.longest_chain as f64);

            info!(
                "  {}: Avg probes = {:.2}, Longest chain = {}, Empty buckets = {}",
                method,
                stats.average_successful_probes(),
                stats.longest_chain,
                stats.empty_buckets
            );
        }
    }

    draw_chart(
        "average_probes.svg",
        "Average Comparisons per Successful Find",
        "Key comparisons",
        &load_factors,
        &average_probes,
    )?;
    draw_chart(
        "longest_chain.svg",
        "Longest Chain by Hash Function",
        "Entries in longest chain",
        &load_factors,
        &longest_chain,
    )?;

    info!("Generated charts: average_probes.svg, longest_chain.svg");

    Ok(())
}
