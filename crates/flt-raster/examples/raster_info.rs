//! Example: Print header and statistics for a float grid raster.
//!
//! Usage: cargo run --example raster_info -- <file.flt> [world_x world_y]
//!
//! Set `RUST_LOG=flt_raster=debug` to see load diagnostics.

use flt_raster::load_raster;
use std::env;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <file.flt> [world_x world_y]", args[0]);
        eprintln!("Example: {} ./dem/elevation.flt 500150 4100250", args[0]);
        std::process::exit(1);
    }

    let start = Instant::now();
    let raster = match load_raster(&args[1]) {
        Ok(raster) => raster,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    println!("Loaded {} in {:.3}s", args[1], start.elapsed().as_secs_f64());

    let header = raster.header();
    println!(
        "Grid: {} x {} cells of {} units, origin ({}, {}), {}",
        header.ncols,
        header.nrows,
        header.cell_size,
        header.minx,
        header.miny,
        header.byte_order.header_value()
    );

    let stats = raster.statistics();
    println!(
        "Valid samples: {} of {} (nodata = {})",
        stats.count(),
        raster.grid().len(),
        header.nodata
    );
    println!(
        "Range: {} to {} (delta {})",
        stats.min_data(),
        stats.max_data(),
        stats.del_data()
    );
    println!(
        "Mean: {:.4}, stddev: {:.4}, one-sigma band: {} to {}",
        stats.mean(),
        stats.stddev(),
        stats.min_limit(),
        stats.max_limit()
    );

    let transform = raster.transform();
    println!(
        "Maximum at row {}, col {} -> world ({}, {})",
        stats.max_row(),
        stats.max_col(),
        transform.to_world_x(stats.max_col() as f64),
        transform.to_world_y(stats.max_row() as f64)
    );

    if args.len() >= 4 {
        let x: f64 = args[2].parse().expect("Invalid world x");
        let y: f64 = args[3].parse().expect("Invalid world y");
        println!(
            "\nWorld ({}, {}) -> row {}, col {}",
            x,
            y,
            transform.to_grid_row(y),
            transform.to_grid_column(x)
        );
        match raster.value_at(x, y) {
            Some(v) if raster.is_nodata(v) => println!("Value: nodata"),
            Some(v) => println!("Value: {}", v),
            None => println!("Value: grid index out of range"),
        }
    }
}
