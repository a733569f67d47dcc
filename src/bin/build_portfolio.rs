use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use portfolio_graph::{Tunables, build_from_dir, tunables, write_graph};

/// Build the colour-correlation portfolio table from a directory of PNGs.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory of PNGs to scan
    #[arg(long, default_value = "assets/images/portfolio")]
    img_dir: PathBuf,

    /// Output JSON path
    #[arg(long, default_value = "public/portfolioTable.json")]
    out: PathBuf,

    /// Optional minimum correlation to emit (e.g. 0.1)
    #[arg(long)]
    min_link: Option<f64>,

    /// ΔE (LAB) falloff; smaller means stricter similarity
    #[arg(long, default_value_t = tunables::SIGMA_E)]
    sigma_e: f64,

    /// Hue complement falloff in degrees
    #[arg(long, default_value_t = tunables::SIGMA_H)]
    sigma_h: f64,

    /// Weight of the similarity term
    #[arg(long, default_value_t = tunables::W_SIM)]
    w_sim: f64,

    /// Weight of the complement term
    #[arg(long, default_value_t = tunables::W_COMP)]
    w_comp: f64,

    /// Images with a longer side are downscaled before averaging
    #[arg(long, default_value_t = tunables::MAX_ANALYSIS_SIDE)]
    max_analysis_side: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let tunables = Tunables {
        sigma_e: args.sigma_e,
        sigma_h: args.sigma_h,
        w_sim: args.w_sim,
        w_comp: args.w_comp,
        max_analysis_side: args.max_analysis_side,
    };

    let nodes = build_from_dir(&args.img_dir, &tunables, args.min_link)
        .context("portfolio build failed")?;
    write_graph(&args.out, &nodes)?;

    println!("Wrote {} with {} nodes.", args.out.display(), nodes.len());
    Ok(())
}
