use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

use iabsim::channel::ShannonCapacity;
use iabsim::config::{load_channel_config, ChannelConfig, SynthesisConfig};
use iabsim::report::render_topology;
use iabsim::topology::{self, TreeMode};

/// Topology synthesis for IAB-style wireless backhaul networks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the channel configuration YAML file (defaults built in)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid rows and columns
    #[arg(long, default_value_t = 8)]
    size: usize,

    /// Minimum candidate placements per row
    #[arg(long, default_value_t = 2)]
    min_per_row: usize,

    /// Maximum candidate placements per row
    #[arg(long, default_value_t = 4)]
    max_per_row: usize,

    /// Placement exclusion radius
    #[arg(long, default_value_t = 2)]
    radius: usize,

    /// Attachment policy: DAG or TREE
    #[arg(long, default_value = "DAG")]
    tree_mode: TreeMode,

    /// Physical length of one grid cell in meters
    #[arg(long, default_value_t = 10.0)]
    cell_length: f64,

    /// Seed for reproducible synthesis
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting IabSim topology synthesis");

    let channel = match &args.config {
        Some(path) => load_channel_config(path)?,
        None => {
            info!("No channel config given, using built-in defaults");
            ChannelConfig::default()
        }
    };
    let formula = ShannonCapacity::from_config(&channel);

    let synthesis = SynthesisConfig {
        grid_size: args.size,
        min_nodes_per_row: args.min_per_row,
        max_nodes_per_row: args.max_per_row,
        connection_radius: args.radius,
        tree_mode: args.tree_mode,
        grid_cell_length_m: args.cell_length,
        max_connect_distance: None,
    };

    let mut rng = match args.seed {
        Some(seed) => {
            info!("Seeding synthesis with {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let topology = topology::generate(&synthesis, &formula, &mut rng)?;
    info!(
        "Synthesis complete: {} nodes, {} links",
        topology.node_count(),
        topology.link_count()
    );

    println!("{}", render_topology(&topology));
    Ok(())
}
