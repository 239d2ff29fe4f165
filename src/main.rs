use clap::{Args, Parser, Subcommand};
use graphforce::{
    driver::{LayoutConfig, LayoutDriver},
    gfa::{self, GraphSpec},
    objective::node_positions,
    progress, render,
};
use nalgebra::Vector2;
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Graphforce: force-directed 2D graph layout
#[derive(Parser, Debug)]
#[command(
    name = "graphforce",
    about = "Lay out graphs as charged particles connected by springs, minimized by a strong-Wolfe conjugate-gradient solver",
    version,
    propagate_version = true,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a layout and write node positions as CSV
    Layout(LayoutArgs),
    /// Compute a layout and render it to an uncompressed TGA image
    Viz(VizArgs),
}

#[derive(Args, Debug, Clone)]
struct SolveArgs {
    /// Input graph: .gfa, or a whitespace-separated edge list
    #[arg(long, value_name = "FILE")]
    input: PathBuf,

    /// RNG seed for a reproducible initial layout
    #[arg(long)]
    seed: Option<u64>,

    /// Outer iteration cap for the solver
    #[arg(long, default_value_t = 200)]
    max_iterations: usize,

    /// Refuse to lay out graphs with more nodes than this (the pairwise repulsion
    /// term is O(n^2) per evaluation)
    #[arg(long, default_value_t = 5000)]
    max_nodes: usize,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    solve: SolveArgs,

    /// Output CSV file (node,x,y)
    #[arg(long, value_name = "FILE")]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct VizArgs {
    #[command(flatten)]
    solve: SolveArgs,

    /// Output TGA file
    #[arg(long, value_name = "FILE")]
    output: PathBuf,

    /// Also write node positions as CSV
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long, default_value_t = render::DEFAULT_WIDTH)]
    width: u16,

    /// Image height in pixels
    #[arg(long, default_value_t = render::DEFAULT_HEIGHT)]
    height: u16,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Layout(args) => {
            let (spec, positions) = run_solve(&args.solve)?;
            render::write_positions_csv(&spec.names, &positions, &args.output)?;
            eprintln!(
                "[layout] Wrote {} node positions to {}.",
                positions.len(),
                args.output.display()
            );
        }
        Command::Viz(args) => {
            let (spec, positions) = run_solve(&args.solve)?;
            render::render_tga(&positions, &spec.links, &args.output, args.width, args.height)?;
            if let Some(csv_path) = args.csv {
                render::write_positions_csv(&spec.names, &positions, &csv_path)?;
            }
        }
    }

    Ok(())
}

/// Load the graph, run the background solver to completion while polling its
/// progress, and return the per-node positions.
fn run_solve(args: &SolveArgs) -> io::Result<(GraphSpec, Vec<Vector2<f64>>)> {
    let spec = gfa::load_graph(&args.input)?;
    if spec.node_count() > args.max_nodes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "refusing to force-layout {} nodes; narrow the input or raise --max-nodes",
                spec.node_count()
            ),
        ));
    }

    let config = LayoutConfig {
        seed: args.seed,
        max_iterations: args.max_iterations,
        ..LayoutConfig::default()
    };
    let driver = LayoutDriver::start(spec.node_count(), spec.links.clone(), config);

    let pb = progress::solve_progress_bar("solve", args.max_iterations as u64);
    while !driver.is_done() {
        pb.set_position(driver.iterations() as u64);
        thread::sleep(Duration::from_millis(25));
    }
    pb.set_position(driver.iterations() as u64);
    pb.finish_with_message("done");

    let free = driver.join();
    Ok((spec, node_positions(&free)))
}

