use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use log::info;

use dp_aligner::center_star::center_star;
use dp_aligner::display::{
    render_matrix, CellFormat, GLOBAL_GLYPHS, GOTOH_E_GLYPHS, GOTOH_F_GLYPHS, GOTOH_G_GLYPHS,
    LOCAL_GLYPHS,
};
use dp_aligner::{
    global, gotoh, local, AffineScoring, CenterStarConfig, LinearScoring, PairwiseAlignment,
    Sequence, DEFAULT_DEL_COST, DEFAULT_GAP_A, DEFAULT_GAP_B, DEFAULT_INS_COST,
    DEFAULT_MATCH_COST, DEFAULT_MISMATCH_COST,
};

#[derive(Parser)]
#[command(name = "dp-aligner")]
#[command(version)]
#[command(about = "Dynamic-programming sequence alignment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Global alignment (Needleman-Wunsch)
    Global(PairArgs),
    /// Global alignment with affine gaps (Gotoh)
    Gotoh(AffineArgs),
    /// Local alignment (Smith-Waterman)
    Local(PairArgs),
    /// Multiple alignment (center star)
    CenterStar(CenterStarArgs),
}

#[derive(Args, Debug)]
struct LinearCosts {
    #[arg(long, default_value_t = DEFAULT_INS_COST, allow_hyphen_values = true)]
    ins: f64,
    #[arg(long = "del", default_value_t = DEFAULT_DEL_COST, allow_hyphen_values = true)]
    del: f64,
    #[arg(long = "match", default_value_t = DEFAULT_MATCH_COST, allow_hyphen_values = true)]
    match_cost: f64,
    #[arg(long = "mismatch", default_value_t = DEFAULT_MISMATCH_COST, allow_hyphen_values = true)]
    mismatch_cost: f64,
}

impl LinearCosts {
    fn scoring(&self) -> LinearScoring {
        LinearScoring::new(self.ins, self.del, self.match_cost, self.mismatch_cost)
    }
}

#[derive(Args, Debug)]
struct DisplayArgs {
    /// Print the DP matrices
    #[arg(long)]
    show_matrix: bool,
    /// Decimal places for matrix cells
    #[arg(long)]
    precision: Option<usize>,
}

impl DisplayArgs {
    fn format(&self) -> CellFormat {
        CellFormat {
            precision: self.precision,
        }
    }
}

#[derive(Args, Debug)]
struct PairArgs {
    s1: String,
    s2: String,
    #[command(flatten)]
    costs: LinearCosts,
    #[command(flatten)]
    display: DisplayArgs,
}

#[derive(Args, Debug)]
struct AffineArgs {
    s1: String,
    s2: String,
    /// Gap open term a in f(k) = a + b * k
    #[arg(short = 'a', default_value_t = DEFAULT_GAP_A, allow_hyphen_values = true)]
    a: f64,
    /// Gap extension term b in f(k) = a + b * k
    #[arg(short = 'b', default_value_t = DEFAULT_GAP_B, allow_hyphen_values = true)]
    b: f64,
    #[arg(long = "match", default_value_t = DEFAULT_MATCH_COST, allow_hyphen_values = true)]
    match_cost: f64,
    #[arg(long = "mismatch", default_value_t = DEFAULT_MISMATCH_COST, allow_hyphen_values = true)]
    mismatch_cost: f64,
    #[command(flatten)]
    display: DisplayArgs,
}

#[derive(Args, Debug)]
struct CenterStarArgs {
    #[arg(required = true, num_args = 1..)]
    sequences: Vec<String>,
    /// Use this sequence as the center instead of searching for one
    #[arg(long)]
    center: Option<String>,
    /// Evaluate center candidates on a single thread
    #[arg(long)]
    serial: bool,
    #[command(flatten)]
    costs: LinearCosts,
}

fn print_alignment(s1: &str, s2: &str, alignment: &PairwiseAlignment) {
    println!("S1: {}", s1);
    println!("S2: {}", s2);
    println!("Alignment Score={}", alignment.score);
    println!("ST1: {}", alignment.seq1_str());
    println!("ST2: {}", alignment.seq2_str());
}

fn run_global(args: PairArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (s1, s2) = (args.s1.as_bytes(), args.s2.as_bytes());
    let start = Instant::now();
    let matrices = global::needleman_wunsch(s1, s2, &args.costs.scoring())?;
    let alignment = global::reconstruct(s1, s2, &matrices)?;
    info!("Calculation took {:.4} seconds", start.elapsed().as_secs_f64());

    if args.display.show_matrix {
        let format = args.display.format();
        println!(
            "{}",
            render_matrix(s1, s2, &matrices.scores, &matrices.paths, GLOBAL_GLYPHS, &format)
        );
    }
    print_alignment(&args.s1, &args.s2, &alignment);
    Ok(())
}

fn run_local(args: PairArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (s1, s2) = (args.s1.as_bytes(), args.s2.as_bytes());
    let start = Instant::now();
    let matrices = local::smith_waterman(s1, s2, &args.costs.scoring())?;
    let local = local::reconstruct(s1, s2, &matrices)?;
    info!("Calculation took {:.4} seconds", start.elapsed().as_secs_f64());

    if args.display.show_matrix {
        let format = args.display.format();
        println!(
            "{}",
            render_matrix(s1, s2, &matrices.scores, &matrices.paths, LOCAL_GLYPHS, &format)
        );
    }
    print_alignment(&args.s1, &args.s2, &local.alignment);
    println!(
        "Core: ({}, {}) -> ({}, {})",
        local.start.i, local.start.j, local.end.i, local.end.j
    );
    Ok(())
}

fn run_gotoh(args: AffineArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (s1, s2) = (args.s1.as_bytes(), args.s2.as_bytes());
    let scoring = AffineScoring::new(args.a, args.b, args.match_cost, args.mismatch_cost);
    let start = Instant::now();
    let m = gotoh::gotoh(s1, s2, &scoring)?;
    let alignment = gotoh::reconstruct(s1, s2, &m)?;
    info!("Calculation took {:.4} seconds", start.elapsed().as_secs_f64());

    if args.display.show_matrix {
        let format = args.display.format();
        println!("F=\n{}", render_matrix(s1, s2, &m.f, &m.f_paths, GOTOH_F_GLYPHS, &format));
        println!("G=\n{}", render_matrix(s1, s2, &m.g, &m.g_paths, GOTOH_G_GLYPHS, &format));
        println!("E=\n{}", render_matrix(s1, s2, &m.e, &m.e_paths, GOTOH_E_GLYPHS, &format));
    }
    print_alignment(&args.s1, &args.s2, &alignment);
    Ok(())
}

fn run_center_star(args: CenterStarArgs) -> Result<(), Box<dyn std::error::Error>> {
    let sequences: Vec<Sequence> = args.sequences.iter().map(|s| Sequence::from(s.as_str())).collect();
    let center = args.center.as_deref().map(Sequence::from);
    let config = CenterStarConfig::new().with_parallel(!args.serial);

    let start = Instant::now();
    let msa = center_star(&sequences, center.as_ref(), &args.costs.scoring(), &config)?;
    info!("Center star took {:.4} seconds", start.elapsed().as_secs_f64());

    println!("Center Star Sequence: {}", sequences[msa.center_index]);
    for (idx, row) in msa.rows().into_iter().enumerate() {
        let marker = if idx == msa.center_index { " <- Center Star" } else { "" };
        println!("Sequence: {}{}", String::from_utf8_lossy(row), marker);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Global(args) => run_global(args)?,
        Commands::Gotoh(args) => run_gotoh(args)?,
        Commands::Local(args) => run_local(args)?,
        Commands::CenterStar(args) => run_center_star(args)?,
    }
    Ok(())
}
