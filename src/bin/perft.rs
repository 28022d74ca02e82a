use anyhow::Context;
use clap::Parser;
use damista::board::{Board, CaptureRule, Side};

#[derive(Parser, Debug)]
#[command(author, version, about = "Count move-tree leaves from a position", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 4)]
    depth: u8,

    /// Text layout file (8 rows of `.`, `c`, `C`, `h`, `H`); start position if omitted
    #[arg(short, long)]
    layout: Option<std::path::PathBuf>,

    /// Side to move in the layout
    #[arg(long, default_value_t = false)]
    computer_to_move: bool,

    #[arg(long, default_value_t = false)]
    free_captures: bool,

    /// Print the count below every root move
    #[arg(long, default_value_t = false)]
    divide: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let board = match &args.layout {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading layout {}", path.display()))?;
            let side = if args.computer_to_move {
                Side::Computer
            } else {
                Side::Human
            };
            Board::from_layout(&text, side)?
        }
        None => Board::new(),
    };
    let rule = if args.free_captures {
        CaptureRule::Free
    } else {
        CaptureRule::Forced
    };
    let mut board = board.with_capture_rule(rule);

    println!("{}", board);
    println!("perft to depth {} ({:?} captures)", args.depth, rule);

    if args.divide {
        let mut total = 0u64;
        for (mv, nodes) in board.perft_divide(args.depth) {
            println!("{}: {}", mv, nodes);
            total += nodes;
        }
        println!("total: {}", total);
        return Ok(());
    }

    for depth in 1..=args.depth {
        let start = std::time::Instant::now();
        let nodes = board.perft(depth);
        let duration = start.elapsed();
        println!(
            "perft({}) = {} nodes ({} ms, {:.2} Mnps)",
            depth,
            nodes,
            duration.as_millis(),
            nodes as f64 / (duration.as_micros().max(1) as f64)
        );
    }
    Ok(())
}
