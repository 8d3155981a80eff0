#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use broadside::{
    init_logging, Board, Difficulty, LocalMatch, MatchOutcome, Opponent, RandomStrategy,
    RelayServer, Strategy,
};

#[cfg(feature = "std")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Debug)]
#[cfg(feature = "std")]
enum OpponentKind {
    Easy,
    Hard,
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// Run the relay server.
    Relay {
        #[arg(long, default_value = "0.0.0.0:8000")]
        bind: String,
    },
    /// Play an automated local game against the computer opponent.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, value_enum, default_value_t = OpponentKind::Hard)]
        opponent: OpponentKind,
    },
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Relay { bind } => {
            let server = RelayServer::bind(&bind).await?;
            println!("Relay started on {}", server.local_addr()?);
            let shutdown = server.shutdown_handle();
            tokio::spawn(async move {
                let _ = tokio::signal::ctrl_c().await;
                shutdown.notify_one();
            });
            server.run().await?;
        }
        Commands::Local { seed, opponent } => {
            if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
            }
            let mut rng = match seed {
                Some(s) => SmallRng::seed_from_u64(s),
                None => {
                    let mut seed_rng = rand::rng();
                    SmallRng::from_rng(&mut seed_rng)
                }
            };

            let mut player_board = Board::new();
            let mut opponent_board = Board::new();
            if !player_board.place_fleet_randomly(&mut rng)
                || !opponent_board.place_fleet_randomly(&mut rng)
            {
                return Err(anyhow::anyhow!("could not place both fleets"));
            }

            let difficulty = match opponent {
                OpponentKind::Easy => Difficulty::Easy,
                OpponentKind::Hard => Difficulty::Hard,
            };
            let opponent = match seed {
                Some(s) => Opponent::from_seed(difficulty, s.wrapping_add(1)),
                None => Opponent::new(difficulty),
            };
            let mut shooter = match seed {
                Some(s) => RandomStrategy::from_seed(s.wrapping_add(2)),
                None => RandomStrategy::new(),
            };

            let mut game = LocalMatch::new(player_board, opponent_board, opponent);
            while game.outcome() == MatchOutcome::InProgress {
                let at = shooter.desired_move(game.opponent_board());
                let _ = game.player_shot(at);
            }

            match game.outcome() {
                MatchOutcome::PlayerWon => println!("Player wins!"),
                MatchOutcome::OpponentWon => println!("Computer opponent wins!"),
                MatchOutcome::InProgress => {}
            }
            println!(
                "Player shots: {} ({} hits, {} misses, best streak {})",
                game.opponent_board().moves(),
                game.opponent_board().hits(),
                game.opponent_board().misses(),
                game.opponent_board().max_streak()
            );
            println!(
                "Opponent shots: {} ({} hits, {} misses, best streak {})",
                game.player_board().moves(),
                game.player_board().hits(),
                game.player_board().misses(),
                game.player_board().max_streak()
            );
        }
    }
    Ok(())
}
