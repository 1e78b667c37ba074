//! gift-hunt binary
//!
//! Encodes, decodes and rewrites gift seeds outside the game, using the
//! same level table and limits the in-game core uses.
//!
//! ## Configuration (env / TOML via `config` crate)
//!
//! | Key                              | Default  | Description                      |
//! |----------------------------------|----------|----------------------------------|
//! | `GIFT_HUNT_CONFIG`               | *(none)* | Settings file path               |
//! | `GIFT_HUNT__GIFT__AUX_CAP_MS`    | `600000` | Largest reference time (ms)      |
//! | `GIFT_HUNT__GIFT__COOLDOWN_MS`   | `1000`   | Seed activation cooldown (ms)    |
//!
//! ## Examples
//!
//! ```text
//! gift-hunt encode --level TUT_MOVEMENT -- 12.5 3.0 -40.2
//! gift-hunt decode "Movement:qWAH2AB5/m4:MEk"
//! gift-hunt update-aux "Movement:qWAH2AB5/m4:MEk" 12000
//! gift-hunt levels
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gift_hunt::{GiftHuntSettings, LevelId, LevelTokenMap, Position, SeedCodec};
use std::path::PathBuf;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "gift-hunt", about = "Gift Hunt seed tool", version)]
struct Args {
    /// Settings file (TOML)
    #[arg(long, env = "GIFT_HUNT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a position into a seed
    Encode {
        /// Level id (e.g. TUT_MOVEMENT)
        #[arg(long)]
        level: String,

        /// Reference time in milliseconds
        #[arg(long)]
        aux_ms: Option<u32>,

        #[arg(allow_hyphen_values = true)]
        x: f32,
        #[arg(allow_hyphen_values = true)]
        y: f32,
        #[arg(allow_hyphen_values = true)]
        z: f32,
    },

    /// Decode a seed and print it as JSON
    Decode { seed: String },

    /// Replace the reference time of a seed that already carries one
    UpdateAux { seed: String, aux_ms: u32 },

    /// List known level tokens
    Levels,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // Initialise logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gift_hunt=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let settings = GiftHuntSettings::load(args.config.as_deref())
        .context("Failed to load gift hunt settings")?;
    let table = settings
        .level_table()
        .context("Failed to build level table")?;

    log::debug!(
        "Loaded {} levels (aux cap {}ms)",
        table.len(),
        settings.gift.aux_cap_ms
    );

    let entries = table.entries();
    let levels: Arc<dyn LevelTokenMap> = Arc::new(table);
    let codec = SeedCodec::new(levels, settings.gift.aux_cap_ms);

    match args.command {
        Command::Encode {
            level,
            aux_ms,
            x,
            y,
            z,
        } => {
            let seed = codec.encode(
                Position::new(x, y, z),
                &LevelId::new(level),
                aux_ms,
                &mut rand::thread_rng(),
            )?;
            println!("{}", seed);
        }
        Command::Decode { seed } => {
            let decoded = codec.decode(&seed)?;
            println!("{}", serde_json::to_string_pretty(&decoded)?);
        }
        Command::UpdateAux { seed, aux_ms } => {
            println!("{}", codec.update_aux(&seed, aux_ms)?);
        }
        Command::Levels => {
            for entry in entries {
                let gate = if entry.campaign_gated { " (campaign)" } else { "" };
                println!("{:<20} {}{}", entry.token, entry.id, gate);
            }
        }
    }

    Ok(())
}
