use clap::{Args, Parser, Subcommand};
use strength_serve::client::{advise, StrengthClass, DEFAULT_API_URL};
use strength_serve::utils::logger;
use strength_serve::{MixComposition, StrengthClient};

#[derive(Parser)]
#[command(name = "strength-client")]
#[command(about = "Query the concrete strength prediction API")]
struct Cli {
    /// Base URL of the prediction API
    #[arg(long, env = "API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check API and model status
    Health,
    /// Show model metadata and performance metrics
    Metadata,
    /// Predict compressive strength for a mix design
    Predict(MixArgs),
    /// Predict and show feature importances
    Explain(MixArgs),
}

/// Defaults are a common 28-day reference mix.
#[derive(Args)]
struct MixArgs {
    #[arg(long, default_value_t = 540.0)]
    cement: f64,
    #[arg(long, default_value_t = 0.0)]
    blast_furnace_slag: f64,
    #[arg(long, default_value_t = 0.0)]
    fly_ash: f64,
    #[arg(long, default_value_t = 162.0)]
    water: f64,
    #[arg(long, default_value_t = 2.5)]
    superplasticizer: f64,
    #[arg(long, default_value_t = 1040.0)]
    coarse_aggregate: f64,
    #[arg(long, default_value_t = 676.0)]
    fine_aggregate: f64,
    #[arg(long, default_value_t = 28)]
    age: u32,
}

impl From<&MixArgs> for MixComposition {
    fn from(args: &MixArgs) -> Self {
        MixComposition {
            cement: args.cement,
            blast_furnace_slag: args.blast_furnace_slag,
            fly_ash: args.fly_ash,
            water: args.water,
            superplasticizer: args.superplasticizer,
            coarse_aggregate: args.coarse_aggregate,
            fine_aggregate: args.fine_aggregate,
            age: args.age,
        }
    }
}

fn print_mix_summary(mix: &MixComposition) {
    let total_binder = mix.total_binder();
    println!("📐 Mix design ratios");
    println!("   Total binder:           {:.1} kg/m³", total_binder);
    if total_binder > 0.0 {
        println!("   Water/binder ratio:     {:.3}", mix.water / total_binder);
    }
    if mix.cement > 0.0 {
        println!(
            "   Aggregate/cement ratio: {:.3}",
            (mix.coarse_aggregate + mix.fine_aggregate) / mix.cement
        );
    }

    let advice = advise(mix);
    for warning in &advice.warnings {
        println!("⚠️  {}", warning);
    }
    for note in &advice.notes {
        println!("💡 {}", note);
    }
}

async fn run(cli: Cli) -> strength_serve::Result<()> {
    let client = StrengthClient::new(&cli.api_url)?;

    match cli.command {
        Command::Health => {
            let health = client.health().await?;
            println!(
                "✅ API {} - model loaded: {}, version: {} ({})",
                health.status, health.model_loaded, health.model_version, health.timestamp
            );
        }
        Command::Metadata => {
            let metadata = client.metadata().await?;
            println!("🤖 {} v{}", metadata.model_type, metadata.model_version);
            println!("   Trained:  {}", metadata.training_date);
            println!("   Features: {}", metadata.features_used);
            println!("   Target:   {}", metadata.target);
            if let Some(metrics) = &metadata.performance_metrics {
                for (name, value) in metrics {
                    println!("   {}: {}", name, value);
                }
            }
        }
        Command::Predict(args) => {
            let mix = MixComposition::from(&args);
            let result = client.predict(&mix).await?;
            let class = StrengthClass::classify(result.predicted_strength);

            println!(
                "🏗️  Compressive strength: {:.1} {} (model {})",
                result.predicted_strength, result.units, result.model_version
            );
            println!("🏷️  {}: {}", class.label(), class.typical_use());
            print_mix_summary(&mix);
        }
        Command::Explain(args) => {
            let mix = MixComposition::from(&args);
            let explanation = client.explain(&mix).await?;

            println!(
                "🏗️  Compressive strength: {:.1} MPa",
                explanation.predicted_strength
            );
            println!("{}", explanation.message);

            let mut ranked: Vec<_> = explanation.feature_importance.into_iter().collect();
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
            for (feature, weight) in ranked {
                println!("   {:<24} {:.3}", feature, weight);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    if let Err(e) = run(cli).await {
        tracing::debug!("Request failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }
}
