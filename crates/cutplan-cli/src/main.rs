use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use cutplan_core::{validate_input, CuttingConfig, CuttingOptimizer, OptimizationInput, OptimizationResult};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cutplan")]
#[command(about = "Cutting plan optimizer - place parts on sheet and roll material", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a cutting plan
    Optimize {
        /// Input file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Longest piece the machine can cut
        #[arg(long, default_value_t = cutplan_core::config::MAX_MACHINE_SIZE)]
        max_machine_size: f64,

        /// Width of the synthetic roll used with infinite materials
        #[arg(long, default_value_t = cutplan_core::config::INFINITE_MATERIAL_WIDTH)]
        infinite_width: f64,

        /// Spacing between neighbouring parts
        #[arg(long, default_value_t = cutplan_core::config::PADDING_DETAILS_ON_SHEET)]
        padding: f64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Optimize {
            input,
            output,
            max_machine_size,
            infinite_width,
            padding,
        } => {
            let config = CuttingConfig {
                max_machine_size,
                infinite_material_width: infinite_width,
                padding,
                ..CuttingConfig::default()
            };
            optimize_command(&input, output, config)?;
        }
    }

    Ok(())
}

fn load_input(path: &Path) -> Result<OptimizationInput> {
    let content = std::fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    );

    let input = if is_yaml {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    Ok(input)
}

fn optimize_command(input: &Path, output: Option<PathBuf>, config: CuttingConfig) -> Result<()> {
    println!("{}", "🔍 Loading input...".bright_blue());

    let request = load_input(input)?;
    validate_input(&request, &config)?;

    println!(
        "  {} parts to cut",
        request.parts.len().to_string().bright_white().bold()
    );
    if request.options.use_infinite_materials {
        println!(
            "  infinite material, {} wide",
            config.infinite_material_width.to_string().bright_white().bold()
        );
    } else {
        println!(
            "  {} materials available",
            request
                .available_materials
                .as_ref()
                .map_or(0, Vec::len)
                .to_string()
                .bright_white()
                .bold()
        );
    }
    println!();

    println!("{}", "🚀 Running optimization...".bright_blue());

    let mut optimizer = CuttingOptimizer::new(config);
    let result = optimizer.optimize_cutting(&request)?;

    println!();
    if result.is_complete {
        println!("{}", "✅ Optimization complete!".bright_green().bold());
    } else {
        println!("{}", "⚠️  Some parts could not be placed".bright_yellow().bold());
    }
    println!();

    print_summary(&result);

    let json = serde_json::to_string_pretty(&result)?;
    if let Some(output_path) = output {
        std::fs::write(&output_path, json)?;
        println!(
            "💾 Saved result to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn print_summary(result: &OptimizationResult) {
    println!("{}", "📊 Results:".bright_yellow().bold());
    println!("  Materials required:");
    for (material_id, count) in &result.materials_required {
        println!("    • {}: {} sheets", material_id.bright_white(), count);
    }
    println!(
        "  Sections cut: {}",
        result.sheets.len().to_string().bright_white().bold()
    );
    println!(
        "  Utilization: {}%",
        format!("{:.1}", result.utilization_rate).bright_white()
    );
    println!(
        "  Total waste: {} of {}",
        format!("{:.0}", result.total_waste).bright_white(),
        format!("{:.0}", result.total_material_area).bright_white()
    );

    if !result.waste.is_empty() {
        println!("  Waste by material:");
        for entry in &result.waste {
            println!(
                "    • {} / {}: {:.0}",
                entry.color.bright_cyan(),
                entry.thickness,
                entry.square
            );
        }
    }

    if !result.unplaced_parts.is_empty() {
        println!();
        println!("  Unplaced parts:");
        for part in &result.unplaced_parts {
            println!(
                "    • {} x{} ({} x {}): {}",
                part.id.bright_red(),
                part.quantity,
                part.length,
                part.width,
                part.message
            );
        }
    }

    println!();
}
