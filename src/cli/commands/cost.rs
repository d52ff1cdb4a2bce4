//! `brigade cost` command - Cost and margin analysis
//!
//! Loads the project's recipe snapshot, aggregates the full cost tree for
//! one recipe, and renders the derived metrics. Everything shown here is
//! recomputed on each run; nothing is cached between invocations.

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::recipe::find_recipe;
use crate::cli::helpers::open_project;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::loader::LoadedRecipes;
use crate::core::Config;
use crate::costing::{compute_cost_metrics, ingredient_line_cost, CostingConfig};

#[derive(clap::Args, Debug)]
pub struct CostArgs {
    /// Recipe ID or short ID (RCP@N)
    pub id: String,

    /// Target food-cost percentage (overrides project config)
    #[arg(long)]
    pub target: Option<f64>,

    /// Show the per-line cost breakdown
    #[arg(long)]
    pub lines: bool,
}

pub fn run(args: CostArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (_, recipe) = find_recipe(&project, &args.id)?;

    let loaded = LoadedRecipes::load(&project)?;

    let config = match args.target {
        Some(target) => CostingConfig::with_target(target),
        None => Config::load().costing(),
    };

    let metrics = compute_cost_metrics(&recipe, &loaded, &config)
        .map_err(|e| miette::miette!("{}", e))?;

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&metrics).into_diagnostic()?;
            println!("{}", json);
            return Ok(());
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&metrics).into_diagnostic()?;
            print!("{}", yaml);
            return Ok(());
        }
        _ => {}
    }

    println!();
    println!(
        "{} {}",
        style("Cost analysis:").bold(),
        style(&recipe.title).cyan()
    );
    println!("{}", "=".repeat(50));
    println!();

    if args.lines {
        if !recipe.ingredient_lines.is_empty() {
            println!("{}", style("Ingredient lines").bold());
            for line in &recipe.ingredient_lines {
                let cost = ingredient_line_cost(line, metrics.servings);
                let name = line.name.as_deref().unwrap_or("(unnamed)");
                println!(
                    "  {:<28} {:>8.3} {:<6} {:>8.2}",
                    name, line.quantity_per_serving, line.unit, cost
                );
            }
        }
        if !recipe.subrecipe_lines.is_empty() {
            println!("{}", style("Sub-recipes").bold());
            for line in &recipe.subrecipe_lines {
                let name = line.name.as_deref().unwrap_or("(unnamed)");
                println!("  {:<28} {:>8.3} srv/srv", name, line.quantity_per_serving);
            }
        }
        if recipe.line_count() > 0 {
            println!();
        }
    }

    println!("  Servings:             {:>10.0}", metrics.servings);
    if metrics.production_servings > 1.0 {
        println!(
            "  Production servings:  {:>10.0}",
            metrics.production_servings
        );
    }
    println!("  Total cost:           {:>10.2}", metrics.total_cost);
    println!("  Cost per serving:     {:>10.2}", metrics.cost_per_serving);
    println!();
    println!("  Net price:            {:>10.2}", metrics.net_price);
    println!(
        "  Price per serving:    {:>10.2}",
        metrics.price_per_serving
    );
    println!();

    let margin_styled = if metrics.current_margin >= 0.0 {
        style(format!("{:>10.2}", metrics.current_margin)).green()
    } else {
        style(format!("{:>10.2}", metrics.current_margin)).red()
    };
    println!("  Current margin:       {}", margin_styled);
    println!(
        "  Margin percent:       {:>9.1}%",
        metrics.current_margin_percent
    );

    if metrics.net_price > 0.0 {
        let fc_styled = if metrics.food_cost_percent <= config.target_food_cost_percent {
            style(format!("{:>9.1}%", metrics.food_cost_percent)).green()
        } else {
            style(format!("{:>9.1}%", metrics.food_cost_percent)).yellow()
        };
        println!("  Food cost percent:    {}", fc_styled);
    }

    println!();
    println!(
        "  Suggested price/srv:  {:>10.2}  (at {:.0}% food cost)",
        metrics.suggested_price, config.target_food_cost_percent
    );

    if !global.quiet && metrics.net_price <= 0.0 && metrics.suggested_price > 0.0 {
        println!();
        println!(
            "  {}",
            style(format!(
                "No price set. Try: brigade recipe set {} --price-per-serving {:.2}",
                args.id, metrics.suggested_price
            ))
            .dim()
        );
    }

    println!();
    Ok(())
}
