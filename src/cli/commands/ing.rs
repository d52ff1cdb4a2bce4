//! `brigade ing` command - Ingredient management

use chrono::{Duration, Utc};
use clap::{Subcommand, ValueEnum};
use console::style;
use dialoguer::Input;
use miette::{IntoDiagnostic, Result};
use std::fs;

use crate::cli::helpers::{escape_csv, open_project, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::Status;
use crate::core::identity::EntityPrefix;
use crate::core::loader;
use crate::core::project::Project;
use crate::core::shortid::ShortIdIndex;
use crate::core::Config;
use crate::entities::Ingredient;

#[derive(Subcommand, Debug)]
pub enum IngCommands {
    /// List ingredients with filtering
    List(ListArgs),

    /// Create a new ingredient
    New(NewArgs),

    /// Show an ingredient's details
    Show(ShowArgs),

    /// Edit an ingredient in your editor
    Edit(EditArgs),
}

/// Status filter
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusFilter {
    Draft,
    Active,
    Archived,
    All,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, short = 's', default_value = "all")]
    pub status: StatusFilter,

    /// Filter by category
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Search in name
    #[arg(long)]
    pub search: Option<String>,

    /// Filter by author
    #[arg(long, short = 'a')]
    pub author: Option<String>,

    /// Show only ingredients created in the last N days
    #[arg(long)]
    pub recent: Option<u32>,

    /// Sort by name instead of id
    #[arg(long)]
    pub sort_by_name: bool,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Ingredient name
    #[arg(long, short = 't')]
    pub name: Option<String>,

    /// Purchase unit (kg, l, piece, ...)
    #[arg(long, default_value = "kg")]
    pub unit: String,

    /// Purchase price per unit
    #[arg(long)]
    pub base_price: Option<f64>,

    /// Fractional loss rate (0.05 = 5%)
    #[arg(long)]
    pub waste_percent: Option<f64>,

    /// Category (produce, dairy, dry goods, ...)
    #[arg(long)]
    pub category: Option<String>,

    /// Preferred supplier name
    #[arg(long)]
    pub supplier: Option<String>,

    /// Open in editor after creation
    #[arg(long, short = 'e')]
    pub edit: bool,

    /// Skip opening in editor
    #[arg(long)]
    pub no_edit: bool,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Ingredient ID or short ID (ING@N)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Ingredient ID or short ID (ING@N)
    pub id: String,
}

/// Run an ing subcommand
pub fn run(cmd: IngCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        IngCommands::List(args) => run_list(args, global),
        IngCommands::New(args) => run_new(args, global),
        IngCommands::Show(args) => run_show(args, global),
        IngCommands::Edit(args) => run_edit(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let ing_dir = project
        .root()
        .join(Project::entity_directory(EntityPrefix::Ing));

    let ingredients: Vec<Ingredient> = loader::load_all(&ing_dir)?;

    // Apply filters
    let mut ingredients: Vec<Ingredient> = ingredients
        .into_iter()
        .filter(|i| match args.status {
            StatusFilter::Draft => i.status == Status::Draft,
            StatusFilter::Active => i.status == Status::Active,
            StatusFilter::Archived => i.status == Status::Archived,
            StatusFilter::All => true,
        })
        .filter(|i| {
            if let Some(ref category) = args.category {
                i.category
                    .as_ref()
                    .map_or(false, |c| c.eq_ignore_ascii_case(category))
            } else {
                true
            }
        })
        .filter(|i| {
            if let Some(ref search) = args.search {
                i.name.to_lowercase().contains(&search.to_lowercase())
            } else {
                true
            }
        })
        .filter(|i| {
            if let Some(ref author_filter) = args.author {
                i.author
                    .to_lowercase()
                    .contains(&author_filter.to_lowercase())
            } else {
                true
            }
        })
        .filter(|i| {
            if let Some(days) = args.recent {
                let cutoff = Utc::now() - Duration::days(days as i64);
                i.created >= cutoff
            } else {
                true
            }
        })
        .collect();

    if args.sort_by_name {
        ingredients.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    } else {
        ingredients.sort_by(|a, b| a.id.to_string().cmp(&b.id.to_string()));
    }

    if let Some(limit) = args.limit {
        ingredients.truncate(limit);
    }

    if args.count {
        println!("{}", ingredients.len());
        return Ok(());
    }

    if ingredients.is_empty() {
        println!("No ingredients found.");
        return Ok(());
    }

    // Update short ID index
    let mut short_ids = ShortIdIndex::load(&project);
    short_ids.ensure_all(ingredients.iter().map(|i| i.id.to_string()));
    let _ = short_ids.save(&project);

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&ingredients).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&ingredients).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("short_id,id,name,unit,base_price,waste_percent,effective_cost,status");
            for i in &ingredients {
                let short_id = short_ids
                    .get_short_id(&i.id.to_string())
                    .map(|n| n.to_string())
                    .unwrap_or_default();
                println!(
                    "{},{},{},{},{:.4},{:.4},{:.4},{}",
                    short_id,
                    i.id,
                    escape_csv(&i.name),
                    escape_csv(&i.unit),
                    i.base_price,
                    i.waste_percent,
                    i.effective_unit_cost(),
                    i.status
                );
            }
        }
        OutputFormat::Id => {
            for i in &ingredients {
                println!("{}", i.id);
            }
        }
        OutputFormat::Md => {
            println!("| Short | Name | Unit | Price | Waste | Effective | Status |");
            println!("|---|---|---|---|---|---|---|");
            for i in &ingredients {
                let short_id = short_ids
                    .get_short_id(&i.id.to_string())
                    .map(|n| format!("@{}", n))
                    .unwrap_or_default();
                println!(
                    "| {} | {} | {} | {:.2} | {:.0}% | {:.2} | {} |",
                    short_id,
                    i.name,
                    i.unit,
                    i.base_price,
                    i.waste_percent * 100.0,
                    i.effective_unit_cost(),
                    i.status
                );
            }
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            println!(
                "{:<8} {:<22} {:<7} {:>8} {:>7} {:>10} {:<9}",
                style("SHORT").bold(),
                style("NAME").bold(),
                style("UNIT").bold(),
                style("PRICE").bold(),
                style("WASTE").bold(),
                style("EFFECTIVE").bold(),
                style("STATUS").bold()
            );
            println!("{}", "-".repeat(78));

            for i in &ingredients {
                let short_id = short_ids
                    .get_short_id(&i.id.to_string())
                    .map(|n| format!("@{}", n))
                    .unwrap_or_default();
                print!(
                    "{:<8} {:<22} {:<7} {:>8.2} {:>6.0}% {:>10.2} {:<9}",
                    style(short_id).cyan(),
                    truncate_str(&i.name, 20),
                    truncate_str(&i.unit, 7),
                    i.base_price,
                    i.waste_percent * 100.0,
                    i.effective_unit_cost(),
                    i.status
                );
                if global.verbose {
                    print!(" {}", style(&i.id).dim());
                }
                println!();
            }

            if !global.quiet {
                println!();
                println!(
                    "{} ingredient(s) found. Use {} to reference by short ID.",
                    style(ingredients.len()).cyan(),
                    style("ING@N").cyan()
                );
            }
        }
    }

    Ok(())
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let config = Config::load();

    let name: String;
    let base_price: f64;
    let waste_percent: f64;

    if args.interactive {
        name = Input::new()
            .with_prompt("Ingredient name")
            .interact_text()
            .into_diagnostic()?;
        let price: String = Input::new()
            .with_prompt("Purchase price per unit")
            .default("0".to_string())
            .interact_text()
            .into_diagnostic()?;
        base_price = price.trim().parse().unwrap_or(0.0);
        let waste: String = Input::new()
            .with_prompt("Waste rate (0.05 = 5%)")
            .default("0".to_string())
            .interact_text()
            .into_diagnostic()?;
        waste_percent = waste.trim().parse().unwrap_or(0.0);
    } else {
        name = args.name.unwrap_or_else(|| "New Ingredient".to_string());
        base_price = args.base_price.unwrap_or(0.0);
        waste_percent = args.waste_percent.unwrap_or(0.0);
    }

    let mut ingredient = Ingredient::new(name, base_price, config.author());
    ingredient.unit = args.unit;
    ingredient.waste_percent = waste_percent;
    ingredient.category = args.category;
    ingredient.supplier = args.supplier;

    let file_path = project.entity_path(EntityPrefix::Ing, &ingredient.id);
    if let Some(parent) = file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).into_diagnostic()?;
        }
    }

    let yaml_content = serde_yml::to_string(&ingredient).into_diagnostic()?;
    fs::write(&file_path, &yaml_content).into_diagnostic()?;

    let mut short_ids = ShortIdIndex::load(&project);
    let short_id = short_ids.add(ingredient.id.to_string());
    let _ = short_ids.save(&project);

    println!(
        "{} Created ingredient {} ({})",
        style("✓").green(),
        style(&ingredient.name).cyan(),
        style(format!("@{}", short_id)).cyan()
    );
    if !global.quiet {
        println!("   {}", style(file_path.display()).dim());
        println!(
            "   {:.2}/{} with {:.0}% waste (effective {:.2})",
            ingredient.base_price,
            ingredient.unit,
            ingredient.waste_percent * 100.0,
            ingredient.effective_unit_cost()
        );
    }

    if args.edit || (!args.no_edit && !args.interactive) {
        if !global.quiet {
            println!();
            println!("Opening in {}...", style(config.editor()).yellow());
        }
        config.run_editor(&file_path).into_diagnostic()?;
    }

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (path, _ingredient) = find_ingredient(&project, &args.id)?;

    let content = fs::read_to_string(&path).into_diagnostic()?;

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Yaml,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            let ingredient: Ingredient = serde_yml::from_str(&content).into_diagnostic()?;
            let json = serde_json::to_string_pretty(&ingredient).into_diagnostic()?;
            println!("{}", json);
        }
        _ => {
            print!("{}", content);
        }
    }

    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let config = Config::load();
    let (path, _ingredient) = find_ingredient(&project, &args.id)?;

    if !global.quiet {
        println!(
            "Opening {} in {}...",
            style(path.display()).cyan(),
            style(config.editor()).yellow()
        );
    }

    config.run_editor(&path).into_diagnostic()?;

    Ok(())
}

/// Resolve a short ID or partial ID to an ingredient file and record
pub fn find_ingredient(
    project: &Project,
    reference: &str,
) -> Result<(std::path::PathBuf, Ingredient)> {
    let short_ids = ShortIdIndex::load(project);
    let resolved_id = short_ids
        .resolve(reference)
        .unwrap_or_else(|| reference.to_string());

    let ing_dir = project
        .root()
        .join(Project::entity_directory(EntityPrefix::Ing));
    loader::load_entity::<Ingredient>(&ing_dir, &resolved_id)?
        .ok_or_else(|| miette::miette!("No ingredient found matching '{}'", reference))
}
