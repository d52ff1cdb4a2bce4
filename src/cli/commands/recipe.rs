//! `brigade recipe` command - Recipe management
//!
//! Covers the file-level CRUD (list/new/show/edit) plus the three domain
//! verbs: `add` copies priced fields from an ingredient into a recipe line,
//! `use` links another recipe as a component (with a pre-flight cycle
//! check), and `set` routes a single pricing-field edit through the
//! synchronization reducer before persisting.

use chrono::{Duration, Utc};
use clap::{Subcommand, ValueEnum};
use console::style;
use dialoguer::Input;
use miette::{IntoDiagnostic, Result};
use std::fs;

use crate::cli::commands::ing::find_ingredient;
use crate::cli::helpers::{escape_csv, open_project, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::Status;
use crate::core::identity::EntityPrefix;
use crate::core::loader::{self, LoadedRecipes};
use crate::core::project::Project;
use crate::core::shortid::ShortIdIndex;
use crate::core::Config;
use crate::costing::{apply_field_edit, resolve_recipe_cost, Edit, PricingState};
use crate::entities::{IngredientLine, Recipe, SubrecipeLine};

#[derive(Subcommand, Debug)]
pub enum RecipeCommands {
    /// List recipes with filtering
    List(ListArgs),

    /// Create a new recipe
    New(NewArgs),

    /// Show a recipe's details
    Show(ShowArgs),

    /// Edit a recipe in your editor
    Edit(EditArgs),

    /// Add ingredient(s) to a recipe, copying their priced fields
    Add(AddArgs),

    /// Use another recipe as a component (sub-recipe)
    Use(UseArgs),

    /// Set servings, per-serving price, or net price (kept consistent)
    Set(SetArgs),
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

    /// Search in title
    #[arg(long)]
    pub search: Option<String>,

    /// Filter by author
    #[arg(long, short = 'a')]
    pub author: Option<String>,

    /// Show only recipes created in the last N days
    #[arg(long)]
    pub recent: Option<u32>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Recipe title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Diners the listed price covers
    #[arg(long, default_value = "4")]
    pub servings: f64,

    /// Minimum batch size
    #[arg(long)]
    pub production_servings: Option<f64>,

    /// Total sale price for all servings
    #[arg(long)]
    pub net_price: Option<f64>,

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
    /// Recipe ID or short ID (RCP@N)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Recipe ID or short ID (RCP@N)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Recipe ID or short ID (RCP@N)
    pub recipe: String,

    /// Ingredients to add (ID or short ID ING@N)
    #[arg(required = true)]
    pub ingredients: Vec<String>,

    /// Quantity used per serving, in the ingredient's unit
    #[arg(long, default_value = "0")]
    pub qty: f64,

    /// Recipe section (garnish, sauce, ...)
    #[arg(long)]
    pub section: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct UseArgs {
    /// Parent recipe ID or short ID (RCP@N)
    pub recipe: String,

    /// Child recipe to use as a component
    pub child: String,

    /// Child servings consumed per parent serving
    #[arg(long, default_value = "1")]
    pub qty: f64,

    /// Free-form preparation notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Recipe ID or short ID (RCP@N)
    pub id: String,

    /// New diner count (net price follows if a price was ever set)
    #[arg(long)]
    pub servings: Option<f64>,

    /// New per-serving price (net price follows)
    #[arg(long)]
    pub price_per_serving: Option<f64>,

    /// New total price (per-serving price follows)
    #[arg(long)]
    pub net_price: Option<f64>,
}

/// Run a recipe subcommand
pub fn run(cmd: RecipeCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        RecipeCommands::List(args) => run_list(args, global),
        RecipeCommands::New(args) => run_new(args, global),
        RecipeCommands::Show(args) => run_show(args, global),
        RecipeCommands::Edit(args) => run_edit(args, global),
        RecipeCommands::Add(args) => run_add(args, global),
        RecipeCommands::Use(args) => run_use(args, global),
        RecipeCommands::Set(args) => run_set(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let recipe_dir = project
        .root()
        .join(Project::entity_directory(EntityPrefix::Rcp));

    let recipes: Vec<Recipe> = loader::load_all(&recipe_dir)?;

    let mut recipes: Vec<Recipe> = recipes
        .into_iter()
        .filter(|r| match args.status {
            StatusFilter::Draft => r.status == Status::Draft,
            StatusFilter::Active => r.status == Status::Active,
            StatusFilter::Archived => r.status == Status::Archived,
            StatusFilter::All => true,
        })
        .filter(|r| {
            if let Some(ref search) = args.search {
                let search_lower = search.to_lowercase();
                r.title.to_lowercase().contains(&search_lower)
                    || r.description
                        .as_ref()
                        .map_or(false, |d| d.to_lowercase().contains(&search_lower))
            } else {
                true
            }
        })
        .filter(|r| {
            if let Some(ref author_filter) = args.author {
                r.author
                    .to_lowercase()
                    .contains(&author_filter.to_lowercase())
            } else {
                true
            }
        })
        .filter(|r| {
            if let Some(days) = args.recent {
                let cutoff = Utc::now() - Duration::days(days as i64);
                r.created >= cutoff
            } else {
                true
            }
        })
        .collect();

    recipes.sort_by(|a, b| a.id.to_string().cmp(&b.id.to_string()));

    if let Some(limit) = args.limit {
        recipes.truncate(limit);
    }

    if args.count {
        println!("{}", recipes.len());
        return Ok(());
    }

    if recipes.is_empty() {
        println!("No recipes found.");
        return Ok(());
    }

    let mut short_ids = ShortIdIndex::load(&project);
    short_ids.ensure_all(recipes.iter().map(|r| r.id.to_string()));
    let _ = short_ids.save(&project);

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&recipes).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&recipes).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("short_id,id,title,servings,net_price,price_per_serving,lines,status");
            for r in &recipes {
                let short_id = short_ids
                    .get_short_id(&r.id.to_string())
                    .map(|n| n.to_string())
                    .unwrap_or_default();
                println!(
                    "{},{},{},{:.0},{:.2},{:.2},{},{}",
                    short_id,
                    r.id,
                    escape_csv(&r.title),
                    r.servings,
                    r.net_price,
                    r.price_per_serving(),
                    r.line_count(),
                    r.status
                );
            }
        }
        OutputFormat::Id => {
            for r in &recipes {
                println!("{}", r.id);
            }
        }
        OutputFormat::Md => {
            println!("| Short | Title | Servings | Net | Per serving | Lines | Status |");
            println!("|---|---|---|---|---|---|---|");
            for r in &recipes {
                let short_id = short_ids
                    .get_short_id(&r.id.to_string())
                    .map(|n| format!("@{}", n))
                    .unwrap_or_default();
                println!(
                    "| {} | {} | {:.0} | {:.2} | {:.2} | {} | {} |",
                    short_id,
                    r.title,
                    r.servings,
                    r.net_price,
                    r.price_per_serving(),
                    r.line_count(),
                    r.status
                );
            }
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            println!(
                "{:<8} {:<26} {:>8} {:>9} {:>11} {:>5} {:<9}",
                style("SHORT").bold(),
                style("TITLE").bold(),
                style("SERVES").bold(),
                style("NET").bold(),
                style("PER SRV").bold(),
                style("LINES").bold(),
                style("STATUS").bold()
            );
            println!("{}", "-".repeat(82));

            for r in &recipes {
                let short_id = short_ids
                    .get_short_id(&r.id.to_string())
                    .map(|n| format!("@{}", n))
                    .unwrap_or_default();
                print!(
                    "{:<8} {:<26} {:>8.0} {:>9.2} {:>11.2} {:>5} {:<9}",
                    style(short_id).cyan(),
                    truncate_str(&r.title, 24),
                    r.servings,
                    r.net_price,
                    r.price_per_serving(),
                    r.line_count(),
                    r.status
                );
                if global.verbose {
                    print!(" {}", style(&r.id).dim());
                }
                println!();
            }

            if !global.quiet {
                println!();
                println!(
                    "{} recipe(s) found. Use {} to reference by short ID.",
                    style(recipes.len()).cyan(),
                    style("RCP@N").cyan()
                );
            }
        }
    }

    Ok(())
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let config = Config::load();

    let title: String;
    let servings: f64;

    if args.interactive {
        title = Input::new()
            .with_prompt("Recipe title")
            .interact_text()
            .into_diagnostic()?;
        let serves: String = Input::new()
            .with_prompt("Servings")
            .default("4".to_string())
            .interact_text()
            .into_diagnostic()?;
        servings = serves.trim().parse().unwrap_or(4.0);
    } else {
        title = args.title.unwrap_or_else(|| "New Recipe".to_string());
        servings = args.servings;
    }

    let mut recipe = Recipe::new(title, servings, config.author());
    if let Some(production) = args.production_servings {
        // Batch size can never exceed the priced serving count
        recipe.production_servings = production.max(1.0).min(recipe.servings);
    }
    if let Some(net_price) = args.net_price {
        recipe.net_price = net_price.max(0.0);
    }

    let file_path = project.entity_path(EntityPrefix::Rcp, &recipe.id);
    if let Some(parent) = file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).into_diagnostic()?;
        }
    }

    let yaml_content = serde_yml::to_string(&recipe).into_diagnostic()?;
    fs::write(&file_path, &yaml_content).into_diagnostic()?;

    let mut short_ids = ShortIdIndex::load(&project);
    let short_id = short_ids.add(recipe.id.to_string());
    let _ = short_ids.save(&project);

    println!(
        "{} Created recipe {} ({})",
        style("✓").green(),
        style(&recipe.title).cyan(),
        style(format!("@{}", short_id)).cyan()
    );
    if !global.quiet {
        println!("   {}", style(file_path.display()).dim());
        println!(
            "   {} servings at net price {:.2}",
            recipe.servings, recipe.net_price
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
    let (path, _recipe) = find_recipe(&project, &args.id)?;

    let content = fs::read_to_string(&path).into_diagnostic()?;

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Yaml,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            let recipe: Recipe = serde_yml::from_str(&content).into_diagnostic()?;
            let json = serde_json::to_string_pretty(&recipe).into_diagnostic()?;
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
    let (path, _recipe) = find_recipe(&project, &args.id)?;

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

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (recipe_path, mut recipe) = find_recipe(&project, &args.recipe)?;

    let mut added_count = 0;

    for ing_ref in &args.ingredients {
        let (_, ingredient) = find_ingredient(&project, ing_ref)?;

        let already_exists = recipe
            .ingredient_lines
            .iter()
            .any(|l| l.ingredient == ingredient.id);

        if already_exists {
            println!(
                "{} Ingredient {} already in recipe, skipping",
                style("!").yellow(),
                style(&ingredient.name).cyan()
            );
            continue;
        }

        // Copy the priced fields so the recipe file is self-contained
        let line = IngredientLine {
            ingredient: ingredient.id.clone(),
            name: Some(ingredient.name.clone()),
            quantity_per_serving: args.qty,
            unit: ingredient.unit.clone(),
            base_price: ingredient.base_price,
            waste_percent: ingredient.waste_percent,
            section: args.section.clone(),
        };

        println!(
            "{} Added {} ({} {}/serving at {:.2}, {:.0}% waste)",
            style("✓").green(),
            style(&ingredient.name).cyan(),
            args.qty,
            ingredient.unit,
            ingredient.base_price,
            ingredient.waste_percent * 100.0
        );

        recipe.add_ingredient_line(line);
        added_count += 1;
    }

    if added_count == 0 {
        println!("No ingredients added.");
        return Ok(());
    }

    let yaml_content = serde_yml::to_string(&recipe).into_diagnostic()?;
    fs::write(&recipe_path, &yaml_content).into_diagnostic()?;

    if !global.quiet {
        println!();
        println!(
            "{} Added {} line(s) to recipe {}",
            style("✓").green(),
            added_count,
            style(&recipe.title).cyan()
        );
    }

    Ok(())
}

fn run_use(args: UseArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (recipe_path, mut recipe) = find_recipe(&project, &args.recipe)?;
    let (_, child) = find_recipe(&project, &args.child)?;

    if recipe.id == child.id {
        return Err(miette::miette!(
            "Recipe {} cannot use itself as a component",
            recipe.title
        ));
    }

    if recipe.references(&child.id) {
        println!(
            "{} Recipe {} already uses {}, skipping",
            style("!").yellow(),
            style(&recipe.title).cyan(),
            style(&child.title).cyan()
        );
        return Ok(());
    }

    recipe.add_subrecipe_line(SubrecipeLine {
        recipe: child.id.clone(),
        name: Some(child.title.clone()),
        quantity_per_serving: args.qty,
        notes: args.notes.clone(),
    });

    // Pre-flight: resolving the modified parent against the project snapshot
    // catches any cycle the new link would close, before anything is written.
    let loaded = LoadedRecipes::load(&project)?;
    let mut recipes: Vec<Recipe> = loaded
        .iter()
        .filter(|r| r.id != recipe.id)
        .cloned()
        .collect();
    recipes.push(recipe.clone());
    let snapshot = LoadedRecipes::from_recipes(recipes);

    if let Err(e) = resolve_recipe_cost(&recipe, &snapshot) {
        return Err(miette::miette!("{}", e));
    }

    let yaml_content = serde_yml::to_string(&recipe).into_diagnostic()?;
    fs::write(&recipe_path, &yaml_content).into_diagnostic()?;

    println!(
        "{} Recipe {} now uses {} ({} serving(s) per serving)",
        style("✓").green(),
        style(&recipe.title).cyan(),
        style(&child.title).cyan(),
        args.qty
    );

    Ok(())
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let project = open_project(global)?;
    let (recipe_path, mut recipe) = find_recipe(&project, &args.id)?;

    let edits = [
        args.servings.map(Edit::Servings),
        args.price_per_serving.map(Edit::PricePerServing),
        args.net_price.map(Edit::NetPrice),
    ];
    let mut edits = edits.into_iter().flatten();

    let edit = edits.next().ok_or_else(|| {
        miette::miette!(
            "Nothing to set. Use one of --servings, --price-per-serving, --net-price."
        )
    })?;
    if edits.next().is_some() {
        return Err(miette::miette!(
            "Set exactly one of --servings, --price-per-serving, --net-price per edit."
        ));
    }

    let before = PricingState::of_recipe(&recipe);
    let after = apply_field_edit(before, edit);
    after.store(&mut recipe);

    let yaml_content = serde_yml::to_string(&recipe).into_diagnostic()?;
    fs::write(&recipe_path, &yaml_content).into_diagnostic()?;

    println!(
        "{} Updated recipe {}",
        style("✓").green(),
        style(&recipe.title).cyan()
    );
    println!(
        "   servings: {:.0}   net price: {:.2}   per serving: {:.2}",
        recipe.servings,
        recipe.net_price,
        recipe.price_per_serving()
    );
    if !global.quiet {
        if let (Edit::Servings(_), None) = (edit, before.price_per_serving) {
            println!(
                "   {}",
                style("No price set yet; net price left unchanged.").dim()
            );
        }
    }

    Ok(())
}

/// Resolve a short ID or partial ID to a recipe file and record
pub fn find_recipe(project: &Project, reference: &str) -> Result<(std::path::PathBuf, Recipe)> {
    let short_ids = ShortIdIndex::load(project);
    let resolved_id = short_ids
        .resolve(reference)
        .unwrap_or_else(|| reference.to_string());

    let recipe_dir = project
        .root()
        .join(Project::entity_directory(EntityPrefix::Rcp));
    loader::load_entity::<Recipe>(&recipe_dir, &resolved_id)?
        .ok_or_else(|| miette::miette!("No recipe found matching '{}'", reference))
}
