//! Integration tests for the Brigade CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a brigade command
fn brigade() -> Command {
    Command::cargo_bin("brigade").unwrap()
}

/// Helper to create a test project in a temp directory
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    brigade()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success();
    tmp
}

/// Extract the first full entity ID with the given prefix from command output
fn extract_id(stdout: &str, prefix: &str) -> String {
    stdout
        .lines()
        .find_map(|l| l.find(prefix).map(|pos| &l[pos..]))
        .map(|s| s.chars().take(prefix.len() + 26).collect())
        .unwrap_or_default()
}

/// Helper to create a priced ingredient, returning its full ID
fn create_test_ingredient(tmp: &TempDir, name: &str, base_price: &str, waste: &str) -> String {
    let output = brigade()
        .current_dir(tmp.path())
        .args([
            "ing",
            "new",
            "--name",
            name,
            "--base-price",
            base_price,
            "--waste-percent",
            waste,
            "--no-edit",
        ])
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    extract_id(&stdout, "ING-")
}

/// Helper to create a recipe, returning its full ID
fn create_test_recipe(tmp: &TempDir, title: &str, servings: &str) -> String {
    let output = brigade()
        .current_dir(tmp.path())
        .args([
            "recipe",
            "new",
            "--title",
            title,
            "--servings",
            servings,
            "--no-edit",
        ])
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    extract_id(&stdout, "RCP-")
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    brigade()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("restaurant back-office"));
}

#[test]
fn test_version_displays() {
    brigade()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("brigade"));
}

#[test]
fn test_unknown_command_fails() {
    brigade()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_completions_generate() {
    brigade()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("brigade"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_project_structure() {
    let tmp = TempDir::new().unwrap();

    brigade()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(tmp.path().join(".brigade").exists());
    assert!(tmp.path().join(".brigade/config.yaml").exists());
    assert!(tmp.path().join("pantry/ingredients").is_dir());
    assert!(tmp.path().join("recipes").is_dir());
}

#[test]
fn test_init_warns_if_project_exists() {
    let tmp = setup_test_project();

    brigade()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_overwrites() {
    let tmp = setup_test_project();

    brigade()
        .current_dir(tmp.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

// ============================================================================
// Ingredient Command Tests
// ============================================================================

#[test]
fn test_ing_new_creates_file() {
    let tmp = setup_test_project();

    brigade()
        .current_dir(tmp.path())
        .args([
            "ing",
            "new",
            "--name",
            "Tomato",
            "--base-price",
            "3.50",
            "--no-edit",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created ingredient"));

    let files: Vec<_> = fs::read_dir(tmp.path().join("pantry/ingredients"))
        .unwrap()
        .collect();
    assert_eq!(files.len(), 1);
}

#[test]
fn test_ing_new_reports_effective_cost() {
    let tmp = setup_test_project();

    // 10.00 with 5% waste -> effective 10.50
    brigade()
        .current_dir(tmp.path())
        .args([
            "ing",
            "new",
            "--name",
            "Beef",
            "--base-price",
            "10.0",
            "--waste-percent",
            "0.05",
            "--no-edit",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("10.50"));
}

#[test]
fn test_ing_list_shows_created() {
    let tmp = setup_test_project();
    create_test_ingredient(&tmp, "Tomato", "3.50", "0");
    create_test_ingredient(&tmp, "Onion", "1.20", "0.1");

    brigade()
        .current_dir(tmp.path())
        .args(["ing", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tomato"))
        .stdout(predicate::str::contains("Onion"));
}

#[test]
fn test_ing_list_count() {
    let tmp = setup_test_project();
    create_test_ingredient(&tmp, "Tomato", "3.50", "0");
    create_test_ingredient(&tmp, "Onion", "1.20", "0");

    brigade()
        .current_dir(tmp.path())
        .args(["ing", "list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2"));
}

#[test]
fn test_ing_list_search_filter() {
    let tmp = setup_test_project();
    create_test_ingredient(&tmp, "Tomato", "3.50", "0");
    create_test_ingredient(&tmp, "Onion", "1.20", "0");

    brigade()
        .current_dir(tmp.path())
        .args(["ing", "list", "--search", "toma"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tomato"))
        .stdout(predicate::str::contains("Onion").not());
}

#[test]
fn test_ing_list_csv_format() {
    let tmp = setup_test_project();
    create_test_ingredient(&tmp, "Tomato", "3.50", "0");

    brigade()
        .current_dir(tmp.path())
        .args(["ing", "list", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "short_id,id,name,unit,base_price",
        ));
}

#[test]
fn test_ing_show_by_full_id() {
    let tmp = setup_test_project();
    let id = create_test_ingredient(&tmp, "Tomato", "3.50", "0.05");
    assert!(!id.is_empty());

    brigade()
        .current_dir(tmp.path())
        .args(["ing", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tomato"))
        .stdout(predicate::str::contains("waste_percent"));
}

#[test]
fn test_ing_show_by_short_id() {
    let tmp = setup_test_project();
    create_test_ingredient(&tmp, "Tomato", "3.50", "0");

    brigade()
        .current_dir(tmp.path())
        .args(["ing", "show", "@1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tomato"));
}

#[test]
fn test_ing_show_missing_fails() {
    let tmp = setup_test_project();

    brigade()
        .current_dir(tmp.path())
        .args(["ing", "show", "@99"])
        .assert()
        .failure();
}

// ============================================================================
// Recipe Command Tests
// ============================================================================

#[test]
fn test_recipe_new_creates_file() {
    let tmp = setup_test_project();

    brigade()
        .current_dir(tmp.path())
        .args([
            "recipe",
            "new",
            "--title",
            "Bolognese",
            "--servings",
            "4",
            "--no-edit",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created recipe"));

    let files: Vec<_> = fs::read_dir(tmp.path().join("recipes")).unwrap().collect();
    assert_eq!(files.len(), 1);
}

#[test]
fn test_recipe_list_shows_created() {
    let tmp = setup_test_project();
    create_test_recipe(&tmp, "Bolognese", "4");
    create_test_recipe(&tmp, "Tomato Sauce", "8");

    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bolognese"))
        .stdout(predicate::str::contains("Tomato Sauce"));
}

#[test]
fn test_recipe_add_copies_priced_fields() {
    let tmp = setup_test_project();
    let ing_id = create_test_ingredient(&tmp, "Beef", "10.0", "0.05");
    let rcp_id = create_test_recipe(&tmp, "Bolognese", "4");

    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "add", &rcp_id, &ing_id, "--qty", "0.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added"));

    // The recipe file carries its own copies of the pricing fields
    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "show", &rcp_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("base_price: 10.0"))
        .stdout(predicate::str::contains("waste_percent: 0.05"))
        .stdout(predicate::str::contains("quantity_per_serving: 0.1"));
}

#[test]
fn test_recipe_add_duplicate_skipped() {
    let tmp = setup_test_project();
    let ing_id = create_test_ingredient(&tmp, "Beef", "10.0", "0");
    let rcp_id = create_test_recipe(&tmp, "Bolognese", "4");

    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "add", &rcp_id, &ing_id, "--qty", "0.1"])
        .assert()
        .success();

    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "add", &rcp_id, &ing_id, "--qty", "0.2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already in recipe"));
}

#[test]
fn test_recipe_use_links_subrecipe() {
    let tmp = setup_test_project();
    let parent = create_test_recipe(&tmp, "Bolognese", "4");
    let child = create_test_recipe(&tmp, "Tomato Sauce", "8");

    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "use", &parent, &child, "--qty", "0.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("now uses"));

    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "show", &parent])
        .assert()
        .success()
        .stdout(predicate::str::contains(&child));
}

#[test]
fn test_recipe_use_self_rejected() {
    let tmp = setup_test_project();
    let rcp_id = create_test_recipe(&tmp, "Bolognese", "4");

    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "use", &rcp_id, &rcp_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("itself"));
}

#[test]
fn test_recipe_use_cycle_rejected() {
    let tmp = setup_test_project();
    let a = create_test_recipe(&tmp, "Bolognese", "4");
    let b = create_test_recipe(&tmp, "Tomato Sauce", "8");

    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "use", &a, &b])
        .assert()
        .success();

    // Closing the loop must fail before anything is written
    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "use", &b, &a])
        .assert()
        .failure()
        .stderr(predicate::str::contains("circular"));

    // The rejected link must not be on disk
    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "show", &b])
        .assert()
        .success()
        .stdout(predicate::str::contains(&a).not());
}

#[test]
fn test_recipe_set_net_price_syncs_per_serving() {
    let tmp = setup_test_project();
    let rcp_id = create_test_recipe(&tmp, "Bolognese", "4");

    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "set", &rcp_id, "--net-price", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("net price: 20.00"))
        .stdout(predicate::str::contains("per serving: 5.00"));
}

#[test]
fn test_recipe_set_price_per_serving_syncs_net() {
    let tmp = setup_test_project();
    let rcp_id = create_test_recipe(&tmp, "Bolognese", "4");

    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "set", &rcp_id, "--price-per-serving", "5.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("net price: 22.00"));
}

#[test]
fn test_recipe_set_servings_scales_confirmed_price() {
    let tmp = setup_test_project();
    let rcp_id = create_test_recipe(&tmp, "Bolognese", "4");

    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "set", &rcp_id, "--net-price", "20"])
        .assert()
        .success();

    // Per-serving price is confirmed, so doubling servings doubles net price
    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "set", &rcp_id, "--servings", "8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("servings: 8"))
        .stdout(predicate::str::contains("net price: 40.00"));
}

#[test]
fn test_recipe_set_servings_without_price_leaves_net() {
    let tmp = setup_test_project();
    let rcp_id = create_test_recipe(&tmp, "Bolognese", "4");

    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "set", &rcp_id, "--servings", "6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("net price: 0.00"))
        .stdout(predicate::str::contains("No price set yet"));
}

#[test]
fn test_recipe_set_servings_clamped_to_one() {
    let tmp = setup_test_project();
    let rcp_id = create_test_recipe(&tmp, "Bolognese", "4");

    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "set", &rcp_id, "--servings", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("servings: 1"));
}

#[test]
fn test_recipe_set_requires_exactly_one_field() {
    let tmp = setup_test_project();
    let rcp_id = create_test_recipe(&tmp, "Bolognese", "4");

    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "set", &rcp_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to set"));

    brigade()
        .current_dir(tmp.path())
        .args([
            "recipe",
            "set",
            &rcp_id,
            "--servings",
            "4",
            "--net-price",
            "20",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exactly one"));
}

// ============================================================================
// Cost Command Tests
// ============================================================================

/// Build the standard costed recipe: 0.1 kg/serving of a 10.00/kg ingredient
/// with 5% waste, 4 servings. Total cost 4.20, cost per serving 1.05.
fn setup_costed_recipe(tmp: &TempDir) -> String {
    let ing_id = create_test_ingredient(tmp, "Beef", "10.0", "0.05");
    let rcp_id = create_test_recipe(tmp, "Bolognese", "4");

    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "add", &rcp_id, &ing_id, "--qty", "0.1"])
        .assert()
        .success();

    rcp_id
}

#[test]
fn test_cost_reports_totals() {
    let tmp = setup_test_project();
    let rcp_id = setup_costed_recipe(&tmp);

    brigade()
        .current_dir(tmp.path())
        .args(["cost", &rcp_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("4.20"))
        .stdout(predicate::str::contains("1.05"));
}

#[test]
fn test_cost_reports_margin_when_priced() {
    let tmp = setup_test_project();
    let rcp_id = setup_costed_recipe(&tmp);

    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "set", &rcp_id, "--net-price", "20"])
        .assert()
        .success();

    brigade()
        .current_dir(tmp.path())
        .args(["cost", &rcp_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("15.80"))
        .stdout(predicate::str::contains("79.0%"))
        .stdout(predicate::str::contains("21.0%"));
}

#[test]
fn test_cost_suggested_price_default_target() {
    let tmp = setup_test_project();
    let rcp_id = setup_costed_recipe(&tmp);

    // 1.05 per serving at a 30% food-cost target -> 3.50
    brigade()
        .current_dir(tmp.path())
        .args(["cost", &rcp_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("3.50"))
        .stdout(predicate::str::contains("30%"));
}

#[test]
fn test_cost_target_override() {
    let tmp = setup_test_project();
    let rcp_id = setup_costed_recipe(&tmp);

    // 1.05 per serving at a 25% target -> 4.20
    brigade()
        .current_dir(tmp.path())
        .args(["cost", &rcp_id, "--target", "25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4.20"))
        .stdout(predicate::str::contains("25%"));
}

#[test]
fn test_cost_includes_subrecipes() {
    let tmp = setup_test_project();
    let parent_id = setup_costed_recipe(&tmp);

    let ing_id = create_test_ingredient(&tmp, "Tomato", "2.0", "0");
    let child_id = create_test_recipe(&tmp, "Tomato Sauce", "8");
    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "add", &child_id, &ing_id, "--qty", "0.5"])
        .assert()
        .success();

    // Child: 0.5 * 2.00 = 1.00 per serving. Parent uses 1 child serving per
    // serving, adding 1.00 on top of its own 1.05.
    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "use", &parent_id, &child_id, "--qty", "1"])
        .assert()
        .success();

    brigade()
        .current_dir(tmp.path())
        .args(["cost", &parent_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("2.05"));
}

#[test]
fn test_cost_json_format() {
    let tmp = setup_test_project();
    let rcp_id = setup_costed_recipe(&tmp);

    brigade()
        .current_dir(tmp.path())
        .args(["cost", &rcp_id, "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_cost\""))
        .stdout(predicate::str::contains("\"suggested_price\""));
}

#[test]
fn test_cost_line_breakdown() {
    let tmp = setup_test_project();
    let rcp_id = setup_costed_recipe(&tmp);

    brigade()
        .current_dir(tmp.path())
        .args(["cost", &rcp_id, "--lines"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Beef"));
}

#[test]
fn test_cost_line_breakdown_subrecipes_only() {
    let tmp = setup_test_project();
    let ing_id = create_test_ingredient(&tmp, "Tomato", "2.0", "0");
    let child_id = create_test_recipe(&tmp, "Tomato Sauce", "8");
    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "add", &child_id, &ing_id, "--qty", "0.5"])
        .assert()
        .success();

    // The parent has no ingredient lines of its own
    let parent_id = create_test_recipe(&tmp, "Pasta al Pomodoro", "4");
    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "use", &parent_id, &child_id, "--qty", "1"])
        .assert()
        .success();

    brigade()
        .current_dir(tmp.path())
        .args(["cost", &parent_id, "--lines"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sub-recipes"))
        .stdout(predicate::str::contains("Tomato Sauce"));
}

#[test]
fn test_cost_cyclic_files_on_disk_rejected() {
    let tmp = setup_test_project();
    let a = create_test_recipe(&tmp, "Bolognese", "4");
    let b = create_test_recipe(&tmp, "Tomato Sauce", "8");

    brigade()
        .current_dir(tmp.path())
        .args(["recipe", "use", &a, &b])
        .assert()
        .success();

    // Hand-edit B's file to close the loop, bypassing the pre-flight check
    let b_path = fs::read_dir(tmp.path().join("recipes"))
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| p.to_string_lossy().contains(&b))
        .unwrap();
    let content = fs::read_to_string(&b_path).unwrap();
    let content = content.replace(
        "subrecipe_lines: []",
        &format!("subrecipe_lines:\n- recipe: {}\n  quantity_per_serving: 1.0", a),
    );
    fs::write(&b_path, content).unwrap();

    brigade()
        .current_dir(tmp.path())
        .args(["cost", &a])
        .assert()
        .failure()
        .stderr(predicate::str::contains("circular sub-recipe reference"));
}

#[test]
fn test_cost_missing_recipe_fails() {
    let tmp = setup_test_project();

    brigade()
        .current_dir(tmp.path())
        .args(["cost", "@42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No recipe found"));
}

#[test]
fn test_cost_outside_project_fails() {
    let tmp = TempDir::new().unwrap();

    brigade()
        .current_dir(tmp.path())
        .args(["cost", "@1"])
        .assert()
        .failure();
}

// ============================================================================
// Global Option Tests
// ============================================================================

#[test]
fn test_project_flag_points_at_project_root() {
    let project = setup_test_project();
    create_test_ingredient(&project, "Tomato", "3.50", "0");

    // Run from an unrelated directory, pointing --project at the real root
    let elsewhere = TempDir::new().unwrap();
    let project_path = project.path().to_string_lossy().to_string();

    brigade()
        .current_dir(elsewhere.path())
        .args(["--project", &project_path, "ing", "list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1"));

    brigade()
        .current_dir(elsewhere.path())
        .args(["ing", "list", "--count"])
        .assert()
        .failure();
}

#[test]
fn test_quiet_suppresses_list_footer() {
    let tmp = setup_test_project();
    create_test_ingredient(&tmp, "Tomato", "3.50", "0");

    brigade()
        .current_dir(tmp.path())
        .args(["ing", "list", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tomato"))
        .stdout(predicate::str::contains("short ID").not());
}

#[test]
fn test_verbose_list_shows_full_ids() {
    let tmp = setup_test_project();
    let id = create_test_ingredient(&tmp, "Tomato", "3.50", "0");
    assert!(!id.is_empty());

    brigade()
        .current_dir(tmp.path())
        .args(["ing", "list", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains(&id));

    brigade()
        .current_dir(tmp.path())
        .args(["ing", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(&id).not());
}

// ============================================================================
// Forgiving Input Tests
// ============================================================================

#[test]
fn test_cost_tolerates_malformed_numeric_fields() {
    let tmp = setup_test_project();
    let rcp_id = setup_costed_recipe(&tmp);

    // Simulate a hand-edited file with a quoted price and garbage waste
    let recipe_dir = tmp.path().join("recipes");
    let entry = fs::read_dir(&recipe_dir).unwrap().next().unwrap().unwrap();
    let content = fs::read_to_string(entry.path()).unwrap();
    let content = content
        .replace("base_price: 10.0", "base_price: '10.0'")
        .replace("waste_percent: 0.05", "waste_percent: lots");
    fs::write(entry.path(), content).unwrap();

    // Quoted number parses, garbage coerces to 0: 0.1 * 4 * 10 = 4.00
    brigade()
        .current_dir(tmp.path())
        .args(["cost", &rcp_id])
        .assert()
        .success()
        .stdout(predicate::str::contains("4.00"));
}
