//! Test harness for the recipe parsers against fixture files.
//!
//! Every `test/make/<name>.make` file is parsed with the bracket-path parser
//! and compared with its YAML twin `test/yml/<name>.make.yml`; both must give
//! the same manifest tree. Every `test/nay/<name>.yml` must fail to parse, with
//! an error message containing the text of `test/nay/<name>.error`.

use std::fs;
use std::path::{Path, PathBuf};

use librecipe::{
    encode, parse_make, parse_yaml_with_filename, Format, ManifestFormat, ManifestNode,
};

/// Root test directory.
fn test_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("test")
}

/// Get all files matching a glob pattern below test/, sorted.
fn get_files(pattern: &str) -> Vec<PathBuf> {
    let pattern = test_root().join(pattern);
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .expect("valid glob pattern")
        .flatten()
        .collect();
    files.sort();
    files
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().to_string()
}

/// Parse a .make fixture and compare against its YAML twin.
fn run_make_test(path: &Path) -> Result<(), String> {
    let name = file_name(path);
    let source =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", name, e))?;

    if ManifestFormat::detect(&name) != Some(ManifestFormat::Make) {
        return Err(format!("{}: not routed to the make parser", name));
    }

    let tree = parse_make(&source);
    if tree.is_empty() {
        return Err(format!("{}: no assignments found", name));
    }
    if parse_make(&source) != tree {
        return Err(format!("{}: re-parse differs", name));
    }

    let yml_path = test_root().join("yml").join(format!("{}.yml", name));
    let yml_source = fs::read_to_string(&yml_path)
        .map_err(|e| format!("Failed to read {}: {}", yml_path.display(), e))?;
    let yml_name = file_name(&yml_path);
    let expected = parse_yaml_with_filename(&yml_source, Some(yml_name.as_str()))
        .map_err(|e| format!("{}: {}", yml_name, e))?;

    if tree != expected {
        return Err(format!(
            "{}: Output mismatch\n  Expected: {:?}\n  Actual:   {:?}",
            name, expected, tree
        ));
    }

    // Converting to either format and back must not change the tree.
    for format in [Format::Make, Format::Yaml] {
        let text = encode(&tree, format).map_err(|e| format!("{}: {}", name, e))?;
        let again: ManifestNode = match format {
            Format::Make => parse_make(&text),
            _ => parse_yaml_with_filename(&text, None).map_err(|e| format!("{}: {}", name, e))?,
        };
        if again != tree {
            return Err(format!("{}: {:?} round trip changed the tree", name, format));
        }
    }

    println!("  {} => OK", name);
    Ok(())
}

/// Parse a .yml file that must fail and check the error message.
fn run_nay_test(path: &Path) -> Result<(), String> {
    let name = file_name(path);
    let source =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", name, e))?;
    let error_path = path.with_extension("error");
    let expected = fs::read_to_string(&error_path)
        .map_err(|e| format!("Failed to read {}: {}", error_path.display(), e))?;
    let expected = expected.trim();

    match parse_yaml_with_filename(&source, Some(name.as_str())) {
        Ok(tree) => Err(format!("{}: expected error, got {:?}", name, tree)),
        Err(e) => {
            let message = e.to_string();
            if message.contains(expected) {
                println!("  {} => OK (error: {})", name, message);
                Ok(())
            } else {
                Err(format!(
                    "{}: Error mismatch\n  Expected: {}\n  Actual:   {}",
                    name, expected, message
                ))
            }
        }
    }
}

#[test]
fn test_all_make_fixtures() {
    let files = get_files("make/*.make");
    assert!(!files.is_empty(), "No .make fixtures found!");

    println!("\nRunning {} make fixture tests:", files.len());

    let errors: Vec<String> = files.iter().filter_map(|f| run_make_test(f).err()).collect();
    for error in &errors {
        println!("  - {}", error);
    }
    assert!(errors.is_empty(), "{} make fixture tests failed", errors.len());
}

#[test]
fn test_all_nay_fixtures() {
    let files = get_files("nay/*.yml");
    assert!(!files.is_empty(), "No .yml nay fixtures found!");

    println!("\nRunning {} nay fixture tests:", files.len());

    let errors: Vec<String> = files.iter().filter_map(|f| run_nay_test(f).err()).collect();
    for error in &errors {
        println!("  - {}", error);
    }
    assert!(errors.is_empty(), "{} nay fixture tests failed", errors.len());
}

#[test]
fn test_every_yml_fixture_has_a_make_twin() {
    for yml in get_files("yml/*.make.yml") {
        let stem = yml.file_stem().unwrap().to_string_lossy().to_string();
        assert!(
            test_root().join("make").join(&stem).exists(),
            "{} has no make twin",
            stem
        );
    }
}
