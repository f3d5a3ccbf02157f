//! Multi-file composition: includes, include graphs and cross-file
//! resolution, driven through real files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use ctlspec::{Formula, ParseError, parse, parse_file};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn include_line(path: &Path) -> String {
    format!("#include \"{}\"", path.display())
}

#[test]
fn test_simple_resolve_in_include() {
    let dir = TempDir::new().unwrap();
    let included = write(&dir, "values.ctl", "v = False");

    let result = parse(&format!("k = !v\n{}", include_line(&included))).unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result["v"], Formula::False);
    assert_eq!(result["k"], Formula::not(Formula::False));
}

#[test]
fn test_transitive_resolve_across_files() {
    let dir = TempDir::new().unwrap();
    let a = write(&dir, "a.ctl", "k = True");
    let b = write(&dir, "b.ctl", "l = EF k");

    let result = parse(&format!(
        "m = !l\n{}\n{}",
        include_line(&a),
        include_line(&b)
    ))
    .unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(result["k"], Formula::True);
    assert_eq!(result["l"], Formula::ef(Formula::True));
    assert_eq!(result["m"], Formula::not(Formula::ef(Formula::True)));
}

#[test]
fn test_duplicate_declaration_across_files() {
    let dir = TempDir::new().unwrap();
    let included = write(&dir, "dup.ctl", "k = True");

    let err = parse(&format!("{}\nk = False", include_line(&included))).unwrap_err();

    assert!(matches!(
        err,
        ParseError::DuplicateDefinition { ref name, ref first, ref second }
            if name == "k" && first != second
    ));
}

#[test]
fn test_diamond_include_is_composed_once() {
    // root → a → shared, root → b → shared: shared's assignments must
    // appear once, not conflict with themselves.
    let dir = TempDir::new().unwrap();
    let shared = write(&dir, "shared.ctl", "s = True");
    let a = write(
        &dir,
        "a.ctl",
        &format!("{}\na = EF s", include_line(&shared)),
    );
    let b = write(
        &dir,
        "b.ctl",
        &format!("{}\nb = AF s", include_line(&shared)),
    );

    let result = parse(&format!(
        "root = a && b\n{}\n{}",
        include_line(&a),
        include_line(&b)
    ))
    .unwrap();

    assert_eq!(result.len(), 4);
    assert_eq!(
        result["root"],
        Formula::and(
            Formula::ef(Formula::True),
            Formula::af(Formula::True)
        )
    );
}

#[test]
fn test_self_include_terminates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("selfish.ctl");
    fs::write(&path, format!("{}\nk = True", include_line(&path))).unwrap();

    let result = parse_file(&path).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result["k"], Formula::True);
}

#[test]
fn test_mutual_include_terminates() {
    let dir = TempDir::new().unwrap();
    let a_path = dir.path().join("a.ctl");
    let b_path = dir.path().join("b.ctl");
    fs::write(&a_path, format!("{}\nx = True", include_line(&b_path))).unwrap();
    fs::write(&b_path, format!("{}\ny = !x", include_line(&a_path))).unwrap();

    let result = parse_file(&a_path).unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result["y"], Formula::not(Formula::True));
}

#[test]
fn test_nested_include_chain() {
    let dir = TempDir::new().unwrap();
    let inner = write(&dir, "inner.ctl", "base = False");
    let middle = write(
        &dir,
        "middle.ctl",
        &format!("{}\nwrapped = EX base", include_line(&inner)),
    );

    let result = parse(&format!("top = !wrapped\n{}", include_line(&middle))).unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(result["top"], Formula::not(Formula::ex(Formula::False)));
}

#[test]
fn test_missing_include_file() {
    let err = parse("#include \"/nonexistent/missing.ctl\"").unwrap_err();
    assert!(matches!(err, ParseError::Io { .. }));
}
