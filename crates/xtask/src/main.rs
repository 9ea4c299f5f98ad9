use std::collections::BTreeMap;

use anyhow::Context;
use serde::Deserialize;

/// Workspace crates each crate may depend on. Anything not listed here is
/// outside the layering and ignored.
const LAYERS: &[(&str, &[&str])] = &[
    ("wolfpack-domain", &[]),
    ("wolfpack-shared", &[]),
    ("wolfpack-player", &["wolfpack-domain", "wolfpack-shared"]),
    ("xtask", &[]),
];

/// Runtime and network crates that must stay out of the vocabulary crates.
const IO_CRATES: &[&str] = &["tokio", "reqwest", "tokio-tungstenite", "dashmap"];
const PURE_CRATES: &[&str] = &["wolfpack-domain", "wolfpack-shared"];

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
    #[serde(default)]
    kind: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;
    let violations = check_layers(&metadata);
    if !violations.is_empty() {
        for v in &violations {
            eprintln!("arch-check: {v}");
        }
        anyhow::bail!("{} layering violation(s)", violations.len());
    }

    println!("arch-check: ok ({} crates)", metadata.packages.len());
    Ok(())
}

fn check_layers(metadata: &Metadata) -> Vec<String> {
    let allowed: BTreeMap<&str, &[&str]> = LAYERS.iter().copied().collect();
    let mut violations = Vec::new();

    for package in &metadata.packages {
        let Some(permitted) = allowed.get(package.name.as_str()) else {
            violations.push(format!("{} is not part of the layering", package.name));
            continue;
        };

        // Tests may pull in anything.
        let normal = package
            .dependencies
            .iter()
            .filter(|d| d.kind.as_deref() != Some("dev"));

        for dep in normal {
            let internal = allowed.contains_key(dep.name.as_str());
            if internal && !permitted.contains(&dep.name.as_str()) {
                violations.push(format!("{} must not depend on {}", package.name, dep.name));
            }
            if PURE_CRATES.contains(&package.name.as_str()) && IO_CRATES.contains(&dep.name.as_str())
            {
                violations.push(format!(
                    "{} must stay free of runtime crates, found {}",
                    package.name, dep.name
                ));
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(json: &str) -> Metadata {
        serde_json::from_str(json).expect("metadata json")
    }

    #[test]
    fn current_layering_passes() {
        let m = metadata(
            r#"{"packages":[
                {"name":"wolfpack-domain","dependencies":[{"name":"serde","kind":null}]},
                {"name":"wolfpack-shared","dependencies":[{"name":"serde_json","kind":null}]},
                {"name":"wolfpack-player","dependencies":[
                    {"name":"wolfpack-domain","kind":null},
                    {"name":"wolfpack-shared","kind":null},
                    {"name":"tokio","kind":null}
                ]}
            ]}"#,
        );
        assert!(check_layers(&m).is_empty());
    }

    #[test]
    fn upward_and_runtime_dependencies_are_flagged() {
        let m = metadata(
            r#"{"packages":[
                {"name":"wolfpack-domain","dependencies":[
                    {"name":"wolfpack-player","kind":null},
                    {"name":"tokio","kind":null},
                    {"name":"tokio","kind":"dev"}
                ]}
            ]}"#,
        );
        let violations = check_layers(&m);
        assert_eq!(violations.len(), 2);
        assert!(violations[0].contains("wolfpack-player"));
    }
}
