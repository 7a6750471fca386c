//! Output formatting for archlens results.
//!
//! Supports three output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: structured output for programmatic consumption
//! - PlantUML: class diagram text (see [`crate::diagram`])

use colored::*;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::analysis::{AnalysisResult, TypeKind, TypeReport};

// =============================================================================
// Distance gate
// =============================================================================

/// Outcome of checking every type's distance against a threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct GateOutcome {
    pub threshold: Option<f64>,
    /// Types above the threshold with their distance, sorted by name.
    pub offenders: Vec<(String, f64)>,
}

impl GateOutcome {
    pub fn evaluate(result: &AnalysisResult, threshold: Option<f64>) -> Self {
        let offenders = match threshold {
            Some(max) => result
                .types_over_distance(max)
                .into_iter()
                .map(|(name, t)| (name.to_string(), t.metrics.distance))
                .collect(),
            None => Vec::new(),
        };
        Self {
            threshold,
            offenders,
        }
    }

    pub fn passed(&self) -> bool {
        self.offenders.is_empty()
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// Top-level JSON report.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
    pub files_scanned: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<JsonSkipped>,
    pub abstractness: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<f64>,
    pub passed: bool,
    pub types: Vec<JsonType>,
    pub files: Vec<JsonFile>,
}

/// One declared type with its metrics and outgoing relationships.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonType {
    pub name: String,
    pub kind: TypeKind,
    pub file: String,
    pub singleton: bool,
    pub afferent: usize,
    pub efferent: usize,
    pub instability: f64,
    pub distance: f64,
    pub relations: Vec<JsonRelation>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRelation {
    pub kind: String,
    pub target: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonFile {
    pub path: String,
    pub size: usize,
    pub complexity: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonSkipped {
    pub path: String,
    pub reason: String,
}

fn type_to_json(name: &str, t: &TypeReport) -> JsonType {
    JsonType {
        name: name.to_string(),
        kind: t.kind,
        file: t.file.clone(),
        singleton: t.relations.singleton,
        afferent: t.coupling.afferent,
        efferent: t.coupling.efferent,
        instability: t.metrics.instability,
        distance: t.metrics.distance,
        relations: t
            .relations
            .iter()
            .map(|(relation, target)| JsonRelation {
                kind: relation.to_string(),
                target: target.to_string(),
            })
            .collect(),
    }
}

/// Build the JSON report for a run.
pub fn build_json_report(
    path: &str,
    config_path: Option<&str>,
    result: &AnalysisResult,
    gate: &GateOutcome,
) -> JsonReport {
    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        config: config_path.map(str::to_string),
        files_scanned: result.files.len(),
        skipped: result
            .skipped
            .iter()
            .map(|s| JsonSkipped {
                path: s.path.clone(),
                reason: s.reason.clone(),
            })
            .collect(),
        abstractness: result.abstractness,
        mean_distance: result.mean_distance(),
        max_distance: gate.threshold,
        passed: gate.passed(),
        types: result
            .types
            .iter()
            .map(|(name, t)| type_to_json(name, t))
            .collect(),
        files: result
            .files
            .iter()
            .map(|(path, m)| JsonFile {
                path: path.clone(),
                size: m.size,
                complexity: m.complexity,
            })
            .collect(),
    }
}

/// Write results in JSON format.
pub fn write_json<W: Write>(out: &mut W, report: &JsonReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(
    path: &str,
    config_path: Option<&str>,
    result: &AnalysisResult,
    gate: &GateOutcome,
) {
    // Header
    println!();
    print!("  ");
    print!("{}", "archlens".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    // Scan info
    print!("  {}", "Analyzing: ".dimmed());
    println!("{}", path);
    if let Some(config) = config_path {
        print!("  {}", "Config:    ".dimmed());
        println!("{}", config);
    }
    println!();

    write_result_summary(result, gate);
    println!();

    if result.has_types() {
        write_types(result, gate);
        println!();
    } else {
        println!("  {}", "No type declarations found".yellow());
        println!();
    }

    if !result.skipped.is_empty() {
        write_skipped(result);
        println!();
    }

    write_final_status(result, gate);
    println!();
}

fn write_result_summary(result: &AnalysisResult, gate: &GateOutcome) {
    if gate.passed() {
        print!("  {}", "✓ PASS".green());
    } else {
        print!("  {}", "✗ FAIL".red());
    }

    let (classes, abstracts, interfaces) = result.kind_counts();
    print!(
        "  Types: {} ({} classes, {} abstract, {} interfaces)",
        result.type_count(),
        classes,
        abstracts,
        interfaces
    );
    print!("  A: {:.2}", result.abstractness);
    if let Some(mean) = result.mean_distance() {
        print!("  Mean D: ");
        write_colored_distance(mean, 0);
    }
    println!();

    let totals = result.file_totals();
    println!(
        "  {}",
        format!(
            "{} files, {} lines, {} control statements",
            result.files.len(),
            totals.size,
            totals.complexity
        )
        .dimmed()
    );
}

fn write_colored_distance(d: f64, width: usize) {
    let text = format!("{:>width$.2}", d, width = width);
    match d {
        d if d <= 0.3 => print!("{}", text.green()),
        d if d <= 0.6 => print!("{}", text.yellow()),
        _ => print!("{}", text.red()),
    }
}

fn write_kind_tag(kind: TypeKind, singleton: bool) {
    if singleton {
        print!("{}", "singleton ".magenta());
        return;
    }
    match kind {
        TypeKind::Interface => print!("{}", "interface ".blue()),
        TypeKind::AbstractClass => print!("{}", "abstract  ".yellow()),
        TypeKind::Class => print!("{}", "class     ".normal()),
    }
}

fn write_types(result: &AnalysisResult, gate: &GateOutcome) {
    println!("  {} ({}):", "Types".bold(), result.type_count());
    println!();
    println!(
        "    {}",
        format!("{:<28}{:<10}{:>4}{:>4}{:>7}{:>7}", "name", "kind", "Ca", "Ce", "I", "D").dimmed()
    );

    for (name, t) in &result.types {
        let flagged = gate.offenders.iter().any(|(n, _)| n == name);
        if flagged {
            print!("  {} ", "!".red());
        } else {
            print!("    ");
        }
        print!("{:<28}", name);
        write_kind_tag(t.kind, t.relations.singleton);
        print!(
            "{:>4}{:>4}{:>7.2}",
            t.coupling.afferent, t.coupling.efferent, t.metrics.instability
        );
        write_colored_distance(t.metrics.distance, 7);
        println!();
        if !t.relations.is_empty() {
            let edges: Vec<String> = t
                .relations
                .iter()
                .map(|(relation, target)| format!("{} {}", relation, target))
                .collect();
            println!("        {}", edges.join(", ").dimmed());
        }
    }
}

fn write_skipped(result: &AnalysisResult) {
    println!("  {} ({}):", "Skipped".yellow(), result.skipped.len());
    for s in &result.skipped {
        print!("    {}", s.path.blue());
        println!("  {}", s.reason.dimmed());
    }
}

fn write_final_status(result: &AnalysisResult, gate: &GateOutcome) {
    match gate.threshold {
        Some(max) => print!("  {}", format!("Max distance: {:.2}", max).dimmed()),
        None => print!("  {}", "Max distance: none".dimmed()),
    }
    print!("  Types over: {}", gate.offenders.len());
    print!("  ");

    if !result.has_types() {
        print!("{}", "NO TYPES".yellow());
    } else if gate.passed() {
        print!("{}", "PASSED".green());
    } else {
        print!("{}", "FAILED".red());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, LoadError};

    fn sample() -> AnalysisResult {
        let loader = |path: &str| -> Result<String, LoadError> {
            match path {
                "C.java" => Ok("class C extends D {}".to_string()),
                "D.java" => Ok("class D {}".to_string()),
                _ => Err(LoadError::Unavailable(path.to_string())),
            }
        };
        analyze(&["C.java", "D.java", "Gone.java"], &loader).unwrap()
    }

    #[test]
    fn test_gate() {
        let result = sample();
        // A = 0: C has I = 1 (D = 0), D has I = 0 (D = 1)
        let gate = GateOutcome::evaluate(&result, Some(0.5));
        assert!(!gate.passed());
        assert_eq!(gate.offenders, vec![("D".to_string(), 1.0)]);
        assert!(GateOutcome::evaluate(&result, None).passed());
    }

    #[test]
    fn test_json_report_roundtrips() {
        let result = sample();
        let gate = GateOutcome::evaluate(&result, None);
        let report = build_json_report("src", Some("archlens.yaml"), &result, &gate);

        let mut buf = Vec::new();
        write_json(&mut buf, &report).unwrap();
        let parsed: JsonReport = serde_json::from_slice(&buf).unwrap();

        assert_eq!(parsed.files_scanned, 2);
        assert_eq!(parsed.skipped.len(), 1);
        assert!(parsed.passed);
        let c = parsed.types.iter().find(|t| t.name == "C").unwrap();
        assert_eq!(c.efferent, 1);
        assert_eq!(c.relations[0].kind, "extends");
        assert_eq!(c.relations[0].target, "D");
    }

    #[test]
    fn test_json_omits_empty_optionals() {
        let result = AnalysisResult::default();
        let gate = GateOutcome::evaluate(&result, None);
        let report = build_json_report(".", None, &result, &gate);
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("\"config\""));
        assert!(!json.contains("\"mean_distance\""));
        assert!(!json.contains("\"skipped\""));
    }
}
