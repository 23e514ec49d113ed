//! textflow CLI: validate, explain, and run plan documents.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use textflow_core::config::{EngineConfig, PlanConfig};
use textflow_exec::{load_jsonl_file, Engine};
use textflow_operators::MemoryCatalog;
use textflow_planner::{
    parse_json_plan, parse_yaml_plan, AssembledPlan, BuildContext, OperatorRegistry, PlanAssembler,
    PlanDocument,
};

#[derive(Parser)]
#[command(name = "textflow")]
#[command(about = "Declarative dataflow plans over text tuples", long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. "info", "textflow_planner=debug")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Plan-building overrides shared by every subcommand.
#[derive(clap::Args, Debug, Clone, Default)]
struct PlanArgs {
    /// Path to the plan document (.json, .yaml or .yml)
    #[arg(short, long)]
    plan: PathBuf,

    /// Report every failing operator instead of stopping at the first
    #[arg(long)]
    keep_going: bool,

    /// Maximum operators in one plan (overrides config)
    #[arg(long)]
    max_operators: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and link every operator without running anything
    Validate {
        #[command(flatten)]
        args: PlanArgs,
    },

    /// Show the assembled plan: operator order, configs, schemas, links
    Explain {
        #[command(flatten)]
        args: PlanArgs,

        /// Print the plan summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a plan against JSON-lines data sets and print the sink's tuples
    Run {
        #[command(flatten)]
        args: PlanArgs,

        /// Data set binding, `name=path/to/file.jsonl` (repeatable)
        #[arg(short, long = "data", value_parser = parse_data_binding)]
        data: Vec<(String, PathBuf)>,

        /// Stop after this many tuples reach the sink (overrides config)
        #[arg(long)]
        max_tuples: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result = match cli.command {
        Commands::Validate { args } => validate_plan(&args),
        Commands::Explain { args, json } => explain_plan(&args, json),
        Commands::Run {
            args,
            data,
            max_tuples,
        } => run_plan(&args, &data, max_tuples),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_data_binding(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
            Ok((name.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(format!("expected name=path, got '{s}'")),
    }
}

fn read_document(path: &Path) -> Result<PlanDocument, Box<dyn std::error::Error>> {
    let src = fs::read_to_string(path)?;
    let doc = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => parse_yaml_plan(&src)?,
        _ => parse_json_plan(&src)?,
    };
    tracing::debug!(
        path = %path.display(),
        operators = doc.operators.len(),
        links = doc.links.len(),
        "plan document loaded"
    );
    Ok(doc)
}

/// Env < document `config` block < command-line flags.
fn plan_config(doc: &PlanDocument, args: &PlanArgs) -> PlanConfig {
    let mut cfg = doc.plan_config(PlanConfig::from_env());
    if args.keep_going {
        cfg.fail_fast = false;
    }
    if let Some(max) = args.max_operators {
        cfg.max_operators = max;
    }
    cfg
}

fn engine_config(doc: &PlanDocument, max_tuples: Option<u64>) -> EngineConfig {
    let mut cfg = doc.engine_config(EngineConfig::from_env());
    if max_tuples.is_some() {
        cfg.max_tuples = max_tuples;
    }
    cfg
}

fn assemble(
    doc: &PlanDocument,
    args: &PlanArgs,
    catalog: MemoryCatalog,
) -> Result<AssembledPlan, Box<dyn std::error::Error>> {
    let assembler = PlanAssembler::new(OperatorRegistry::default(), BuildContext::new(catalog))
        .with_config(plan_config(doc, args));
    Ok(assembler.assemble(&doc.operators, &doc.links)?)
}

fn validate_plan(args: &PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let doc = read_document(&args.plan)?;
    let plan = assemble(&doc, args, MemoryCatalog::new())?;
    println!(
        "✓ Plan is valid: {} operators, sink '{}', fingerprint {}",
        plan.order().len(),
        plan.sink_id(),
        plan.fingerprint().short()
    );
    Ok(())
}

fn explain_plan(args: &PlanArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let doc = read_document(&args.plan)?;
    let plan = assemble(&doc, args, MemoryCatalog::new())?;
    let summary = plan.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Plan");
    println!("====");
    println!("Fingerprint: {}", summary.fingerprint);
    println!("Sink: {}", summary.sink);
    println!();
    println!("Operators (execution order):");
    for (i, op) in summary.operators.iter().enumerate() {
        println!("  {}. {} [{}] -> {}", i + 1, op.operator_id, op.operator_type, op.schema);
        println!("     {}", op.config);
    }
    println!();
    println!("Links:");
    for link in &summary.links {
        println!("  {} -> {}", link.from, link.to);
    }
    Ok(())
}

fn run_plan(
    args: &PlanArgs,
    data: &[(String, PathBuf)],
    max_tuples: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = read_document(&args.plan)?;
    let catalog = load_catalog(&doc, data)?;
    let plan = assemble(&doc, args, catalog)?;

    let engine = Engine::new(engine_config(&doc, max_tuples));
    let report = engine.run(plan)?;

    for row in report.rows_json() {
        println!("{}", row);
    }
    eprintln!("✓ Plan executed successfully");
    eprintln!("  Tuples: {}", report.manifest.tuples_out);
    eprintln!("  Duration: {}ms", report.manifest.elapsed_ms());
    eprintln!("  Plan hash: {}", report.manifest.plan_hash);
    Ok(())
}

/// Load each `--data` file with the schema its sources declare.
fn load_catalog(
    doc: &PlanDocument,
    data: &[(String, PathBuf)],
) -> Result<MemoryCatalog, Box<dyn std::error::Error>> {
    let declared = doc.data_sources()?;
    let catalog = MemoryCatalog::new();
    for (name, path) in data {
        let schema = declared
            .get(name)
            .ok_or_else(|| format!("no source in the plan reads data set '{name}'"))?;
        catalog.insert(name.clone(), load_jsonl_file(path, schema)?);
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use textflow_planner::DocumentConfig;

    const PLAN: &str = r#"{
        "operators": [
            {"operator_id": "src", "operator_type": "ScanSource", "dataSource": "notes",
             "attributeNames": "who, bio", "attributeTypes": "string, text"},
            {"operator_id": "m1", "operator_type": "RegexMatcher", "regex": "sal[a-z]+",
             "attributeNames": "bio", "attributeTypes": "text"},
            {"operator_id": "out", "operator_type": "TupleSink"}
        ],
        "links": [{"from": "src", "to": "m1"}, {"from": "m1", "to": "out"}]
    }"#;

    fn args(path: &Path) -> PlanArgs {
        PlanArgs {
            plan: path.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn data_binding_parsing() {
        assert_eq!(
            parse_data_binding("notes=data/notes.jsonl"),
            Ok(("notes".to_string(), PathBuf::from("data/notes.jsonl")))
        );
        assert!(parse_data_binding("notes").is_err());
        assert!(parse_data_binding("=x").is_err());
    }

    #[test]
    fn flags_override_document_config() {
        let doc = PlanDocument {
            config: Some(DocumentConfig {
                fail_fast: Some(true),
                max_operators: Some(10),
                max_tuples: Some(5),
            }),
            ..Default::default()
        };
        let flags = PlanArgs {
            keep_going: true,
            max_operators: Some(3),
            ..Default::default()
        };
        let cfg = plan_config(&doc, &flags);
        assert!(!cfg.fail_fast);
        assert_eq!(cfg.max_operators, 3);
        assert_eq!(engine_config(&doc, None).max_tuples, Some(5));
        assert_eq!(engine_config(&doc, Some(1)).max_tuples, Some(1));
    }

    #[test]
    fn validate_and_run_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let plan_path = dir.path().join("plan.json");
        fs::write(&plan_path, PLAN).unwrap();
        let data_path = dir.path().join("notes.jsonl");
        let mut f = fs::File::create(&data_path).unwrap();
        writeln!(f, r#"{{"who":"ann","bio":"salary review"}}"#).unwrap();
        writeln!(f, r#"{{"who":"bob","bio":"boat trip"}}"#).unwrap();

        validate_plan(&args(&plan_path)).unwrap();
        explain_plan(&args(&plan_path), true).unwrap();

        let doc = read_document(&plan_path).unwrap();
        let catalog = load_catalog(&doc, &[("notes".into(), data_path.clone())]).unwrap();
        let report = Engine::default()
            .run(assemble(&doc, &args(&plan_path), catalog).unwrap())
            .unwrap();
        assert_eq!(report.collected.len(), 1);

        assert!(load_catalog(&doc, &[("other".into(), data_path)]).is_err());
    }

    #[test]
    fn yaml_extension_selects_yaml_parser() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.yml");
        fs::write(
            &path,
            "operators:\n  - { operator_id: x, operator_type: FooBar }\n",
        )
        .unwrap();
        let doc = read_document(&path).unwrap();
        let err = assemble(&doc, &args(&path), MemoryCatalog::new()).unwrap_err();
        assert!(err.to_string().contains("unknown operator type 'FooBar'"));
    }
}
