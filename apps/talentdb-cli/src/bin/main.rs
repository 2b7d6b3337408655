use std::env;
use std::path::PathBuf;

use talentdb_core::config::{expand_path, Config, Settings};
use talentdb_core::dataset::{filter_employees, load_employees, EmployeeFilter};
use talentdb_core::logging;
use talentdb_core::types::Availability;
use talentdb_hybrid::{SearchOutcome, SearchService, Summarizer};

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {} <index|query|filter|status> [args...]", prog);
        eprintln!("  {} index [dataset.json]", prog);
        eprintln!("  {} query \"<text>\" [top_k]", prog);
        eprintln!("  {} filter [--skill S] [--min-experience N] [--availability A] [--q TEXT]", prog);
        eprintln!("  {} status", prog);
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn parse_filter(args: &[String]) -> anyhow::Result<EmployeeFilter> {
    let mut filter = EmployeeFilter::default();
    let mut it = args.iter();
    while let Some(flag) = it.next() {
        let value = it.next().ok_or_else(|| anyhow::anyhow!("{flag} needs a value"))?;
        match flag.as_str() {
            "--skill" => filter.skill = Some(value.clone()),
            "--min-experience" => {
                filter.min_experience = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("--min-experience must be a number, got '{value}'"))?
            }
            "--availability" => {
                filter.availability = Some(
                    Availability::parse(value).ok_or_else(|| anyhow::anyhow!("unknown availability '{value}'"))?,
                )
            }
            "--q" => filter.text = Some(value.clone()),
            other => anyhow::bail!("unknown filter flag '{other}'"),
        }
    }
    Ok(filter)
}

fn start(settings: &Settings, dataset: Option<&String>) -> anyhow::Result<SearchService> {
    let path = dataset.map(PathBuf::from).unwrap_or_else(|| expand_path(&settings.data.dataset_path));
    let employees = load_employees(&path)?;
    tracing::info!(path = %path.display(), employees = employees.len(), "dataset loaded");
    Ok(SearchService::start(settings, employees))
}

fn main() -> anyhow::Result<()> {
    logging::init("info");
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let settings = config.settings();
    let (cmd, args) = parse_args();

    match cmd.as_str() {
        "index" => {
            let service = start(settings, args.first())?;
            let status = service.status();
            if !status.active {
                eprintln!("❌ Search service inactive: {}", status.inactive_reason.unwrap_or_default());
                std::process::exit(2);
            }
            if let Some(index) = &status.index {
                println!("✅ Index ready: {} employees, dim {}, metric {}", index.rows, index.dimension, index.metric);
                println!("   model: {}", index.model);
                println!("   fingerprint: {}", index.dataset_fingerprint);
                println!(
                    "   embeddings from cache: {}  index from cache: {}",
                    index.embeddings_from_cache, index.index_from_cache
                );
            }
        }
        "query" => {
            let query_text = args.first().cloned().unwrap_or_else(|| {
                eprintln!("Usage: talentdb query \"<text>\" [top_k]");
                std::process::exit(1)
            });
            let top_k = match args.get(1) {
                Some(raw) => Some(raw.parse::<usize>().map_err(|_| anyhow::anyhow!("top_k must be a number, got '{raw}'"))?),
                None => None,
            };
            let service = start(settings, None)?;
            let results = match service.search(&query_text, top_k)? {
                SearchOutcome::Ranked(results) => results,
                SearchOutcome::Unavailable(reason) => {
                    eprintln!("❌ Search unavailable: {}", reason);
                    std::process::exit(2);
                }
            };

            println!("🔍 {} results for: \"{}\"", results.len(), query_text);
            for (i, r) in results.iter().enumerate() {
                println!(
                    "\n  {}. {}  ({} years, {})  score={:.3}  confidence={:.1}",
                    i + 1,
                    r.employee.name,
                    r.employee.experience_years,
                    r.employee.availability,
                    r.relevance_score,
                    r.confidence
                );
                println!("     skills: {}", r.employee.skills.join(", "));
                for reason in &r.match_reasons {
                    println!("     - {}", reason);
                }
            }

            let summarizer = Summarizer::from_settings(settings);
            println!("\n💬 {}", summarizer.summarize(&query_text, &results));
        }
        "filter" => {
            let filter = parse_filter(&args)?;
            let path = expand_path(&settings.data.dataset_path);
            let employees = load_employees(&path)?;
            let found = filter_employees(&employees, &filter);
            tracing::debug!(?filter, matched = found.len(), "filtered dataset");
            let body = serde_json::json!({ "count": found.len(), "results": found });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        "status" => {
            let service = start(settings, args.first())?;
            println!("{}", serde_json::to_string_pretty(&service.status())?);
        }
        other => {
            eprintln!("Unknown command '{}'. Expected index, query, filter or status.", other);
            std::process::exit(1);
        }
    }
    Ok(())
}
