use std::sync::Arc;
use std::thread;

use anyhow::{bail, Context};
use colored::Colorize;
use rdv_agent::{Agent, AgentConfig, AgentResult, CoordinationStore};
use rdv_registry::ROSTER_KEY;
use rdv_store::InMemoryStore;
use rdv_types::NameTable;
use serde_json::{json, Value};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let base = base_config(&cli)?;
    match cli.command {
        Command::Static(args) => cmd_static(&base, &cli.format, args),
        Command::Dynamic(args) => cmd_dynamic(&base, &cli.format, args),
        Command::Barrier(args) => cmd_barrier(&base, &cli.format, args),
        Command::Config(_) => cmd_config(&base, &cli.format),
    }
}

/// Config file (or defaults) with command-line overrides applied.
fn base_config(cli: &Cli) -> anyhow::Result<AgentConfig> {
    let mut config = match &cli.config {
        Some(path) => AgentConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AgentConfig::default(),
    };
    if let Some(prefix) = &cli.prefix {
        config.prefix = prefix.clone();
    }
    if cli.timeout_ms.is_some() {
        config.store.timeout_ms = cli.timeout_ms;
    }
    Ok(config)
}

fn worker_config(base: &AgentConfig, id: u32, name: &str, world_size: Option<u32>) -> AgentConfig {
    AgentConfig {
        worker_id: id,
        worker_name: name.to_string(),
        world_size,
        ..base.clone()
    }
}

fn default_names(world_size: u32) -> Vec<String> {
    (0..world_size).map(|i| format!("worker{i}")).collect()
}

fn table_json(table: &NameTable) -> Value {
    Value::Array(
        table
            .sorted_by_id()
            .into_iter()
            .map(|(id, name)| json!({ "id": id.get(), "name": name.to_string() }))
            .collect(),
    )
}

fn table_text(table: &NameTable) -> String {
    table
        .sorted_by_id()
        .into_iter()
        .map(|(id, name)| format!("{}={}", id, name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn cmd_static(base: &AgentConfig, format: &OutputFormat, args: StaticArgs) -> anyhow::Result<()> {
    let world_size = args
        .world_size
        .unwrap_or_else(|| if args.names.is_empty() { 2 } else { args.names.len() as u32 });
    if world_size == 0 {
        bail!("world size must be at least 1");
    }
    let names = if args.names.is_empty() {
        default_names(world_size)
    } else {
        args.names
    };
    if names.len() != world_size as usize {
        bail!("{} names given for a world of size {}", names.len(), world_size);
    }

    let store = Arc::new(InMemoryStore::with_config(base.store.clone()));
    let handles: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(id, name)| {
            let config = worker_config(base, id as u32, name, Some(world_size));
            let store = Arc::clone(&store);
            thread::spawn(move || -> AgentResult<NameTable> {
                let mut agent = Agent::new(config, store)?;
                Ok(agent.register()?.clone())
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle
            .join()
            .map_err(|_| anyhow::anyhow!("worker thread panicked"))?;
        results.push(result);
    }

    let failed = results.iter().filter(|r| r.is_err()).count();
    match format {
        OutputFormat::Json => {
            let workers: Vec<Value> = results
                .iter()
                .enumerate()
                .map(|(id, r)| match r {
                    Ok(table) => json!({ "id": id, "table": table_json(table) }),
                    Err(e) => json!({ "id": id, "error": e.to_string() }),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json!({ "workers": workers }))?);
        }
        OutputFormat::Text => {
            for (id, result) in results.iter().enumerate() {
                match result {
                    Ok(table) => println!("  {} worker {}: {}", "✓".green(), id, table_text(table)),
                    Err(e) => println!("  {} worker {}: {}", "✗".red(), id, e.to_string().red()),
                }
            }
        }
    }
    if failed > 0 {
        bail!("registration failed on {failed} of {world_size} workers");
    }
    Ok(())
}

fn cmd_dynamic(base: &AgentConfig, format: &OutputFormat, args: DynamicArgs) -> anyhow::Result<()> {
    let store = Arc::new(InMemoryStore::with_config(base.store.clone()));
    let mut joined = Vec::new();
    let mut last: Option<Agent<Arc<InMemoryStore>>> = None;

    // Sequential on purpose: roster appends must not overlap.
    for (offset, name) in args.names.iter().enumerate() {
        let id = args.first_id + offset as u32;
        let mut agent = Agent::new(worker_config(base, id, name, None), Arc::clone(&store))?;
        let known = agent
            .register()
            .with_context(|| format!("registering worker {id} ({name})"))?
            .len();
        if let OutputFormat::Text = format {
            println!("  {} {} joined as {} (sees {} workers)", "✓".green(), name.bold(), id, known);
        }
        joined.push(json!({ "id": id, "name": name, "known": known }));
        last = Some(agent);
    }

    let Some(agent) = last else {
        bail!("no workers to register");
    };
    let roster = String::from_utf8_lossy(&agent.store().get(ROSTER_KEY)?).into_owned();
    let table = agent.name_table().cloned().unwrap_or_default();

    match format {
        OutputFormat::Json => {
            let out = json!({ "workers": joined, "roster": roster, "table": table_json(&table) });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("Roster: {}", roster.cyan());
            println!("Table:  {}", table_text(&table));
        }
    }
    Ok(())
}

fn cmd_barrier(base: &AgentConfig, format: &OutputFormat, args: BarrierArgs) -> anyhow::Result<()> {
    let world_size = args.contributions.len() as u32;
    let store = Arc::new(InMemoryStore::with_config(base.store.clone()));
    let rounds = args.rounds;

    let handles: Vec<_> = args
        .contributions
        .iter()
        .enumerate()
        .map(|(id, &calls)| {
            let config = worker_config(base, id as u32, &format!("worker{id}"), Some(world_size));
            let store = Arc::clone(&store);
            thread::spawn(move || -> AgentResult<Vec<i64>> {
                let agent = Agent::new(config, store)?;
                (0..rounds).map(|_| agent.sync_call_count(calls)).collect()
            })
        })
        .collect();

    let mut per_worker = Vec::with_capacity(handles.len());
    for handle in handles {
        let totals = handle
            .join()
            .map_err(|_| anyhow::anyhow!("worker thread panicked"))??;
        per_worker.push(totals);
    }

    let expected: i64 = args.contributions.iter().sum();
    let consistent = per_worker
        .iter()
        .all(|totals| totals.iter().all(|t| *t == expected));

    match format {
        OutputFormat::Json => {
            let out = json!({
                "world_size": world_size,
                "rounds": rounds,
                "expected": expected,
                "totals": per_worker,
                "consistent": consistent,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            for round in 0..rounds as usize {
                let totals: Vec<String> = per_worker.iter().map(|t| t[round].to_string()).collect();
                println!("  round {}: totals [{}]", round + 1, totals.join(", ").bold());
            }
            if consistent {
                println!("{} all {} workers agree on {}", "✓".green().bold(), world_size, expected);
            }
        }
    }
    if !consistent {
        bail!("workers disagree on the aggregated call count");
    }
    Ok(())
}

fn cmd_config(base: &AgentConfig, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(base)?),
        OutputFormat::Text => print!("{}", base.to_toml_string()?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let cli = Cli::try_parse_from(["rdv", "--prefix", "job", "--timeout-ms", "50", "config"]).unwrap();
        let config = base_config(&cli).unwrap();
        assert_eq!(config.prefix, "job");
        assert_eq!(config.store.timeout_ms, Some(50));
    }

    #[test]
    fn worker_config_keeps_shared_settings() {
        let base = AgentConfig {
            prefix: "job".into(),
            ..AgentConfig::default()
        };
        let c = worker_config(&base, 3, "w3", Some(4));
        assert_eq!(c.prefix, "job");
        assert_eq!(c.worker_id, 3);
        assert_eq!(c.worker_name, "w3");
        assert_eq!(c.world_size, Some(4));
    }

    #[test]
    fn default_names_follow_ids() {
        assert_eq!(default_names(3), vec!["worker0", "worker1", "worker2"]);
    }

    #[test]
    fn static_command_succeeds() {
        let cli = Cli::try_parse_from(["rdv", "static", "--names", "ps,w1,w2"]).unwrap();
        run_command(cli).unwrap();
    }

    #[test]
    fn static_command_reports_duplicates() {
        let cli = Cli::try_parse_from(["rdv", "static", "--names", "a,a"]).unwrap();
        assert!(run_command(cli).is_err());
    }

    #[test]
    fn static_command_rejects_empty_world() {
        let cli = Cli::try_parse_from(["rdv", "static", "-n", "0"]).unwrap();
        let err = run_command(cli).unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn dynamic_command_succeeds() {
        let cli = Cli::try_parse_from(["rdv", "--format", "json", "dynamic", "--names", "a,b,c"]).unwrap();
        run_command(cli).unwrap();
    }

    #[test]
    fn barrier_command_succeeds() {
        let cli = Cli::try_parse_from(["rdv", "barrier", "--contributions", "1,2", "-r", "2"]).unwrap();
        run_command(cli).unwrap();
    }

    #[test]
    fn table_text_is_ordered_by_id() {
        let mut table = NameTable::new();
        table.insert("b".into(), rdv_types::WorkerId::new(1)).unwrap();
        table.insert("a".into(), rdv_types::WorkerId::new(0)).unwrap();
        assert_eq!(table_text(&table), "0=a, 1=b");
    }
}
