//! taskloom - run and inspect the capability-matched task scheduler.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use taskloom_core::app::{StatusCounts, seed};
use taskloom_core::board::{DependencyGraph, TaskBoard};
use taskloom_core::config::SchedulerConfig;
use taskloom_core::domain::{Task, TaskId};
use taskloom_core::impls::{DotRenderer, JsonFileStore, SimulatedExecutor};
use taskloom_core::ports::{Clock, GraphRenderer, SystemClock, TaskStore};
use taskloom_core::{TaskManager, TaskManagerBuilder};

/// Grace period for in-flight executions after Ctrl-C.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(name = "taskloom")]
#[command(about = "Assign prioritized, dependent tasks to capable workers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file (defaults are used for missing keys)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Task state file (overrides `state_path` from the config)
    #[arg(short, long, global = true)]
    state: Option<PathBuf>,

    /// Log filter, e.g. `info` or `taskloom_core=debug` (RUST_LOG wins if set)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Load or seed tasks, start workers and run orchestration cycles
    Run {
        /// Stop after this many cycles instead of waiting for Ctrl-C
        #[arg(long)]
        cycles: Option<u64>,
    },

    /// Print tasks and status counts from the state file
    Status {
        /// Print the task list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the dependency graph from the state file as DOT
    Graph {
        /// Output path (overrides `graph_path` from the config)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Append a pending task to the state file
    Add {
        description: String,

        #[arg(short, long, default_value_t = 3)]
        priority: u8,

        /// Deadline as YYYY-MM-DD
        #[arg(short, long)]
        deadline: Option<NaiveDate>,

        /// Id of a task this one depends on (repeatable)
        #[arg(long = "depends-on")]
        depends_on: Vec<u64>,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(cli: &Cli) -> Result<SchedulerConfig> {
    let mut config = match &cli.config {
        Some(path) => SchedulerConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SchedulerConfig::default(),
    };
    if let Some(state) = &cli.state {
        config.state_path = state.clone();
    }
    Ok(config)
}

async fn load_tasks(store: &JsonFileStore) -> Result<Option<Vec<Task>>> {
    store
        .load()
        .await
        .with_context(|| format!("reading task state from {}", store.path().display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Run { cycles } => run(config, cycles).await,
        Commands::Status { json } => status(&config, json).await,
        Commands::Graph { out } => {
            let out = out.unwrap_or_else(|| config.graph_path.clone());
            graph(&config, &out).await
        }
        Commands::Add {
            description,
            priority,
            deadline,
            depends_on,
        } => add(&config, description, priority, deadline, depends_on).await,
    }
}

async fn run(config: SchedulerConfig, cycles: Option<u64>) -> Result<()> {
    let store = Arc::new(JsonFileStore::new(&config.state_path));
    let tasks = match load_tasks(&store).await? {
        Some(tasks) => {
            tracing::info!(tasks = tasks.len(), "task state loaded");
            tasks
        }
        None => {
            tracing::warn!("no saved state found; starting with the default tasks");
            seed::default_tasks(SystemClock.today())
        }
    };

    let manager = TaskManagerBuilder::new()
        .workers(config.workers.clone())
        .tasks(tasks)
        .executor(Arc::new(SimulatedExecutor::new(config.execution.clone())))
        .prioritizer(config.prioritizer)
        .store(store)
        .renderer(Arc::new(DotRenderer::new(&config.graph_path)))
        .render_each_cycle(config.render_graph_each_cycle)
        .build()
        .context("building task manager")?;

    let group = manager.spawn_workers();
    let shutdown = group.subscribe();
    let interval = config.cycle_interval();

    let cycle_loop = async {
        match cycles {
            Some(limit) => manager.run_cycles(limit, interval, shutdown).await,
            None => manager.run(interval, shutdown).await,
        }
    };
    tokio::pin!(cycle_loop);

    let ran = tokio::select! {
        ran = &mut cycle_loop => ran,
        signal = tokio::signal::ctrl_c() => {
            signal.context("listening for Ctrl-C")?;
            tracing::info!("interrupt received, shutting down");
            group.request_shutdown();
            cycle_loop.await
        }
    };

    if !group.shutdown_within(SHUTDOWN_GRACE).await {
        tracing::warn!("some workers were still executing and were abandoned");
    }
    manager.flush().await.context("saving task state")?;
    tracing::info!(cycles = ran, "orchestration stopped");

    print_summary(&manager);
    Ok(())
}

fn print_summary(manager: &TaskManager) {
    let counts = manager.counts();
    println!(
        "tasks: {} pending, {} assigned, {} completed, {} error",
        counts.pending, counts.assigned, counts.completed, counts.error
    );
    println!("worker performance:");
    for worker in manager.workers() {
        let summary = worker.performance_summary();
        let mean = summary
            .mean()
            .map(|d| format!("{:.1}s", d.as_secs_f64()))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<8} {:<28} handled {:>3}  mean {}",
            worker.name(),
            worker.profile().role,
            summary.handled,
            mean
        );
    }
}

async fn status(config: &SchedulerConfig, json: bool) -> Result<()> {
    let store = JsonFileStore::new(&config.state_path);
    let Some(tasks) = load_tasks(&store).await? else {
        println!("no task state at {}", config.state_path.display());
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    println!(
        "{:<4} {:<10} {:>3}  {:<10}  {:<8}  DESCRIPTION",
        "ID", "STATUS", "PRI", "DEADLINE", "WORKER"
    );
    for task in &tasks {
        println!(
            "{:<4} {:<10} {:>3}  {:<10}  {:<8}  {}",
            task.id.get(),
            task.status.as_str(),
            task.priority,
            task.deadline.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
            task.assigned_to.as_ref().map(|w| w.as_str()).unwrap_or("-"),
            task.description,
        );
    }

    let counts: StatusCounts = tasks.iter().map(|t| t.status).collect();
    println!(
        "\n{} tasks: {} pending, {} assigned, {} completed, {} error",
        counts.total(),
        counts.pending,
        counts.assigned,
        counts.completed,
        counts.error
    );
    Ok(())
}

async fn graph(config: &SchedulerConfig, out: &Path) -> Result<()> {
    let store = JsonFileStore::new(&config.state_path);
    let tasks = load_tasks(&store).await?.unwrap_or_default();
    let graph = DependencyGraph::from_tasks(&tasks);

    DotRenderer::new(out)
        .render(&tasks, &graph)
        .await
        .with_context(|| format!("writing graph to {}", out.display()))?;
    println!(
        "wrote {} tasks and {} dependencies to {}",
        tasks.len(),
        graph.edge_count(),
        out.display()
    );
    Ok(())
}

fn next_task_id(board: &TaskBoard) -> Result<TaskId> {
    match board.max_id() {
        Some(max) => max.next().context("no free task id left"),
        None => Ok(TaskId::new(1)),
    }
}

async fn add(
    config: &SchedulerConfig,
    description: String,
    priority: u8,
    deadline: Option<NaiveDate>,
    depends_on: Vec<u64>,
) -> Result<()> {
    if description.trim().is_empty() {
        bail!("task description must not be empty");
    }
    let store = JsonFileStore::new(&config.state_path);
    let tasks = match load_tasks(&store).await? {
        Some(tasks) => tasks,
        None => seed::default_tasks(SystemClock.today()),
    };
    let board = TaskBoard::from_tasks(tasks).context("task state holds duplicate ids")?;

    for dep in &depends_on {
        if !board.contains(TaskId::new(*dep)) {
            bail!("unknown dependency id {dep}");
        }
    }

    let id = next_task_id(&board)?;
    let mut task = Task::new(id, description, priority);
    if let Some(deadline) = deadline {
        task = task.with_deadline(deadline);
    }
    for dep in depends_on {
        task = task.depends_on(dep);
    }
    board.insert(task)?;

    store
        .save(&board.snapshot())
        .await
        .context("saving task state")?;
    println!("added task {}", id.get());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_follows_the_largest_one() {
        let board = TaskBoard::from_tasks([Task::new(4, "a", 1), Task::new(2, "b", 1)]).unwrap();
        assert_eq!(next_task_id(&board).unwrap(), TaskId::new(5));
        assert_eq!(next_task_id(&TaskBoard::new()).unwrap(), TaskId::new(1));
    }

    #[test]
    fn exhausted_ids_are_an_error() {
        let board = TaskBoard::from_tasks([Task::new(u64::MAX, "last", 1)]).unwrap();
        let err = next_task_id(&board).unwrap_err();
        assert!(err.to_string().contains("no free task id"));
    }
}
