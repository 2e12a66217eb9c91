use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use feature_runtime::catalog::{
    CatalogFeature, CatalogIntent, CatalogRoute, CatalogServices, InMemoryCatalog, ItemForm,
};
use feature_runtime::feature::FeatureSnapshot;
use feature_runtime::logging::init_tracing;
use feature_runtime::navigation::parse;
use feature_runtime::{FeatureModel, RuntimeConfig, UiState};

#[derive(Parser, Debug)]
#[command(name = "feature-runtime")]
#[command(about = "Feature runtime: state, effects, modals and navigation for UI screens", long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/feature-runtime/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scripted catalog session and print every snapshot
    Demo {
        /// Simulated service latency in milliseconds
        #[arg(long, default_value = "50")]
        latency_ms: u64,

        /// Number of items the in-memory catalog starts with
        #[arg(long, default_value = "3")]
        items: usize,
    },
    /// Resolve a catalog deep link
    Parse { url: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RuntimeConfig::load_from(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RuntimeConfig::load().context("loading default config")?,
    };
    init_tracing(&config.logging);

    match cli.command {
        Command::Demo { latency_ms, items } => {
            run_demo(&config, Duration::from_millis(latency_ms), items).await?
        }
        Command::Parse { url } => {
            let route = parse::<CatalogRoute>(&url)?;
            println!("{route:?}");
        }
    }

    Ok(())
}

async fn run_demo(config: &RuntimeConfig, latency: Duration, items: usize) -> Result<()> {
    let service = Arc::new(
        InMemoryCatalog::new(latency).with_items((1..=items).map(|n| format!("Item {n}"))),
    );
    let feature = CatalogFeature::new(CatalogServices::shared(service.clone()));
    let mut model = FeatureModel::new(feature, config)?;
    model.subscribe(|snapshot| println!("{}", describe(snapshot)));

    let script = [
        CatalogIntent::Load,
        CatalogIntent::Refresh,
        CatalogIntent::ShowItem(1),
        CatalogIntent::Back,
        CatalogIntent::OpenFilters,
        CatalogIntent::Compose,
        CatalogIntent::DismissModal,
        CatalogIntent::Compose,
        CatalogIntent::Submit(ItemForm::new("Fresh item")),
    ];
    for intent in script {
        println!("> {intent:?}");
        model.dispatch(intent);
        model.settle().await;
    }

    println!("> open catalog://search?q=item");
    model.open_url("catalog://search?q=item")?;
    println!("> BackToRoot");
    model.dispatch(CatalogIntent::BackToRoot);

    for entry in model.diagnostics().entries() {
        println!("! {}: {}", entry.error.kind(), entry.error);
    }
    println!(
        "service: {} fetches, {} tracked events",
        service.fetches(),
        service.tracked().len()
    );

    model.dispose();
    Ok(())
}

fn describe(snapshot: &FeatureSnapshot<CatalogFeature>) -> String {
    let state = match &snapshot.state {
        UiState::Loaded(items) => format!("loaded({} items)", items.len()),
        UiState::Failed(error) => format!("failed({error})"),
        other => other.tag().to_string(),
    };
    let routes: Vec<String> = snapshot.routes.iter().map(ToString::to_string).collect();
    format!(
        "#{} state={} modal={} routes=[{}]",
        snapshot.revision,
        state,
        snapshot.modal,
        routes.join(", ")
    )
}
