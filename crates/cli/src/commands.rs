use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use rulesync_core::{MappingOrderReconciler, MappingRuleService, ObservedStateStore};
use rulesync_domain::{Config, MappingId};
use rulesync_infra::api::ApiClient;
use rulesync_infra::{config, ApiMappingRepository, JsonFileStateStore};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{Cli, Commands, RuleCommand};

/// Everything a command needs, wired from configuration
struct Services {
    reconciler: MappingOrderReconciler,
    rules: MappingRuleService,
    store: Arc<JsonFileStateStore>,
}

impl Services {
    async fn connect(config: &Config, cancel: &CancellationToken) -> anyhow::Result<Self> {
        let client = ApiClient::connect(&config.api, cancel)
            .await
            .context("authenticating against the identity provider")?;
        let repository = Arc::new(ApiMappingRepository::new(Arc::new(client), cancel.clone()));
        let store = Arc::new(JsonFileStateStore::new(&config.state.path));

        Ok(Self {
            reconciler: MappingOrderReconciler::new(repository.clone(), store.clone()),
            rules: MappingRuleService::new(repository),
            store,
        })
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match cli.config {
        Some(path) => config::load_from_file(Some(path)),
        None => config::load(),
    }
    .context("loading configuration")?;

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let services = Services::connect(&config, &cancel).await?;

    match cli.command {
        Commands::Reconcile { desired } => reconcile(&services, &desired).await,
        Commands::Refresh => refresh(&services).await,
        Commands::Rule(RuleCommand::Get { id }) => get_rule(&services, id).await,
        Commands::Rule(RuleCommand::Delete { id }) => delete_rule(&services, id).await,
    }
}

fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling in-flight requests");
            cancel.cancel();
        }
    });
}

async fn reconcile(services: &Services, desired_path: &Path) -> anyhow::Result<()> {
    let desired = config::load_desired_state(desired_path).context("loading desired state")?;
    let outcome = services.reconciler.reconcile(&desired).await.context("reconciliation failed")?;

    info!(mutations = outcome.mutation_count(), "reconciliation complete");
    print_json(&json!({
        "state": outcome.state,
        "toggled_to_disabled": outcome.toggled_to_disabled,
        "toggled_to_enabled": outcome.toggled_to_enabled,
        "reordered": outcome.reordered,
    }))
}

async fn refresh(services: &Services) -> anyhow::Result<()> {
    let Some(previous) = services.store.load().await.context("reading recorded state")? else {
        bail!("no recorded state at {}; run `rulesync reconcile` first", services.store.path().display());
    };
    let outcome = services.reconciler.refresh(&previous).await.context("refresh failed")?;

    let warnings: Vec<String> = outcome.warnings.iter().map(ToString::to_string).collect();
    print_json(&json!({ "state": outcome.state, "warnings": warnings }))
}

async fn get_rule(services: &Services, id: MappingId) -> anyhow::Result<()> {
    match services.rules.get(id).await? {
        Some(rule) => print_json(&serde_json::to_value(rule)?),
        None => bail!("mapping {id} not found"),
    }
}

async fn delete_rule(services: &Services, id: MappingId) -> anyhow::Result<()> {
    let deleted = services.rules.delete(id).await?;
    print_json(&json!({ "id": id, "deleted": deleted }))
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
