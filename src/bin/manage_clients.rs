//! Edit the saved client book and global assumptions
//!
//! Every change is queued through the autosaver and flushed before exit.

use anyhow::{bail, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use saas_metrics::{
    assumptions::{Addon, GlobalField, Plan, PlanChoice},
    clients::{monthly_revenue, resolve_subscription, Addons, FlexUsage},
    storage::{Autosaver, DataBridge, JsonFileStore, StorageConfig},
    SubscriptionPatch, SubscriptionState, Workspace,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(about = "Manage clients and assumptions in the saved client book")]
struct Cli {
    /// Data directory (defaults to $SAAS_METRICS_DATA_DIR or ./data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List clients with the plan they end the projection on
    List,
    /// Add a client
    Add {
        name: String,
        /// First active month (1-12)
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        start_month: u32,
        #[command(flatten)]
        subscription: SubscriptionArgs,
    },
    /// Remove a client
    Remove { id: u64 },
    /// Pause a client from the given month onward
    Pause {
        id: u64,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        month: u32,
    },
    /// Resume a paused client
    Unpause { id: u64 },
    Rename { id: u64, name: String },
    /// Change a client's subscription from the given month onward
    Change {
        id: u64,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        month: u32,
        #[command(flatten)]
        subscription: SubscriptionArgs,
    },
    /// Set a global assumption (churn, cac, upgraded-customers, upgrade-price-increase)
    Set { field: GlobalField, value: String },
    /// Show where the data file lives
    Path,
}

#[derive(ClapArgs, Debug)]
struct SubscriptionArgs {
    /// trial, basic, pro, enterprise or flex (implied by flex usage flags)
    #[arg(long, value_parser = parse_plan)]
    plan: Option<PlanChoice>,

    /// Flex usage: personas
    #[arg(long)]
    personas: Option<u32>,

    /// Flex usage: premium posts per month
    #[arg(long)]
    premium_posts: Option<u32>,

    /// Flex usage: regenerations per month
    #[arg(long)]
    regenerations: Option<u32>,

    /// Add-on as key=quantity, repeatable (e.g. --addon extra_seat=2)
    #[arg(long = "addon", value_parser = parse_addon)]
    addons: Vec<(Addon, u32)>,
}

impl SubscriptionArgs {
    fn flex_usage(&self) -> Option<FlexUsage> {
        if self.personas.is_none() && self.premium_posts.is_none() && self.regenerations.is_none() {
            return None;
        }
        let defaults = FlexUsage::default();
        Some(FlexUsage {
            personas: self.personas.unwrap_or(defaults.personas),
            premium_posts: self.premium_posts.unwrap_or(defaults.premium_posts),
            regenerations: self.regenerations.unwrap_or(defaults.regenerations),
        })
    }

    fn addons(&self) -> Option<Addons> {
        if self.addons.is_empty() {
            return None;
        }
        Some(
            self.addons
                .iter()
                .filter(|(_, quantity)| *quantity > 0)
                .map(|(addon, quantity)| (addon.key().to_string(), *quantity))
                .collect(),
        )
    }

    fn into_patch(self) -> SubscriptionPatch {
        SubscriptionPatch {
            plan: self.plan,
            flex_usage: self.flex_usage(),
            addons: self.addons(),
        }
    }
}

fn parse_plan(raw: &str) -> std::result::Result<PlanChoice, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_lowercase()))
        .map_err(|_| {
            let known: Vec<String> = Plan::ALL.iter().map(|p| p.display_name().to_lowercase()).collect();
            format!("unknown plan '{}' (known: {}, flex)", raw, known.join(", "))
        })
}

fn parse_addon(raw: &str) -> std::result::Result<(Addon, u32), String> {
    let (key, quantity) = raw.split_once('=').unwrap_or((raw, "1"));
    let addon = Addon::from_key(key).ok_or_else(|| {
        let known: Vec<&str> = Addon::ALL.iter().map(|a| a.key()).collect();
        format!("unknown add-on '{}' (known: {})", key, known.join(", "))
    })?;
    let quantity = quantity
        .parse()
        .map_err(|_| format!("invalid quantity '{}'", quantity))?;
    Ok((addon, quantity))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = StorageConfig::from_env();
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir);
    }
    let store = Arc::new(JsonFileStore::from_config(&config));
    let mut workspace = Workspace::load(store.as_ref())
        .with_autosave(Autosaver::spawn(store.clone(), config.debounce));

    match cli.command {
        Command::List => {
            let last_month = workspace.assumptions().months.saturating_sub(1);
            println!("{:>4}  {:<24} {:>5} {:>6}  {:<10} {:>8}", "ID", "Name", "Start", "Paused", "Plan", "MRR");
            for client in workspace.registry().iter() {
                let current = resolve_subscription(client, last_month.max(client.start_month));
                println!(
                    "{:>4}  {:<24} {:>5} {:>6}  {:<10} {:>8.0}",
                    client.id,
                    client.name,
                    client.start_month + 1,
                    client.paused_at.map_or("-".to_string(), |m| (m + 1).to_string()),
                    current.plan_choice().display_name(),
                    monthly_revenue(&current),
                );
                for (month, patch) in &client.overrides {
                    println!("{:>4}  from month {}: {:?}", "", month + 1, patch);
                }
            }
        }
        Command::Add { name, start_month, subscription } => {
            let patch = subscription.into_patch();
            let base = SubscriptionState::from_patch(&patch);
            let id = workspace.add_client(&name, start_month - 1, base);
            println!("Added client {} ({})", id, name);
        }
        Command::Remove { id } => {
            let removed = workspace.remove_client(id)?;
            println!("Removed client {} ({})", removed.id, removed.name);
        }
        Command::Pause { id, month } => {
            workspace.pause_client(id, month - 1)?;
            println!("Client {} paused from month {}", id, month);
        }
        Command::Unpause { id } => {
            workspace.unpause_client(id)?;
            println!("Client {} resumed", id);
        }
        Command::Rename { id, name } => {
            workspace.rename_client(id, &name)?;
            println!("Client {} renamed to {}", id, name);
        }
        Command::Change { id, month, subscription } => {
            let patch = subscription.into_patch();
            if patch.is_empty() {
                bail!("Nothing to change: pass --plan, flex usage or --addon");
            }
            workspace.update_subscription(id, month - 1, patch)?;
            println!("Client {} updated from month {}", id, month);
        }
        Command::Set { field, value } => {
            workspace.set_assumption(field, &value);
            println!("{} set to {}", field, value);
        }
        Command::Path => {
            println!("{}", store.data_path().display());
        }
    }

    if !workspace.close().await {
        bail!("Failed to save {}", store.data_path().display());
    }
    Ok(())
}
