mod cli;

use crate::cli::{Command, LogFormat, CLI};
use anyhow::Context;
use clap::Parser;
use linkvault_core::{input, StorageRecord};
use linkvault_generator::RandomKeyGenerator;
use linkvault_service::{
    CreateParams, RedirectConfig, RedirectService, RequestContext, UpdateParams,
};
use linkvault_storage::InMemoryStore;
use serde_json::{json, Value};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

type Service = RedirectService<InMemoryStore, RandomKeyGenerator>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CLI::parse();
    init_tracing(cli.log_format);

    let config = RedirectConfig::builder()
        .table(cli.table.clone())
        .default_key_length(cli.default_key_length)
        .max_key_attempts(cli.max_key_attempts)
        .build();

    let store = load_state(&cli.state, &config.table)?;
    let generator = RandomKeyGenerator::from_config(&config)?;
    let service = RedirectService::new(store, generator, config)?;

    let output = run(&service, cli.command).await?;

    save_state(&cli.state, &service)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(service: &Service, command: Command) -> anyhow::Result<Value> {
    let ctx = RequestContext::now();

    let output = match command {
        Command::Create {
            namespace_id,
            domain,
            link,
            key_length,
            key,
            expiry,
            data,
        } => {
            let params = CreateParams {
                namespace_id,
                domain,
                original_link: link,
                key_length,
                key,
                expiry,
                supplementary_data: data,
            };
            serde_json::to_value(service.create(&ctx, params).await?)?
        }
        Command::Get { domain, key } => {
            serde_json::to_value(service.get_data(&domain, &key).await?)?
        }
        Command::Redirect { domain, key } => {
            serde_json::to_value(service.get_redirect_url(&domain, &key).await?)?
        }
        Command::Update {
            namespace_id,
            domain,
            key,
            expiry,
            remove_expiry,
            data,
        } => {
            let params = UpdateParams {
                namespace_id,
                domain,
                key,
                expiry,
                remove_expiry,
                supplementary_data: data,
            };
            json!({ "updated": service.update_data(&ctx, params).await? })
        }
        Command::Delete {
            namespace_id,
            domain,
            key,
        } => json!({ "deleted": service.delete_data(&namespace_id, &domain, &key).await? }),
        Command::Check { domain, key } => {
            json!({ "available": service.check_key_availability(&domain, &key).await? })
        }
        Command::ValidateKey { key } => {
            json!({ "valid": input::validate_url_key(service.config(), &key) })
        }
        Command::SanitizeKey { key } => {
            json!({ "key": input::sanitize_url_key(service.config(), &key) })
        }
    };

    Ok(output)
}

fn load_state(path: &Path, table: &str) -> anyhow::Result<InMemoryStore> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no state file, starting empty");
            return Ok(InMemoryStore::new());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };

    let records: Vec<StorageRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    info!(path = %path.display(), records = records.len(), "loaded state");
    Ok(InMemoryStore::with_records(table, records)?)
}

fn save_state(path: &Path, service: &Service) -> anyhow::Result<()> {
    let records = service.store().records(&service.config().table);
    let raw = serde_json::to_string_pretty(&records)?;
    std::fs::write(path, raw).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
