//! Export/import commands: per-product aggregation with the outer bundle
//! packed or unpacked on this side.

use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{Context, Result, bail};
use flowgate::prelude::*;
use tracing::info;

use crate::{bundle, cli::AppContext};

pub async fn handle_export(ctx: &AppContext, args: super::ExportArgs) -> Result<()> {
    let clients = ctx.client.backup_clients();
    if clients.is_empty() {
        bail!("no bundle product is configured for this profile");
    }

    let outcome = export_products(&clients).await;

    // the result map is reported no matter how many products succeeded;
    // only writing the bundle itself can fail the command
    ctx.output.emit_value(&outcome.results)?;

    let path = args
        .file
        .unwrap_or_else(|| PathBuf::from(bundle::default_bundle_name()));
    bundle::write_bundle(&path, &outcome.entries).context("Could not export entities")?;
    info!("wrote bundle {}", path.display());
    Ok(())
}

pub async fn handle_import(ctx: &AppContext, args: super::ImportArgs) -> Result<()> {
    let archives = bundle::read_bundle(&args.file)?;
    let endpoints: BTreeMap<Product, BackupClient> =
        ctx.client.backup_clients().into_iter().collect();
    let results = import_entries(&endpoints, archives, args.on_conflict.to_policy()).await;
    ctx.output.emit_value(&results)
}
