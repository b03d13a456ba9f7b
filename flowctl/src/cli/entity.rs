//! Generic handlers shared by every entity kind. The capability interface
//! on the client side means credentials, secrets, servers, labels, and
//! seeds all flow through the same store/get/list/delete code.

use anyhow::{Context, Result};
use flowgate::prelude::*;

use crate::{cli::AppContext, input};

pub async fn handle(
    ctx: &AppContext,
    kind: EntityKind,
    command: super::EntityCommands,
) -> Result<()> {
    let client = ctx.client.entities(kind)?;
    match command {
        super::EntityCommands::Store { input } => store(ctx, &client, input).await,
        super::EntityCommands::Get { name_or_id } => {
            let entity = resolve_name_or_id(&client, &name_or_id).await?;
            ctx.output.emit_value(&entity)
        }
        super::EntityCommands::List { query, max } => {
            let entities = client.search(query.as_deref(), max).await?;
            ctx.output.emit_value(&entities)
        }
        super::EntityCommands::Delete { name_or_id } => delete(ctx, &client, &name_or_id).await,
    }
}

/// Bulk create-or-update from `--data`/`--file` input. The output is always
/// a JSON array, one element per input entity, so single-element and bulk
/// invocations print the same shape.
pub(crate) async fn store(
    ctx: &AppContext,
    client: &EntityClient,
    args: super::InputArgs,
) -> Result<()> {
    let entities = input::collect_entities(args.data.as_deref(), &args.files)?;
    let outcomes = upsert_entities(client, entities, args.abort_on_error)
        .await
        .context("Could not store entities")?;
    ctx.output.emit_array(&outcomes)
}

/// Resolves the target by name or id, then deletes it.
pub(crate) async fn delete(
    ctx: &AppContext,
    client: &EntityClient,
    name_or_id: &str,
) -> Result<()> {
    let entity = resolve_name_or_id(client, name_or_id).await?;
    let id = entity_id(&entity)
        .map(str::to_string)
        .with_context(|| format!("{} {name_or_id:?} has no id", client.kind()))?;
    let ack = client.delete(&id).await?;
    ctx.output.emit_value(&ack)
}
