//! Server commands: the shared CRUD handlers plus the lifecycle actions
//! (ping/halt/start), which resolve their target by name or id before
//! invoking the action endpoint.

use anyhow::{Context, Result};
use flowgate::prelude::*;

use crate::cli::{AppContext, entity};

pub async fn handle(ctx: &AppContext, args: super::ServerArgs) -> Result<()> {
    let client = ctx.client.entities(EntityKind::Server)?;
    match args.command {
        super::ServerCommands::Store { input } => entity::store(ctx, &client, input).await,
        super::ServerCommands::Get { name_or_id } => {
            let server = resolve_name_or_id(&client, &name_or_id).await?;
            ctx.output.emit_value(&server)
        }
        super::ServerCommands::List { query, max } => {
            let servers = client.search(query.as_deref(), max).await?;
            ctx.output.emit_value(&servers)
        }
        super::ServerCommands::Delete { name_or_id } => {
            entity::delete(ctx, &client, &name_or_id).await
        }
        super::ServerCommands::Ping { name_or_id } => {
            lifecycle(ctx, &client, &name_or_id, "ping").await
        }
        super::ServerCommands::Halt { name_or_id } => {
            lifecycle(ctx, &client, &name_or_id, "halt").await
        }
        super::ServerCommands::Start { name_or_id } => {
            lifecycle(ctx, &client, &name_or_id, "start").await
        }
    }
}

async fn lifecycle(
    ctx: &AppContext,
    client: &EntityClient,
    name_or_id: &str,
    action: &str,
) -> Result<()> {
    let server = resolve_name_or_id(client, name_or_id).await?;
    let id = entity_id(&server)
        .map(str::to_string)
        .with_context(|| format!("server {name_or_id:?} has no id"))?;
    let result = client
        .invoke(&id, action)
        .await
        .with_context(|| format!("Could not {action} server {name_or_id:?}"))?;
    ctx.output.emit_value(&result)
}
