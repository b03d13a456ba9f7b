//! Bucket commands. Create is apply-style: a bucket that already exists
//! (HTTP 409) has its index set reconciled instead of failing.

use anyhow::{Context, Result};
use flowgate::prelude::*;

use crate::{cli::AppContext, input};

pub async fn handle(ctx: &AppContext, args: super::BucketArgs) -> Result<()> {
    let client = ctx.client.buckets()?;
    match args.command {
        super::BucketCommands::Create { data, files } => {
            let values = input::collect_entities(data.as_deref(), &files)?;
            let mut specs = Vec::with_capacity(values.len());
            for value in values {
                let spec: BucketSpec = serde_json::from_value(value)
                    .context("could not parse bucket definition")?;
                specs.push(spec);
            }
            let mut results = Vec::with_capacity(specs.len());
            for spec in &specs {
                // index reconciliation failures are fatal, unlike entity upserts
                results.push(apply_bucket(&client, spec).await?);
            }
            ctx.output.emit_array(&results)
        }
        super::BucketCommands::Get { name } => {
            let bucket = client.get(&name).await?;
            ctx.output.emit_value(&bucket)
        }
        super::BucketCommands::Dump { max } => {
            let buckets = client.list(max).await?;
            ctx.output.emit_value(&buckets)
        }
        super::BucketCommands::Delete { name } => {
            let ack = client.delete(&name).await?;
            ctx.output.emit_value(&ack)
        }
    }
}
