//! Profile management commands.

use anyhow::{Result, bail};

use crate::{cli::AppContext, config::CliConfig};

pub fn handle(ctx: &AppContext, args: super::ProfileArgs) -> Result<()> {
    match args.command {
        super::ProfileCommands::List => {
            let config = CliConfig::load()?;
            let names: Vec<&String> = config.profiles.keys().collect();
            ctx.output.emit_array(&names)
        }
        super::ProfileCommands::Show { name } => {
            let config = CliConfig::load()?;
            let profile = config.profile(&name)?;
            ctx.output.emit_value(&profile)
        }
        super::ProfileCommands::Set {
            name,
            api_key,
            core_url,
            ingestion_url,
            queryflow_url,
            staging_url,
        } => {
            let mut config = CliConfig::load()?;
            let profile = config.profiles.entry(name).or_default();
            if api_key.is_some() {
                profile.api_key = api_key;
            }
            if core_url.is_some() {
                profile.core_url = core_url;
            }
            if ingestion_url.is_some() {
                profile.ingestion_url = ingestion_url;
            }
            if queryflow_url.is_some() {
                profile.queryflow_url = queryflow_url;
            }
            if staging_url.is_some() {
                profile.staging_url = staging_url;
            }
            let updated = profile.clone();
            config.save()?;
            ctx.output.emit_value(&updated)
        }
        super::ProfileCommands::Remove { name } => {
            let mut config = CliConfig::load()?;
            if config.profiles.remove(&name).is_none() {
                bail!("profile {name:?} is not defined");
            }
            config.save()
        }
    }
}
