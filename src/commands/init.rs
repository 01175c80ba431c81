//! Configuration wizard.
//!
//! Walks through the tracker, summary service and Clio sections and writes
//! `config.json`. With `--delete` the configuration file and the stored Clio
//! token are removed instead.

use crate::api::clio::ClioConfig;
use crate::libs::config::{Config, CONFIG_FILE_NAME};
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::{msg_info, msg_success};
use anyhow::Result;
use clap::Args;
use std::fs;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Remove existing configuration instead of creating new one
    #[arg(short, long)]
    delete: bool,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    if init_args.delete {
        return delete();
    }

    Config::init()?.save()?;
    msg_success!(Message::ConfigSaved);
    Ok(())
}

fn delete() -> Result<()> {
    let path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
    if !path.exists() {
        msg_info!(Message::ConfigNotFound);
        return Ok(());
    }
    fs::remove_file(path)?;
    ClioConfig::token_secret().remove()?;
    msg_success!(Message::ConfigDeleted);
    Ok(())
}
