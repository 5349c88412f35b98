//! The `coursecraft catalog` command.

use std::io;
use std::path::PathBuf;

use anyhow::Result;

use coursecraft_core::navigator::CatalogNavigator;
use coursecraft_providers::load_config_from;

use crate::browser::{self, Assistant};

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let catalog = super::build_catalog(&config)?;

    // Browsing works without a provider; only the assist commands need one.
    let assistant: Assistant = super::build_tutor(&config, None, None).map_err(|e| format!("{e:#}"));
    if let Err(reason) = &assistant {
        tracing::info!(%reason, "browsing without AI assist");
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut nav = CatalogNavigator::new();
    browser::run(&mut nav, &catalog, &assistant, &mut input, &mut out).await
}
