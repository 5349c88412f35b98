//! The `coursecraft explain` and `coursecraft prereqs` commands.

use std::path::PathBuf;

use anyhow::Result;

use coursecraft_core::traits::CatalogSource;
use coursecraft_providers::load_config_from;

/// Which question to put to the tutor.
#[derive(Debug, Clone, Copy)]
pub enum Ask {
    Explain,
    Prerequisites,
}

pub async fn execute(
    ask: Ask,
    subject_id: String,
    course_id: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let catalog = super::build_catalog(&config)?;
    let tutor = super::build_tutor(&config, None, None)?;

    let details = catalog.fetch_course_details(&subject_id, &course_id).await?;
    println!("{}", details.describe());
    println!();

    let (heading, answer) = match ask {
        Ask::Explain => ("Explanation", tutor.explain_course(&details).await?),
        Ask::Prerequisites => ("Preparation", tutor.suggest_prerequisites(&details).await?),
    };
    println!("{heading}:");
    println!("{answer}");

    Ok(())
}
