//! Tables command - prints the project's table list

use anyhow::Context;

use crate::config::AppConfig;

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let context = crate::create_meta_context(config)?;
    let project_id = context
        .project_id()
        .context("api.project_id must be set to list tables")?;

    let tables = context.client.list_tables(project_id).await?;
    for table in &tables {
        println!("{}\t{}", table.id, table.title);
    }

    Ok(())
}
