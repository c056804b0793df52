//! Get command - resolves a table through the cache

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::meta::TableMeta;

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Table id (e.g. md_xxxx) or title
    pub key: String,

    /// Bypass the cache and any in-flight fetch
    #[arg(long)]
    pub force: bool,

    /// Number of lookups to perform; repeats after the first are served from memory
    #[arg(long, default_value_t = 1)]
    pub repeat: usize,

    /// Print a column summary instead of the full JSON record
    #[arg(long)]
    pub columns: bool,
}

pub async fn run(config: &AppConfig, args: GetArgs) -> anyhow::Result<()> {
    let context = crate::create_meta_context(config)?;
    context.refresh_directory().await?;

    let mut last = None;
    for attempt in 1..=args.repeat.max(1) {
        let cached = context.cache.peek(&args.key).is_some();
        let force = args.force && attempt == 1;

        let record = context.cache.get(&args.key, force).await;
        info!(
            key = %args.key,
            attempt,
            from_memory = cached && !force,
            found = record.is_some(),
            "Lookup finished"
        );
        last = record;
    }

    let Some(record) = last else {
        anyhow::bail!("No metadata found for '{}'", args.key);
    };

    if args.columns {
        print!("{}", column_summary(&record));
    } else {
        println!("{}", serde_json::to_string_pretty(&*record)?);
    }

    Ok(())
}

/// Header with the primary key titles, then one line per column
fn column_summary(meta: &TableMeta) -> String {
    let primary_keys: Vec<&str> = meta
        .primary_keys()
        .map(|c| c.title.as_deref().unwrap_or("-"))
        .collect();

    let mut out = format!(
        "{} ({})\tpk: {}\n",
        meta.title.as_deref().unwrap_or("-"),
        meta.id.as_deref().unwrap_or("-"),
        primary_keys.join(", ")
    );
    for column in &meta.columns {
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            column.title.as_deref().unwrap_or("-"),
            column.column_name.as_deref().unwrap_or("-"),
            column.uidt.as_deref().unwrap_or("-"),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::meta::ColumnMeta;

    #[test]
    fn test_column_summary_lists_primary_keys() {
        let meta = TableMeta::new("md_1", "Users")
            .with_column(ColumnMeta {
                id: Some("cl_1".to_string()),
                title: Some("Id".to_string()),
                column_name: Some("id".to_string()),
                uidt: Some("ID".to_string()),
                pk: true,
                ..Default::default()
            })
            .with_column(ColumnMeta {
                id: Some("cl_2".to_string()),
                title: Some("Email".to_string()),
                uidt: Some("Email".to_string()),
                ..Default::default()
            });

        assert_eq!(
            column_summary(&meta),
            "Users (md_1)\tpk: Id\nId\tid\tID\nEmail\t-\tEmail\n"
        );
    }
}
