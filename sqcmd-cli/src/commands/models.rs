//! `sqcmd models` command - Show the normalized snapshot of every model.

use indexmap::IndexMap;

use sqcmd_migrate::{ModelLoader, ModelSnapshot, snapshot_model};

use crate::cli::ModelsArgs;
use crate::error::CliResult;
use crate::output::{self, kv};

/// Run the models command
pub async fn run(args: ModelsArgs, env: &str) -> CliResult<()> {
    let (root, config) = super::load_project(env)?;
    let settings = &config.migration;
    let models_dir = config.models_dir(&root);

    let models = ModelLoader::new(&models_dir)
        .files_filter(&settings.files_filter)?
        .model_names(settings.model_names)
        .load()
        .await?;

    let generator_config = config.generator_config();
    let snapshots: IndexMap<String, ModelSnapshot> = models
        .iter()
        .map(|(name, model)| (name.clone(), snapshot_model(&generator_config, model)))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
        return Ok(());
    }

    output::header("Models");

    if snapshots.is_empty() {
        output::info(&format!("No models found in {}", models_dir.display()));
        return Ok(());
    }

    for snapshot in snapshots.values() {
        output::section(&snapshot.name);
        for (column, record) in &snapshot.attributes {
            let mut description = record.data_type.to_string();
            if !record.constraints.is_empty() {
                description.push(' ');
                description.push_str(&serde_json::to_string(&record.constraints)?);
            }
            kv(column, &description);
        }
        for (key, value) in &snapshot.options {
            output::list_item(&format!("{} = {}", key, serde_json::to_string(value)?));
        }
        output::newline();
    }

    output::dim(&format!("{} model(s)", snapshots.len()));
    Ok(())
}
