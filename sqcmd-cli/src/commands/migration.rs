//! `sqcmd migration` command - Generate a migration from model changes.

use sqcmd_migrate::{
    FileSnapshotStore, Generated, MigrationFileManager, MigrationGenerator, ModelLoader, str_to_case,
};

use crate::cli::MigrationArgs;
use crate::error::CliResult;
use crate::output::{self, success};
use crate::templates::{self, TemplateKind};

/// Run the migration command
pub async fn run(args: MigrationArgs, env: &str) -> CliResult<()> {
    let (root, config) = super::load_project(env)?;
    let settings = &config.migration;
    let migrations_dir = config.migrations_dir(&root);

    let template = templates::load(
        TemplateKind::Migration,
        args.template.as_deref(),
        config.templates_dir(&root).as_deref(),
    )?;

    let generator = MigrationGenerator::new(
        config.generator_config(),
        FileSnapshotStore::new(&migrations_dir),
        MigrationFileManager::new(&migrations_dir)
            .file_names(settings.file_names)
            .force(args.force),
    );

    if args.stub {
        let file = generator.stub(&args.name, &template).await?;
        success(&format!("The migration {} was successfully created.", file.identifier()));
        output::kv("Path", &file.path.display().to_string());
        return Ok(());
    }

    let models = ModelLoader::new(config.models_dir(&root))
        .files_filter(&settings.files_filter)?
        .model_names(settings.model_names)
        .load()
        .await?;

    let selection: Vec<String> = args
        .model
        .iter()
        .map(|name| str_to_case(name.trim(), settings.model_names))
        .collect();
    let selection = (!selection.is_empty()).then_some(selection.as_slice());

    match generator.generate(&args.name, &template, &models, selection).await? {
        Generated::NoChanges(plan) => {
            let report = plan.report();
            let mut lines = report.lines();
            if let Some(first) = lines.next() {
                output::warn(first);
            }
            for line in lines {
                output::dim(line);
            }
        }
        Generated::Written { plan, file } => {
            success(&format!("The migration {} was successfully created.", file.identifier()));
            output::report(&plan.report());
            output::kv("Path", &file.path.display().to_string());
        }
    }

    Ok(())
}
