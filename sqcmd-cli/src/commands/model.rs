//! `sqcmd model` command - Generate a model definition file.

use tracing::warn;

use sqcmd_migrate::file::strip_extension;
use sqcmd_migrate::{ModelLoader, fill_model_template, format_properties, str_to_case, write_new_file};

use crate::cli::ModelArgs;
use crate::error::{CliError, CliResult};
use crate::output::{self, success};
use crate::templates::{self, TemplateKind};

/// Run the model command
pub async fn run(args: ModelArgs, env: &str) -> CliResult<()> {
    let (root, config) = super::load_project(env)?;
    let settings = &config.migration;

    let name = strip_extension(&args.name);
    let model_name = str_to_case(name, settings.model_names);
    let file_name = str_to_case(name, settings.file_names);

    let models_dir = config.models_dir(&root);
    let mut dir = models_dir.clone();
    if let Some(prefix) = &args.prefix {
        dir = dir.join(prefix);
    }
    let path = dir.join(format!("{}.{}", file_name, TemplateKind::Model.extension()));

    if !args.force {
        let loader = ModelLoader::new(&models_dir)
            .files_filter(&settings.files_filter)?
            .model_names(settings.model_names);
        match loader.load().await {
            Ok(existing) if existing.contains_key(&model_name) => {
                return Err(CliError::ModelExists(model_name));
            }
            Ok(_) => {}
            // An unreadable sibling should not block creating a new model.
            Err(e) => warn!(error = %e, "could not check existing models"),
        }
    }

    let properties = format_properties(&args.properties);
    if properties.is_none() {
        output::warn("No properties provided generating empty model.");
    }

    let template = templates::load(
        TemplateKind::Model,
        args.template.as_deref(),
        config.templates_dir(&root).as_deref(),
    )?;
    let content = fill_model_template(&template, &model_name, properties.as_deref(), None);
    write_new_file(&path, &content, args.force).await?;

    success(&format!("The model {} was successfully created.", model_name));
    output::kv("Path", &path.display().to_string());

    Ok(())
}
