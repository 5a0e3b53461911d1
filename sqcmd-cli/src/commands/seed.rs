//! `sqcmd seed` command - Generate a seed stub.

use sqcmd_migrate::file::strip_extension;
use sqcmd_migrate::{str_to_case, write_new_file};

use crate::cli::SeedArgs;
use crate::error::CliResult;
use crate::output::{self, success};
use crate::templates::{self, TemplateKind};

/// Run the seed command
pub async fn run(args: SeedArgs, env: &str) -> CliResult<()> {
    let (root, config) = super::load_project(env)?;

    let name = str_to_case(strip_extension(&args.name), config.migration.file_names);
    let mut dir = config.seeds_dir(&root);
    if let Some(prefix) = &args.prefix {
        dir = dir.join(prefix);
    }
    let path = dir.join(format!("{}.{}", name, TemplateKind::Seed.extension()));

    let template = templates::load(
        TemplateKind::Seed,
        args.template.as_deref(),
        config.templates_dir(&root).as_deref(),
    )?;
    write_new_file(&path, &template.replace("{{name}}", &name), args.force).await?;

    success(&format!("The seed {} was successfully created.", name));
    output::kv("Path", &path.display().to_string());

    Ok(())
}
