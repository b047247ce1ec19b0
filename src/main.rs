//! settings-tree
//!
//! Resolves layered YAML settings (primary document, scope, local override,
//! explicit assignments, environment) and prints the result.

use anyhow::{Result, bail};
use clap::Parser;
use settings_tree::cli::{Cli, Command, GetArgs, KeysArgs, ShowArgs, split_path};
use settings_tree::config::Settings;
use settings_tree::format::{format_sources, render_node, render_setting};
use settings_tree::logging::{LogTarget, init_logging};
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&LogTarget::parse(&cli.log), cli.verbose)?;

    let settings = cli.settings_builder()?.build()?;
    debug!(
        stages = settings.sources().len(),
        entries = settings.root().len(),
        "Settings resolved"
    );

    let output = match cli.command.unwrap_or(Command::Show(ShowArgs::default())) {
        Command::Show(args) => render_node(settings.root(), args.format)?,
        Command::Get(args) => get(&settings, &args)?,
        Command::Keys(args) => keys(&settings, &args)?,
        Command::Sources => format_sources(settings.sources()).trim_end().to_string(),
    };
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

fn get(settings: &Settings, args: &GetArgs) -> Result<String> {
    let keys = split_path(&args.path);
    let Some(setting) = settings.dig(&keys) else {
        bail!("no setting at '{}'", args.path);
    };
    Ok(render_setting(setting, args.format)?)
}

fn keys(settings: &Settings, args: &KeysArgs) -> Result<String> {
    let node = match &args.path {
        None => settings.root(),
        Some(path) => match settings.dig(split_path(path)) {
            Some(setting) => match setting.as_node() {
                Some(node) => node,
                None => bail!("setting at '{path}' is not a section"),
            },
            None => bail!("no setting at '{path}'"),
        },
    };
    Ok(node
        .keys()
        .map(|key| key.as_str())
        .collect::<Vec<_>>()
        .join("\n"))
}
