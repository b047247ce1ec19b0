//! Output formatting for resolved settings.

use crate::config::{AppliedSource, ConfigNode, OverrideStage, Setting};
use crate::error::Result;
use clap::ValueEnum;
use serde_yaml::Value;

/// Output format for settings dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Render a whole tree.
pub fn render_node(node: &ConfigNode, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => {
            if node.is_empty() {
                return Ok("{}".to_string());
            }
            Ok(serde_yaml::to_string(node)?.trim_end().to_string())
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(node)?),
    }
}

/// Render a single setting. Plain strings are printed without quoting.
pub fn render_setting(setting: &Setting, format: OutputFormat) -> Result<String> {
    match setting {
        Setting::Node(node) => render_node(node, format),
        Setting::Scalar(Value::String(text)) => Ok(text.clone()),
        Setting::Scalar(value) => match format {
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?.trim_end().to_string()),
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
        },
    }
}

/// One line per contributing stage.
pub fn format_sources(sources: &[AppliedSource]) -> String {
    let mut out = String::new();
    for source in sources {
        let origin = source
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(in memory)".to_string());
        let unit = match source.stage {
            OverrideStage::Environment => "variables",
            _ => "entries",
        };
        out.push_str(&format!(
            "{:<12} {} ({} {})\n",
            source.stage.to_string(),
            origin,
            source.entries,
            unit
        ));
    }
    out
}
