use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use octopilot_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

use crate::commands::CommandResult;

pub fn run(load: LoadOptions) -> CommandResult {
    let config_file_path = resolve_config_path(load.config_path.as_deref());
    let overrides = load.overrides.clone();

    let config = match AppConfig::load(load) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            );
        }
    };

    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, flag: Option<&str>, env_keys: &[&str]| {
        field_source(
            key_path,
            flag,
            env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        )
    };
    let flag = |set: bool, name: &'static str| set.then_some(name);

    let lines = [
        "effective config (source precedence: flag > env > file > default):".to_string(),
        render_line(
            "octopus.url",
            &config.octopus.url,
            source(
                "octopus.url",
                flag(overrides.octopus_url.is_some(), "--octopus-url"),
                &["OCTOPILOT_OCTOPUS_URL"],
            ),
        ),
        render_line(
            "octopus.space_id",
            &config.octopus.space_id,
            source(
                "octopus.space_id",
                flag(overrides.space_id.is_some(), "--space-id"),
                &["OCTOPILOT_OCTOPUS_SPACE_ID"],
            ),
        ),
        render_line(
            "octopus.space_name",
            &config.octopus.space_name,
            source(
                "octopus.space_name",
                flag(overrides.space_name.is_some(), "--space-name"),
                &["OCTOPILOT_OCTOPUS_SPACE_NAME"],
            ),
        ),
        render_line(
            "logging.level",
            &config.logging.level,
            source(
                "logging.level",
                flag(overrides.log_level.is_some(), "--log-level"),
                &["OCTOPILOT_LOGGING_LEVEL", "OCTOPILOT_LOG_LEVEL"],
            ),
        ),
        render_line(
            "logging.format",
            &format!("{:?}", config.logging.format),
            source(
                "logging.format",
                flag(overrides.log_format.is_some(), "--log-format"),
                &["OCTOPILOT_LOGGING_FORMAT", "OCTOPILOT_LOG_FORMAT"],
            ),
        ),
    ];

    CommandResult::output(lines.join("\n"))
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    flag: Option<&str>,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(flag) = flag {
        return format!("flag ({flag})");
    }

    let set_env_key = env_keys
        .iter()
        .find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()));
    if let Some(env_key) = set_env_key {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("config file"));
            return format!("file ({})", file_path.display());
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
