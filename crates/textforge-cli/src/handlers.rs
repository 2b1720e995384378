//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

use crate::cli::{CompletionsArgs, ConfigAction, ConfigArgs, ConfigFormat, ServeArgs, TransformArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use clap::CommandFactory;
use serde::Serialize;
use std::io::{self, IsTerminal, Read};
use textforge_core::{PipelineBuilder, TransformKind};
use textforge_server::ApiState;
use tracing::{debug, info};

/// Structured result of the transform command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransformOutput<'a> {
    transformed_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stages: Option<Vec<&'a str>>,
}

/// One row of the transformation listing
#[derive(Debug, Serialize)]
struct TransformInfo {
    name: &'static str,
    description: &'static str,
}

/// Handle the transform command, reading stdin when no text is given
pub fn handle_transform(
    args: TransformArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let reads_stdin = matches!(args.text.as_deref(), None | Some("-"));
    if reads_stdin && io::stdin().is_terminal() {
        return Err(Error::invalid_args(
            "no TEXT given and stdin is a terminal; pass TEXT or pipe input",
        ));
    }
    transform_with_input(args, config, io::stdin().lock(), output)
}

/// Transform `args.text`, or the contents of `input` when the text is absent or `-`
fn transform_with_input<R: Read>(
    args: TransformArgs,
    config: &Config,
    mut input: R,
    output: &mut OutputWriter,
) -> Result<()> {
    let text = match args.text {
        Some(text) if text != "-" => text,
        _ => {
            let mut buffer = String::new();
            input.read_to_string(&mut buffer)?;
            strip_trailing_newline(buffer)
        }
    };

    let pipeline = PipelineBuilder::new()
        .names(args.transforms)
        .fallback(config.defaults.transforms.iter().cloned())
        .build()?;

    let _timer = Timer::with_details("transform", &pipeline.names().join(","));
    debug!(stages = ?pipeline.names(), chars = text.chars().count(), "applying pipeline");
    let transformed_text = pipeline.apply(&text);

    if output.is_human() {
        if args.explain {
            output.section("Pipeline")?;
            if pipeline.is_empty() {
                output.info("(identity)")?;
            }
            for (index, kind) in pipeline.stages().iter().enumerate() {
                output.info(&format!("{}. {} - {}", index + 1, kind, kind.description()))?;
            }
            output.section("Result")?;
        }
        output.writeln(&transformed_text)
    } else {
        output.data(&TransformOutput {
            transformed_text,
            stages: args.explain.then(|| pipeline.names()),
        })
    }
}

/// Drop a single trailing line ending added by shells and `echo`
fn strip_trailing_newline(mut text: String) -> String {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    text
}

/// Handle the list command
pub fn handle_list(output: &mut OutputWriter) -> Result<()> {
    let kinds = TransformKind::ALL.iter().map(|kind| TransformInfo {
        name: kind.name(),
        description: kind.description(),
    });

    if output.is_human() {
        let rows = kinds
            .map(|info| vec![info.name.to_string(), info.description.to_string()])
            .collect();
        output.table(&["Name", "Description"], rows)
    } else {
        output.data(&kinds.collect::<Vec<_>>())
    }
}

/// Handle the serve command
pub async fn handle_serve(args: ServeArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let mut server_config = config.server.clone();
    if let Some(listen) = args.listen {
        server_config.listen_addr = listen;
    }
    if args.no_cors {
        server_config.cors.enabled = false;
    }

    let state = ApiState::new(&config.defaults.transforms)?;
    info!(
        listen_addr = %server_config.listen_addr,
        defaults = ?state.defaults().names(),
        cors = server_config.cors.enabled,
        "starting HTTP adapter"
    );
    output.info(&format!("Serving on {}", server_config.listen_addr))?;

    let _timer = Timer::new("serve");
    textforge_server::serve(server_config, state).await?;

    output.success("Server stopped")
}

/// Handle the config command
pub fn handle_config(
    args: ConfigArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show(show) => {
            let rendered = match show.format {
                ConfigFormat::Yaml => serde_yaml::to_string(config)?,
                ConfigFormat::Json => serde_json::to_string_pretty(config)? + "\n",
                ConfigFormat::Toml => toml::to_string_pretty(config)?,
            };
            output.write(&rendered)
        }
        ConfigAction::Init(init) => {
            let path = match (init.path, init.project) {
                (Some(path), _) => path,
                (None, true) => Config::project_config_path(),
                (None, false) => Config::user_config_path()
                    .ok_or_else(|| Error::config("no user configuration directory on this platform"))?,
            };

            if path.exists() {
                if !init.force {
                    return Err(Error::config(format!(
                        "{} already exists; pass --force to overwrite it",
                        path.display()
                    )));
                }
                output.warning(&format!("Overwriting {}", path.display()))?;
            }

            Config::default().save(&path)?;
            output.success(&format!("Wrote default configuration to {}", path.display()))
        }
        ConfigAction::Validate => {
            config.validate()?;
            if output.is_human() {
                output.success("Configuration is valid")
            } else {
                output.data(&serde_json::json!({
                    "valid": true,
                    "defaults": config.defaults.transforms,
                    "listenAddr": config.server.listen_addr,
                }))
            }
        }
    }
}

/// Handle the completions command
pub fn handle_completions(args: CompletionsArgs, output: &mut OutputWriter) -> Result<()> {
    let mut cmd = crate::cli::Cli::command();
    let name = cmd.get_name().to_string();

    clap_complete::generate(args.shell.to_clap_shell(), &mut cmd, name, output.raw());
    Ok(())
}
