use std::{env, path::PathBuf};

use anyhow::Context;

use calendar_util::{
    backend::{Catalog, default_categories},
    storage::config::Config,
    ui::color::{BlueChannel, Color, border_color_with, text_color_with},
};

pub const USAGE: &str =
    "Usage: calendar-util [--config PATH] contrast [--mirror-green | --independent-blue] COLOR...\n       calendar-util [--config PATH] categories";

#[derive(Debug, Clone, PartialEq)]
pub enum CliMode {
    Contrast {
        colors: Vec<String>,
        blue: Option<BlueChannel>,
    },
    Categories,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub mode: CliMode,
}

pub fn parse_cli_mode() -> Result<CliArgs, String> {
    parse_args(env::args().skip(1))
}

pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut config = None;
    let mut command = None;
    let mut colors = Vec::new();
    let mut blue = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| "--config needs a path".to_string())?;
                config = Some(PathBuf::from(path));
            }
            "--mirror-green" => blue = Some(BlueChannel::MirrorGreen),
            "--independent-blue" => blue = Some(BlueChannel::Independent),
            "--help" | "-h" => command = Some("help".to_string()),
            "contrast" | "categories" if command.is_none() => command = Some(arg.clone()),
            _ if command.as_deref() == Some("contrast") && !arg.starts_with("--") => colors.push(arg.clone()),
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
    }

    let mode = match command.as_deref() {
        Some("contrast") if colors.is_empty() => {
            return Err("contrast needs at least one COLOR".to_string());
        }
        Some("contrast") => CliMode::Contrast { colors, blue },
        Some("categories") => CliMode::Categories,
        _ => CliMode::Help,
    };

    Ok(CliArgs { config, mode })
}

pub fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Config::load_or_create().context("loading default config"),
    }
}

pub fn run_contrast(config: &Config, colors: &[String], blue: Option<BlueChannel>) -> anyhow::Result<()> {
    let blue = blue.unwrap_or(config.colors.blue_channel);
    for input in colors {
        let background = Color::from_hex(input)?;
        println!("{}", format_contrast_line(background, blue));
    }
    Ok(())
}

pub fn format_contrast_line(background: Color, blue: BlueChannel) -> String {
    format!(
        "{}  text {}  border {}",
        background,
        text_color_with(background, blue),
        border_color_with(background, blue)
    )
}

pub fn run_categories(config: &Config) -> anyhow::Result<()> {
    let catalog = match &config.l10n.catalog {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("loading translations from {}", path.display()))?,
        None => Catalog::new(),
    };

    for category in default_categories(&catalog) {
        println!("{category}");
    }
    Ok(())
}
