use std::path::PathBuf;

use anyhow::Error;
use clap::Parser;
use console::style;

use ci_output::CiOutput;
use container::Container;
use image_reference::ImageReference;
use inspector::{ImageInspector, SkopeoInspector};
use layer_matcher::{MatchPolicy, MatchReport};

pub const MATCH_OUTPUT_KEY: &str = "match";

fn trimmed(s: &str) -> Result<String, String> {
    Ok(s.trim().to_string())
}

#[derive(Parser, Debug)]
#[clap(name = "layer check app")]
pub struct Opt {
    /// Image expected to be built on top of the parent.
    #[clap(long, env = "CONTAINER", value_parser = trimmed)]
    pub container: String,

    /// Purported base image.
    #[clap(long, env = "PARENT", value_parser = trimmed)]
    pub parent: String,

    #[clap(long, env = "GITHUB_OUTPUT")]
    pub github_output: Option<PathBuf>,

    #[clap(long, env = "LAYER_MATCH_POLICY", value_enum, default_value_t = MatchPolicy::AnyCommonLayer)]
    pub policy: MatchPolicy,

    #[clap(long, env = "SKOPEO_PATH", default_value = inspector::skopeo::DEFAULT_SKOPEO_BINARY)]
    pub skopeo_path: String,

    #[clap(long, default_value = inspector::skopeo::DEFAULT_OVERRIDE_OS)]
    pub override_os: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub container: ImageReference,
    pub parent: ImageReference,
    pub report: MatchReport,
}

impl CheckOutcome {
    pub fn matched(&self) -> bool {
        self.report.matched
    }
}

/// The result line, with a coloured mark in front only on an interactive terminal.
pub fn summary_line(report: &MatchReport, styled: bool) -> String {
    if !styled {
        return report.summary().to_string();
    }
    let mark = if report.matched {
        style("✔").green()
    } else {
        style("x").red()
    };
    format!("{} {}", mark, report.summary())
}

pub async fn check_main(opt: Opt) -> Result<CheckOutcome, Error> {
    let inspector = SkopeoInspector::new(&opt.skopeo_path, &opt.override_os);
    let sink = CiOutput::from_env_path(opt.github_output.clone());
    check_with_inspector(&opt, &inspector, &sink).await
}

pub async fn check_with_inspector<I>(
    opt: &Opt,
    inspector: &I,
    sink: &CiOutput,
) -> Result<CheckOutcome, Error>
where
    I: ImageInspector + ?Sized,
{
    let container = Container::new(&opt.container, inspector);
    let parent = Container::new(&opt.parent, inspector);

    let (container_layers, parent_layers) = tokio::try_join!(container.layers(), parent.layers())?;

    println!(
        "Checking if \"{}\" has common layers with \"{}\"",
        container.image(),
        parent.image()
    );

    let report = layer_matcher::evaluate(opt.policy, container_layers, parent_layers);
    tracing::info!(
        policy = %report.policy,
        common_layers = report.common_layers,
        required_common_layers = ?report.required_common_layers,
        container_layers = container_layers.len(),
        parent_layers = parent_layers.len(),
        "Evaluated layer match"
    );
    println!(
        "{}",
        summary_line(&report, console::Term::stdout().is_term())
    );

    let value = if report.matched { "true" } else { "false" };
    println!("Setting \"{}\" to \"{}\"", MATCH_OUTPUT_KEY, value);
    sink.set(MATCH_OUTPUT_KEY, value)?;

    Ok(CheckOutcome {
        container: container.image().clone(),
        parent: parent.image().clone(),
        report,
    })
}

pub mod ci_output;
pub mod container;
pub mod container_specs;
pub mod image_reference;
pub mod inspector;
pub mod layer_matcher;
