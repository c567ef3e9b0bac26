use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Error};

/// Where step outputs are published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CiOutput {
    /// Appends `key=value` lines to the file named by `GITHUB_OUTPUT`.
    File(PathBuf),
    /// Prints the deprecated `::set-output` workflow command on stdout.
    Legacy,
}

impl CiOutput {
    pub fn from_env_path(path: Option<PathBuf>) -> CiOutput {
        match path {
            Some(p) if !p.as_os_str().is_empty() => CiOutput::File(p),
            _ => CiOutput::Legacy,
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        match self {
            CiOutput::File(path) => append_output(path, key, value),
            CiOutput::Legacy => {
                println!("{}", set_output_command(key, value));
                Ok(())
            }
        }
    }
}

fn append_output(path: &Path, key: &str, value: &str) -> Result<(), Error> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Unable to open output file {:?}", path))?;
    writeln!(file, "{}={}", key, value)?;
    Ok(())
}

pub fn set_output_command(key: &str, value: &str) -> String {
    format!("::set-output name={}::{}", key, value)
}

pub fn error_annotation(title: &str, message: &str) -> String {
    format!("::error title={}::{}", title, message)
}
