//! JSON printer: pretty or compact, to stdout or a file.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Pretty,
    Quiet,
}

#[derive(Clone, Debug)]
pub struct Output {
    format: OutputFormat,
    path: Option<PathBuf>,
}

impl Output {
    pub fn new(format: OutputFormat, path: Option<PathBuf>) -> Self {
        Self { format, path }
    }

    /// Renders one JSON value.
    pub fn emit_value<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        if self.format == OutputFormat::Quiet {
            return Ok(());
        }
        let data = self.render(value).context("Could not print JSON object")?;
        self.write(&data)
    }

    /// Renders a sequence of JSON values as one array.
    pub fn emit_array<T: Serialize>(&self, values: &[T]) -> Result<()> {
        if self.format == OutputFormat::Quiet {
            return Ok(());
        }
        let data = self.render(values).context("Could not print JSON array")?;
        self.write(&data)
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, serde_json::Error> {
        match self.format {
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
            _ => serde_json::to_string(value),
        }
    }

    fn write(&self, data: &str) -> Result<()> {
        let mut output = data.to_string();
        if !output.ends_with('\n') {
            output.push('\n');
        }

        if let Some(path) = &self.path {
            fs::write(path, output).with_context(|| format!("write {}", path.display()))?;
        } else {
            print!("{output}");
        }
        Ok(())
    }
}
