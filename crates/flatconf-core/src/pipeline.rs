//! The load → merge → resolve → write pipeline

use std::path::PathBuf;

use crate::config::PipelineOptions;
use crate::env;
use crate::error::Result;
use crate::loader::Loader;
use crate::merge::merge;
use crate::property::ProfileMap;
use crate::writer;

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Profiles written, in name order
    pub profiles: Vec<String>,
    /// Files written, in the same order
    pub files: Vec<PathBuf>,
}

/// One conversion of an input directory into properties files
#[derive(Debug, Clone)]
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Compute the final properties of every profile without writing anything
    pub fn build(&self) -> Result<ProfileMap> {
        let conventions = &self.options.conventions;
        let loader = Loader::new(conventions.clone())?;

        let fragments = loader.load_all(&self.options.input_dir)?;
        let merged = merge(&fragments);

        match &self.options.env_dir {
            Some(env_dir) => env::resolve_from_dir(env_dir, &merged, conventions),
            None => Ok(merged),
        }
    }

    /// Run the whole pipeline and write the output files
    pub fn run(&self) -> Result<PipelineReport> {
        let profiles = self.build()?;
        if profiles.is_empty() {
            log::warn!(
                "No profiles found in {}; nothing to write",
                self.options.input_dir.display()
            );
        }

        let files = writer::write_all(
            &self.options.output_dir,
            &profiles,
            &self.options.conventions,
        )?;

        Ok(PipelineReport {
            profiles: profiles.into_keys().collect(),
            files,
        })
    }
}
