//! Turns a [`PlanResult`] into files on disk: per-group staging directories,
//! one PBS job file per job, GNU parallel work lists for multi-node jobs and
//! a `submit.sh` that queues everything.

pub mod pbs;
pub mod stage;

use crate::core::{Job, PlanResult};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub use pbs::{render_submit, JobTemplate};
pub use stage::{check_stageable, stage_group};

pub const SUBMIT_SCRIPT: &str = "submit.sh";

/// A job's files before they are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedJob {
    pub job_file: PathBuf,
    pub contents: String,
    /// Work list path and contents, for jobs spanning several groups
    pub worklist: Option<(PathBuf, String)>,
}

/// Paths of everything [`ScriptWriter::write`] produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenPlan {
    pub subset_dirs: Vec<PathBuf>,
    pub job_files: Vec<PathBuf>,
    pub worklists: Vec<PathBuf>,
    pub submit_script: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ScriptWriter {
    template: JobTemplate,
    save_path: PathBuf,
    stage_path: PathBuf,
}

impl ScriptWriter {
    pub fn new(template: JobTemplate, save_path: PathBuf, stage_path: PathBuf) -> Self {
        Self {
            template,
            save_path,
            stage_path,
        }
    }

    pub fn subset_dir(&self, group: usize) -> PathBuf {
        self.stage_path.join(format!("subset{group}"))
    }

    pub fn output_dir(&self, group: usize) -> PathBuf {
        self.save_path.join(format!("subset{group}"))
    }

    pub fn submit_script(&self) -> PathBuf {
        self.stage_path.join(SUBMIT_SCRIPT)
    }

    /// Renders a job without touching the filesystem.
    pub fn render_job(&self, job: &Job) -> RenderedJob {
        if !job.is_multi_group() {
            let group = job.first_group();
            return RenderedJob {
                job_file: self.stage_path.join(format!("subset{group}.pbs")),
                contents: self.template.render_single(
                    group,
                    &self.subset_dir(group),
                    &self.output_dir(group),
                ),
                worklist: None,
            };
        }

        let worklist_path = self.stage_path.join(format!("job{}.cmd", job.index));
        let nodelist = self
            .stage_path
            .join(format!("nodelist_job{}.txt", job.index));
        let worklist: String = job
            .groups
            .clone()
            .map(|group| {
                self.template
                    .command(&self.subset_dir(group), &self.output_dir(group))
            })
            .collect();

        RenderedJob {
            job_file: self.stage_path.join(format!("job{}.pbs", job.index)),
            contents: self.template.render_multi(
                job.node_count,
                job.first_group(),
                job.last_group(),
                &nodelist,
                &worklist_path,
            ),
            worklist: Some((worklist_path, worklist)),
        }
    }

    /// Stages every group and writes job files, work lists and the submit
    /// script under the staging directory.
    ///
    /// Link names and subset directories are checked for every group before
    /// the first directory is created.
    pub fn write(&self, plan: &PlanResult) -> Result<WrittenPlan> {
        check_stageable(&plan.groups)?;
        for group in &plan.groups {
            let dir = self.subset_dir(group.index);
            if dir.exists() {
                bail!(
                    "Staging directory '{}' already exists; refusing to mix runs",
                    dir.display()
                );
            }
        }

        fs::create_dir_all(&self.stage_path).with_context(|| {
            format!(
                "Failed to create staging directory '{}'",
                self.stage_path.display()
            )
        })?;

        let mut written = WrittenPlan::default();

        for group in &plan.groups {
            let dir = self.subset_dir(group.index);
            stage_group(group, &dir)?;
            written.subset_dirs.push(dir);
        }

        for job in &plan.jobs {
            let rendered = self.render_job(job);
            if let Some((path, contents)) = &rendered.worklist {
                write_file(path, contents)?;
                written.worklists.push(path.clone());
            }
            write_file(&rendered.job_file, &rendered.contents)?;
            tracing::debug!(job = job.index, file = %rendered.job_file.display(), "Wrote job file");
            written.job_files.push(rendered.job_file);
        }

        let submit = self.submit_script();
        write_file(&submit, &render_submit(&written.job_files))?;
        written.submit_script = submit;

        tracing::info!(
            jobs = written.job_files.len(),
            stage = %self.stage_path.display(),
            "Wrote job scripts"
        );
        Ok(written)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write '{}'", path.display()))
}
