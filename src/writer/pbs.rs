use crate::config::Config;
use crate::core::ProcessingProfile;
use crate::utils::{format_duration, hours_to_duration};
use shell_escape::escape;
use std::borrow::Cow;
use std::path::Path;
use std::time::Duration;

/// Environment GNU parallel forwards to the remote nodes so module state and
/// OpenMP settings survive the ssh hop.
const PARALLEL_ENV: &str = "--workdir . --env PATH --env LD_LIBRARY_PATH --env LOADEDMODULES \
--env _LMFILES_ --env MODULE_VERSION --env MODULEPATH --env MODULEVERSION_STACK --env MODULESHOME \
--env OMP_DYNAMICS --env OMP_MAX_ACTIVE_LEVELS --env OMP_NESTED --env OMP_NUM_THREADS \
--env OMP_SCHEDULE --env OMP_STACKSIZE --env OMP_THREAD_LIMIT --env OMP_WAIT_POLICY";

/// Everything about a PBS job file that does not depend on the plan.
#[derive(Debug, Clone, PartialEq)]
pub struct JobTemplate {
    pub program: String,
    pub modules: Vec<String>,
    pub parallel_module: String,
    pub mail_events: String,
    pub job_name_prefix: String,
    pub ppn: u32,
    pub walltime: Duration,
    pub profile: ProcessingProfile,
}

fn quote(path: &Path) -> Cow<'_, str> {
    escape(path.to_string_lossy())
}

impl JobTemplate {
    /// Builds the template from configuration; the requested walltime is the
    /// target walltime times the configured buffer factor.
    pub fn from_config(config: &Config, profile: ProcessingProfile) -> Self {
        let walltime = hours_to_duration(
            config.throughput.target_walltime_hours * config.jobs.walltime_factor,
        );
        Self {
            program: config.processing.program.clone(),
            modules: config.processing.modules.clone(),
            parallel_module: config.processing.parallel_module.clone(),
            mail_events: config.jobs.mail_events.clone(),
            job_name_prefix: config.jobs.job_name_prefix.clone(),
            ppn: config.throughput.reference_parallelism,
            walltime,
            profile,
        }
    }

    pub fn preamble(&self, nodes: usize, name: &str) -> String {
        format!(
            "#!/bin/bash -l\n\
             #PBS -l nodes={nodes}:ppn={ppn},walltime={walltime}\n\
             #PBS -m {mail}\n\
             #PBS -j oe\n\
             #PBS -N {name}\n\
             \n",
            ppn = self.ppn,
            walltime = format_duration(self.walltime),
            mail = self.mail_events,
        )
    }

    /// One invocation of the processing program over a staged group.
    pub fn command(&self, input_dir: &Path, save_dir: &Path) -> String {
        let mut cmd = format!(
            "{} --cpu_threads_per_caller {} --input_path {} --save_path {}",
            self.program,
            self.ppn,
            quote(input_dir),
            quote(save_dir),
        );
        for arg in self.profile.command_args() {
            cmd.push(' ');
            cmd.push_str(&escape(Cow::from(arg)));
        }
        cmd.push('\n');
        cmd
    }

    fn module_loads(&self, with_parallel: bool) -> String {
        let parallel = with_parallel.then_some(&self.parallel_module);
        parallel
            .into_iter()
            .chain(&self.modules)
            .map(|module| format!("module load {module}\n"))
            .collect()
    }

    pub fn single_job_name(&self, group: usize) -> String {
        format!("{}_set{group}", self.job_name_prefix)
    }

    pub fn multi_job_name(&self, first: usize, last: usize) -> String {
        format!("{}_sets{first}.{last}", self.job_name_prefix)
    }

    /// Job file for a job that runs exactly one group on one node.
    pub fn render_single(&self, group: usize, input_dir: &Path, save_dir: &Path) -> String {
        let mut contents = self.preamble(1, &self.single_job_name(group));
        contents.push_str(&self.module_loads(false));
        contents.push_str(&self.command(input_dir, save_dir));
        contents
    }

    /// Job file for a job that fans several groups out over its nodes with
    /// GNU parallel, reading one command per line from `worklist`.
    pub fn render_multi(
        &self,
        nodes: usize,
        first: usize,
        last: usize,
        nodelist: &Path,
        worklist: &Path,
    ) -> String {
        let mut contents = self.preamble(nodes, &self.multi_job_name(first, last));
        contents.push_str(&self.module_loads(true));
        contents.push_str(&format!(
            "sort -u $PBS_NODEFILE > {}\n",
            quote(nodelist)
        ));
        contents.push_str(&format!("export PARALLEL=\"{PARALLEL_ENV}\"\n"));
        contents.push_str(&format!(
            "parallel --jobs 1 --sshloginfile {} --workdir $PWD < {}\n",
            quote(nodelist),
            quote(worklist),
        ));
        contents
    }
}

/// Script that queues every job file.
pub fn render_submit<P: AsRef<Path>>(job_files: &[P]) -> String {
    job_files
        .iter()
        .map(|path| format!("qsub {}\n", quote(path.as_ref())))
        .collect()
}
