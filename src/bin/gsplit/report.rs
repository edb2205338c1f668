use gsplit::core::{PlanNotice, PlanResult};
use gsplit::utils::format_gb;
use owo_colors::OwoColorize;
use tabled::{builder::Builder, settings::style::Style};

fn group_label(first: usize, last: usize) -> String {
    if first == last {
        first.to_string()
    } else {
        format!("{first}-{last}")
    }
}

fn render_notice(notice: &PlanNotice) -> String {
    match notice {
        PlanNotice::JobCountReduced {
            requested,
            effective,
        } => format!(
            "{} requested {requested} jobs but only {effective} can be filled; \
             using {effective}",
            "warning:".yellow().bold()
        ),
    }
}

/// Human-readable summary of a plan: sizing figures, one row per job and
/// one row per group.
pub fn render_plan(plan: &PlanResult) -> String {
    let summary = &plan.summary;
    let mut out = String::new();

    for notice in &plan.notices {
        out.push_str(&render_notice(notice));
        out.push('\n');
    }

    out.push_str(&format!(
        "Empirical efficiency: {:.2} h/GB\n",
        summary.efficiency
    ));
    out.push_str(&format!(
        "Max group size: {}\n",
        format_gb(summary.max_group_bytes)
    ));
    out.push_str(&format!(
        "{} files ({}) in {} groups over {} job(s)\n",
        summary.item_count,
        format_gb(summary.total_bytes),
        summary.group_count(),
        summary.job_count(),
    ));

    let mut jobs = Builder::default();
    jobs.push_record(["JOB", "NODES", "PPN", "GROUPS", "SIZE"]);
    for job in &summary.jobs {
        jobs.push_record([
            job.index.to_string(),
            job.node_count.to_string(),
            job.ppn.to_string(),
            group_label(job.groups.start, job.groups.end - 1),
            format_gb(job.total_bytes),
        ]);
    }
    out.push_str(&format!("{}\n", jobs.build().with(Style::rounded())));

    let mut groups = Builder::default();
    groups.push_record(["GROUP", "JOB", "FILES", "SIZE"]);
    for job in &summary.jobs {
        for group in &summary.groups[job.groups.clone()] {
            groups.push_record([
                group.index.to_string(),
                job.index.to_string(),
                group.item_count.to_string(),
                format_gb(group.total_bytes),
            ]);
        }
    }
    out.push_str(&format!("{}\n", groups.build().with(Style::rounded())));

    out
}
