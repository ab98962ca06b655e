//! Statistics command handler.

use sitecrew_core::{Coordinator, Statistics};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn stats_detail(s: &Statistics) -> String {
    let mut lines = vec![
        "Sites".to_owned(),
        format!("  total:      {}", s.sites.total),
        format!("  assigned:   {}", s.sites.assigned),
        format!("  unassigned: {}", s.sites.unassigned),
    ];
    for (phase, count) in &s.sites.by_phase {
        lines.push(format!("  phase {phase}: {count}"));
    }
    for (company, count) in &s.sites.by_company {
        lines.push(format!("  company {company}: {count}"));
    }
    lines.push("Personnel".to_owned());
    lines.push(format!("  total: {}", s.personnel.total));
    for (status, count) in &s.personnel.by_status {
        lines.push(format!("  {status}: {count}"));
    }
    for (role, count) in &s.personnel.by_role {
        lines.push(format!("  role {role}: {count}"));
    }
    lines.push("Certificates".to_owned());
    lines.push(format!("  total:     {}", s.certificates.total));
    lines.push(format!("  available: {}", s.certificates.available));
    lines.push(format!("  in use:    {}", s.certificates.in_use));
    lines.join("\n")
}

pub async fn handle(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    let stats = Statistics::collect(coordinator.store().as_ref()).await?;
    let out = output::render_single(&global.output, &stats, stats_detail, |s| {
        format!(
            "{} {} {}",
            s.sites.total, s.personnel.total, s.certificates.total
        )
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
