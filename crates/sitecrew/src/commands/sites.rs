//! Site command handlers.

use tabled::Tabled;

use sitecrew_core::{
    Coordinator, NewSite, Site, SiteFilter, SiteId, find_sites, register_site,
};

use crate::cli::{AssignmentOpt, GlobalOpts, SitesArgs, SitesCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Phase")]
    phase: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Manager")]
    manager: String,
}

impl From<&Site> for SiteRow {
    fn from(s: &Site) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            company: s.company.clone(),
            phase: s.phase.clone(),
            status: s.assignment.to_string(),
            manager: s.manager_name.clone(),
        }
    }
}

fn site_detail(s: &Site) -> String {
    let mut lines = vec![
        format!("ID:          {}", s.id),
        format!("Name:        {}", s.name),
        format!("Owner:       {}", s.owner_name),
        format!("Company:     {}", s.company),
        format!("Address:     {}", s.address),
        format!("Phase:       {}", s.phase),
        format!("Status:      {}", s.assignment),
    ];
    if let Some(manager) = &s.manager {
        lines.push(format!("Manager:     {} ({manager})", s.manager_name));
    }
    if let Some(certificate) = &s.certificate {
        lines.push(format!(
            "Certificate: {} ({certificate})",
            s.certificate_name
        ));
    }
    lines.push(format!("Version:     {}", s.last_modified));
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    coordinator: &Coordinator,
    args: SitesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SitesCommand::List {
            company,
            phase,
            assignment,
            search,
        } => {
            let filter = SiteFilter {
                company,
                phase,
                assignment: assignment.map(|a| match a {
                    AssignmentOpt::Assigned => sitecrew_core::AssignmentStatus::Assigned,
                    AssignmentOpt::Unassigned => sitecrew_core::AssignmentStatus::Unassigned,
                }),
                search,
            };
            let sites = find_sites(coordinator.store().as_ref(), &filter).await?;
            let out = output::render_list(&global.output, &sites, |s| SiteRow::from(s), |s| {
                s.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Get { id } => {
            let site_id = SiteId::from(id.as_str());
            let site = coordinator
                .store()
                .get_site(&site_id)
                .await
                .map_err(sitecrew_core::CoreError::StoreRead)?
                .ok_or(sitecrew_core::CoreError::SiteNotFound { id: site_id })?;
            let out =
                output::render_single(&global.output, &site, site_detail, |s| s.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SitesCommand::Create {
            name,
            owner,
            company,
            address,
            phase,
            notes,
        } => {
            let site = register_site(
                coordinator.store().as_ref(),
                NewSite {
                    id: None,
                    name,
                    owner_name: owner.unwrap_or_default(),
                    company: company.unwrap_or_default(),
                    address: address.unwrap_or_default(),
                    phase: phase.unwrap_or_default(),
                    notes: notes.unwrap_or_default(),
                },
            )
            .await?;
            let out =
                output::render_single(&global.output, &site, site_detail, |s| s.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
