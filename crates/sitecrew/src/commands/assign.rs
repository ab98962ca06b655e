//! Assign / unassign command handlers.

use owo_colors::OwoColorize;

use sitecrew_core::{
    AssignmentReceipt, CertificateId, Coordinator, PersonnelId, SiteId, UnassignmentReceipt,
    resolve_version,
};

use crate::cli::{AssignArgs, GlobalOpts, UnassignArgs};
use crate::error::CliError;
use crate::output;

fn assign_detail(r: &AssignmentReceipt) -> String {
    let header = if output::should_color() {
        format!("{}", "Assigned".green().bold())
    } else {
        "Assigned".to_owned()
    };
    [
        format!("{header} {} ({})", r.site_name, r.site_id),
        format!("Manager:     {}", r.manager_name),
        format!("Certificate: {}", r.certificate_name),
        format!("Version:     {}", r.version),
    ]
    .join("\n")
}

fn unassign_detail(r: &UnassignmentReceipt) -> String {
    let header = if output::should_color() {
        format!("{}", "Unassigned".yellow().bold())
    } else {
        "Unassigned".to_owned()
    };
    [
        format!("{header} {} ({})", r.site_name, r.site_id),
        format!("Version: {}", r.version),
    ]
    .join("\n")
}

pub async fn assign(
    coordinator: &Coordinator,
    args: AssignArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Blank tokens count as "no expectation", same as the wire contract.
    let expected = resolve_version(args.expect_version.as_deref(), None);
    let receipt = coordinator
        .assign(
            &SiteId::from(args.site.as_str()),
            &PersonnelId::from(args.manager.as_str()),
            &CertificateId::from(args.certificate.as_str()),
            expected.as_ref(),
        )
        .await?;

    let out = output::render_single(&global.output, &receipt, assign_detail, |r| {
        r.version.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn unassign(
    coordinator: &Coordinator,
    args: UnassignArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let expected = resolve_version(args.expect_version.as_deref(), None);
    let receipt = coordinator
        .unassign(&SiteId::from(args.site.as_str()), expected.as_ref())
        .await?;

    let out = output::render_single(&global.output, &receipt, unassign_detail, |r| {
        r.version.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
