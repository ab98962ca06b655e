//! Certificate command handlers.

use tabled::Tabled;

use sitecrew_core::{
    Certificate, CertificateId, Coordinator, NewCertificate, register_certificate,
};

use crate::cli::{CertsArgs, CertsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct CertRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Site")]
    site: String,
}

impl From<&Certificate> for CertRow {
    fn from(c: &Certificate) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            owner: c.owner_name.clone(),
            status: c.availability.to_string(),
            site: c
                .current_site
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }
}

fn cert_detail(c: &Certificate) -> String {
    let mut lines = vec![
        format!("ID:     {}", c.id),
        format!("Name:   {}", c.name),
        format!("Owner:  {}", c.owner_name),
        format!("Phone:  {}", c.owner_phone),
        format!("Issuer: {}", c.issuer),
        format!("Status: {}", c.availability),
    ];
    if let Some(site) = &c.current_site {
        lines.push(format!("Site:   {site}"));
    }
    lines.join("\n")
}

pub async fn handle(
    coordinator: &Coordinator,
    args: CertsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CertsCommand::List => {
            let certs = coordinator
                .store()
                .list_certificates()
                .await
                .map_err(sitecrew_core::CoreError::StoreRead)?;
            let out = output::render_list(&global.output, &certs, |c| CertRow::from(c), |c| {
                c.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CertsCommand::Get { id } => {
            let cert_id = CertificateId::from(id.as_str());
            let cert = coordinator
                .store()
                .get_certificate(&cert_id)
                .await
                .map_err(sitecrew_core::CoreError::StoreRead)?
                .ok_or(sitecrew_core::CoreError::CertificateNotFound { id: cert_id })?;
            let out =
                output::render_single(&global.output, &cert, cert_detail, |c| c.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CertsCommand::Create {
            name,
            owner,
            owner_phone,
            issuer,
        } => {
            let cert = register_certificate(
                coordinator.store().as_ref(),
                NewCertificate {
                    id: None,
                    name,
                    owner_name: owner.unwrap_or_default(),
                    owner_phone: owner_phone.unwrap_or_default(),
                    issuer: issuer.unwrap_or_default(),
                },
            )
            .await?;
            let out =
                output::render_single(&global.output, &cert, cert_detail, |c| c.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
