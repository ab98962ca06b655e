//! Personnel command handlers.

use tabled::Tabled;

use sitecrew_core::{
    Coordinator, NewPersonnel, Personnel, PersonnelId, register_personnel,
};

use crate::cli::{GlobalOpts, PersonnelArgs, PersonnelCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct PersonnelRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Sites")]
    sites: String,
}

impl From<&Personnel> for PersonnelRow {
    fn from(p: &Personnel) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            role: p.role.clone(),
            status: p.status.to_string(),
            sites: p.active_site_count.to_string(),
        }
    }
}

fn personnel_detail(p: &Personnel) -> String {
    [
        format!("ID:          {}", p.id),
        format!("Name:        {}", p.name),
        format!("Role:        {}", p.role),
        format!("Affiliation: {}", p.affiliation),
        format!("Phone:       {}", p.phone),
        format!("Status:      {}", p.status),
        format!("Sites:       {}", p.active_site_count),
    ]
    .join("\n")
}

pub async fn handle(
    coordinator: &Coordinator,
    args: PersonnelArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PersonnelCommand::List => {
            let people = coordinator
                .store()
                .list_personnel()
                .await
                .map_err(sitecrew_core::CoreError::StoreRead)?;
            let out = output::render_list(&global.output, &people, |p| PersonnelRow::from(p), |p| {
                p.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PersonnelCommand::Get { id } => {
            let person_id = PersonnelId::from(id.as_str());
            let person = coordinator
                .store()
                .get_personnel(&person_id)
                .await
                .map_err(sitecrew_core::CoreError::StoreRead)?
                .ok_or(sitecrew_core::CoreError::ManagerNotFound { id: person_id })?;
            let out = output::render_single(&global.output, &person, personnel_detail, |p| {
                p.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PersonnelCommand::Create {
            name,
            role,
            affiliation,
            phone,
        } => {
            let person = register_personnel(
                coordinator.store().as_ref(),
                NewPersonnel {
                    id: None,
                    name,
                    role: role.unwrap_or_default(),
                    affiliation: affiliation.unwrap_or_default(),
                    phone: phone.unwrap_or_default(),
                },
            )
            .await?;
            let out = output::render_single(&global.output, &person, personnel_detail, |p| {
                p.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
