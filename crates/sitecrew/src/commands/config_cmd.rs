//! Config command handlers.

use sitecrew_config::{Config, config_path, load_config_or_default, save_config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = load_config_or_default();
            let rendered =
                toml::to_string_pretty(&cfg).map_err(sitecrew_config::ConfigError::from)?;
            output::print_output(rendered.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init => {
            let path = config_path();
            if path.exists() {
                return Err(CliError::Usage(format!(
                    "config file already exists at {}",
                    path.display()
                )));
            }
            save_config(&Config::default())?;
            if !global.quiet {
                eprintln!("Wrote starter config to {}", path.display());
            }
            Ok(())
        }
    }
}
