use clap::Subcommand;
use tickdown_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current configuration as TOML
    Show,
    /// Set the default countdown length in minutes
    SetMinutes {
        minutes: u64,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load_or_default();
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::SetMinutes { minutes } => {
            let mut config = Config::load_or_default();
            config.set_default_minutes(minutes)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
