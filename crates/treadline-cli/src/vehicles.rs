use clap::Subcommand;
use treadline_core::AppConfig;
use treadline_finder::{Garage, JsonFileStorage};

use crate::surface;

/// Sub-commands available under `vehicles`.
#[derive(Debug, Subcommand)]
pub enum VehiclesCommands {
    /// List saved vehicles
    List,
    /// Remove one saved vehicle by its position in `vehicles list`
    Remove {
        /// 1-based position (e.g., 2)
        #[arg(long)]
        index: usize,
    },
    /// Remove every saved vehicle
    Clear,
}

/// Dispatch a `vehicles` sub-command against the garage file.
///
/// # Errors
///
/// Returns an error if the position is out of range or the garage file cannot
/// be written.
pub(crate) fn run_vehicles(config: &AppConfig, command: VehiclesCommands) -> anyhow::Result<()> {
    let mut garage = Garage::open(JsonFileStorage::new(&config.vehicles_path));

    match command {
        VehiclesCommands::List => {
            if garage.list().is_empty() {
                println!("no saved vehicles; run `finder vehicle --save` to add one");
                return Ok(());
            }
            println!("{:<4}{:<6}{:<14}{:<14}{:<12}SIZE", "#", "YEAR", "MAKE", "MODEL", "TRIM");
            for (i, v) in garage.list().iter().enumerate() {
                println!(
                    "{:<4}{:<6}{:<14}{:<14}{:<12}{}",
                    i + 1,
                    v.year,
                    v.make,
                    v.model,
                    v.trim,
                    v.tire_size
                );
            }
        }
        VehiclesCommands::Remove { index } => {
            let vehicle = index
                .checked_sub(1)
                .and_then(|i| garage.list().get(i))
                .cloned()
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "no saved vehicle at position {index}; {} saved",
                        garage.list().len()
                    )
                })?;
            garage.remove(&vehicle).map_err(surface)?;
            println!("removed {}", vehicle.describe());
        }
        VehiclesCommands::Clear => {
            let count = garage.list().len();
            garage.clear().map_err(surface)?;
            println!("removed {count} saved vehicles");
        }
    }
    Ok(())
}
