//! Vehicle and tire size finder command handlers.
//!
//! Each stage value given on the command line is checked against the options
//! the API offers for it, in order, exactly as a shopper would pick them.

use clap::Subcommand;
use futures::future::join_all;
use treadline_client::{ApiClient, ClientError};
use treadline_core::{AppConfig, Failure, ProductType, ReferenceValue};
use treadline_finder::size::{diameter_options, ratio_options, width_options};
use treadline_finder::vehicle::{
    make_options, model_options, tire_size_options, trim_options, year_options,
};
use treadline_finder::{
    Garage, JsonFileStorage, OptionsState, SizeFinder, SizeStage, VehicleFinder, VehicleOptions,
    VehicleStage,
};

use crate::surface;

/// Sub-commands available under `finder`.
#[derive(Debug, Subcommand)]
pub enum FinderCommands {
    /// Pick a vehicle year, make, model, trim and tire size
    Vehicle {
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        make: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        trim: Option<String>,
        /// Tire size as listed for the trim (e.g., 215/55R16)
        #[arg(long)]
        size: Option<String>,
        /// Save the completed vehicle to the garage
        #[arg(long)]
        save: bool,
    },
    /// Pick a tire size by width, ratio and diameter
    Size {
        #[arg(long)]
        width: Option<String>,
        #[arg(long)]
        ratio: Option<String>,
        #[arg(long)]
        diameter: Option<String>,
        /// Product type to search (tire or wheel)
        #[arg(long = "type", default_value = "tire")]
        product_type: ProductType,
    },
}

/// Dispatch a `finder` sub-command.
///
/// # Errors
///
/// Returns an error if a value is not offered for its stage, a stage is
/// skipped, reference data cannot be fetched, or the garage cannot be written.
pub(crate) async fn run_finder(
    client: &ApiClient,
    config: &AppConfig,
    command: FinderCommands,
) -> anyhow::Result<()> {
    match command {
        FinderCommands::Vehicle {
            year,
            make,
            model,
            trim,
            size,
            save,
        } => {
            let picks = [year, make, model, trim, size];
            run_vehicle(client, config, picks, save).await
        }
        FinderCommands::Size {
            width,
            ratio,
            diameter,
            product_type,
        } => run_size(client, [width, ratio, diameter], product_type).await,
    }
}

async fn fetch_stage(
    client: &ApiClient,
    stage: VehicleStage,
    key: &[String],
) -> Result<Vec<String>, ClientError> {
    let at = |i: usize| key.get(i).map_or("", String::as_str);
    let options = match stage {
        VehicleStage::Year => year_options(&client.years().await?),
        VehicleStage::Make => make_options(&client.makes(at(0)).await?, at(0)),
        VehicleStage::Model => model_options(&client.models(at(0), at(1)).await?, at(0), at(1)),
        VehicleStage::Trim => trim_options(
            &client.trims(at(0), at(1), at(2)).await?,
            at(0),
            at(1),
            at(2),
        ),
        VehicleStage::TireSize => tire_size_options(
            &client.tire_sizes(at(0), at(1), at(2), at(3)).await?,
            at(0),
            at(1),
            at(2),
            at(3),
        ),
    };
    Ok(options)
}

/// Brings every option list in line with the finder, fetching the stale ones
/// concurrently.
async fn refresh_options(client: &ApiClient, finder: &VehicleFinder, options: &mut VehicleOptions) {
    let tickets = options.sync_with(finder);
    let results = join_all(
        tickets
            .iter()
            .map(|(stage, ticket)| fetch_stage(client, *stage, ticket.key())),
    )
    .await;
    for ((stage, ticket), result) in tickets.iter().zip(results) {
        let result = result.map_err(|e| {
            tracing::warn!(stage = stage.label(), error = %e, "option list failed to load");
            e.notice().to_string()
        });
        options.complete(*stage, ticket, result);
    }
}

fn print_options(stage: &str, state: &OptionsState<String>) {
    match state {
        OptionsState::Locked => println!("{stage}: choose the earlier stages first"),
        OptionsState::Loading => println!("{stage}: loading"),
        OptionsState::Empty => println!("{stage}: no options available"),
        OptionsState::Failed(message) => println!("{stage}: {message}"),
        OptionsState::Loaded(items) => println!("{stage}: {}", items.join(", ")),
    }
}

async fn run_vehicle(
    client: &ApiClient,
    config: &AppConfig,
    picks: [Option<String>; 5],
    save: bool,
) -> anyhow::Result<()> {
    let mut finder = VehicleFinder::new();
    let mut options = VehicleOptions::new();

    let mut shown = false;
    for (stage, pick) in VehicleStage::ALL.into_iter().zip(picks) {
        refresh_options(client, &finder, &mut options).await;
        match pick {
            Some(value) => {
                finder.go_to(stage).map_err(surface)?;
                let offered = options.state(stage).items().to_vec();
                finder
                    .select_offered(stage, &value, &offered)
                    .map_err(surface)?;
            }
            None if !shown => {
                print_options(stage.label(), options.state(stage));
                shown = true;
            }
            None => {}
        }
    }

    if !finder.is_complete() && !save {
        return Ok(());
    }
    let vehicle = finder.proceed().map_err(surface)?;
    println!("vehicle: {}", vehicle.describe());
    if save {
        let mut garage = Garage::open(JsonFileStorage::new(&config.vehicles_path));
        if garage.save(vehicle).map_err(surface)? {
            println!("saved ({} vehicles in garage)", garage.list().len());
        } else {
            println!("already in garage");
        }
    }
    Ok(())
}

async fn run_size(
    client: &ApiClient,
    picks: [Option<String>; 3],
    product_type: ProductType,
) -> anyhow::Result<()> {
    let catalog = client.size_catalog().await.map_err(surface)?;
    let mut finder = SizeFinder::new(product_type);
    let stages = [SizeStage::Width, SizeStage::Ratio, SizeStage::Diameter];

    let mut shown = false;
    for (stage, pick) in stages.into_iter().zip(picks) {
        match pick {
            Some(value) => {
                finder.choose(&catalog, stage, &value).map_err(surface)?;
            }
            None if !shown => {
                let offered: Vec<String> = match stage {
                    SizeStage::Width => values(&width_options(&catalog)),
                    SizeStage::Ratio => finder
                        .width()
                        .map(|w| values(&ratio_options(&catalog, w)))
                        .unwrap_or_default(),
                    SizeStage::Diameter => finder
                        .ratio()
                        .map(|r| values(&diameter_options(&catalog, r)))
                        .unwrap_or_default(),
                };
                print_options(stage.label(), &OptionsState::from_items(offered));
                shown = true;
            }
            None => {}
        }
    }

    if finder.is_complete() {
        let selection = finder.proceed().map_err(surface)?;
        println!("{} size: {}", selection.product_type, selection.label());
    }
    Ok(())
}

fn values<T: ReferenceValue>(records: &[T]) -> Vec<String> {
    records.iter().map(|r| r.value().to_owned()).collect()
}
