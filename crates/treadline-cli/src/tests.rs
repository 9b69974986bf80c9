use clap::Parser;
use treadline_catalog::{CatalogQuery, Facet, PriceSort};
use treadline_core::ProductType;

use super::*;

#[test]
fn parses_products_with_filters() {
    let cli = Cli::try_parse_from([
        "treadline",
        "products",
        "--listing",
        "wheels",
        "--brand",
        "Enkei",
        "--brand",
        "BBS",
        "--sort",
        "desc",
        "--page",
        "2",
    ])
    .expect("expected valid cli args");

    let Commands::Products(args) = cli.command else {
        panic!("expected products command");
    };
    assert_eq!(args.listing, "wheels");
    assert_eq!(args.brand, ["Enkei", "BBS"]);
    assert_eq!(args.sort, Some(PriceSort::Descending));
    assert_eq!(args.page, 2);
    assert!(!args.my_vehicles);
}

#[test]
fn products_defaults_to_tires_first_page() {
    let cli = Cli::try_parse_from(["treadline", "products"]).unwrap();
    let Commands::Products(args) = cli.command else {
        panic!("expected products command");
    };
    assert_eq!(args.listing, "tires");
    assert_eq!(args.page, 1);
    assert!(args.sort.is_none());
}

#[test]
fn rejects_unknown_sort_order() {
    let result = Cli::try_parse_from(["treadline", "products", "--sort", "cheapest"]);
    assert!(result.is_err());
}

#[test]
fn products_args_keep_requested_page() {
    let cli = Cli::try_parse_from([
        "treadline",
        "products",
        "--search",
        "pilot",
        "--width",
        "225",
        "--page",
        "3",
        "--my-vehicles",
    ])
    .unwrap();
    let Commands::Products(args) = cli.command else {
        panic!("expected products command");
    };

    let mut query = CatalogQuery::new();
    args.apply(&mut query);
    assert_eq!(query.text(), "pilot");
    assert!(query.selected(Facet::Width).is_some_and(|v| v.contains("225")));
    assert!(query.selected(Facet::Brand).is_none());
    assert!(query.vehicles_only());
    assert_eq!(query.page(), 3);
}

#[test]
fn parses_facets_with_default_listing() {
    let cli = Cli::try_parse_from(["treadline", "facets"]).unwrap();
    assert!(matches!(cli.command, Commands::Facets { listing } if listing == "tires"));
}

#[test]
fn parses_partial_vehicle_finder() {
    let cli = Cli::try_parse_from([
        "treadline",
        "finder",
        "vehicle",
        "--year",
        "2020",
        "--make",
        "Honda",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Finder {
            command: FinderCommands::Vehicle {
                year: Some(_),
                make: Some(_),
                model: None,
                save: false,
                ..
            }
        }
    ));
}

#[test]
fn parses_size_finder_product_type() {
    let cli = Cli::try_parse_from(["treadline", "finder", "size", "--type", "wheel"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Finder {
            command: FinderCommands::Size {
                product_type: ProductType::Wheel,
                width: None,
                ..
            }
        }
    ));
}

#[test]
fn parses_vehicles_remove_index() {
    let cli = Cli::try_parse_from(["treadline", "vehicles", "remove", "--index", "2"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Vehicles {
            command: VehiclesCommands::Remove { index: 2 }
        }
    ));
}

#[test]
fn parses_cart_services_with_repeated_addons() {
    let cli = Cli::try_parse_from([
        "treadline",
        "cart",
        "services",
        "--user",
        "u1",
        "--product",
        "p1",
        "--installation",
        "--addon",
        "a1",
        "--addon",
        "a2",
    ])
    .unwrap();
    let Commands::Cart {
        command:
            CartCommands::Services {
                installation,
                addon,
                addon_index,
                ..
            },
    } = cli.command
    else {
        panic!("expected cart services command");
    };
    assert!(installation);
    assert_eq!(addon, ["a1", "a2"]);
    assert!(addon_index.is_empty());
}

#[test]
fn cart_quantity_requires_a_number() {
    let result = Cli::try_parse_from([
        "treadline", "cart", "quantity", "--user", "u1", "--product", "p1", "--qty", "two",
    ]);
    assert!(result.is_err());
}
