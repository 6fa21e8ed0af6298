use std::collections::BTreeMap;

use fuelwatch_core::{FuelPrice, Station};

use super::*;

fn parse(args: &[&str]) -> Commands {
    Cli::try_parse_from(args)
        .expect("expected valid cli args")
        .command
}

#[test]
fn parses_station_command() {
    assert!(matches!(
        parse(&["fuelwatch", "station", "gb-123"]),
        Commands::Station { site_id } if site_id == "gb-123"
    ));
}

#[test]
fn search_limit_defaults_to_ten() {
    assert!(matches!(
        parse(&["fuelwatch", "search", "old kent road"]),
        Commands::Search { text, limit: 10 } if text == "old kent road"
    ));
}

#[test]
fn help_renders_without_config() {
    let err = Cli::try_parse_from(["fuelwatch", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn missing_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["fuelwatch"]).is_err());
}

#[test]
fn near_accepts_negative_longitude() {
    let Commands::Near(args) = parse(&["fuelwatch", "near", "--lat", "51.5074", "--lon", "-0.1278"])
    else {
        panic!("expected near command");
    };
    let area = args.area().unwrap();
    assert_eq!(area.center.longitude, -0.1278);
    assert_eq!(area.radius_km, DEFAULT_RADIUS);
    assert!(args.fuel_types.is_empty());
}

#[test]
fn near_at_with_miles_and_fuels() {
    let Commands::Near(args) = parse(&[
        "fuelwatch", "near", "--at", "51.5,-0.12", "--radius", "3", "--miles", "--fuel", "B7,E10",
    ]) else {
        panic!("expected near command");
    };
    let area = args.area().unwrap();
    assert_eq!(area.center.latitude, 51.5);
    assert!((area.radius_km - 4.828_02).abs() < 1e-9);
    assert_eq!(args.fuel_types, vec!["B7", "E10"]);
}

#[test]
fn near_requires_a_centre() {
    let Commands::Near(args) = parse(&["fuelwatch", "near"]) else {
        panic!("expected near command");
    };
    assert!(args.area().is_err());
}

#[test]
fn near_rejects_lat_without_lon() {
    assert!(Cli::try_parse_from(["fuelwatch", "near", "--lat", "51.5"]).is_err());
}

#[test]
fn near_rejects_out_of_range_point() {
    let Commands::Near(args) = parse(&["fuelwatch", "near", "--at", "91,0"]) else {
        panic!("expected near command");
    };
    assert!(args.area().is_err());
}

#[test]
fn watch_location_beats_station_list() {
    let Commands::Watch(args) = parse(&[
        "fuelwatch", "watch", "--at", "51.5,-0.12", "--station", "a,b",
    ]) else {
        panic!("expected watch command");
    };
    assert!(matches!(
        args.target().unwrap(),
        Some(WatchTarget::Area { area, .. }) if area.radius_km == DEFAULT_RADIUS
    ));
}

#[test]
fn watch_station_list() {
    let Commands::Watch(args) = parse(&["fuelwatch", "watch", "--station", "a,b"]) else {
        panic!("expected watch command");
    };
    assert_eq!(
        args.target().unwrap(),
        Some(WatchTarget::Stations(vec!["a".to_string(), "b".to_string()]))
    );
}

#[test]
fn watch_rejects_malformed_location() {
    let Commands::Watch(args) = parse(&["fuelwatch", "watch", "--at", "london"]) else {
        panic!("expected watch command");
    };
    assert!(args.target().is_err());
}

fn station_with(prices: &[(&str, f64)]) -> Station {
    Station {
        site_id: Some("gb-1".to_string()),
        brand: None,
        name: None,
        address: None,
        postcode: None,
        town: None,
        latitude: 51.5,
        longitude: -0.12,
        prices: prices
            .iter()
            .map(|(code, price)| {
                (
                    (*code).to_string(),
                    FuelPrice {
                        price: *price,
                        metadata: serde_json::Map::new(),
                    },
                )
            })
            .collect::<BTreeMap<_, _>>(),
        last_updated: None,
        source_endpoint: "https://feed.example.test".to_string(),
        distance_km: None,
        extra: serde_json::Map::new(),
    }
}

#[test]
fn price_line_lists_known_fuels_in_order() {
    let station = station_with(&[("B7", 1.479), ("E10", 1.399), ("LPG", 0.899)]);
    assert_eq!(watch::price_line(&station), "E10=1.399 B7=1.479");
}

#[test]
fn price_line_without_prices() {
    assert_eq!(watch::price_line(&station_with(&[])), "no prices");
}
