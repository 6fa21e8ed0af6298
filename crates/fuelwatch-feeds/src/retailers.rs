//! Retailers publishing open fuel price data under the CMA scheme.

use fuelwatch_core::RetailerEndpoint;

/// `(display name, feed URL)` for every participating retailer.
pub const RETAILER_FEEDS: [(&str, &str); 14] = [
    ("Ascona Group", "https://fuelprices.asconagroup.co.uk/newfuel.json"),
    ("Asda", "https://storelocator.asda.com/fuel_prices_data.json"),
    (
        "bp",
        "https://www.bp.com/en_gb/united-kingdom/home/fuelprices/fuel_prices_data.json",
    ),
    ("Esso Tesco Alliance", "https://fuelprices.esso.co.uk/latestdata.json"),
    ("JET Retail UK", "https://jetlocal.co.uk/fuel_prices_data.json"),
    ("Karan Retail Ltd", "https://api.krl.live/integration/live_price/krl"),
    ("Morrisons", "https://www.morrisons.com/fuel-prices/fuel.json"),
    ("Moto", "https://moto-way.com/fuel-price/fuel_prices.json"),
    (
        "Motor Fuel Group",
        "https://fuel.motorfuelgroup.com/fuel_prices_data.json",
    ),
    (
        "Rontec",
        "https://www.rontec-servicestations.co.uk/fuel-prices/data/fuel_prices_data.json",
    ),
    (
        "Sainsbury's",
        "https://api.sainsburys.co.uk/v1/exports/latest/fuel_prices_data.json",
    ),
    ("SGN", "https://www.sgnretail.uk/files/data/SGN_daily_fuel_prices.json"),
    ("Shell", "https://www.shell.co.uk/fuel-prices-data.html"),
    ("Tesco", "https://www.tesco.com/fuel_prices/fuel_prices_data.json"),
];

/// The retailer list as owned endpoints, in publication order.
#[must_use]
pub fn default_endpoints() -> Vec<RetailerEndpoint> {
    RETAILER_FEEDS
        .iter()
        .map(|(name, url)| RetailerEndpoint::new(*name, *url))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_retailer_has_an_https_url() {
        let endpoints = default_endpoints();
        assert_eq!(endpoints.len(), 14);
        assert!(endpoints.iter().all(|e| e.url.starts_with("https://")));
    }

    #[test]
    fn retailer_names_are_unique() {
        let mut names: Vec<_> = RETAILER_FEEDS.iter().map(|(n, _)| *n).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RETAILER_FEEDS.len());
    }
}
