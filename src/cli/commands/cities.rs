//! One-shot polluted-cities fetch command.

use tokio::runtime::Runtime;

use super::build_pipeline;
use crate::config::Config;
use crate::model::City;

/// Fetch polluted cities and print them to stdout
pub fn cmd_cities(
    rt: &Runtime,
    country: Option<&str>,
    page: u32,
    limit: u32,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::from_env();
    let pipeline = build_pipeline(&config)?;

    rt.block_on(async {
        let cities = match pipeline.get_polluted_cities(country, page, limit).await {
            Ok(cities) => cities,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };

        if json {
            match serde_json::to_string_pretty(&cities) {
                Ok(body) => println!("{}", body),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        } else {
            print_cities(&cities);
        }
    });
    Ok(())
}

fn print_cities(cities: &[City]) {
    if cities.is_empty() {
        println!("No cities matched.");
        return;
    }

    for city in cities {
        println!(
            "{} ({}) - pollution {:.1}",
            city.name, city.country, city.pollution
        );
        println!("  {}", city.description);
    }

    println!();
    println!("{} cities", cities.len());
}
