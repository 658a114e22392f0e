use std::path::Path;

use crate::adapter::outbound::influx::InfluxSessionFactory;
use crate::domain::{HostTag, LatestQuery, Series};
use crate::error::{describe, Result};
use crate::infrastructure::config::settings::Config;
use crate::port::{SeriesSession, SessionFactory};

/// Test connectivity to the time-series store and query each series once.
pub async fn execute_connection<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config = Config::load(config_path)?;
    let factory = InfluxSessionFactory::new(config.influx.clone())?;
    let host = HostTag::new(config.influx.resolve_host_tag());

    println!("Testing connection to {}...", factory.endpoint());
    println!("  Host tag: {}", host.tag_value());
    println!();

    print!("Opening session... ");
    let session = match factory.open().await {
        Ok(session) => {
            println!("✓ OK");
            session
        }
        Err(e) => {
            println!("✗ {}", describe(&e));
            return Err(e.into());
        }
    };

    print!("Probing server... ");
    if let Err(e) = session.ping().await {
        println!("✗ {}", describe(&e));
        return Err(e.into());
    }
    println!("✓ OK");

    for series in Series::ALL {
        print!("Querying {}... ", series.measurement());
        let query = LatestQuery::new(series, host.clone());
        match session.latest(&query).await {
            Ok(points) => match points.first() {
                Some(point) => println!("✓ {}%", point.percent()),
                None => println!("⚠ no rows for this host"),
            },
            Err(e) => {
                println!("✗ {}", describe(&e));
                return Err(e.into());
            }
        }
    }

    println!();
    println!("All connection tests passed.");
    Ok(())
}
