use std::process;

use canteenbot::{ResultStore, WebScraper};
use canteenbot_cli::CommonArgs;
use chrono::{Datelike, Local};
use clap::Parser;

#[derive(Parser)]
#[command(name = "canteenbot-scrape")]
#[command(about = "Scrape this week's canteen menus into the menu store", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    cli.common.init_logging();

    let config = cli.common.load_config();

    let scraper = WebScraper::new(&config.user_agent, config.request_delay()).unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });
    let store = ResultStore::new(&config.output_dir);

    log::info!("Scraping menus from {}...", config.base_url);
    let scrapes = scraper.scrape_week(&config.days()).await;

    let mut failures = 0;
    let mut week = Vec::with_capacity(scrapes.len());
    for scrape in scrapes {
        match scrape.result {
            Ok(result) => {
                if let Err(e) = store.write_day(scrape.config.day, &result) {
                    log::error!("Error storing {} menu: {}", scrape.config.day, e);
                    failures += 1;
                }
                week.push(Some(result));
            }
            Err(_) => {
                failures += 1;
                week.push(None);
            }
        }
    }

    let weekday = Local::now().weekday();
    if let Err(e) = store.write_aliases(&week, weekday) {
        log::error!("Error storing today/tomorrow menus: {}", e);
        failures += 1;
    }

    if failures > 0 {
        log::error!("{} step(s) failed, see errors above", failures);
        process::exit(1);
    }

    log::info!(
        "Stored {} day(s) of menus in {}",
        week.len(),
        store.dir().display()
    );
}
