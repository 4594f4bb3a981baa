use std::process;

use canteenbot::types::MenuType;
use canteenbot::{Notifier, ResultStore};
use canteenbot_cli::CommonArgs;
use clap::Parser;

#[derive(Parser)]
#[command(name = "canteenbot-notify")]
#[command(about = "Post a stored canteen menu to the chat webhook", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[arg(
        default_value = "today",
        help = "Menu to post: today, tomorrow or a day of the week"
    )]
    menu: MenuType,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    cli.common.init_logging();

    let config = cli.common.load_config();

    let store = ResultStore::new(&config.output_dir);
    let result = store.read(cli.menu).unwrap_or_else(|e| {
        log::error!("Error reading {} menu: {}", cli.menu, e);
        process::exit(1);
    });

    let notifier = Notifier::new(&config.webhook_url).unwrap_or_else(|e| {
        log::error!("Error creating notifier: {}", e);
        process::exit(1);
    });

    notifier
        .notify(&result, &cli.menu.title())
        .await
        .unwrap_or_else(|e| {
            log::error!("Error posting {} menu: {}", cli.menu, e);
            process::exit(1);
        });
}
