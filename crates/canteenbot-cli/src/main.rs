use std::process;

use canteenbot::ResultStore;
use canteenbot::types::MenuType;
use canteenbot_cli::{CommonArgs, serialize_json};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "canteenbot")]
#[command(about = "Browse stored canteen menus", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a stored menu
    Show {
        #[arg(
            default_value = "today",
            help = "Menu to show: today, tomorrow or a day of the week"
        )]
        menu: MenuType,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
    /// List the days and locations serving an ingredient
    Search {
        #[arg(help = "Ingredient to look for, matched as a whole word")]
        ingredient: String,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
}

fn main() {
    let cli = Cli::parse();
    cli.common.init_logging();

    let config = cli.common.load_config();
    let store = ResultStore::new(&config.output_dir);

    let command = cli.command.unwrap_or(Commands::Show {
        menu: MenuType::Today,
        format: OutputFormat::Text,
    });

    match command {
        Commands::Show { menu, format } => {
            let result = store.read(menu).unwrap_or_else(|e| {
                log::error!("Error reading {} menu: {}", menu, e);
                process::exit(1);
            });

            match format {
                OutputFormat::Json => serialize_json(&result),
                OutputFormat::Text => print!("{}", result),
            }
        }

        Commands::Search { ingredient, format } => {
            let matches = store.search(&ingredient).unwrap_or_else(|e| {
                log::error!("Error searching menus: {}", e);
                process::exit(1);
            });

            match format {
                OutputFormat::Json => serialize_json(&matches),
                OutputFormat::Text => {
                    if matches.is_empty() {
                        println!("No menus mention '{}'.", ingredient);
                    } else {
                        for (i, m) in matches.iter().enumerate() {
                            println!("{:>3}. {}", i + 1, m);
                        }
                    }
                }
            }
        }
    }
}
