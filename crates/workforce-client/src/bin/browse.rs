//! # Master-Data Browser
//!
//! Prints one page of an HR master-data list from the backend, rendered
//! through the same table view model the dashboard uses.
//!
//! ## Usage
//! ```bash
//! # First page of regions (default page size from client.toml)
//! cargo run -p workforce-client --bin browse -- regions
//!
//! # Third page of holidays, 25 per page, Arabic names
//! cargo run -p workforce-client --bin browse -- holidays --page 3 --page-size 25 --rtl
//!
//! # Search terminals against a specific backend
//! WORKFORCE_API_URL=https://hr.example.com/api \
//!   cargo run -p workforce-client --bin browse -- biometric-terminals --search gate
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use workforce_client::{ClientConfig, HttpSource, ListController, TracingSink};
use workforce_core::catalog;
use workforce_core::table::{ActionState, RowActions, RowHandlers, TableBody, TableView};
use workforce_core::{Columns, CoreResult, Entity, ListSnapshot, PageRequest, TextDirection};

/// Resources the browser knows, with their REST path.
const RESOURCES: &[&str] = &[
    "regions",
    "grades",
    "organizations",
    "designations",
    "nationalities",
    "employee-types",
    "holidays",
    "biometric-terminals",
    "leave-types",
    "permission-types",
    "weekly-rosters",
];

struct Options {
    resource: String,
    page: u32,
    page_size: Option<u32>,
    search: Option<String>,
    config_path: Option<PathBuf>,
    rtl: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let Some(opts) = parse_args(env::args().collect()) else {
        print_usage();
        return Ok(());
    };

    let mut config = ClientConfig::load(opts.config_path.clone())?;
    if let Some(page_size) = opts.page_size {
        config.list.page_size = page_size;
    }
    if opts.rtl {
        config.locale.direction = TextDirection::Rtl;
    }
    config.validate()?;

    match opts.resource.as_str() {
        "regions" => browse(&opts, &config, catalog::region_columns()).await,
        "grades" => browse(&opts, &config, catalog::grade_columns()).await,
        "organizations" => browse(&opts, &config, catalog::organization_columns()).await,
        "designations" => browse(&opts, &config, catalog::designation_columns()).await,
        "nationalities" => browse(&opts, &config, catalog::nationality_columns()).await,
        "employee-types" => browse(&opts, &config, catalog::employee_type_columns()).await,
        "holidays" => browse(&opts, &config, catalog::holiday_columns()).await,
        "biometric-terminals" => {
            browse(&opts, &config, catalog::biometric_terminal_columns()).await
        }
        "leave-types" => browse(&opts, &config, catalog::leave_type_columns()).await,
        "permission-types" => browse(&opts, &config, catalog::permission_type_columns()).await,
        "weekly-rosters" => browse(&opts, &config, catalog::weekly_roster_columns()).await,
        other => {
            eprintln!("Unknown resource '{}'", other);
            print_usage();
            Ok(())
        }
    }
}

fn parse_args(args: Vec<String>) -> Option<Options> {
    let mut opts = Options {
        resource: String::new(),
        page: 1,
        page_size: None,
        search: None,
        config_path: None,
        rtl: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--page" | "-p" => {
                if i + 1 < args.len() {
                    opts.page = args[i + 1].parse().unwrap_or(1);
                    i += 1;
                }
            }
            "--page-size" | "-n" => {
                if i + 1 < args.len() {
                    opts.page_size = args[i + 1].parse().ok();
                    i += 1;
                }
            }
            "--search" | "-s" => {
                if i + 1 < args.len() {
                    opts.search = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    opts.config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--rtl" => opts.rtl = true,
            "--help" | "-h" => return None,
            other if opts.resource.is_empty() && !other.starts_with('-') => {
                opts.resource = other.to_string();
            }
            _ => {}
        }
        i += 1;
    }

    (!opts.resource.is_empty()).then_some(opts)
}

fn print_usage() {
    println!("Workforce Master-Data Browser");
    println!();
    println!("Usage: browse <RESOURCE> [OPTIONS]");
    println!();
    println!("Resources:");
    for resource in RESOURCES {
        println!("  {}", resource);
    }
    println!();
    println!("Options:");
    println!("  -p, --page <N>         Page to show (default: 1)");
    println!("  -n, --page-size <N>    Rows per page (default: from config)");
    println!("  -s, --search <TEXT>    Search text");
    println!("  -c, --config <PATH>    Config file (default: platform config dir)");
    println!("      --rtl              Show Arabic names");
    println!("  -h, --help             Show this help message");
}

async fn browse<T>(
    opts: &Options,
    config: &ClientConfig,
    columns: CoreResult<Columns<T>>,
) -> Result<(), Box<dyn std::error::Error>>
where
    T: Entity + Serialize + DeserializeOwned,
{
    let columns = columns?;
    let source: HttpSource<T> = HttpSource::new(&config.api, &opts.resource)?;
    let controller = ListController::from_config(source, config, Arc::new(TracingSink));

    controller.load().await;
    if let Some(search) = &opts.search {
        controller.apply_search(search).await;
    }
    if opts.page > 1 && controller.seek_page(opts.page).await == PageRequest::Ignored {
        let snapshot = controller.snapshot().await;
        if snapshot.error.is_none() {
            eprintln!(
                "✗ Page {} is out of range (pages: {})",
                opts.page, snapshot.page_count
            );
            return Ok(());
        }
    }

    let snapshot = controller.snapshot().await;
    if let Some(error) = &snapshot.error {
        eprintln!("✗ {}", error);
        return Ok(());
    }

    let ctx = config.render_context();
    let view = controller
        .render(&columns, &ctx, RowHandlers::edit_delete())
        .await;

    print_table(&view);
    print_footer(&snapshot);
    Ok(())
}

fn print_table(view: &TableView) {
    let mut header: Vec<String> = view.header.columns.iter().map(|c| c.label.clone()).collect();
    if view.header.actions {
        header.push("Actions".to_string());
    }

    let rows: Vec<Vec<String>> = match &view.body {
        TableBody::Loading { skeleton_rows, columns } => {
            vec![vec!["…".to_string(); *columns]; *skeleton_rows as usize]
        }
        TableBody::Empty { message, .. } => {
            println!("{}", header.join(" | "));
            println!("{}", message);
            return;
        }
        TableBody::Rows(rows) => rows
            .iter()
            .map(|row| {
                let mut cells: Vec<String> = row.cells.iter().map(|c| c.to_string()).collect();
                if let Some(actions) = &row.actions {
                    cells.push(describe_actions(actions));
                }
                cells
            })
            .collect(),
    };

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    println!("{}", pad_line(&header, &widths));
    println!(
        "{}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("-+-")
    );
    for row in &rows {
        println!("{}", pad_line(row, &widths));
    }
}

fn pad_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Disabled controls are shown in parentheses.
fn describe_actions(actions: &RowActions) -> String {
    match actions {
        RowActions::Standard { edit, delete } => [("edit", edit), ("delete", delete)]
            .into_iter()
            .filter_map(|(name, state)| state.as_ref().map(|s| action_label(name, s)))
            .collect::<Vec<_>>()
            .join(" "),
        RowActions::Custom(custom) => custom
            .iter()
            .map(|a| action_label(&a.label, &a.state))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn action_label(name: &str, state: &ActionState) -> String {
    match state {
        ActionState::Enabled => name.to_string(),
        ActionState::Disabled => format!("({})", name),
    }
}

fn print_footer<T>(snapshot: &ListSnapshot<T>) {
    println!();
    match snapshot.total {
        Some(total) => println!(
            "Page {} of {} ({} records)",
            snapshot.page, snapshot.page_count, total
        ),
        None => println!("Page {} of {}", snapshot.page, snapshot.page_count),
    }
}
