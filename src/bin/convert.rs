//! One-shot conversion from the command line
//!
//! Usage: umc-convert <quantity> <from> <to>
//!
//! Units registered through the MCP server are loaded from the same
//! database, so `umc-convert 2 st lb` works once `st` has been registered.

use tracing_subscriber::EnvFilter;

use umc::conversion::{is_temperature_scale, UnitTable};
use umc::tools::conversions;

fn load_table() -> Result<UnitTable, Box<dyn std::error::Error>> {
    let mut table = UnitTable::standard();

    let db_path = umc::config::database_path();
    if !db_path.exists() {
        tracing::debug!("No database at {}, using default units", db_path.display());
        return Ok(table);
    }

    let database = umc::db::Database::new(&db_path)?;
    database.with_conn(|conn| umc::db::migrations::run_migrations(conn))?;
    conversions::load_registrations(&database, &mut table)?;
    Ok(table)
}

/// argv[0], or the binary name when the OS passes an empty argv
fn program_name(args: &[String]) -> &str {
    args.first().map_or("umc-convert", String::as_str)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("umc=warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        let program = program_name(&args);
        eprintln!("Usage: {} <quantity> <from> <to>", program);
        eprintln!("Example: {} 2.5 kg lb", program);
        eprintln!("         {} 100 F C", program);
        std::process::exit(2);
    }

    let (quantity, from, to) = (&args[1], &args[2], &args[3]);

    let response = if is_temperature_scale(from) && is_temperature_scale(to) {
        conversions::convert_temperature(quantity, from, to)
    } else {
        let table = load_table()?;
        conversions::convert_unit(&table, quantity, from, to)
    };

    match response {
        Ok(resp) => {
            println!("{} {} = {} {}", resp.quantity, resp.from, resp.display, resp.to);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
