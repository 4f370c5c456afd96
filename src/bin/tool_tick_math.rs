/// Tick Math Tool
///
/// Offline converter between CLMM ticks, Q64.64 sqrt prices and decimal prices.
///
/// Usage:
///   cargo run --bin tool_tick_math -- tick-to-sqrt -18973
///   cargo run --bin tool_tick_math -- sqrt-to-tick 7144393258922745604
///   cargo run --bin tool_tick_math -- price 7144393258922745604 9 6
///   cargo run --bin tool_tick_math -- tick-price 10000 6 6 --digits 12
use anyhow::Result;
use clap::{Parser, Subcommand};
use clmm_analyzer::constants::DEFAULT_PRICE_SIGNIFICANT_DIGITS;
use clmm_analyzer::pools::math::{
    get_sqrt_price_x64_from_tick, get_tick_from_sqrt_price_x64, max_sqrt_price_x64,
    min_sqrt_price_x64, parse_sqrt_price_x64, sqrt_price_x64_to_price, tick_to_price,
    MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK,
};
use colored::*;

#[derive(Parser)]
#[command(name = "tool_tick_math")]
#[command(about = "Convert between CLMM ticks, sqrt prices and prices", long_about = None)]
struct Cli {
    /// Significant digits for printed prices (0 = exact)
    #[arg(long, global = true, default_value_t = DEFAULT_PRICE_SIGNIFICANT_DIGITS)]
    digits: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tick -> sqrt_price_x64
    TickToSqrt {
        #[arg(allow_negative_numbers = true)]
        tick: i32,
    },
    /// sqrt_price_x64 -> nearest tick below
    SqrtToTick { sqrt_price_x64: String },
    /// sqrt_price_x64 -> price of token A in token B
    Price {
        sqrt_price_x64: String,
        decimals_a: u8,
        decimals_b: u8,
    },
    /// Tick -> price of token A in token B
    TickPrice {
        #[arg(allow_negative_numbers = true)]
        tick: i32,
        decimals_a: u8,
        decimals_b: u8,
    },
    /// Print the legal tick and sqrt price range
    Bounds,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".bright_red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::TickToSqrt { tick } => {
            let sqrt = get_sqrt_price_x64_from_tick(tick)?;
            print_field("tick", &tick.to_string());
            print_field("sqrt_price_x64", &sqrt.to_string());
        }
        Command::SqrtToTick { sqrt_price_x64 } => {
            let sqrt = parse_sqrt_price_x64(&sqrt_price_x64)?;
            let tick = get_tick_from_sqrt_price_x64(sqrt)?;
            print_field("sqrt_price_x64", &sqrt.to_string());
            print_field("tick", &tick.to_string());
            print_field(
                "tick sqrt_price_x64",
                &get_sqrt_price_x64_from_tick(tick)?.to_string(),
            );
        }
        Command::Price {
            sqrt_price_x64,
            decimals_a,
            decimals_b,
        } => {
            let sqrt = parse_sqrt_price_x64(&sqrt_price_x64)?;
            let price = sqrt_price_x64_to_price(sqrt, decimals_a, decimals_b)?;
            print_field("sqrt_price_x64", &sqrt.to_string());
            print_field(
                "price",
                &price.with_significant_digits(cli.digits).to_plain_string(),
            );
        }
        Command::TickPrice {
            tick,
            decimals_a,
            decimals_b,
        } => {
            let price = tick_to_price(tick, decimals_a, decimals_b)?;
            print_field("tick", &tick.to_string());
            print_field(
                "price",
                &price.with_significant_digits(cli.digits).to_plain_string(),
            );
        }
        Command::Bounds => {
            print_field("min tick", &MIN_TICK.to_string());
            print_field("max tick", &MAX_TICK.to_string());
            print_field("min tick sqrt", &min_sqrt_price_x64().to_string());
            print_field("max tick sqrt", &max_sqrt_price_x64().to_string());
            print_field("min sqrt_price_x64", &MIN_SQRT_PRICE_X64.to_string());
            print_field("max sqrt_price_x64", &MAX_SQRT_PRICE_X64.to_string());
        }
    }
    Ok(())
}

fn print_field(label: &str, value: &str) {
    println!("{:<20} {}", format!("{}:", label).bold(), value);
}
