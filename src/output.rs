/// Report output: pretty JSON file and console summary
use crate::errors::AnalyzerResult;
use crate::logger::{self, LogTag};
use crate::pools::analyzer::PoolAnalysis;
use colored::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// `<output_dir>/pool_<POOL_ID>.json`
pub fn default_output_path(output_dir: &str, pool_id: &str) -> PathBuf {
    Path::new(output_dir).join(format!("pool_{}.json", pool_id))
}

/// Write `value` as pretty JSON, creating parent directories as needed
pub fn write_report_json<T: Serialize>(path: &Path, value: &T) -> AnalyzerResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;

    logger::info(
        LogTag::Output,
        &format!("Pool info saved to {}", path.display()),
    );
    Ok(())
}

/// Human-readable lines for the console summary
pub fn summary_lines(analysis: &PoolAnalysis) -> Vec<String> {
    let report = &analysis.report;
    let mut lines = vec![
        format!("Pool: {}", report.pool_id),
        format!("Program: {}", report.program_id),
        format!(
            "Token pair: {}/{}",
            report.token_a.symbol, report.token_b.symbol
        ),
        format!(
            "Current price: 1 {} = {} {}",
            report.token_a.symbol, report.price.current, report.token_b.symbol
        ),
        format!("Tick: {}", report.price.tick_current),
        format!("Start time: {}", report.start_time),
    ];

    for token in [&report.token_a, &report.token_b] {
        if let Some(balance) = &token.vault_balance {
            lines.push(format!("Vault {}: {} {}", token.vault, balance, token.symbol));
        }
    }

    if let Some(metrics) = &analysis.performance_metrics {
        lines.push(format!("Total time: {:.2}ms", metrics.total_time));
    }

    lines
}

pub fn print_summary(analysis: &PoolAnalysis) {
    println!("\n{}", "=== POOL INFORMATION ===".bright_cyan().bold());
    for line in summary_lines(analysis) {
        match line.split_once(": ") {
            Some((label, value)) => println!("{}: {}", label.bold(), value),
            None => println!("{}", line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pools::report::{PoolReport, PriceReport, TokenReport};
    use crate::pools::types::DecimalPrice;
    use crate::profiling::PerformanceMetrics;
    use std::collections::BTreeMap;
    use std::str::FromStr;
    use tempfile::tempdir;

    fn token(symbol: &str, vault_balance: Option<&str>) -> TokenReport {
        TokenReport {
            mint: format!("{}-mint", symbol),
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            decimals: 6,
            vault: format!("{}-vault", symbol),
            vault_balance: vault_balance.map(str::to_string),
        }
    }

    fn sample_analysis() -> PoolAnalysis {
        PoolAnalysis {
            report: PoolReport {
                pool_id: "pool".to_string(),
                program_id: "program".to_string(),
                token_a: token("SOL", Some("12.5")),
                token_b: token("USDC", None),
                price: PriceReport {
                    current: DecimalPrice::from_str("149.99999999999999997").unwrap(),
                    sqrt_price_x64: "7144393258922745604".to_string(),
                    tick_current: -18973,
                },
                start_time: "Unknown".to_string(),
            },
            performance_metrics: Some(PerformanceMetrics {
                total_time: 12.0,
                markers: BTreeMap::new(),
            }),
        }
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path("out", "ABC"),
            Path::new("out").join("pool_ABC.json")
        );
    }

    #[test]
    fn test_write_report_json_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("pool_x.json");

        write_report_json(&path, &sample_analysis()).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["poolId"], "pool");
        assert_eq!(written["price"]["current"], "149.99999999999999997");
        assert_eq!(written["tokenA"]["vaultBalance"], "12.5");
        assert!(written["tokenB"].get("vaultBalance").is_none());
        assert_eq!(written["performanceMetrics"]["totalTime"], 12.0);
    }

    #[test]
    fn test_summary_lines() {
        let lines = summary_lines(&sample_analysis());
        assert!(lines.contains(&"Token pair: SOL/USDC".to_string()));
        assert!(lines.contains(&"Current price: 1 SOL = 149.99999999999999997 USDC".to_string()));
        assert!(lines.contains(&"Vault SOL-vault: 12.5 SOL".to_string()));
        assert!(lines.contains(&"Total time: 12.00ms".to_string()));
    }
}
