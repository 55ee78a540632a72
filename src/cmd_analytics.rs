//! `analytics` and `styles` commands.

use chrono::Utc;

use softline_config::Config;
use softline_core::{MetricsStore, available_styles};

use crate::cmd_rewrite::save_metrics;

pub(crate) fn run_analytics(
    config: &Config,
    clear: bool,
    json: bool,
    top: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = MetricsStore::load(&config.metrics.store_path, config.metrics.history_limit)?;

    if clear {
        store.clear();
        save_metrics(&store, &config.metrics.store_path)?;
        println!("Analytics cleared.");
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&store.query())?);
        return Ok(());
    }

    print!("{}", render_report(&store, top));
    Ok(())
}

fn render_report(store: &MetricsStore, top: usize) -> String {
    let summary = store.summary(Utc::now());
    let mut out = String::new();
    out.push_str(&format!("Total replacements:  {}\n", summary.total_count));
    out.push_str(&format!("Last hour:           {}\n", summary.last_hour));
    out.push_str(&format!("Avg toxicity (24h):  {:.2}\n", summary.avg_toxicity_24h));
    out.push_str(&format!("Last 7 days:         {}\n", summary.last_7_days));

    let domains = store.domain_stats(top);
    if !domains.is_empty() {
        out.push('\n');
        out.push_str(&format!("{:<30} {:>8} {:>12}\n", "DOMAIN", "COUNT", "AVG TOXICITY"));
        out.push_str(&format!("{}\n", "-".repeat(52)));
        for stat in domains {
            out.push_str(&format!("{:<30} {:>8} {:>12.2}\n", stat.domain, stat.count, stat.avg_toxicity));
        }
    }
    out
}

pub(crate) fn run_styles() {
    println!("{:<28} {}", "KEY", "DESCRIPTION");
    println!("{}", "-".repeat(60));
    for (key, summary) in available_styles() {
        println!("{:<28} {}", key, summary);
    }
}
