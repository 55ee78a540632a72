//! `rewrite` and `score` commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use softline_config::Config;
use softline_core::{DisablePolicy, MetricsStore, MutationPipeline, PassReport, PipelineOptions};
use softline_dom::{Document, render_html};
use softline_protocols::{ServiceKind, Settings};

use crate::register::{build_gate, build_scorer, build_transform_service};

/// Options of the `rewrite` command.
pub(crate) struct RewriteArgs {
    pub file: Option<PathBuf>,
    pub text: Option<String>,
    pub url: Option<String>,
    pub style: Option<String>,
    pub backend: Option<ServiceKind>,
}

pub(crate) async fn run_rewrite(config: &Config, args: RewriteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let source = match (&args.file, args.text) {
        (Some(path), _) => std::fs::read_to_string(path)?,
        (None, Some(text)) => text,
        (None, None) => return Err("no input text".into()),
    };

    let settings = effective_settings(&config.settings, args.style, args.backend);
    let metrics = Arc::new(MetricsStore::load(
        &config.metrics.store_path,
        config.metrics.history_limit,
    )?);
    let document = Document::from_paragraphs(&source);

    let pipeline = MutationPipeline::new(
        document.clone(),
        Arc::new(build_scorer(config)),
        Arc::new(build_transform_service(config)),
        metrics.clone(),
        settings,
    )
    .with_gate(build_gate(config))
    .with_options(PipelineOptions {
        url: args.url,
        ..Default::default()
    });

    let report = pipeline.start().await?;
    // One-shot run: no page script follows, so stop observing.
    pipeline.stop(DisablePolicy::RequireReload);

    {
        let dom = document.lock();
        println!("{}", render_html(&dom, dom.body()));
    }
    eprintln!("{}", pass_summary(&report));

    save_metrics(&metrics, &config.metrics.store_path)?;
    Ok(())
}

pub(crate) async fn run_score(config: &Config, texts: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let scorer = build_scorer(config);
    let assessments = scorer.score_batch(texts).await;

    let output: Vec<serde_json::Value> = texts
        .iter()
        .zip(assessments)
        .map(|(text, assessment)| {
            serde_json::json!({
                "text": text,
                "toxicityScore": assessment.toxicity_score,
                "isToxic": assessment.is_toxic,
                "confidence": assessment.confidence,
                "method": assessment.method,
                "level": assessment.level().label(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Config settings with command-line overrides applied.
fn effective_settings(base: &Settings, style: Option<String>, backend: Option<ServiceKind>) -> Settings {
    let mut settings = base.clone();
    // A one-shot run is always enabled; `enabled = false` only matters to a live session.
    settings.enabled = true;
    if let Some(style) = style {
        settings.style_key = style;
    }
    if let Some(backend) = backend {
        settings.backend = backend;
    }
    settings
}

fn pass_summary(report: &PassReport) -> String {
    format!(
        "{} fragments, {} gated, {} replaced ({} plain), {} unchanged, {} below threshold, {} failed, {} dropped",
        report.discovered,
        report.gated,
        report.replaced(),
        report.fallback_replaced,
        report.unchanged,
        report.below_threshold,
        report.failed,
        report.dropped,
    )
}

pub(crate) fn save_metrics(metrics: &MetricsStore, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    metrics.save(path)?;
    info!(path = %path.display(), total = metrics.total_count(), "Saved analytics");
    Ok(())
}
