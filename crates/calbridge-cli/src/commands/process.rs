//! The fetch → parse → normalize → write pipeline.

use std::path::Path;

use tracing::{debug, info};

use calbridge_core::SourceTag;
use calbridge_engine::{
    CalendarDocument, IanaResolver, Normalizer, OutputPolicy, TimezoneContext, assemble,
    parse_json_feed, to_ics, to_json,
};
use calbridge_fetch::{Fetcher, Source};

use crate::cli::{Cli, OutputFormat};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Effective settings for one run: CLI flags layered over the config file.
struct RunSettings {
    policy: OutputPolicy,
    fallback_zone: String,
    display_zone: Option<String>,
    source_id: Option<String>,
    fold_width: usize,
}

impl RunSettings {
    fn merge(cli: &Cli, config: &CliConfig) -> CliResult<Self> {
        let settings = Self {
            policy: cli.policy.map(Into::into).unwrap_or(config.policy),
            fallback_zone: cli
                .fallback_zone
                .clone()
                .unwrap_or_else(|| config.fallback_zone.clone()),
            display_zone: cli.display_zone.clone().or_else(|| config.display_zone.clone()),
            source_id: cli.source_id.clone().or_else(|| config.source_id.clone()),
            fold_width: cli.fold_width.unwrap_or(config.fold_width),
        };
        if settings.policy == OutputPolicy::LocalWithZone && settings.display_zone.is_none() {
            return Err(CliError::Config(
                "the local-with-zone policy requires --display-zone".to_string(),
            ));
        }
        Ok(settings)
    }
}

/// Runs the whole pipeline for one feed.
pub async fn run(
    source: &str,
    output: &Path,
    cli: &Cli,
    config: &CliConfig,
) -> CliResult<()> {
    let settings = RunSettings::merge(cli, config)?;
    let format = cli.format.unwrap_or_else(|| OutputFormat::infer(output));
    let tag = settings.source_id.as_deref().map(SourceTag::new);

    let source = Source::parse(source)?;
    info!(source = %source, "fetching feed");
    let fetcher = Fetcher::new(&config.fetch_config())?;
    let text = fetcher.fetch(&source).await?;

    let resolver = IanaResolver;
    let normalizer = Normalizer::new(
        &resolver,
        &settings.fallback_zone,
        settings.policy,
        settings.display_zone.as_deref(),
    );

    let (rendered, count) = if looks_like_json(&text) {
        debug!("input looks like a JSON feed");
        if format == OutputFormat::Ics {
            return Err(CliError::Config(
                "JSON feeds can only be written as JSON output".to_string(),
            ));
        }
        let events = parse_json_feed(&text, tag.as_ref())?;
        let normalized = normalizer.normalize_events(&events, &TimezoneContext::none());
        (to_json(&normalized), normalized.len())
    } else {
        let doc = CalendarDocument::parse(&text);
        let context = doc.timezone_context();
        let events = assemble(&doc, tag.as_ref());
        let count = events.len();
        let rendered = match format {
            OutputFormat::Ics => to_ics(&doc, &events, &normalizer, settings.fold_width),
            OutputFormat::Json => to_json(&normalizer.normalize_events(&events, &context)),
        };
        (rendered, count)
    };

    tokio::fs::write(output, rendered).await?;
    info!(count, output = %output.display(), "wrote normalized events");
    println!("Wrote {} events to {}", count, output.display());
    Ok(())
}

/// JSON feeds start with `{` or `[`; everything else takes the ICS path.
fn looks_like_json(text: &str) -> bool {
    matches!(text.trim_start().as_bytes().first(), Some(b'{') | Some(b'['))
}
