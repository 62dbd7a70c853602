use std::sync::Arc;

use concord::{Concord, FusionMethod, ResolutionPolicy, SeriesRequest, ViewOptions};
use concord_mock::{MockProvider, fixtures};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,concord=trace,concord_core=debug (with --features tracing)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();

    // 1. Register one provider per source mapped in the fixture catalog.
    let concord = Concord::builder()
        .with_catalog(fixtures::catalog())
        .with_provider(Arc::new(MockProvider::new("scale_api")))
        .with_provider(Arc::new(MockProvider::new("wearable_api")))
        .with_provider(Arc::new(MockProvider::new("manual")))
        .build()?;

    // 2. Merge by priority, then again with fusion.
    let req = SeriesRequest::new("body_weight");
    let picked = concord.merged_view(&req, &ViewOptions::default()).await?;
    let fused = concord
        .merged_view(
            &req,
            &ViewOptions::new(ResolutionPolicy::Fuse(FusionMethod::WeightedAverage))
                .disagreement_threshold_pct(0.5),
        )
        .await?;

    println!("## Merged body weight ({} days)", picked.points.len());
    for (p, f) in picked.points.iter().zip(&fused.points) {
        println!(
            " - {}: {:.2} kg via {} ({}), fused {:.2}{}",
            p.date,
            p.value,
            p.chosen_source,
            p.method,
            f.value,
            if f.disagreement { " [sources disagree]" } else { "" }
        );
    }

    println!("\n## Attribution:");
    for (source, span) in &picked.attribution.spans {
        println!(" - {source} chosen from {} to {}", span.start, span.end);
    }

    for w in &picked.warnings {
        println!("warning: {w}");
    }
    Ok(())
}
