use std::sync::Arc;
use std::time::Duration;

use concord::{Concord, SeriesRequest};
use concord_mock::{MockProvider, fixtures};

fn fmt(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |x| format!("{x:.3}"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let concord = Concord::builder()
        .with_catalog(fixtures::catalog())
        .with_provider(Arc::new(MockProvider::new("scale_api")))
        .with_provider(Arc::new(MockProvider::new("wearable_api")))
        .with_provider(Arc::new(MockProvider::new("manual")))
        .with_provider(Arc::new(MockProvider::new("chest_strap")))
        .with_provider(Arc::new(MockProvider::new("watch")))
        .provider_timeout(Duration::from_secs(2))
        .build()?;

    for group in ["body_weight", "resting_hr"] {
        let report = concord.correlation_report(&SeriesRequest::new(group)).await?;
        println!("## {group}");
        for r in &report {
            println!(
                " - {} vs {}: n={} status={:?} r={} rho={} icc={} ccc={} mae={} bias={} p={}",
                r.source_a,
                r.source_b,
                r.n,
                r.status,
                fmt(r.pearson),
                fmt(r.spearman),
                fmt(r.icc),
                fmt(r.ccc),
                fmt(r.mae),
                fmt(r.mean_bias),
                fmt(r.p_value),
            );
        }
    }

    // Served from cache this time.
    let again = concord
        .correlation_report(&SeriesRequest::new("body_weight"))
        .await?;
    println!("\ncached rows: {}", again.len());
    Ok(())
}
