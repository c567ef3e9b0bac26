use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use container_layer_check::ci_output::error_annotation;
use container_layer_check::inspector::InspectorError;
use container_layer_check::Opt;

// CONTAINER=myorg/app:latest PARENT=alpine:3.18 cargo run --bin layer-check-app

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let opt = Opt::parse();

    match container_layer_check::check_main(opt).await {
        Ok(outcome) => {
            tracing::debug!("Finished layer check: {:?}", outcome);
            Ok(())
        }
        Err(e) => match e.downcast_ref::<InspectorError>() {
            Some(inspector_error) => {
                println!("{}", error_annotation("skopeo", &inspector_error.diagnostic()));
                std::process::exit(inspector_error.exit_code());
            }
            None => Err(e),
        },
    }
}
