use std::env::var;

use opentelemetry_sdk::trace::{self, RandomIdGenerator, Sampler, Tracer};
use tracing::Subscriber;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

pub fn get_subscriber(name: &str, env_filter: &str) -> impl Subscriber + Sync + Send {
    let telemetry = build_datadog(name).or_else(|| build_jaeger(name));

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));

    let json = var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));
    let json_fmt = json.then(|| tracing_subscriber::fmt::layer().json());
    let plain_fmt = (!json).then(|| tracing_subscriber::fmt::layer());

    Registry::default()
        .with(telemetry)
        .with(env_filter)
        .with(json_fmt)
        .with(plain_fmt)
}

/// Install the subscriber globally, `log` records included
pub fn init_subscriber(
    subscriber: impl Subscriber + Sync + Send + 'static,
) -> Result<(), TryInitError> {
    subscriber.try_init()
}

fn build_jaeger<S>(name: &str) -> Option<OpenTelemetryLayer<S, Tracer>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if var("JAEGER_ENABLED").is_err() {
        return None;
    }

    opentelemetry_jaeger::new_agent_pipeline()
        .with_service_name(name)
        .install_batch(opentelemetry_sdk::runtime::Tokio)
        .map_err(|err| eprintln!("Jaeger error {:?}", err))
        .ok()
        .map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer))
}

fn build_datadog<S>(name: &str) -> Option<OpenTelemetryLayer<S, Tracer>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if var("DD_ENABLED").is_err() {
        return None;
    }

    opentelemetry_datadog::new_pipeline()
        .with_service_name(name)
        .with_agent_endpoint(var("DD_AGENT").unwrap_or_else(|_| "http://127.0.0.1:8126".to_owned()))
        .with_trace_config(
            trace::config()
                .with_sampler(Sampler::AlwaysOn)
                .with_id_generator(RandomIdGenerator::default()),
        )
        .install_batch(opentelemetry_sdk::runtime::Tokio)
        .map_err(|err| eprintln!("Datadog error {:?}", err))
        .ok()
        .map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer))
}
