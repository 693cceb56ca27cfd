use actix_governor::governor::middleware::StateInformationMiddleware;
use actix_governor::{GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor};

use crate::configuration::parse_env;
use crate::errors::ConfigurationError;

/// Rate limiting of the API, per client ip
pub fn build_rate_limiting_conf(
) -> Result<GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>, ConfigurationError> {
    let fill_rate: u64 = parse_env("RATE_LIMITING_FILL_RATE", 10)?;
    let bucket_size: u32 = parse_env("RATE_LIMITING_BUCKET_SIZE", 100)?;

    GovernorConfigBuilder::default()
        .per_second(fill_rate)
        .burst_size(bucket_size)
        .use_headers()
        .finish()
        .ok_or(ConfigurationError::InvalidRateLimiting)
}
