//! Simulated request latency model.
//!
//! Latency is the edge's base latency scaled by three independent
//! multiplicative factors, plus an origin round-trip amplification when the
//! content is not cached at the requested edge:
//!
//! - **Time of day**: diurnal traffic load. Peak hours are loaded, the
//!   small hours are quiet.
//! - **Congestion**: per-request jitter, uniform around 1.0.
//! - **Distance**: a per-region scale on top of the base latency.
//!
//! Every factor is drawn uniformly from a bounded half-open range, so the
//! output is plausible but only reproducible in distribution. Tests assert
//! range membership with a seeded RNG, never exact values.

use crate::catalog::ContentType;
use rand::Rng;

/// Origin round-trip amplification for uncached content.
const ORIGIN_FACTOR_LO: f64 = 2.5;
const ORIGIN_FACTOR_HI: f64 = 3.5;

/// Uniform factor range for the time-of-day traffic load.
///
/// Peak hours (08-11, 19-22) load the edge most; the quiet band
/// (23-05, wrapping midnight) barely does.
fn time_of_day_range(hour: u32) -> (f64, f64) {
    match hour {
        8..=11 | 19..=22 => (0.80, 0.90),
        23 | 0..=5 => (0.30, 0.40),
        _ => (0.60, 0.70),
    }
}

/// Uniform factor range for the content type.
fn content_type_range(content_type: ContentType) -> (f64, f64) {
    match content_type {
        ContentType::Video => (0.90, 1.00),
        ContentType::Image => (0.80, 0.90),
        ContentType::Static => (0.70, 0.80),
        ContentType::Api => (0.75, 0.85),
    }
}

/// Uniform factor range for the requesting region.
fn distance_range(location_id: &str) -> (f64, f64) {
    match location_id {
        "ap-south" => (0.80, 1.00),
        "ap-northeast" | "sa-east" => (0.80, 0.95),
        _ => (0.70, 0.80),
    }
}

fn sample<R: Rng>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    rng.gen_range(lo..hi)
}

/// Computes a simulated latency in whole milliseconds.
///
/// Effective latency is `round(base * time * congestion * distance)`. When
/// the content is not cached at the edge, the rounded value is amplified by
/// a uniform origin round-trip factor in [2.5, 3.5) and rounded again.
pub fn compute_latency<R: Rng>(
    base_latency_ms: u32,
    content_type: ContentType,
    location_id: &str,
    is_cached: bool,
    hour: u32,
    rng: &mut R,
) -> u32 {
    let time = sample(rng, time_of_day_range(hour));
    let congestion = rng.gen_range(0.85..1.15);
    let distance = sample(rng, distance_range(location_id));
    let type_factor = sample(rng, content_type_range(content_type));

    let mut latency =
        (base_latency_ms as f64 * time * congestion * distance * type_factor).round();

    if !is_cached {
        latency = (latency * rng.gen_range(ORIGIN_FACTOR_LO..ORIGIN_FACTOR_HI)).round();
    }

    latency as u32
}
