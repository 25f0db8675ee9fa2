// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Inf and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::str::FromStr;
use std::time::Duration;

use criterion::Criterion;

use pprof::criterion::{Output, PProfProfiler};

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Criterion tuned from `BENCH_*` variables. Flamegraphs are only collected when
/// `PROFILE_FREQ` is set, since hit-testing cases are short enough for sampling to dominate.
pub fn criterion() -> Criterion {
    let sample_size = env_or("BENCH_SAMPLE_SIZE", 60usize).clamp(10, 200);
    let warmup_secs = env_or("BENCH_WARMUP_SECS", 2u64).clamp(1, 60);
    let measurement_secs = env_or("BENCH_MEASUREMENT_SECS", 4u64).clamp(1, 120);

    let criterion = Criterion::default()
        .sample_size(sample_size)
        .warm_up_time(Duration::from_secs(warmup_secs))
        .measurement_time(Duration::from_secs(measurement_secs));

    match std::env::var("PROFILE_FREQ") {
        Ok(_) => {
            let frequency = env_or("PROFILE_FREQ", 100i32).clamp(1, 1000);
            criterion.with_profiler(PProfProfiler::new(frequency, Output::Flamegraph(None)))
        }
        Err(_) => criterion,
    }
}
