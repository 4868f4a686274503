use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use tsgraph::api::{find_date_labels, find_linear_labels};
use tsgraph::core::interval::SECONDS_PER_DAY;
use tsgraph::core::line_series::project_line;
use tsgraph::core::{
    CalendarStep, CalendarUnit, DataRect, DateRange, DeviceRect, RecordingInterval,
    RegionTransform, Sample, TimeSeries,
};

fn bench_linear_label_search(c: &mut Criterion) {
    c.bench_function("find_linear_labels awkward range", |b| {
        b.iter(|| find_linear_labels(black_box(3.173), black_box(9_871.02), false, 4, 12))
    });
}

fn bench_date_label_search(c: &mut Criterion) {
    let visible = DateRange::new(0, 40 * 365 * SECONDS_PER_DAY);
    c.bench_function("find_date_labels forty years", |b| {
        b.iter(|| find_date_labels(black_box(visible), 1_200.0, 36.0))
    });
}

fn bench_line_projection(c: &mut Criterion) {
    let samples: Vec<Sample> = (0..100_000)
        .map(|day| Sample::new(day as i64 * SECONDS_PER_DAY, (day % 97) as f64))
        .collect();
    let series = TimeSeries::new(
        "bench",
        "CFS",
        RecordingInterval::Regular(CalendarStep::new(CalendarUnit::Day, 1).expect("step")),
        samples,
    )
    .expect("valid series");
    let period = series.period();
    let transform = RegionTransform::new(
        DeviceRect::new(0.0, 0.0, 1_600.0, 900.0),
        DataRect::new(period.start as f64, period.end as f64, 0.0, 100.0),
    )
    .expect("valid transform");

    c.bench_function("project_line 100k daily samples", |b| {
        b.iter(|| project_line(black_box(&series), transform, period, None))
    });
}

criterion_group!(
    benches,
    bench_linear_label_search,
    bench_date_label_search,
    bench_line_projection
);
criterion_main!(benches);
