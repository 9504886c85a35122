//! Promo player benchmarks.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use promo::Command;
use promo_media::{
    embed_url, IframeApi, PlaybackAdapter, PlayerConfig, PlayerVars, ScriptHost, Widget,
    WidgetEvents, WidgetFactory,
};

struct NoopHost;

impl ScriptHost for NoopHost {
    fn inject_script(&self, _src: &str) {}
}

/// Widget that does nothing, so only adapter overhead is measured.
struct NullWidget;

impl Widget for NullWidget {
    fn play_video(&self) {}
    fn pause_video(&self) {}
    fn seek_to(&self, _seconds: f64, _allow_seek_ahead: bool) {}
    fn set_volume(&self, _volume: u8) {}
    fn mute(&self) {}
    fn un_mute(&self) {}
    fn duration(&self) -> f64 {
        212.0
    }
    fn current_time(&self) -> f64 {
        0.0
    }
    fn destroy(&self) {}
}

struct NullFactory;

impl WidgetFactory for NullFactory {
    fn create(
        &self,
        _mount_point: &str,
        _video_id: &str,
        _vars: &PlayerVars,
        _events: WidgetEvents,
    ) -> Arc<dyn Widget> {
        Arc::new(NullWidget)
    }
}

/// Benchmark input parsing and formatting.
fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    group.bench_function("command_parse", |b| {
        b.iter(|| {
            black_box(Command::parse(black_box("seek 75.5")).ok());
            black_box(Command::parse(black_box("up")).ok());
        })
    });

    group.bench_function("format_time", |b| {
        b.iter(|| black_box(common::format_time(black_box(212.7))))
    });

    group.bench_function("embed_url", |b| {
        let vars = PlayerVars::default();
        b.iter(|| black_box(embed_url(black_box("dbwIKgG16Cs"), &vars).ok()))
    });

    group.finish();
}

/// Benchmark adapter command dispatch.
fn bench_commands(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");
    let _guard = runtime.enter();

    let api = Arc::new(IframeApi::new());
    let adapter = PlaybackAdapter::new("dbwIKgG16Cs", PlayerConfig::default(), api.clone(), &NoopHost)
        .expect("adapter");
    api.resolve(Arc::new(NullFactory));

    let mut group = c.benchmark_group("commands");

    group.bench_function("change_volume", |b| {
        let mut volume = 0u8;
        b.iter(|| {
            volume = (volume + 7) % 101;
            adapter.change_volume(black_box(volume));
        })
    });

    group.bench_function("toggle_mute", |b| b.iter(|| adapter.toggle_mute()));

    group.bench_function("seek_to", |b| b.iter(|| adapter.seek_to(black_box(75.5))));

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_commands);
criterion_main!(benches);
