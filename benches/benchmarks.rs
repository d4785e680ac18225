//! Performance benchmarks for rprompt.
//!
//! Run with: cargo bench
//!
//! These benchmarks measure key performance metrics:
//! - Startup time (parse args, load config)
//! - Image validation and encoding at various sizes
//! - Response parsing
//! - Spinner start/stop latency

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::fs;
use std::io;
use std::time::Duration;
use tempfile::TempDir;

use rprompt::config::RpromptConfig;
use rprompt::feedback::Frames;
use rprompt::vision::gemini::{extract_description, GenerateContentResponse};
use rprompt::vision::load_image;
use rprompt::{Spinner, SpinnerConfig};

/// Helper to create a temp directory with a config file.
fn setup_config_env() -> (TempDir, std::path::PathBuf) {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("config.json");

    let config = r#"{
        "model": "gemini-2.5-flash",
        "studio_url": "https://aistudio.google.com/prompts/new_image",
        "spinner": {
            "style": "triangle",
            "interval_ms": 100
        }
    }"#;
    fs::write(&config_path, config).unwrap();

    (temp, config_path)
}

// ============================================================================
// Config benchmarks
// ============================================================================

fn bench_config_load(c: &mut Criterion) {
    let (temp, config_path) = setup_config_env();

    c.bench_function("config_load", |b| {
        b.iter(|| {
            let config = RpromptConfig::load(black_box(Some(config_path.as_path()))).unwrap();
            black_box(config)
        })
    });

    drop(temp);
}

// ============================================================================
// Image benchmarks
// ============================================================================

fn bench_image_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("image_load");
    let temp = TempDir::new().unwrap();

    for size in [64u32, 512, 1024] {
        let path = temp.path().join(format!("image-{size}.png"));
        image::RgbaImage::from_fn(size, size, |x, y| {
            image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        })
        .save(&path)
        .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &path, |b, path| {
            b.iter(|| black_box(load_image(black_box(path)).unwrap()))
        });
    }

    group.finish();
    drop(temp);
}

// ============================================================================
// Response benchmarks
// ============================================================================

fn bench_extract_description(c: &mut Criterion) {
    let parts: Vec<serde_json::Value> = (0..20)
        .map(|i| serde_json::json!({ "text": format!("Sentence number {i} of the description.") }))
        .collect();
    let body = serde_json::json!({
        "candidates": [{ "content": { "parts": parts }, "finishReason": "STOP" }]
    })
    .to_string();

    c.bench_function("extract_description", |b| {
        b.iter(|| {
            let response: GenerateContentResponse =
                serde_json::from_str(black_box(&body)).unwrap();
            black_box(extract_description(response).unwrap())
        })
    });
}

// ============================================================================
// Spinner benchmarks
// ============================================================================

fn bench_frames_resolve(c: &mut Criterion) {
    c.bench_function("frames_resolve_unknown", |b| {
        b.iter(|| black_box(Frames::from(black_box("nope")).resolve()))
    });
}

fn bench_spinner_start_stop(c: &mut Criterion) {
    // A long interval shows how quickly stop() interrupts the sleep
    let config = SpinnerConfig::new("benchmark").interval(Duration::from_secs(1));

    c.bench_function("spinner_start_stop", |b| {
        b.iter(|| {
            let mut spinner = Spinner::with_output(config.clone(), io::sink());
            spinner.start();
            spinner.stop();
            black_box(spinner.is_running())
        })
    });
}

// ============================================================================
// Startup benchmark (CLI parsing)
// ============================================================================

fn bench_cli_parsing(c: &mut Criterion) {
    use clap::Parser;
    use rprompt::cli::Cli;

    c.bench_function("cli_parse_image", |b| {
        b.iter(|| {
            let cli = Cli::try_parse_from(black_box(["rprompt", "photo.png"])).unwrap();
            black_box(cli)
        })
    });

    c.bench_function("cli_parse_open", |b| {
        b.iter(|| {
            let cli = Cli::try_parse_from(black_box([
                "rprompt",
                "photo.png",
                "--open",
                "--spinner",
                "arrow",
            ]))
            .unwrap();
            black_box(cli)
        })
    });

    c.bench_function("cli_parse_help", |b| {
        b.iter(|| {
            let result = Cli::try_parse_from(black_box(["rprompt", "--help"]));
            black_box(result)
        })
    });
}

criterion_group!(
    benches,
    bench_config_load,
    bench_image_load,
    bench_extract_description,
    bench_frames_resolve,
    bench_spinner_start_stop,
    bench_cli_parsing,
);

criterion_main!(benches);
