//! Extraction benchmarks.
//!
//! `cargo bench` runs one page through every output format, with and
//! without the comparison algorithms, and through a long-lived extractor.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use trafilatura_core::{extract, Extractor, Options, OutputFormat};

const SAMPLE_HTML: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Harbour works resume - Coastal Daily</title>
    <meta name="author" content="Mara Quinn">
    <meta property="og:description" content="Construction at the old harbour restarts after the winter break.">
    <link rel="canonical" href="https://coastal.example/2024/03/12/harbour-works/">
</head>
<body>
    <header><ul><li><a href="/">Front page</a></li><li><a href="/local">Local</a></li></ul></header>
    <article>
        <h1>Harbour works resume</h1>
        <p>Crews returned to the old harbour on Monday, three months after storms
        forced the site to close for the winter.</p>
        <p>The council expects the new breakwater to be finished by autumn, <em>weather
        permitting</em>, and the quay to reopen to ferries the following spring.</p>
        <table><tr><th>Phase</th><th>Status</th></tr><tr><td>Breakwater</td><td>Underway</td></tr></table>
        <p>Residents can follow the works on a public noticeboard at the harbour
        master's office.</p>
    </article>
    <section class="comments-list">
        <p>Good to see the site busy again.</p>
        <p>The ferry timetable has been a mess all winter, hope this helps.</p>
    </section>
    <footer><p>All rights reserved.</p></footer>
</body>
</html>
"#;

fn bench_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("formats");
    group.throughput(Throughput::Bytes(SAMPLE_HTML.len() as u64));
    for format in [
        OutputFormat::Txt,
        OutputFormat::Json,
        OutputFormat::Xml,
        OutputFormat::XmlTei,
    ] {
        let options = Options {
            output_format: format,
            ..Options::default()
        };
        group.bench_with_input(BenchmarkId::new("extract", format), &options, |b, options| {
            b.iter(|| extract(black_box(SAMPLE_HTML), black_box(options)));
        });
    }
    group.finish();
}

fn bench_no_fallback(c: &mut Criterion) {
    let options = Options {
        no_fallback: true,
        ..Options::default()
    };
    c.bench_function("extract_no_fallback", |b| {
        b.iter(|| extract(black_box(SAMPLE_HTML), black_box(&options)));
    });
}

fn bench_extractor_dedup(c: &mut Criterion) {
    let options = Options {
        deduplicate: true,
        // the same page over and over must not be discarded
        max_repetitions: i32::MAX,
        ..Options::default()
    };
    let mut extractor = Extractor::new(options);
    c.bench_function("extractor_dedup", |b| {
        b.iter(|| extractor.extract(black_box(SAMPLE_HTML)));
    });
}

criterion_group!(benches, bench_formats, bench_no_fallback, bench_extractor_dedup);
criterion_main!(benches);
