//! Benchmarks do anotador de citações.
//!
//! Testa performance de:
//! - Numeração das fontes (SourceMap)
//! - Inserção de marcadores por índice de caractere
//! - Anotação completa com referências
//! - Resolução em batch com resolvedor mock
//!
//! Executar: `cargo bench --bench citation_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grounding_citations::prelude::*;
use grounding_citations::utils::insert_markers;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HELPERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn create_chunks(count: usize) -> Vec<SourceChunk> {
    (0..count)
        .map(|i| {
            SourceChunk::new(
                format!("https://redirect.example/grounding-api-redirect/{}", i % (count / 2 + 1)),
                format!("Source {}", i),
            )
        })
        .collect()
}

fn create_answer(sentences: usize) -> String {
    "O Rust garante segurança de memória sem coletor de lixo. ".repeat(sentences)
}

fn create_segments(text: &str, chunks: usize) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut offset = 0;
    for (i, sentence) in text.split_inclusive(". ").enumerate() {
        offset += sentence.chars().count();
        segments.push(Segment::new(offset, vec![i % chunks, (i * 7) % chunks]));
    }
    segments
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK: Numeração de fontes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn bench_source_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("source_map");

    for count in [10, 50, 200] {
        let chunks = create_chunks(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &chunks, |b, chunks| {
            b.iter(|| SourceMap::from_chunks(black_box(chunks)))
        });
    }

    group.finish();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK: Inserção de marcadores
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn bench_insert_markers(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_markers");
    let chunks = create_chunks(20);
    let sources = SourceMap::from_chunks(&chunks);

    for sentences in [10, 100, 500] {
        let text = create_answer(sentences);
        let segments = create_segments(&text, chunks.len());

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(sentences),
            &(text, segments),
            |b, (text, segments)| b.iter(|| insert_markers(black_box(text), &sources, segments)),
        );
    }

    group.finish();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK: Anotação completa
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn bench_annotate(c: &mut Criterion) {
    let chunks = create_chunks(20);
    let text = create_answer(100);
    let segments = create_segments(&text, chunks.len());

    let mut mapping = UrlMapping::new();
    for chunk in &chunks {
        if let Some(uri) = chunk.citable_uri() {
            mapping.insert(uri.to_string(), format!("{}/S%C3%A3o_Paulo", uri));
        }
    }

    c.bench_function("annotate_raw_urls", |b| {
        b.iter(|| add_citations(black_box(&text), &chunks, &segments, None))
    });

    c.bench_function("annotate_resolved_urls", |b| {
        b.iter(|| add_citations(black_box(&text), &chunks, &segments, Some(&mapping)))
    });
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK: Resolução em batch (mock)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn bench_resolve_batch(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let urls: Vec<String> = (0..50)
        .map(|i| format!("https://redirect.example/{}", i))
        .collect();
    let resolver = urls
        .iter()
        .fold(MockUrlResolver::new(), |r, url| r.with_redirect(url.clone(), format!("{}/final", url)));

    c.bench_function("resolve_redirects_mock_50", |b| {
        b.to_async(&runtime)
            .iter(|| resolve_redirects(&resolver, black_box(&urls)))
    });
}

criterion_group!(
    benches,
    bench_source_map,
    bench_insert_markers,
    bench_annotate,
    bench_resolve_batch
);
criterion_main!(benches);
