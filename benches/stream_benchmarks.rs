use criterion::{Criterion, black_box, criterion_group, criterion_main};

use meshstream::stream::{
    IndexFormat, IndicesStream, VertexFormat, VertexSemantic, VertexStreamLayout,
};

// ---------------------------------------------------------------------------
// Layout construction
// ---------------------------------------------------------------------------

fn bench_layout_build(c: &mut Criterion) {
    c.bench_function("layout_build_interleaved", |b| {
        b.iter(|| {
            let mut layout = VertexStreamLayout::new();
            layout.set_vertex_type(
                black_box(VertexSemantic::Position),
                VertexFormat::Float3,
                0,
            );
            layout.set_vertex_type(black_box(VertexSemantic::Normal), VertexFormat::Float3, 0);
            layout.set_vertex_type(black_box(VertexSemantic::Tangent), VertexFormat::Float4, 0);
            layout.set_vertex_type(
                black_box(VertexSemantic::TexCoord(0)),
                VertexFormat::Float2,
                0,
            );
            black_box(layout)
        });
    });
}

fn bench_layout_attribute_lookup(c: &mut Criterion) {
    let mut layout = VertexStreamLayout::new();
    layout.set_vertex_type(VertexSemantic::Position, VertexFormat::Float3, 0);
    layout.set_vertex_type(VertexSemantic::Normal, VertexFormat::Float3, 0);
    layout.set_vertex_type(VertexSemantic::TexCoord(0), VertexFormat::Float2, 0);
    c.bench_function("layout_attribute_lookup", |b| {
        b.iter(|| black_box(layout.attribute(black_box(VertexSemantic::Normal))));
    });
}

// ---------------------------------------------------------------------------
// Index stream
// ---------------------------------------------------------------------------

fn filled_stream(format: IndexFormat, count: u32) -> IndicesStream {
    let mut stream = IndicesStream::new();
    stream.set_index_format(format);
    stream.reserve(count);
    for i in 0..count {
        stream.push_fast(i % 3);
    }
    stream
}

fn bench_push_fast_64k(c: &mut Criterion) {
    c.bench_function("indices_push_fast_64k_u16", |b| {
        b.iter(|| {
            let mut stream = IndicesStream::new();
            stream.set_index_format(IndexFormat::Uint16);
            stream.reserve(65536);
            for i in 0..65536u32 {
                stream.push_fast(black_box(i & 0xFFFF));
            }
            black_box(stream)
        });
    });
}

fn bench_full_merge_64k(c: &mut Criterion) {
    let source = filled_stream(IndexFormat::Uint32, 65536);
    c.bench_function("indices_full_merge_64k_u32", |b| {
        b.iter(|| {
            let mut dst = filled_stream(IndexFormat::Uint32, 65536);
            dst.full_merge(black_box(&source), black_box(1024), dst.count());
            black_box(dst)
        });
    });
}

fn bench_to_u32_vec_64k(c: &mut Criterion) {
    let stream = filled_stream(IndexFormat::Uint16, 65536);
    c.bench_function("indices_to_u32_vec_64k_u16", |b| {
        b.iter(|| black_box(stream.to_u32_vec()));
    });
}

criterion_group!(
    benches,
    bench_layout_build,
    bench_layout_attribute_lookup,
    bench_push_fast_64k,
    bench_full_merge_64k,
    bench_to_u32_vec_64k,
);
criterion_main!(benches);
