//! 译码与翻译基准测试
//!
//! 测试内容:
//! 1. 随机 SVE 编码组字的译码查找
//! 2. 常用指令序列翻译为 IR 块

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sve_frontend::encode::*;
use sve_frontend::{DecodeContext, SveTranslator, decode};

fn sve_words(n: usize) -> Vec<u32> {
    let mut rng = StdRng::seed_from_u64(0xbe7c);
    (0..n)
        .map(|_| {
            let top = rng.gen_range(0..8u32) << 29 | 0b0010 << 25;
            top | rng.gen_range(0..1u32 << 25)
        })
        .collect()
}

fn benchmark_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let words = sve_words(4096);
    group.throughput(Throughput::Elements(words.len() as u64));
    group.bench_function("random_sve_words", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for &w in &words {
                hits += decode(black_box(w)).is_some() as usize;
            }
            black_box(hits)
        });
    });
    group.finish();
}

fn benchmark_translate_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("translate_block");
    let insns = [
        whilelt(2, 0, 1, 2, true),
        ld1_zprr(10, 1, 0, 3, 1),
        ld1_zprr(10, 2, 0, 4, 1),
        fmla_zpzzz(2, 5, 0, 1, 2),
        st1_zprr(2, 2, 5, 0, 6, 1),
        cntp(2, 7, 0, 0),
        uaddv(2, 8, 0, 5),
        clastb_z(2, 9, 0, 5),
    ];
    group.throughput(Throughput::Elements(insns.len() as u64));

    for vl in [16u32, 64, 256] {
        let t = SveTranslator::new(DecodeContext { vl_bytes: vl, ..DecodeContext::default() });
        group.bench_with_input(BenchmarkId::from_parameter(vl), &vl, |b, _| {
            b.iter(|| black_box(t.translate_block(black_box(&insns)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_decode, benchmark_translate_block);
criterion_main!(benches);
