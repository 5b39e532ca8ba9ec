use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use qoif::{Channels, ColorSpace, DecodeContext, EncodeContext, ImageDesc};

/// Small xorshift PRNG so benchmark inputs don't depend on bundled image
/// fixtures; deterministic across runs for stable comparisons.
fn noise(n_pixels: usize, channels: Channels, seed: u32) -> Vec<u8> {
    let mut state = seed.wrapping_add(0x9E3779B9);
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };
    let mut out = Vec::with_capacity(n_pixels * channels.count());
    for _ in 0..n_pixels {
        let v = next();
        let px = [v as u8, (v >> 8) as u8, (v >> 16) as u8, (v >> 24) as u8];
        out.extend_from_slice(&px[..channels.count()]);
    }
    out
}

fn gradient(width: u32, height: u32, channels: Channels) -> Vec<u8> {
    let mut out = Vec::with_capacity(width as usize * height as usize * channels.count());
    for y in 0..height {
        for x in 0..width {
            let px = [x as u8, y as u8, (x ^ y) as u8, 255];
            out.extend_from_slice(&px[..channels.count()]);
        }
    }
    out
}

const SHAPES: &[(u32, u32)] = &[(64, 64), (256, 256), (512, 512)];

fn encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for &(width, height) in SHAPES {
        let desc = ImageDesc::new(width, height, Channels::Rgba, ColorSpace::Srgb);
        let n_pixels = width as usize * height as usize;

        let noisy = noise(n_pixels, Channels::Rgba, 1);
        let smooth = gradient(width, height, Channels::Rgba);
        let solid = vec![42u8; n_pixels * 4];

        group.throughput(criterion::Throughput::Elements(n_pixels as u64));

        for (label, input) in [("noise", &noisy), ("gradient", &smooth), ("solid", &solid)] {
            group.bench_with_input(BenchmarkId::new(label, format!("{width}x{height}")), input, |b, input| {
                let mut ctx = EncodeContext::new();
                let mut out = vec![0u8; qoif::encode::encode_max_len(&desc).unwrap()];
                b.iter(|| ctx.encode_to_slice(input, desc, &mut out).unwrap());
            });
        }
    }
}

fn decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for &(width, height) in SHAPES {
        let desc = ImageDesc::new(width, height, Channels::Rgba, ColorSpace::Srgb);
        let n_pixels = width as usize * height as usize;

        let noisy = noise(n_pixels, Channels::Rgba, 2);
        let smooth = gradient(width, height, Channels::Rgba);
        let solid = vec![42u8; n_pixels * 4];

        group.throughput(criterion::Throughput::Elements(n_pixels as u64));

        for (label, input) in [("noise", noisy), ("gradient", smooth), ("solid", solid)] {
            let encoded = qoif::encode(&input, desc).unwrap();

            group.bench_with_input(BenchmarkId::new(label, format!("{width}x{height}")), &encoded, |b, input| {
                let mut ctx = DecodeContext::new();
                let mut out = vec![0u8; n_pixels * 4];
                b.iter(|| ctx.decode_to_slice(input, None, &mut out).unwrap());
            });
        }
    }
}

criterion_group!(benches, encode, decode);
criterion_main!(benches);
