use criterion::{black_box, criterion_group, criterion_main, Criterion};
use xredirect_capture::{convert_frame, RawFrame};

fn make_frame(width: u32, height: u32, pad: usize) -> RawFrame {
    let stride = width as usize * 4 + pad;
    let mut data = vec![0u8; stride * height as usize];
    for y in 0..height as usize {
        for x in 0..width as usize {
            let idx = y * stride + x * 4;
            data[idx] = (x % 255) as u8;
            data[idx + 1] = (y % 255) as u8;
            data[idx + 2] = 128;
            data[idx + 3] = 255;
        }
    }
    RawFrame {
        data,
        width,
        height,
        stride,
        bits_per_pixel: 32,
        depth: 24,
    }
}

fn bench_convert_packed(c: &mut Criterion) {
    let frame = make_frame(1920, 1080, 0);
    c.bench_function("convert_1080p_packed", |b| {
        b.iter(|| convert_frame(black_box(&frame)).expect("convert"))
    });
}

fn bench_convert_padded(c: &mut Criterion) {
    let frame = make_frame(1921, 1080, 60);
    c.bench_function("convert_1080p_padded", |b| {
        b.iter(|| convert_frame(black_box(&frame)).expect("convert"))
    });
}

criterion_group!(benches, bench_convert_packed, bench_convert_padded);
criterion_main!(benches);
