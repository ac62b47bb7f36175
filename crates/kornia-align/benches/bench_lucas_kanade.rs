use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use kornia_align::{
    ImageWarp, LucasKanade, LucasKanadeAlgorithm, LucasKanadeConfig, SumSquaredDifferences,
    DEFAULT_MAX_ITERS,
};
use kornia_geometry::{Affine2d, Translation2d};
use kornia_image::{Image, ImageMask, MaskedImage};

fn blob(x: f64, y: f64, cx: f64, cy: f64, sigma: f64) -> f64 {
    (-((x - cx).powi(2) + (y - cy).powi(2)) / (2.0 * sigma * sigma)).exp()
}

/// A template with a one eighth border left out of the mask and the target moved by
/// a subpixel shift.
fn make_pair(width: usize, height: usize) -> (MaskedImage<f64, 1>, Image<f64, 1>) {
    let size = [width, height].into();
    let (w, h) = (width as f64, height as f64);
    let pattern = |x: f64, y: f64| {
        blob(x, y, 0.4 * w, 0.45 * h, 0.1 * w) + 0.6 * blob(x, y, 0.6 * w, 0.55 * h, 0.12 * w)
    };

    let image = Image::from_size_fn(size, |x, y| [pattern(x as f64, y as f64)]).unwrap();
    let mask = ImageMask::from_fn(size, |x, y| {
        (width / 8..width - width / 8).contains(&x) && (height / 8..height - height / 8).contains(&y)
    });
    let template = MaskedImage::new(image, mask).unwrap();

    let target =
        Image::from_size_fn(size, |x, y| [pattern(x as f64 - 1.2, y as f64 + 0.8)]).unwrap();

    (template, target)
}

const ALGORITHMS: [LucasKanadeAlgorithm; 3] = [
    LucasKanadeAlgorithm::ForwardAdditive,
    LucasKanadeAlgorithm::ForwardCompositional,
    LucasKanadeAlgorithm::InverseCompositional,
];

fn bench_lucas_kanade_translation(c: &mut Criterion) {
    let mut group = c.benchmark_group("LucasKanadeTranslation");

    for (width, height) in [(64, 64), (128, 128)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let (template, target) = make_pair(*width, *height);

        for algorithm in ALGORITHMS {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", algorithm), format!("{}x{}", width, height)),
                &(&template, &target),
                |b, i| {
                    b.iter(|| {
                        let mut lk = LucasKanade::new(
                            black_box(i.0),
                            black_box(i.1),
                            SumSquaredDifferences,
                            Translation2d::identity(),
                            ImageWarp::default(),
                            algorithm,
                            LucasKanadeConfig::default(),
                        )
                        .unwrap();
                        lk.align(DEFAULT_MAX_ITERS).copied().unwrap()
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_lucas_kanade_affine(c: &mut Criterion) {
    let mut group = c.benchmark_group("LucasKanadeAffine");

    let (template, target) = make_pair(128, 128);

    for algorithm in ALGORITHMS {
        group.bench_with_input(
            BenchmarkId::new(format!("{:?}", algorithm), "128x128"),
            &(&template, &target),
            |b, i| {
                b.iter(|| {
                    let mut lk = LucasKanade::new(
                        black_box(i.0),
                        black_box(i.1),
                        SumSquaredDifferences,
                        Affine2d::identity(),
                        ImageWarp::default(),
                        algorithm,
                        LucasKanadeConfig::default(),
                    )
                    .unwrap();
                    lk.align(DEFAULT_MAX_ITERS).copied().unwrap()
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_lucas_kanade_translation, bench_lucas_kanade_affine
);
criterion_main!(benches);
