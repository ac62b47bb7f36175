use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use kornia_image::Image;
use kornia_imgproc::{
    filter::spatial_gradient,
    interpolation::{remap, InterpolationMode},
};

fn bench_spatial_gradient(c: &mut Criterion) {
    let mut group = c.benchmark_group("SpatialGradient");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        // input image
        let image_size = [*width, *height].into();
        let image = Image::<u8, 1>::from_size_fn(image_size, |x, y| [((x * 7 + y * 13) % 255) as u8])
            .unwrap();
        let image = image.cast::<f64>().unwrap();

        // output images
        let dx = Image::<f64, 1>::from_size_val(image_size, 0.0).unwrap();
        let dy = Image::<f64, 1>::from_size_val(image_size, 0.0).unwrap();

        group.bench_with_input(
            BenchmarkId::new("rayon_row_parallel", &parameter_string),
            &(&image, &dx, &dy),
            |b, i| {
                let (src, mut dx, mut dy) = (i.0, i.1.clone(), i.2.clone());
                b.iter(|| spatial_gradient(black_box(src), black_box(&mut dx), black_box(&mut dy)))
            },
        );
    }
    group.finish();
}

fn bench_remap(c: &mut Criterion) {
    let mut group = c.benchmark_group("Remap");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image_size = [*width, *height].into();
        let image = Image::<f64, 3>::from_size_val(image_size, 0.5).unwrap();
        let output = Image::<f64, 3>::from_size_val(image_size, 0.0).unwrap();

        // a subpixel shift of the whole grid
        let (map_x, map_y): (Vec<f64>, Vec<f64>) = (0..*height)
            .flat_map(|y| (0..*width).map(move |x| (x as f64 + 0.3, y as f64 - 0.6)))
            .unzip();

        for mode in [InterpolationMode::Bilinear, InterpolationMode::Nearest] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", mode), &parameter_string),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| {
                        remap(
                            black_box(src),
                            black_box(&mut dst),
                            black_box(&map_x),
                            black_box(&map_y),
                            black_box(mode),
                        )
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_spatial_gradient, bench_remap);
criterion_main!(benches);
