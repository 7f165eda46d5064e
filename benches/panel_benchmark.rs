use criterion::{criterion_group, criterion_main, Criterion};
use panelfoil::{naca::Naca4, FreeStream, PanelGeometry, ThickMethod, ThickSolver};

fn naca_2412_geometry(n_panels: usize) -> PanelGeometry {
    let contour = Naca4::parse("2412")
        .unwrap()
        .closed_contour(n_panels)
        .unwrap();
    PanelGeometry::closed(contour.view(), n_panels).unwrap()
}

fn naca_2412_benchmark(c: &mut Criterion) {
    let geometry = naca_2412_geometry(200);
    let freestream = FreeStream::from_degrees(8.0);

    for method in [ThickMethod::LinearVortex, ThickMethod::SourceVortex] {
        c.bench_function(&format!("naca_2412_compile_{method:?}"), |b| {
            b.iter(|| ThickSolver::new(&geometry, method).unwrap())
        });

        let solver = ThickSolver::new(&geometry, method).unwrap();
        c.bench_function(&format!("naca_2412_solve_{method:?}"), |b| {
            b.iter(|| solver.solve(&freestream).unwrap())
        });
    }

    let solver = ThickSolver::new(&geometry, ThickMethod::LinearVortex).unwrap();
    let polar: Vec<_> = (-10..=15)
        .map(|alpha| FreeStream::from_degrees(alpha as f64))
        .collect();
    c.bench_function("naca_2412_sweep", |b| {
        b.iter(|| solver.sweep(&polar).unwrap())
    });
}

criterion_group!(benches, naca_2412_benchmark);
criterion_main!(benches);
