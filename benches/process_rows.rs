use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use locator_sheet_processing::execution::{ExecutionEngine, ExecutionOptions};
use locator_sheet_processing::processing::process_rows;
use locator_sheet_processing::types::{Cell, Grid};

fn report_grid(n: usize) -> Grid {
    let mut grid = vec![
        vec![Cell::text("Relatório de processos por localizador")],
        vec![
            Cell::text("Número Processo"),
            Cell::text("Classe"),
            Cell::text("Localizadores"),
            Cell::text("Inclusão no Localizador"),
            Cell::text("Último Evento"),
        ],
    ];
    for i in 0..n {
        grid.push(vec![
            Cell::text(format!(" 50{:05}-{:02}.2024.4.04.7000 ", i % 100_000, i % 100)),
            Cell::text("Procedimento Comum"),
            Cell::text("SECRETARIA (Principal) - AGUARDA PRAZO (G) - Conclusos p/ despacho &amp; outros"),
            Cell::text("01/02/2024 10:30"),
            Cell::text("15/02/2024 09:00:12"),
        ]);
    }
    grid
}

fn bench_process_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_rows");
    for n in [1_000usize, 10_000] {
        let grid = report_grid(n);
        group.bench_with_input(BenchmarkId::new("sequential", n), &grid, |b, grid| {
            b.iter(|| process_rows(black_box(grid)))
        });

        let engine = ExecutionEngine::new(ExecutionOptions::default()).expect("thread pool");
        group.bench_with_input(BenchmarkId::new("parallel", n), &grid, |b, grid| {
            b.iter(|| engine.process_rows(black_box(grid)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_process_rows);
criterion_main!(benches);
