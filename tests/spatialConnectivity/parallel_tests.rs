#![cfg(feature = "cpu")]
use spatialConnectivity::prelude::*;
use sprs::CsMat;

/// Hexagonal layout with a small deterministic jitter on every spot.
fn jittered_hex(rows: usize, cols: usize) -> Vec<[f64; 2]> {
    let dy = 3.0_f64.sqrt() / 2.0;
    (0..rows * cols)
        .map(|i| {
            let (r, c) = (i / cols, i % cols);
            let t = i as f64;
            let jx = ((t * 0.754_877_666).fract() - 0.5) * 0.1;
            let jy = ((t * 0.569_840_291).fract() - 0.5) * 0.1;
            let shift = if r % 2 == 1 { 0.5 } else { 0.0 };
            [c as f64 + shift + jx, r as f64 * dy + jy]
        })
        .collect()
}

fn fit(parallel: bool, coords: &[[f64; 2]]) -> CsMat<f64> {
    SpatialConnectivity::new()
        .adapter(Batch)
        .parallel(parallel)
        .build()
        .unwrap()
        .fit(coords)
        .unwrap()
}

#[test]
fn test_parallel_matches_sequential() {
    let pts = jittered_hex(40, 40);

    let seq = fit(false, &pts);
    let par = fit(true, &pts);

    assert_eq!(seq.shape(), (1600, 1600));
    assert_eq!(seq, par);
}

#[test]
fn test_repeated_calls_are_deterministic() {
    let pts = jittered_hex(25, 30);
    let model = SpatialConnectivity::new().adapter(Batch).build().unwrap();

    let first = model.fit(&pts).unwrap();
    for _ in 0..3 {
        assert_eq!(model.fit(&pts).unwrap(), first);
    }
}

#[test]
fn test_fit_many_matches_individual_fits() {
    let sets: Vec<Vec<[f64; 2]>> = (3..9).map(|s| jittered_hex(s, s + 2)).collect();

    let model = SpatialConnectivity::new().adapter(Batch).build().unwrap();
    let batch = model.fit_many(&sets).unwrap();

    assert_eq!(batch.len(), sets.len());
    for (coords, graph) in sets.iter().zip(batch.iter()) {
        assert_eq!(graph, &fit(false, coords));
    }
}

#[test]
fn test_processor_is_shareable_across_threads() {
    let model = SpatialConnectivity::new().adapter(Batch).build().unwrap();
    let pts = jittered_hex(12, 12);
    let expected = model.fit(&pts).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| model.fit(&pts).unwrap()))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}
