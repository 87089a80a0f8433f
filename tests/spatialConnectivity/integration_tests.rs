use approx::assert_abs_diff_eq;
use spatialConnectivity::internals::math::cutoff::median;
use spatialConnectivity::internals::math::distance::DistanceMetric as Metric;
use spatialConnectivity::prelude::*;
use sprs::CsMat;
use std::collections::BTreeSet;

fn edge_set<T: Copy>(m: &CsMat<T>) -> BTreeSet<(usize, usize)> {
    m.iter().map(|(_, (r, c))| (r, c)).collect()
}

/// `side x side` unit grid; point `r * side + c` sits at `(c, r)`.
fn unit_grid(side: usize) -> Vec<[f64; 2]> {
    (0..side * side)
        .map(|i| [(i % side) as f64, (i / side) as f64])
        .collect()
}

/// Hexagonal spot layout: odd rows shifted by half a spacing.
fn hex_grid(rows: usize, cols: usize) -> Vec<[f64; 2]> {
    let dy = 3.0_f64.sqrt() / 2.0;
    let mut pts = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let shift = if r % 2 == 1 { 0.5 } else { 0.0 };
            pts.push([c as f64 + shift, r as f64 * dy]);
        }
    }
    pts
}

fn column_degree<T: Copy>(m: &CsMat<T>, col: usize) -> usize {
    m.iter().filter(|(_, (_, c))| *c == col).count()
}

#[test]
fn test_unit_grid_exact_edges() {
    let pts = unit_grid(3);
    let m = spatial_connectivity(&pts).unwrap();

    // Candidate distances: 24 x 1, 14 x sqrt(2), 12 x 2, 4 x sqrt(5).
    // The 27th and 28th smallest are both sqrt(2), so the cutoff is 1.3 * sqrt(2):
    // axis and diagonal neighbors survive, distance 2 and sqrt(5) do not.
    let kept: [&[usize]; 9] = [
        &[1, 3, 4],
        &[0, 2, 3, 4, 5],
        &[1, 4, 5],
        &[0, 1, 4, 6, 7],
        &[0, 1, 2, 3, 5, 7], // center: ties among diagonals go to the lowest indices
        &[1, 2, 4, 7, 8],
        &[3, 4, 7],
        &[3, 4, 5, 6, 8],
        &[4, 5, 7],
    ];
    let expected: BTreeSet<(usize, usize)> = kept
        .iter()
        .enumerate()
        .flat_map(|(col, rows)| rows.iter().map(move |&row| (row, col)))
        .collect();

    assert_eq!(m.shape(), (9, 9));
    assert_eq!(m.nnz(), 38);
    assert_eq!(edge_set(&m), expected);
    assert!(m.iter().all(|(&v, _)| v == 1.0));

    // Corners keep exactly their 3 true near neighbors.
    for corner in [0, 2, 6, 8] {
        assert_eq!(column_degree(&m, corner), 3);
    }

    // Center keeps the corners 0 and 2 but they are not mirrored for 6 and 8.
    assert_eq!(m.get(4, 6), Some(&1.0));
    assert_eq!(m.get(6, 4), None);
    assert_eq!(m.get(4, 8), Some(&1.0));
    assert_eq!(m.get(8, 4), None);
}

#[test]
fn test_unit_grid_cutoff_by_hand() {
    let pts = unit_grid(3);
    let view = pts.as_row_major().unwrap();
    let res = ExactNeighbors::new()
        .knn(&view, 6, &Metric::Euclidean)
        .unwrap();

    let d = res.distances();
    assert_eq!(d.len(), 54);
    let count = |x: f64| d.iter().filter(|&&v| v == x).count();
    assert_eq!(count(1.0), 24);
    assert_eq!(count(2.0_f64.sqrt()), 14);
    assert_eq!(count(2.0), 12);
    assert_eq!(count(5.0_f64.sqrt()), 4);

    assert_eq!(median(d), Some(2.0_f64.sqrt()));
}

#[test]
fn test_symmetrize_closes_one_way_edges() {
    let pts = unit_grid(3);
    let directed = spatial_connectivity(&pts).unwrap();
    let undirected = SpatialConnectivity::new()
        .symmetrize(true)
        .adapter(Batch)
        .build()
        .unwrap()
        .fit(&pts)
        .unwrap();

    assert_eq!(undirected.nnz(), 40);
    assert_eq!(undirected.get(6, 4), Some(&1.0));
    assert_eq!(undirected.get(8, 4), Some(&1.0));
    assert!(edge_set(&directed).is_subset(&edge_set(&undirected)));

    let sym = edge_set(&undirected);
    assert!(sym.iter().all(|&(r, c)| sym.contains(&(c, r))));
}

#[test]
fn test_outlier_gets_no_edges() {
    let mut pts = unit_grid(5);
    pts.push([100.0, 100.0]);
    let outlier = pts.len() - 1;

    let m = spatial_connectivity(&pts).unwrap();

    assert_eq!(m.shape(), (26, 26));
    assert!(m.iter().all(|(_, (r, c))| r != outlier && c != outlier));
    for i in 0..outlier {
        assert!(column_degree(&m, i) >= 2);
    }
}

#[test]
fn test_hexagonal_grid_interior_has_six_neighbors() {
    let (rows, cols) = (8, 10);
    let pts = hex_grid(rows, cols);
    let m = spatial_connectivity(&pts).unwrap();

    for r in 1..rows - 1 {
        for c in 1..cols - 1 {
            assert_eq!(column_degree(&m, r * cols + c), 6, "interior spot ({}, {})", r, c);
        }
    }
    // First-row corner has only 2 spots at unit spacing.
    assert_eq!(column_degree(&m, 0), 2);

    // Every kept edge has unit length, so the graph is undirected.
    let edges = edge_set(&m);
    assert!(edges.iter().all(|&(a, b)| edges.contains(&(b, a))));
    for &(a, b) in &edges {
        let d = Metric::Euclidean.distance(&pts[a], &pts[b]);
        assert_abs_diff_eq!(d, 1.0, epsilon = 1e-9);
    }
}

#[test]
fn test_coincident_points_link_both_ways() {
    let mut pts = unit_grid(3);
    pts.push([1.0, 1.0]); // duplicate of the center, index 9
    let m = spatial_connectivity(&pts).unwrap();

    // Each direction is generated once, so both entries exist and neither accumulates.
    assert_eq!(m.get(9, 4), Some(&1.0));
    assert_eq!(m.get(4, 9), Some(&1.0));
    for i in 0..pts.len() {
        assert_eq!(m.get(i, i), None);
    }
}

#[test]
fn test_fewer_points_than_neighbors() {
    let pts = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
    let m = spatial_connectivity(&pts).unwrap();

    // k clamps to 3: distances 1, 1, sqrt(2) per point, median 1, cutoff 1.3.
    assert_eq!(m.shape(), (4, 4));
    assert_eq!(m.nnz(), 8);
    assert_eq!(m.get(3, 0), None);
    assert_eq!(m.get(1, 0), Some(&1.0));
}

#[test]
fn test_three_dimensional_cube() {
    let pts: Vec<Vec<f64>> = (0..8)
        .map(|i| vec![(i & 1) as f64, ((i >> 1) & 1) as f64, ((i >> 2) & 1) as f64])
        .collect();
    let m = spatial_connectivity(&pts).unwrap();

    // 24 edges of length 1 and 24 of sqrt(2); the median sits between them.
    assert_eq!(m.shape(), (8, 8));
    assert_eq!(m.nnz(), 48);
    assert_eq!(m.get(7, 0), None);
}

#[test]
fn test_input_formats_agree() {
    let pts = unit_grid(3);
    let reference = edge_set(&spatial_connectivity(&pts).unwrap());

    let nested: Vec<Vec<f64>> = pts.iter().map(|p| p.to_vec()).collect();
    assert_eq!(edge_set(&spatial_connectivity(&nested).unwrap()), reference);

    let flat: Vec<f64> = pts.iter().flatten().copied().collect();
    let view = RowMajor::new(&flat, 2).unwrap();
    assert_eq!(edge_set(&spatial_connectivity(&view).unwrap()), reference);

    let single: Vec<[f32; 2]> = pts.iter().map(|p| [p[0] as f32, p[1] as f32]).collect();
    let m32 = spatial_connectivity(&single).unwrap();
    assert_eq!(edge_set(&m32), reference);
    assert!(m32.iter().all(|(&v, _)| v == 1.0f32));
}

#[cfg(feature = "cpu")]
#[test]
fn test_ndarray_input() {
    use ndarray::Array2;

    let pts = unit_grid(3);
    let reference = edge_set(&spatial_connectivity(&pts).unwrap());

    let flat: Vec<f64> = pts.iter().flatten().copied().collect();
    let arr = Array2::from_shape_vec((9, 2), flat).unwrap();
    assert_eq!(edge_set(&spatial_connectivity(&arr).unwrap()), reference);

    // Column-major views are rejected rather than silently transposed.
    let t = arr.t();
    assert!(spatial_connectivity(&t).unwrap_err().is_input_error());
}

#[test]
fn test_large_finite_coordinates() {
    let reference = edge_set(&spatial_connectivity(&unit_grid(3)).unwrap());

    let huge: Vec<[f64; 2]> = unit_grid(3)
        .iter()
        .map(|p| [p[0] * 1e160, p[1] * 1e160])
        .collect();
    let m = spatial_connectivity(&huge).unwrap();
    assert_eq!(m.nnz(), 38);
    assert_eq!(edge_set(&m), reference);

    // Pixel-scale spacing with a large Minkowski exponent.
    let pixels: Vec<[f64; 2]> = unit_grid(3)
        .iter()
        .map(|p| [p[0] * 1e4, p[1] * 1e4])
        .collect();
    let m = SpatialConnectivity::new()
        .distance_metric(Metric::Minkowski(100.0))
        .adapter(Batch)
        .build()
        .unwrap()
        .fit(&pixels)
        .unwrap();
    assert_eq!(edge_set(&m), reference);

    let pixels32: Vec<[f32; 2]> = pixels.iter().map(|p| [p[0] as f32, p[1] as f32]).collect();
    let m32 = SpatialConnectivity::new()
        .distance_metric(Metric::Minkowski(10.0f32))
        .adapter(Batch)
        .build()
        .unwrap()
        .fit(&pixels32)
        .unwrap();
    assert_eq!(m32.shape(), (9, 9));
    assert_eq!(edge_set(&m32), reference);
}

#[test]
fn test_alternative_metrics() {
    let pts = unit_grid(3);

    // Chebyshev: diagonals are at distance 1 too, so the center keeps its first 6.
    let m = SpatialConnectivity::new()
        .distance_metric(Metric::Chebyshev)
        .adapter(Batch)
        .build()
        .unwrap()
        .fit(&pts)
        .unwrap();
    assert_eq!(column_degree(&m, 4), 6);
    assert_eq!(column_degree(&m, 0), 3);

    // Manhattan: only 24 of 54 candidates are at distance 1, so the median is 2
    // and the cutoff 2.6 keeps diagonals while pruning distance 3.
    let m = SpatialConnectivity::new()
        .distance_metric(Metric::Manhattan)
        .adapter(Batch)
        .build()
        .unwrap()
        .fit(&pts)
        .unwrap();
    assert_eq!(column_degree(&m, 4), 6);
    assert_eq!(column_degree(&m, 0), 5);
}

#[test]
fn test_error_handling() {
    let one = vec![[0.0, 0.0]];
    match spatial_connectivity(&one) {
        Err(SpatialError::InvalidInput(_)) => (),
        other => panic!("Expected InvalidInput, got {:?}", other),
    }

    let empty: Vec<[f64; 2]> = Vec::new();
    assert!(spatial_connectivity(&empty).unwrap_err().is_input_error());

    let ragged = vec![vec![0.0, 0.0], vec![1.0], vec![2.0, 2.0]];
    assert!(spatial_connectivity(&ragged).unwrap_err().is_input_error());

    let nan = vec![[0.0, 0.0], [f64::NAN, 1.0], [2.0, 2.0]];
    match spatial_connectivity(&nan) {
        Err(SpatialError::OracleError(_)) => (),
        other => panic!("Expected OracleError, got {:?}", other),
    }

    let model = SpatialConnectivity::<f64>::new()
        .n_neighbors(0)
        .adapter(Batch)
        .build();
    assert!(matches!(
        model,
        Err(SpatialError::InvalidParameter { .. })
    ));
}

#[test]
fn test_input_is_not_mutated() {
    let pts = hex_grid(4, 4);
    let before = pts.clone();
    let _ = spatial_connectivity(&pts).unwrap();
    assert_eq!(pts, before);
}

#[test]
fn test_column_moments_on_dense_and_sparse() {
    let pts = unit_grid(3);
    let adjacency = spatial_connectivity(&pts).unwrap();

    // Column sums of the adjacency are the retained degrees.
    let moments = sparse_mean_var(&adjacency).unwrap();
    assert_abs_diff_eq!(moments.mean[4], 6.0 / 9.0, epsilon = 1e-12);
    assert_abs_diff_eq!(moments.mean[0], 3.0 / 9.0, epsilon = 1e-12);

    let coords = mean_var(&pts).unwrap();
    assert_abs_diff_eq!(coords.mean[0], 1.0);
    assert_abs_diff_eq!(coords.mean[1], 1.0);
    // Each axis holds three 0s, three 1s and three 2s: sum of squares 6 over 8.
    assert_abs_diff_eq!(coords.var[0], 0.75, epsilon = 1e-12);
}
