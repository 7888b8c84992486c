//! End-to-end colocation tests against synthetic grids.

use colocation::{colocate_values, ColocationConfig, ColocationError};
use grid_common::{Axis, CoordValues, Grid};
use ndarray::{ArrayD, IxDyn};
use test_utils::{latlon_grid, monthly_times};

fn config() -> ColocationConfig {
    ColocationConfig::default()
}

#[test]
fn colocating_at_grid_centers_is_identity() {
    let lats: Vec<f64> = (-3..=3).map(|i| i as f64 * 10.0).collect();
    let lons: Vec<f64> = (0..5).map(|j| j as f64 * 2.0).collect();
    let grid = latlon_grid(lats.clone(), lons.clone());

    // every (lat, lon) center pair, flattened
    let mut qlat = Vec::new();
    let mut qlon = Vec::new();
    let mut expected = Vec::new();
    for (i, &lat) in lats.iter().enumerate() {
        for (j, &lon) in lons.iter().enumerate() {
            qlat.push(lat);
            qlon.push(lon);
            expected.push((i * 1000 + j) as f64);
        }
    }

    let queries = vec![
        ("lat".to_string(), CoordValues::Numeric(qlat)),
        ("lon".to_string(), CoordValues::Numeric(qlon)),
    ];
    let out = colocate_values(&grid, &queries, &config()).unwrap();
    assert_eq!(out, expected);
}

#[test]
fn out_of_range_queries_are_nan_not_errors() {
    let grid = latlon_grid(vec![-1.0, 0.0, 1.0], vec![0.0, 1.0]);

    let queries = vec![
        (
            "lat".to_string(),
            CoordValues::Numeric(vec![0.0, 89.0, -1.0]),
        ),
        (
            "lon".to_string(),
            CoordValues::Numeric(vec![1.0, 0.0, 0.0]),
        ),
    ];
    let out = colocate_values(&grid, &queries, &config()).unwrap();
    assert_eq!(out[0], 1001.0);
    assert!(out[1].is_nan());
    assert_eq!(out[2], 0.0);
}

#[test]
fn absent_query_names_always_fail() {
    let grid = latlon_grid(vec![-1.0, 0.0, 1.0], vec![0.0, 1.0]);
    let valid = ["lat", "lon"];
    let invalid = ["latitude", "level"];

    // every non-empty combination holding at least one invalid name
    for v_count in 0..=valid.len() {
        for i_count in 1..=invalid.len() {
            let mut queries: Vec<(String, CoordValues)> = Vec::new();
            for name in valid.iter().take(v_count).chain(invalid.iter().take(i_count)) {
                queries.push((name.to_string(), CoordValues::Numeric(vec![0.0])));
            }
            let result = colocate_values(&grid, &queries, &config());
            match result {
                Err(ColocationError::UnmatchedNames { names, .. }) => {
                    assert_eq!(names.len(), i_count);
                }
                other => panic!("expected UnmatchedNames for {queries:?}, got {other:?}"),
            }
        }
    }
}

#[test]
fn datetime_axis_colocation() {
    let times = monthly_times(2015, 12);
    let values: Vec<f64> = (0..12).map(|i| 100.0 + i as f64).collect();
    let grid = Grid::new(
        "co2",
        vec![Axis::time("time", times.clone()).unwrap()],
        ArrayD::from_shape_vec(IxDyn(&[12]), values).unwrap(),
    )
    .unwrap();

    let queries = vec![(
        "time".to_string(),
        CoordValues::Time(vec![times[3], times[7], times[0]]),
    )];
    let out = colocate_values(&grid, &queries, &config()).unwrap();
    assert_eq!(out, vec![103.0, 107.0, 100.0]);
}

#[test]
fn query_restriction_loads_only_the_bounding_range() {
    // the grid is far larger than the ceiling, but the queried range is
    // tiny, so colocation must succeed
    let lats: Vec<f64> = (0..200).map(|i| i as f64).collect();
    let lons: Vec<f64> = (0..200).map(|j| j as f64).collect();
    let grid = latlon_grid(lats, lons);
    let config = ColocationConfig { max_cells: 100 };

    let queries = vec![
        ("lat".to_string(), CoordValues::Numeric(vec![10.0, 12.0])),
        ("lon".to_string(), CoordValues::Numeric(vec![5.0, 7.0])),
    ];
    let out = colocate_values(&grid, &queries, &config).unwrap();
    assert_eq!(out, vec![10_005.0, 12_007.0]);

    // widening the range past the ceiling fails with the target's identity
    let queries = vec![
        ("lat".to_string(), CoordValues::Numeric(vec![0.0, 199.0])),
        ("lon".to_string(), CoordValues::Numeric(vec![0.0, 199.0])),
    ];
    match colocate_values(&grid, &queries, &config) {
        Err(ColocationError::RangeTooLarge { name, shape, .. }) => {
            assert_eq!(name, "tmp");
            assert_eq!(shape, vec![200, 200]);
        }
        other => panic!("expected RangeTooLarge, got {other:?}"),
    }
}
