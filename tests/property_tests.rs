//! Property-based tests for the k-d tree and K-Medoids.
//!
//! These tests verify invariants that should hold regardless of input:
//! - Every node partitions its subtree along its discriminator
//! - Discriminators follow depth modulo dimension
//! - Tree queries agree with a linear scan
//! - PAM labels are valid, nearest, and stable under re-runs
//! - PAM stops at a local optimum when no swap helps

use proptest::prelude::*;

// Integer-valued coordinates keep squared distances exact, so cost
// comparisons below need no epsilon.
prop_compose! {
    fn arb_points(dim: usize, max_len: usize)
        (points in prop::collection::vec(
            prop::collection::vec((-20i32..20).prop_map(f64::from), dim),
            1..max_len,
        )) -> Vec<Vec<f64>> {
        points
    }
}

fn squared(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(feature = "kdtree")]
mod kdtree_props {
    use super::*;
    use medoids::trees::{KdTree, NodeId};

    fn build(points: &[Vec<f64>]) -> KdTree<usize> {
        KdTree::from_points(points.iter().cloned().enumerate().map(|(i, p)| (p, i)))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn subtrees_respect_the_split(points in arb_points(3, 60)) {
            let tree = build(&points);
            for (id, node) in tree.iter() {
                let d = node.discriminator();
                let split = node.value().unwrap();
                if let Some(left) = node.left() {
                    for (_, below) in tree.subtree(left) {
                        prop_assert!(below.data()[d] < split, "left of {:?}", id);
                    }
                }
                if let Some(right) = node.right() {
                    for (_, above) in tree.subtree(right) {
                        prop_assert!(above.data()[d] >= split, "right of {:?}", id);
                    }
                }
            }
        }

        #[test]
        fn discriminator_is_depth_mod_dimension(
            dim in 1usize..5,
            seed in any::<u64>(),
            n in 1usize..50,
        ) {
            use rand::prelude::*;
            let mut rng = StdRng::seed_from_u64(seed);
            let points: Vec<Vec<f64>> = (0..n)
                .map(|_| (0..dim).map(|_| f64::from(rng.random_range(-5i32..5))).collect())
                .collect();
            let tree = build(&points);

            for (id, node) in tree.iter() {
                let mut depth = 0;
                let mut cursor = id;
                while let Some(parent) = tree.node(cursor).unwrap().parent() {
                    cursor = parent;
                    depth += 1;
                }
                prop_assert_eq!(cursor, tree.root().unwrap());
                prop_assert_eq!(node.discriminator(), depth % dim);
            }
        }

        #[test]
        fn links_are_consistent(points in arb_points(2, 60)) {
            let tree = build(&points);
            let mut roots = 0;
            for (id, node) in tree.iter() {
                match node.parent() {
                    None => roots += 1,
                    Some(parent) => {
                        let children = tree.node(parent).unwrap().children();
                        prop_assert!(children.contains(&id));
                    }
                }
                for child in node.children() {
                    prop_assert_eq!(tree.node(child).unwrap().parent(), Some(id));
                }
            }
            prop_assert_eq!(roots, 1);
            prop_assert_eq!(tree.iter().count(), points.len());
        }

        #[test]
        fn every_point_is_found(points in arb_points(2, 40)) {
            let tree = build(&points);
            for (i, p) in points.iter().enumerate() {
                prop_assert!(tree.find_node(p).is_some());
                let id = tree.find_node_with_payload(p, &i).unwrap();
                prop_assert_eq!(id, NodeId::from_index(i));
            }
        }

        #[test]
        fn nearest_matches_linear_scan(
            points in arb_points(3, 80),
            query in prop::collection::vec(-25.0f64..25.0, 3),
        ) {
            let tree = build(&points);
            let expected = points
                .iter()
                .map(|p| squared(p, &query))
                .fold(f64::INFINITY, f64::min);
            let (id, dist) = tree.nearest(&query).unwrap();
            prop_assert_eq!(dist, expected);
            prop_assert_eq!(squared(tree.node(id).unwrap().data(), &query), expected);
        }

        #[test]
        fn k_nearest_matches_linear_scan(
            points in arb_points(2, 80),
            query in prop::collection::vec(-25.0f64..25.0, 2),
            k in 1usize..10,
        ) {
            let tree = build(&points);
            let mut expected: Vec<f64> = points.iter().map(|p| squared(p, &query)).collect();
            expected.sort_by(f64::total_cmp);
            expected.truncate(k);

            let found: Vec<f64> = tree.k_nearest(&query, k).iter().map(|&(_, d)| d).collect();
            prop_assert_eq!(found, expected);
        }

        #[test]
        fn within_radius_matches_linear_scan(
            points in arb_points(2, 80),
            query in prop::collection::vec(-25.0f64..25.0, 2),
            radius in 0.0f64..15.0,
        ) {
            let tree = build(&points);
            let expected = points
                .iter()
                .filter(|p| squared(p, &query) <= radius * radius)
                .count();
            prop_assert_eq!(tree.within_radius(&query, radius).len(), expected);
        }
    }
}

#[cfg(feature = "kmedoids")]
mod kmedoids_props {
    use super::*;
    use medoids::partitioning::kmedoids::init::random_medoids;
    use medoids::{DataType, KMedoids, KMedoidsResult, StopReason};

    fn deviation(data: &[Vec<f64>], medoids: &[usize]) -> f64 {
        data.iter()
            .map(|p| {
                medoids
                    .iter()
                    .map(|&m| squared(p, &data[m]))
                    .fold(f64::INFINITY, f64::min)
            })
            .sum()
    }

    fn run(data: &[Vec<f64>], k: usize, seed: u64, itermax: usize) -> KMedoidsResult {
        let medoids = random_medoids(data.len(), k, seed).unwrap();
        KMedoids::with_medoids(medoids)
            .unwrap()
            .with_tolerance(1e-12)
            .with_itermax(itermax)
            .fit(data, DataType::Points)
            .unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn reruns_are_identical(
            data in arb_points(2, 30),
            k in 1usize..4,
            seed in any::<u64>(),
        ) {
            let k = k.min(data.len());
            prop_assert_eq!(run(&data, k, seed, 100), run(&data, k, seed, 100));
        }

        #[test]
        fn medoids_label_themselves(
            data in arb_points(2, 30),
            k in 1usize..5,
            seed in any::<u64>(),
        ) {
            let k = k.min(data.len());
            let result = run(&data, k, seed, 100);
            for (cluster, &m) in result.medoids.iter().enumerate() {
                prop_assert_eq!(result.labels[m], cluster);
                prop_assert_eq!(result.distances[m], 0.0);
            }
        }

        #[test]
        fn labels_point_at_a_nearest_medoid(
            data in arb_points(3, 30),
            k in 1usize..5,
            seed in any::<u64>(),
        ) {
            let k = k.min(data.len());
            let result = run(&data, k, seed, 100);
            prop_assert_eq!(result.labels.len(), data.len());
            prop_assert_eq!(result.medoids.len(), k);

            for (i, p) in data.iter().enumerate() {
                let label = result.labels[i];
                prop_assert!(label < k);
                let best = result
                    .medoids
                    .iter()
                    .map(|&m| squared(p, &data[m]))
                    .fold(f64::INFINITY, f64::min);
                prop_assert_eq!(result.distances[i], best);
                prop_assert_eq!(squared(p, &data[result.medoids[label]]), best);
            }
            prop_assert_eq!(result.total_deviation, deviation(&data, &result.medoids));
        }

        #[test]
        fn more_iterations_never_cost_more(
            data in arb_points(2, 25),
            k in 1usize..4,
            seed in any::<u64>(),
            itermax in 1usize..4,
        ) {
            let k = k.min(data.len());
            let shorter = run(&data, k, seed, itermax);
            let longer = run(&data, k, seed, itermax + 1);
            prop_assert!(longer.total_deviation <= shorter.total_deviation);
            prop_assert!(shorter.iterations <= itermax);
        }

        #[test]
        fn no_single_swap_improves_a_finished_run(
            data in arb_points(2, 14),
            k in 1usize..4,
            seed in any::<u64>(),
        ) {
            let k = k.min(data.len());
            let result = run(&data, k, seed, 1_000);
            prop_assume!(result.stop_reason == Some(StopReason::NoImprovingSwap));

            let total = deviation(&data, &result.medoids);
            for cluster in 0..k {
                for candidate in 0..data.len() {
                    if result.medoids.contains(&candidate) {
                        continue;
                    }
                    let mut swapped = result.medoids.clone();
                    swapped[cluster] = candidate;
                    prop_assert!(
                        deviation(&data, &swapped) >= total,
                        "swapping cluster {} to point {} helps",
                        cluster,
                        candidate
                    );
                }
            }
        }
    }
}
