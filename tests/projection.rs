//! End-to-end checks of creation, projection and plasticity through the
//! public `Brain` API.

use assemblies::prelude::*;

fn brain(p: f64) -> Brain {
    Brain::new(BrainConfig::with_p(p).with_seed(1234)).unwrap()
}

fn all(conn: &Connectome, value: Weight) -> bool {
    conn.weights().iter().all(|&w| w == value)
}

#[test]
fn creation_wires_every_existing_population() {
    let mut b = brain(0.0);
    b.add_stimulus("s", 3).unwrap();
    b.add_output_area("out").unwrap();
    b.add_area("a", 6, 2, 0.1).unwrap();
    b.add_area("b", 4, 1, 0.2).unwrap();
    b.add_stimulus("t", 2).unwrap();

    // regular pairs: Bernoulli(0) -> all zero, in both directions
    for (src, dst, shape) in [
        ("a", "a", (6, 6)),
        ("a", "b", (6, 4)),
        ("b", "a", (4, 6)),
        ("b", "b", (4, 4)),
    ] {
        let conn = b.area_connectome(src, dst).unwrap();
        assert_eq!((conn.rows(), conn.cols()), shape, "{src}->{dst}");
        assert!(all(conn, 0.0));
    }
    for (stim, k) in [("s", 3), ("t", 2)] {
        for (dst, n) in [("a", 6), ("b", 4)] {
            let conn = b.stimulus_connectome(stim, dst).unwrap();
            assert_eq!((conn.rows(), conn.cols()), (k, n));
            assert!(all(conn, 0.0));
        }
    }

    // output area: ones from areas, zeros from stimuli, whatever the order
    for (src, n) in [("a", 6), ("b", 4)] {
        let conn = b.area_connectome(src, "out").unwrap();
        assert_eq!((conn.rows(), conn.cols()), (n, 2));
        assert!(all(conn, 1.0));
    }
    for stim in ["s", "t"] {
        assert!(all(b.stimulus_connectome(stim, "out").unwrap(), 0.0));
    }
    assert_eq!(
        b.area_connectome("out", "a"),
        Err(BrainError::OutputAreaAsSource("out".to_string()))
    );

    // 2 stimuli x 3 areas + a->{a,b,out} + b->{a,b,out}
    assert_eq!(b.connectomes().len(), 12);
}

#[test]
fn dense_probability_gives_all_ones() {
    let mut b = brain(1.0);
    b.add_area("a", 5, 1, 0.1).unwrap();
    b.add_stimulus("s", 2).unwrap();
    b.add_area("b", 3, 1, 0.1).unwrap();
    assert!(all(b.area_connectome("a", "b").unwrap(), 1.0));
    assert!(all(b.area_connectome("b", "a").unwrap(), 1.0));
    assert!(all(b.stimulus_connectome("s", "a").unwrap(), 1.0));
}

#[test]
fn same_seed_same_connectomes() {
    let build = || {
        let mut b = brain(0.3);
        b.add_stimulus("s", 8).unwrap();
        b.add_area("a", 40, 4, 0.1).unwrap();
        b.add_area("b", 30, 3, 0.1).unwrap();
        b
    };
    let (x, y) = (build(), build());
    assert_eq!(
        x.area_connectome("a", "b").unwrap(),
        y.area_connectome("a", "b").unwrap()
    );
    assert_eq!(
        x.stimulus_connectome("s", "b").unwrap(),
        y.stimulus_connectome("s", "b").unwrap()
    );
}

#[test]
fn stimulus_projection_scenario() {
    let mut b = brain(1.0);
    b.add_stimulus("S", 3).unwrap();
    b.add_area("A", 10, 2, 0.1).unwrap();

    let first_time = b.project_into("A", &["S"], &[]).unwrap();
    assert_eq!(first_time, 2);
    assert_eq!(b.winners("A").unwrap(), &[0, 1]);

    let conn = b.stimulus_connectome("S", "A").unwrap();
    let strengthened: Weight = 1.0 * (1.0 + 0.1);
    for row in 0..3 {
        assert_eq!(conn.get(row, 0), strengthened);
        assert_eq!(conn.get(row, 1), strengthened);
        for col in 2..10 {
            assert_eq!(conn.get(row, col), 1.0);
        }
    }
}

#[test]
fn winners_are_the_k_largest_inputs() {
    let mut b = brain(0.4);
    b.add_stimulus("s", 20).unwrap();
    b.add_area("a", 200, 15, 0.05).unwrap();

    let conn = b.stimulus_connectome("s", "a").unwrap();
    let mut inputs = vec![0.0f32; 200];
    conn.accumulate_column_sums(&mut inputs);
    let expected = top_k(&inputs, 15);

    b.project_into("a", &["s"], &[]).unwrap();
    let winners = b.winners("a").unwrap();
    assert_eq!(winners, expected.as_slice());
    assert_eq!(winners.len(), 15);
    assert!(winners.iter().all(|&w| w < 200));
}

#[test]
fn output_area_is_clamped_while_training() {
    let cfg = BrainConfig::with_p(1.0).with_output_area(10, 1, 0.1);
    let mut b = Brain::new(cfg).unwrap();
    b.add_area("a", 8, 2, 0.1).unwrap();
    b.add_output_area("out").unwrap();
    b.project_into("a", &[], &[]).unwrap();
    let a_winners = b.winners("a").unwrap().to_vec();

    b.set_desired_output("out", &[7]).unwrap();
    b.set_learning_mode(LearningMode::Training);
    assert_eq!(b.project_into("out", &[], &["a"]).unwrap(), 1);
    assert_eq!(b.winners("out").unwrap(), &[7]);

    // only (a winner, 7) is strengthened
    let conn = b.area_connectome("a", "out").unwrap();
    for row in 0..8 {
        for col in 0..10 {
            let expected = if a_winners.contains(&row) && col == 7 {
                1.1
            } else {
                1.0
            };
            assert_eq!(conn.get(row, col), expected, "({row}, {col})");
        }
    }

    // outside training the output area computes its own winners
    b.set_learning_mode(LearningMode::Inference);
    b.project_into("out", &[], &["a"]).unwrap();
    assert_eq!(b.winners("out").unwrap(), &[7]);
}

#[test]
fn testing_mode_freezes_weights_and_is_idempotent() {
    let mut b = brain(0.3);
    b.add_stimulus("s", 10).unwrap();
    b.add_area("a", 60, 6, 0.2).unwrap();
    b.add_area("b", 50, 5, 0.2).unwrap();
    b.project_into("a", &["s"], &[]).unwrap();

    b.set_learning_mode(LearningMode::Testing);
    let s_a = b.stimulus_connectome("s", "a").unwrap().clone();
    let a_b = b.area_connectome("a", "b").unwrap().clone();

    b.project_into("b", &["s"], &["a"]).unwrap();
    let first = b.winners("b").unwrap().to_vec();
    b.project_into("b", &["s"], &["a"]).unwrap();
    let second = b.winners("b").unwrap().to_vec();

    assert_eq!(first, second);
    assert_eq!(b.stimulus_connectome("s", "a").unwrap(), &s_a);
    assert_eq!(b.area_connectome("a", "b").unwrap(), &a_b);
}

#[test]
fn area_plasticity_scales_exactly_the_fired_edges() {
    let mut b = brain(0.5);
    b.add_stimulus("s", 12).unwrap();
    b.add_area("a", 40, 5, 0.1).unwrap();
    b.add_area("b", 30, 4, 0.25).unwrap();
    b.project_into("a", &["s"], &[]).unwrap();

    let a_winners = b.winners("a").unwrap().to_vec();
    let before = b.area_connectome("a", "b").unwrap().clone();
    b.project_into("b", &[], &["a"]).unwrap();
    let b_winners = b.winners("b").unwrap().to_vec();
    let after = b.area_connectome("a", "b").unwrap();

    for row in 0..40 {
        for col in 0..30 {
            let old = before.get(row, col);
            let expected = if a_winners.contains(&row) && b_winners.contains(&col) {
                old * (1.0 + 0.25)
            } else {
                old
            };
            assert_eq!(after.get(row, col), expected, "({row}, {col})");
        }
    }
}

#[test]
fn support_grows_by_first_time_winners() {
    let mut b = brain(0.2);
    b.add_stimulus("s", 10).unwrap();
    b.add_area("a", 100, 10, 0.05).unwrap();

    let mut last = 0;
    for _ in 0..15 {
        let before = b.support_size("a").unwrap();
        let first_time = b
            .project(&[("s", &["a"][..])], &[("a", &["a"][..])])
            .unwrap();
        let after = b.support_size("a").unwrap();

        assert_eq!(after, before + first_time);
        assert!(after >= last && after <= 100);
        assert_eq!(b.support("a").unwrap().iter().filter(|&&s| s).count(), after);
        last = after;
    }
}

#[test]
fn one_round_reads_a_consistent_winner_snapshot() {
    let mut b = brain(0.0);
    b.add_stimulus("s1", 1).unwrap();
    b.add_stimulus("s2", 1).unwrap();
    b.add_area("a", 4, 1, 0.0).unwrap();
    b.add_area("b", 4, 1, 1.0).unwrap();

    b.stimulus_connectome_mut("s1", "a").unwrap().set(0, 2, 1.0);
    b.project_into("a", &["s1"], &[]).unwrap();
    assert_eq!(b.winners("a").unwrap(), &[2]);

    b.stimulus_connectome_mut("s2", "a").unwrap().set(0, 3, 5.0);
    {
        let a_b = b.area_connectome_mut("a", "b").unwrap();
        a_b.set(2, 1, 1.0);
        a_b.set(3, 2, 1.0);
    }

    b.project(&[("s2", &["a"][..])], &[("a", &["b"][..])])
        .unwrap();

    // b was driven by a's winner from before the round
    assert_eq!(b.winners("a").unwrap(), &[3]);
    assert_eq!(b.winners("b").unwrap(), &[1]);
    let a_b = b.area_connectome("a", "b").unwrap();
    assert_eq!(a_b.get(2, 1), 2.0);
    assert_eq!(a_b.get(3, 2), 1.0);
}

#[test]
fn project_merges_sources_per_target_and_repeats_cycles() {
    let cfg = BrainConfig::with_p(1.0).with_seed(3).with_project_cycles(3);
    let mut b = Brain::new(cfg).unwrap();
    b.add_stimulus("s", 2).unwrap();
    b.add_area("a", 6, 2, 0.0).unwrap();
    b.add_area("b", 6, 2, 0.0).unwrap();

    let first_time = b
        .project(
            &[("s", &["a", "b"][..])],
            &[("a", &["b"][..]), ("b", &["a"][..])],
        )
        .unwrap();

    assert_eq!(b.rounds(), 3);
    // all-equal inputs with beta 0: the same two winners every round
    assert_eq!(first_time, 4);
    assert_eq!(b.winners("a").unwrap(), &[0, 1]);
    assert_eq!(b.winners("b").unwrap(), &[0, 1]);
}

#[test]
fn execution_tiers_agree() {
    let run = |tier: ExecutionTier| {
        let mut b = Brain::new(BrainConfig::with_p(0.3).with_seed(8).with_execution_tier(tier)).unwrap();
        b.add_stimulus("s", 16).unwrap();
        b.add_area("a", 64, 8, 0.3).unwrap();
        for _ in 0..5 {
            b.project(&[("s", &["a"][..])], &[("a", &["a"][..])])
                .unwrap();
        }
        (
            b.winners("a").unwrap().to_vec(),
            b.stimulus_connectome("s", "a").unwrap().clone(),
        )
    };
    assert_eq!(run(ExecutionTier::Scalar), run(ExecutionTier::Parallel));
}

#[test]
fn failed_projection_changes_nothing() {
    let mut b = brain(0.5);
    b.add_stimulus("s", 5).unwrap();
    b.add_area("a", 20, 3, 0.1).unwrap();
    b.add_output_area("out").unwrap();
    let before = b.stimulus_connectome("s", "a").unwrap().clone();

    assert_eq!(
        b.project(&[("s", &["a"][..])], &[("out", &["a"][..])]),
        Err(BrainError::OutputAreaAsSource("out".to_string()))
    );
    assert_eq!(
        b.project_into("s", &[], &[]),
        Err(BrainError::NotAnArea("s".to_string()))
    );
    assert_eq!(
        b.project_into("a", &["a"], &[]),
        Err(BrainError::NotAStimulus("a".to_string()))
    );

    assert_eq!(b.stimulus_connectome("s", "a").unwrap(), &before);
    assert_eq!(b.support_size("a").unwrap(), 0);
    assert_eq!(b.rounds(), 0);
}
