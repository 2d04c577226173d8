mod common;

use std::collections::HashSet;

use common::{gen7, ids, options, param, TinyDataset};
use param_search::dataset::ParamIndex;
use param_search::intersect::intersect;
use param_search::rng::PrngSeed;
use param_search::search::{first_match, search, DEFAULT_MAX_OUTER_ITERATIONS};
use param_search::types::{
    has_exclusive_pair, DatasetVersion, ParamType, SearchOptions, SearchOutcome, SearchResult,
};

const SEEDS: [[u16; 4]; 6] = [
    [0, 0, 0, 0],
    [1, 2, 3, 4],
    [0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF],
    [4242, 17, 999, 31337],
    [12, 34, 56, 78],
    [65000, 1, 65000, 1],
];

fn assert_well_formed<I: ParamIndex>(index: &I, opts: &SearchOptions, result: &SearchResult) {
    assert_eq!(result.outcome, SearchOutcome::Found, "seed {:?}", opts.rng_seed);

    // Window
    let size = result.entities.len();
    assert!(
        (opts.min_results..=opts.max_results).contains(&size),
        "{size} outside [{}, {}]",
        opts.min_results,
        opts.max_results
    );

    // Distinct descriptors
    let distinct: HashSet<_> = result.constraints.iter().collect();
    assert_eq!(distinct.len(), result.constraints.len());

    // Mutual exclusion
    let types: Vec<ParamType> = result.constraints.iter().map(|p| p.param_type).collect();
    assert!(!has_exclusive_pair(&types));

    // The answer is exactly what intersect says
    assert_eq!(intersect(index, &result.constraints), result.entities);

    assert!(!index.is_evolution_line(&result.entities));
}

#[test]
fn random_searches_satisfy_invariants() {
    let dataset = gen7();
    for count in [2, 3] {
        for seed in SEEDS {
            let opts = options(count, 3, 50, seed);
            let result = search(&dataset, &opts, DEFAULT_MAX_OUTER_ITERATIONS);
            assert_well_formed(&dataset, &opts, &result);
            assert_eq!(result.constraints.len(), count);
        }
    }
}

#[test]
fn narrow_window_is_respected() {
    let dataset = gen7();
    for seed in SEEDS {
        let opts = options(2, 4, 6, seed);
        let result = search(&dataset, &opts, DEFAULT_MAX_OUTER_ITERATIONS);
        assert_well_formed(&dataset, &opts, &result);
    }
}

#[test]
fn single_type_search_is_supported() {
    let dataset = gen7();
    let mut opts = options(1, 5, 10, [7, 7, 7, 7]);
    opts.type_candidates = vec![ParamType::Type];

    let result = search(&dataset, &opts, DEFAULT_MAX_OUTER_ITERATIONS);
    assert_well_formed(&dataset, &opts, &result);
    assert_eq!(result.constraints.len(), 1);
    assert_eq!(result.constraints[0].param_type, ParamType::Type);
}

#[test]
fn fixed_types_are_used_in_order() {
    let dataset = gen7();
    for seed in SEEDS {
        let opts = options(2, 3, 50, seed)
            .with_constraint_types(vec![ParamType::Move, ParamType::EggGroup]);
        let result = search(&dataset, &opts, DEFAULT_MAX_OUTER_ITERATIONS);
        assert_well_formed(&dataset, &opts, &result);

        let types: Vec<ParamType> = result.constraints.iter().map(|p| p.param_type).collect();
        assert_eq!(types, vec![ParamType::Move, ParamType::EggGroup]);
    }
}

#[test]
fn fixed_types_without_a_fit_are_unsatisfiable() {
    let dataset = gen7();
    let opts = options(2, 40, 50, [1, 2, 3, 4])
        .with_constraint_types(vec![ParamType::Move, ParamType::Type]);

    let result = search(&dataset, &opts, DEFAULT_MAX_OUTER_ITERATIONS);
    assert_eq!(result.outcome, SearchOutcome::Unsatisfiable);
    assert!(result.constraints.is_empty());
    assert!(result.entities.is_empty());
}

#[test]
fn random_types_without_a_fit_are_exhausted() {
    let dataset = gen7();
    let opts = options(2, 40, 50, [1, 2, 3, 4]);

    let result = search(&dataset, &opts, 25);
    assert_eq!(result.outcome, SearchOutcome::Exhausted);
    assert!(result.constraints.is_empty());
    assert!(result.entities.is_empty());
    // Type draws consumed randomness even though nothing fit
    assert_ne!(result.rng_seed, opts.rng_seed);
}

#[test]
fn invalid_options_return_seed_unchanged() {
    let dataset = gen7();
    let seed = PrngSeed::new([5, 6, 7, 8]);

    let inverted = options(2, 10, 3, seed.words());
    let result = search(&dataset, &inverted, DEFAULT_MAX_OUTER_ITERATIONS);
    assert_eq!(result, SearchResult::empty(SearchOutcome::Invalid, seed));

    let contradictory = options(2, 3, 50, seed.words())
        .with_constraint_types(vec![ParamType::Resistance, ParamType::Weakness]);
    let result = search(&dataset, &contradictory, DEFAULT_MAX_OUTER_ITERATIONS);
    assert_eq!(result, SearchResult::empty(SearchOutcome::Invalid, seed));

    let mut too_many = options(3, 3, 50, seed.words());
    too_many.type_candidates = vec![ParamType::Resistance, ParamType::Weakness, ParamType::Color];
    let result = search(&dataset, &too_many, DEFAULT_MAX_OUTER_ITERATIONS);
    assert_eq!(result, SearchResult::empty(SearchOutcome::Invalid, seed));
}

#[test]
fn evolution_line_answers_are_skipped() {
    let only_line = TinyDataset::new("tiny")
        .value(ParamType::Type, "Steel", &["Onix", "Steelix"])
        .value(ParamType::Move, "Iron Tail", &["Onix", "Steelix"])
        .evolution_line(&["Onix", "Steelix"])
        .build();

    let mut opts = options(2, 2, 2, [3, 1, 4, 1])
        .with_constraint_types(vec![ParamType::Type, ParamType::Move]);
    opts.dataset_version = DatasetVersion::new("tiny");

    let result = search(&only_line, &opts, DEFAULT_MAX_OUTER_ITERATIONS);
    assert_eq!(result.outcome, SearchOutcome::Unsatisfiable);

    let with_extra = TinyDataset::new("tiny")
        .value(ParamType::Type, "Steel", &["Onix", "Steelix", "Aron"])
        .value(ParamType::Move, "Iron Tail", &["Onix", "Steelix", "Aron"])
        .evolution_line(&["Onix", "Steelix"])
        .build();

    opts.min_results = 3;
    opts.max_results = 3;
    let result = search(&with_extra, &opts, DEFAULT_MAX_OUTER_ITERATIONS);
    assert_eq!(result.outcome, SearchOutcome::Found);
    assert_eq!(result.entities, ids(&["aron", "onix", "steelix"]));
}

#[test]
fn repeated_descriptor_is_never_returned() {
    let dataset = TinyDataset::new("tiny")
        .value(ParamType::Type, "Steel", &["Aron", "Durant", "Steelix"])
        .build();

    let opts = options(2, 1, 10, [9, 9, 9, 9])
        .with_constraint_types(vec![ParamType::Type, ParamType::Type]);
    let result = search(&dataset, &opts, DEFAULT_MAX_OUTER_ITERATIONS);
    assert_eq!(result.outcome, SearchOutcome::Unsatisfiable);
}

#[test]
fn minimum_prunes_small_values() {
    let dataset = TinyDataset::new("tiny")
        .value(ParamType::Color, "Gray", &["Aron", "Durant", "Steelix"])
        .value(ParamType::Color, "Red", &["Durant"])
        .value(ParamType::Gen, "3", &["Aron", "Durant", "Steelix"])
        .build();

    let opts = options(2, 2, 3, [2, 7, 1, 8])
        .with_constraint_types(vec![ParamType::Color, ParamType::Gen]);
    let result = search(&dataset, &opts, DEFAULT_MAX_OUTER_ITERATIONS);
    assert_eq!(result.outcome, SearchOutcome::Found);
    assert_eq!(
        result.constraints,
        vec![param(ParamType::Color, "Gray"), param(ParamType::Gen, "3")]
    );
}

#[test]
fn attempt_limit_stops_before_a_late_fit() {
    let dataset = TinyDataset::new("tiny")
        .value(ParamType::Color, "Amber", &["X"])
        .value(ParamType::Color, "Beige", &["X", "Y"])
        .value(ParamType::Color, "Cyan", &["X", "Y", "Z"])
        .value(ParamType::Gen, "1", &["X", "Y", "Z"])
        .build();
    let types = [ParamType::Color, ParamType::Gen];
    let lists = vec![
        vec!["amber".to_string(), "beige".to_string(), "cyan".to_string()],
        vec!["1".to_string()],
    ];
    let window = 3..=3;

    assert_eq!(first_match(&dataset, &types, &lists, &window, Some(1)), None);
    assert_eq!(first_match(&dataset, &types, &lists, &window, Some(2)), None);

    let found = first_match(&dataset, &types, &lists, &window, None).unwrap();
    assert_eq!(
        found.params,
        vec![param(ParamType::Color, "Cyan"), param(ParamType::Gen, "1")]
    );
    assert_eq!(found.entities, ids(&["x", "y", "z"]));
}

#[test]
fn fewest_candidates_come_first() {
    let dataset = TinyDataset::new("tiny")
        .value(ParamType::Color, "Amber", &["X", "Y", "Z"])
        .value(ParamType::Color, "Beige", &["W", "X", "Y", "Z"])
        .value(ParamType::Color, "Cyan", &["V", "W", "X", "Y", "Z"])
        .value(ParamType::Gen, "1", &["X", "Y", "Z"])
        .build();

    for seed in SEEDS {
        let mut opts = options(2, 3, 3, seed);
        opts.dataset_version = DatasetVersion::new("tiny");
        opts.type_candidates = vec![ParamType::Color, ParamType::Gen];

        let result = search(&dataset, &opts, DEFAULT_MAX_OUTER_ITERATIONS);
        assert_eq!(result.outcome, SearchOutcome::Found, "seed {seed:?}");
        let types: Vec<ParamType> = result.constraints.iter().map(|p| p.param_type).collect();
        assert_eq!(types, vec![ParamType::Gen, ParamType::Color], "seed {seed:?}");
        assert_eq!(result.entities, ids(&["x", "y", "z"]));
    }
}
