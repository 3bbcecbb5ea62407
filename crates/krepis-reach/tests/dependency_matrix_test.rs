//! Dependency Matrices - From JSON Input to Queries
//!
//! Model used throughout:
//!
//! ```text
//! slots:  x, y, z          guards: g0 "x < 3" tests x, g1 "y == 0" tests y
//!
//! t0  x++      R(x)  w(x)   guarded by g0
//! t1  y = x    R(x)  W(y)   guarded by g1
//! t2  z = 1          w(z)
//! t3  y = 0          w(y)
//! ```

use krepis_reach::domain::matrix::Dimension;
use krepis_reach::{dependency_listing, DependencyInput, DependencyMatrices, MatrixError, MatrixKind};

const MODEL: &str = r#"{
    "slots": ["x", "y", "z"],
    "groups": [
        { "name": "x++",   "read": [0], "must_write": [0], "guards": [0] },
        { "name": "y = x", "read": [0], "may_write": [1],  "guards": [1] },
        { "name": "z = 1", "must_write": [2] },
        { "name": "y = 0", "must_write": [1] }
    ],
    "guards": [
        { "name": "x < 3",  "tests": [0] },
        { "name": "y == 0", "tests": [1] }
    ]
}"#;

fn input() -> DependencyInput {
    serde_json::from_str(MODEL).unwrap()
}

fn build(input: &DependencyInput) -> DependencyMatrices {
    DependencyMatrices::build(input).unwrap()
}

#[test]
fn test_listing() {
    assert_eq!(
        dependency_listing(&input()),
        "0)\tx++\tR(x), w(x), \n\
         1)\ty = x\tR(x), W(y), \n\
         2)\tz = 1\tw(z), \n\
         3)\ty = 0\tw(y), \n"
    );
}

#[test]
fn test_dimensions() {
    let m = build(&input());
    assert_eq!((m.groups(), m.guards(), m.slots()), (4, 2, 3));

    for kind in MatrixKind::ALL {
        let matrix = m.matrix(kind);
        let size = |d: Dimension| match d {
            Dimension::Transitions => 4,
            Dimension::Guards => 2,
            Dimension::Slots => 3,
        };
        let (rows, cols) = kind.dimensions();
        assert_eq!((matrix.rows(), matrix.cols()), (size(rows), size(cols)), "{kind:?}");
    }
}

#[test]
fn test_must_write_counts_as_write() {
    let m = build(&input());
    let writes = m.view('w', false).unwrap();

    assert_eq!(writes.image(0), Some(vec![0]));
    assert_eq!(writes.image(2), Some(vec![2]));
    assert_eq!(m.must_write.row(1).count(), 0);
}

#[test]
fn test_inverse_views() {
    let m = build(&input());

    let writers = m.view('w', true).unwrap();
    assert_eq!(writers.to_string(), "matrix-1(w)");
    assert_eq!(writers.dimensions(), (Dimension::Slots, Dimension::Transitions));
    assert_eq!(writers.image(1), Some(vec![1, 3]));
    assert!(writers.relates(2, 2));
    assert!(!writers.relates(2, 0));

    let guarded = m.view('g', true).unwrap();
    assert_eq!(guarded.image(0), Some(vec![0]));
    assert_eq!(guarded.image(2), None);
}

#[test]
fn test_composed_query() {
    let m = build(&input());
    let guards = m.view('g', false).unwrap();
    let nes = m.view('e', false).unwrap();

    // Transitions that can enable t1's guard
    let enablers = nes.image_of_set(guards.image(1).unwrap());
    assert_eq!(enablers, vec![1, 3]);

    // t2 is unguarded
    assert!(nes.image_of_set(guards.image(2).unwrap()).is_empty());
}

#[test]
fn test_commutation_and_accords() {
    let m = build(&input());
    let com = m.view('u', false).unwrap();
    let dna = m.view('A', false).unwrap();

    assert!(!com.relates(0, 1));
    assert!(com.relates(0, 2));
    assert!(com.relates(0, 3));
    assert!(!com.relates(1, 3));

    // t0 writes what t1's actions read
    assert!(dna.relates(0, 1) && dna.relates(1, 0));
    assert!(!dna.relates(0, 3));
    assert!((0..4).all(|t| dna.relates(t, t)));

    // Every do-not-accord pair is also a do-not-left-accord pair here
    let dnb = m.view('b', false).unwrap();
    for i in 0..4 {
        for j in 0..4 {
            if dna.relates(i, j) {
                assert!(dnb.relates(i, j), "({i}, {j})");
            }
        }
    }
}

#[test]
fn test_explicit_coenabled_relation() {
    let mut input = input();
    input.may_be_coenabled = Some(vec![vec![true, false], vec![false, true]]);
    let m = build(&input);

    // g0 and g1 never hold together: t0 and t1 accord
    assert!(!m.dna_raw.get(0, 1));
    assert!(!m.dna.get(0, 1));

    // One-sided entries are symmetric
    input.may_be_coenabled = Some(vec![vec![true, true], vec![false, true]]);
    let m = build(&input);
    assert!(m.coenabled.get(1, 0));
    assert!(m.dna.get(0, 1));
}

#[test]
fn test_unknown_query_character() {
    let m = build(&input());
    assert!(m.view('z', false).is_none());
    assert_eq!(m.view('d', true).map(|v| v.kind()), Some(MatrixKind::Nds));
}

#[test]
fn test_malformed_input_is_rejected() {
    let mut bad_guard = input();
    bad_guard.groups[2].guards = vec![5];
    assert_eq!(
        DependencyMatrices::build(&bad_guard).unwrap_err(),
        MatrixError::GuardOutOfRange { group: 2, guard: 5, guards: 2 }
    );

    let mut bad_slot = input();
    bad_slot.guards[1].tests = vec![3];
    let err = DependencyMatrices::build(&bad_slot).unwrap_err();
    assert_eq!(err, MatrixError::SlotOutOfRange { owner: "guard 1".into(), slot: 3, slots: 3 });
    assert!(err.to_string().contains("guard 1"));

    let mut bad_shape = input();
    bad_shape.must_disable = Some(vec![vec![false; 4]]);
    assert!(matches!(
        DependencyMatrices::build(&bad_shape),
        Err(MatrixError::Shape { matrix: "must_disable", rows: 2, cols: 4 })
    ));
}
