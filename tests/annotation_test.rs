use cladomark::{
    Annotation, CladeList, Error, annotate_tree, display_names, group_by_bipartition,
    parse_character_table, parse_reference_tree, render_newick, resolve_homology,
    single_origin_labels,
};

fn run_pipeline(tree: &str, characters: &str, origins: &str) -> cladomark::Result<Annotation> {
    let mut tree = parse_reference_tree(tree)?;
    let clades = CladeList::from_tree(&tree);
    let single_origin = single_origin_labels(origins)?;
    let characters = parse_character_table(characters, &single_origin)?;
    let groups = group_by_bipartition(&characters, &clades)?;
    let resolution = resolve_homology(&tree, &groups)?;
    Ok(annotate_tree(&mut tree, &resolution, &characters))
}

#[test]
fn test_single_transition() {
    let annotation = run_pipeline(
        "(((A,B),C),D);",
        "character\tstate\tspecies\nX\t0\tA,B,C\nX\t1\tD\n",
        "character\ta\tb\tc\tflag\nX\t1\t0\t0\t0\n",
    )
    .expect("pipeline should succeed");

    assert_eq!(annotation.tree, "(((A,B),C)\"1\",D);");
    assert_eq!(annotation.character_log, vec!["X 1->0"]);
}

#[test]
fn test_two_sided_reference_scenario() {
    // Three accepted characters resolving to three clades; T4 has two
    // origins and is filtered out. T1 and T2 win on the larger side of
    // their bipartitions, so both are logged reversed. T3 references a
    // species missing from the tree, which narrows its derived side to a
    // single tip.
    let tree = "(((A,B,C,D),E),(F,G,H));";
    let characters = "\
character\tstate\tspecies\n\
T1\t0\tB,E\n\
T1\t1\tF,G,H\n\
T2\t0\tA,B\n\
T2\t1\tF,G\n\
T3\t0\tA,Z\n\
T3\t1\tF,G,H\n\
T4\t0\tA,B\n\
T4\t1\tC,D\n";
    let origins = "\
character\ta\tb\tc\tflag\n\
T1\t1\t0\t0\t0\n\
T2\t0\t0\t1\t0\n\
T3\t1\t0\t0\t0\n\
T4\t1\t1\t0\t0\n";

    let annotation =
        run_pipeline(tree, characters, origins).expect("pipeline should succeed");

    assert_eq!(annotation.tree, "(((A,B,C,D)\"2\"\"1\",E)\"3\",(F,G,H));");
    assert_eq!(annotation.character_log, vec!["T3 1->0", "T2 1->0", "T1 0->1"]);
}

#[test]
fn test_shared_bipartition_gets_a_range_label() {
    // Two characters with identical state sets share a bipartition and are
    // folded into one labeled clade.
    let characters = "\
character\tstate\tspecies\n\
P\t0\tA,B\n\
P\t1\tD,E,F\n\
Q\t0\tA,B\n\
Q\t1\tD,E,F\n";
    let origins = "character\ta\tb\tc\tflag\nP\t1\t0\t0\t0\nQ\t0\t1\t0\t0\n";

    let annotation = run_pipeline("(((A,B),C),(D,(E,F)));", characters, origins)
        .expect("pipeline should succeed");

    assert_eq!(annotation.tree, "(((A,B)\"1-2\",C),(D,(E,F)));");
    assert_eq!(annotation.character_log, vec!["P 1->0", "Q 1->0"]);
}

#[test]
fn test_no_accepted_characters_leaves_tree_unlabeled() {
    let annotation = run_pipeline(
        "((A,B),C);",
        "character\tstate\tspecies\nX\t0\tA\nX\t1\tB\n",
        "character\ta\tb\tc\tflag\nX\t1\t1\t0\t0\n",
    )
    .expect("pipeline should succeed");

    assert_eq!(annotation.tree, "((A,B),C);");
    assert!(annotation.character_log.is_empty());
}

#[test]
fn test_character_absent_from_tree_is_an_error() {
    let result = run_pipeline(
        "(((A,B,C,D),E),(F,G,H));",
        "character\tstate\tspecies\nT5\t0\tY,Z\nT5\t1\tF,G,H\n",
        "character\ta\tb\tc\tflag\nT5\t1\t0\t0\t0\n",
    );

    match result {
        Err(Error::Clade(error)) => {
            assert!(
                error.to_string().contains("T5"),
                "Error should carry the character label: {}",
                error
            );
        }
        Err(other) => panic!("Expected a clade error, got: {}", other),
        Ok(_) => panic!("Expected an unmatched character to be rejected"),
    }
}

#[test]
fn test_render_skips_branch_lengths_and_old_labels() {
    let mut tree =
        parse_reference_tree("((A:1.0,B:1.0)OLD:1.0,C:1.0)ROOT;").expect("tree should parse");
    let clades = CladeList::from_tree(&tree);
    assert_eq!(clades.len(), 5);

    let root_id = tree.root_id().expect("validated tree has a root");
    tree.add_label(&root_id, "\"7\"".to_string());
    assert_eq!(render_newick(&tree), "((A,B),C)\"7\";");
}

#[test]
fn test_display_names() {
    let test_cases = [
        ("(A,B);", "(A,B);", "Single letters stay as they are"),
        ("(AB,CD);", "(Ab,Cd);", "Two-letter runs are folded"),
        (
            "(ARABIDOPSIS_THALIANA,PAN);",
            "(Arabidopsis thaliana,Pan);",
            "Underscores inside a run become spaces",
        ),
        ("(T4,X9);", "(T4,X9);", "Digits break runs and stay untouched"),
        ("(AB1CD,E);", "(Ab1Cd,E);", "Runs on both sides of a digit"),
        (
            "(HOMO_SAPIENS)\"12\";",
            "(Homo sapiens)\"12\";",
            "Quoted numeric labels are preserved",
        ),
        ("(A_B,C);", "(A b,C);", "Run starting at an underscore boundary"),
        ("(ABC_,D);", "(Abc ,D);", "Trailing underscore joins the run"),
    ];

    for (input, expected, description) in test_cases {
        assert_eq!(display_names(input), expected, "Display mismatch for: {}", description);
    }
}

#[test]
fn test_pipeline_output_is_displayable_text() {
    // Uppercased names go in, display names come out, with the labels
    // threaded through untouched.
    let annotation = run_pipeline(
        "((homo_sapiens,pan_troglodytes),mus_musculus);",
        "character\tstate\tspecies\nG\t0\thomo_sapiens,pan_troglodytes\nG\t1\tmus_musculus\n",
        "character\ta\tb\tc\tflag\nG\t0\t0\t1\t0\n",
    )
    .expect("pipeline should succeed");

    assert_eq!(
        annotation.tree,
        "((Homo sapiens,Pan troglodytes)\"1\",Mus musculus);"
    );
    assert_eq!(annotation.character_log, vec!["G 1->0"]);
}
