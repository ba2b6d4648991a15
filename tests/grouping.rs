use anyhow::Result;
use ironfold::testing::{assert_groups_equal, assert_unordered_equal};
use ironfold::{
    Characteristics, GroupTable, contributors_by_item, contributors_by_item_concurrent,
};

type Wish = (String, Vec<String>);

fn contributor(e: &Wish) -> String {
    e.0.clone()
}

fn wants(e: &Wish) -> Vec<String> {
    e.1.clone()
}

fn wish(name: &str, items: &[&str]) -> Wish {
    (
        name.to_string(),
        items.iter().map(|s| s.to_string()).collect(),
    )
}

fn store_wishlists() -> Vec<Wish> {
    vec![
        wish("Joe", &["plate", "fork"]),
        wish("Steven", &["ice cream", "earphone", "cable"]),
        wish("Patrick", &["onion", "ice cream"]),
        wish("Diana", &["cable"]),
        wish("Chris", &["plane"]),
        wish("Alice", &["desk"]),
        wish("Martin", &["plate", "fork"]),
        wish("Amy", &["onion"]),
    ]
}

#[test]
fn groups_two_contributors_in_both_modes() -> Result<()> {
    let input = vec![wish("Alice", &["x", "y"]), wish("Bob", &["y"])];
    let expected: &[(&str, &[&str])] = &[("x", &["Alice"]), ("y", &["Alice", "Bob"])];

    let spec = contributors_by_item(contributor, wants);
    assert_groups_equal(&spec.reduce_seq(input.clone())?, expected);
    assert_groups_equal(&spec.reduce_par(input.clone(), None, Some(2))?, expected);

    let concurrent = contributors_by_item_concurrent(contributor, wants);
    assert_groups_equal(&concurrent.reduce_seq(input.clone())?, expected);
    assert_groups_equal(&concurrent.reduce_par(input, None, Some(2))?, expected);
    Ok(())
}

#[test]
fn store_wishlists_group_by_wanted_item() -> Result<()> {
    let groups = contributors_by_item_concurrent(contributor, wants).reduce_par(
        store_wishlists(),
        None,
        Some(4),
    )?;

    assert_groups_equal(
        &groups,
        &[
            ("plate", &["Joe", "Martin"]),
            ("fork", &["Joe", "Martin"]),
            ("ice cream", &["Patrick", "Steven"]),
            ("earphone", &["Steven"]),
            ("cable", &["Diana", "Steven"]),
            ("onion", &["Patrick", "Amy"]),
            ("plane", &["Chris"]),
            ("desk", &["Alice"]),
        ],
    );
    Ok(())
}

#[test]
fn concurrent_and_split_merge_agree_with_sequential() -> Result<()> {
    let data = store_wishlists();

    let sequential = contributors_by_item(contributor, wants).reduce_seq(data.clone())?;
    let split_merge =
        contributors_by_item(contributor, wants).reduce_par(data.clone(), None, Some(4))?;
    let concurrent =
        contributors_by_item_concurrent(contributor, wants).reduce_par(data, None, Some(4))?;

    assert_eq!(split_merge, sequential);
    assert_eq!(concurrent, sequential);

    let keys: Vec<String> = sequential.keys().cloned().collect();
    let expected: Vec<String> = [
        "plate", "fork", "ice cream", "earphone", "cable", "onion", "plane", "desk",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    assert_unordered_equal(&keys, &expected);
    Ok(())
}

#[test]
fn concurrent_grouping_agrees_with_sequential_on_wide_input() -> Result<()> {
    let input: Vec<Wish> = (0..500)
        .map(|i| {
            (
                format!("user{i}"),
                vec![format!("item{}", i % 7), format!("item{}", i % 3)],
            )
        })
        .collect();

    let spec = contributors_by_item_concurrent(contributor, wants);
    let sequential = spec.reduce_seq(input.clone())?;
    for chunks in [2, 16, 100] {
        let parallel = spec.reduce_par(input.clone(), None, Some(chunks))?;
        assert_eq!(parallel, sequential, "diverged at {chunks} chunks");
    }
    Ok(())
}

#[test]
fn re_merging_a_contributor_does_not_grow_the_set() -> Result<()> {
    let input = vec![
        wish("Alice", &["x"]),
        wish("Alice", &["x"]),
        wish("Alice", &["x"]),
    ];
    let groups = contributors_by_item(contributor, wants).reduce_seq(input)?;
    assert_eq!(groups.get("x").map(|s| s.len()), Some(1));
    Ok(())
}

#[test]
fn variants_carry_their_characteristics() {
    let concurrent = contributors_by_item_concurrent(contributor, wants);
    assert!(
        concurrent
            .characteristics()
            .contains(Characteristics::CONCURRENT)
    );

    let exclusive = contributors_by_item(contributor, wants);
    assert!(
        exclusive
            .characteristics()
            .contains(Characteristics::IDENTITY_FINISH)
    );
    assert!(
        !exclusive
            .characteristics()
            .contains(Characteristics::CONCURRENT)
    );
}

#[test]
fn group_table_collapses_duplicate_records() {
    let table = GroupTable::new();
    table.record("a", "x");
    table.record("a", "x");
    table.record("b", "y");

    let groups = table.into_groups();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups.get("a").map(|s| s.len()), Some(1));
    assert_eq!(groups.get("b").map(|s| s.len()), Some(1));
}

#[test]
fn group_table_merge_unions_per_key() {
    let mut left = GroupTable::new();
    left.record("a", "x");
    let right = GroupTable::new();
    right.record("a", "y");
    right.record("b", "z");

    left.merge_from(right);
    let groups = left.into_groups();
    assert_eq!(groups.get("a").map(|s| s.len()), Some(2));
    assert_eq!(groups.get("b").map(|s| s.len()), Some(1));
}
