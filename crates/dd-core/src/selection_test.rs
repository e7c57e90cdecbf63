use super::*;

fn ids(names: &[&str]) -> BTreeSet<MigrationId> {
    names.iter().map(|n| MigrationId::new(*n)).collect()
}

fn names(selection: &Selection) -> Vec<&str> {
    selection.ids.iter().map(|id| id.as_str()).collect()
}

fn explicit(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_up_selects_unapplied_ascending() {
    let files = ids(&["2024-01-03-c.xml", "2024-01-01-a.xml", "2024-01-02-b.xml"]);
    let applied = ids(&["2024-01-02-b.xml"]);

    let selection = select(Direction::Up, &files, &applied, &[]);
    assert_eq!(names(&selection), vec!["2024-01-01-a.xml", "2024-01-03-c.xml"]);
    assert!(selection.unmatched.is_empty());
}

#[test]
fn test_down_selects_applied_descending() {
    let files = ids(&["2024-01-01-a.xml", "2024-01-02-b.xml", "2024-01-03-c.xml"]);
    let applied = ids(&["2024-01-01-a.xml", "2024-01-03-c.xml"]);

    let selection = select(Direction::Down, &files, &applied, &[]);
    assert_eq!(names(&selection), vec!["2024-01-03-c.xml", "2024-01-01-a.xml"]);
}

#[test]
fn test_down_ignores_applied_without_file() {
    let files = ids(&["2024-01-01-a.xml"]);
    let applied = ids(&["2024-01-01-a.xml", "2023-12-31-gone.xml"]);

    let selection = select(Direction::Down, &files, &applied, &[]);
    assert_eq!(names(&selection), vec!["2024-01-01-a.xml"]);
}

#[test]
fn test_up_everything_applied_is_empty() {
    let files = ids(&["2024-01-01-a.xml", "2024-01-02-b.xml"]);
    let selection = select(Direction::Up, &files, &files.clone(), &[]);
    assert!(selection.is_empty());
}

#[test]
fn test_down_nothing_applied_is_empty() {
    let files = ids(&["2024-01-01-a.xml"]);
    let selection = select(Direction::Down, &files, &BTreeSet::new(), &[]);
    assert!(selection.is_empty());
}

#[test]
fn test_explicit_subset_drops_unknown_ids() {
    let files = ids(&["2024-01-01-x.xml", "2024-01-02-z.xml"]);
    let selection = select(
        Direction::Up,
        &files,
        &BTreeSet::new(),
        &explicit(&["2024-01-01-x.xml", "2024-01-05-y.xml"]),
    );
    assert_eq!(names(&selection), vec!["2024-01-01-x.xml"]);
    assert_eq!(selection.unmatched, vec!["2024-01-05-y.xml".to_string()]);
}

#[test]
fn test_explicit_order_follows_identifier_not_argument_order() {
    let files = ids(&["2024-01-01-a.xml", "2024-01-02-b.xml"]);
    let requested = explicit(&["2024-01-02-b.xml", "2024-01-01-a.xml"]);

    let up = select(Direction::Up, &files, &BTreeSet::new(), &requested);
    assert_eq!(names(&up), vec!["2024-01-01-a.xml", "2024-01-02-b.xml"]);

    let down = select(Direction::Down, &files, &files.clone(), &requested);
    assert_eq!(names(&down), vec!["2024-01-02-b.xml", "2024-01-01-a.xml"]);
}

#[test]
fn test_explicit_already_applied_is_not_unmatched() {
    let files = ids(&["2024-01-01-a.xml"]);
    let selection = select(
        Direction::Up,
        &files,
        &files.clone(),
        &explicit(&["2024-01-01-a.xml"]),
    );
    assert!(selection.is_empty());
    assert!(selection.unmatched.is_empty());
}

#[test]
fn test_explicit_duplicates_collapse() {
    let files = ids(&["2024-01-01-a.xml"]);
    let selection = select(
        Direction::Up,
        &files,
        &BTreeSet::new(),
        &explicit(&["2024-01-01-a.xml", "2024-01-01-a.xml", "nope", "nope"]),
    );
    assert_eq!(names(&selection), vec!["2024-01-01-a.xml"]);
    assert_eq!(selection.unmatched, vec!["nope".to_string()]);
}

/// Exhaustive check over every applied subset of a small file set.
#[test]
fn test_selection_matches_set_algebra_for_all_subsets() {
    let all = [
        "2024-01-01-a.xml",
        "2024-01-02-b.xml",
        "2024-01-03-c.xml",
        "2024-02-01-d.xml",
    ];
    let files = ids(&all);

    for mask in 0u32..(1 << all.len()) {
        let applied: BTreeSet<MigrationId> = all
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, n)| MigrationId::new(*n))
            .collect();

        let up = select(Direction::Up, &files, &applied, &[]);
        let expected_up: Vec<MigrationId> = files.difference(&applied).cloned().collect();
        assert_eq!(up.ids, expected_up, "up, mask {mask:b}");

        let down = select(Direction::Down, &files, &applied, &[]);
        let mut expected_down: Vec<MigrationId> =
            applied.intersection(&files).cloned().collect();
        expected_down.reverse();
        assert_eq!(down.ids, expected_down, "down, mask {mask:b}");
    }
}
