use feedback_portal::utils::table::{Column, Table};
use unicode_width::UnicodeWidthStr;

#[test]
fn test_wide_cells_keep_columns_aligned() {
    let mut table = Table::new(vec![Column::new("Subject", 0), Column::new("Rating", 0)]);
    table.add_row(vec!["数学".into(), "5".into()]);
    table.add_row(vec!["Physics".into(), "4".into()]);
    table.add_row(vec!["Música 🎵".into()]);

    let out = table.render();
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines[0], "Subject    Rating  ");
    assert_eq!(lines[2], "数学       5       ");
    for line in &lines {
        assert_eq!(UnicodeWidthStr::width(*line), 19, "{line:?}");
    }
}

#[test]
fn test_min_width_applies_to_empty_columns() {
    let mut table = Table::new(vec![Column::new("Id", 4), Column::new("Email", 0)]);
    table.add_row(vec!["1".into(), "ada@example.edu".into()]);

    let out = table.render();
    assert!(out.starts_with("Id    Email"));
    assert!(out.contains("1     ada@example.edu  \n"));
}
