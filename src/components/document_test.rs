use super::*;

#[test]
fn headings_get_rules() {
    assert_eq!(render("# Title\n## Sub\n### Small"), "Title\n═════\nSub\n───\n▸ Small");
}

#[test]
fn bullets_and_emphasis() {
    assert_eq!(render("- **bold** item\n* *soft* item"), "  • bold item\n  • soft item");
}

#[test]
fn paragraphs_keep_blank_lines() {
    assert_eq!(render("one\n\ntwo"), "one\n\ntwo");
}

#[test]
fn tables_are_aligned() {
    let md = "| 항목 | 수익 |\n|---|---|\n| 애드센스 | 10 |\n\nafter";
    assert_eq!(render(md), "  항목   │ 수익\n  ─────┼───\n  애드센스 │ 10\n\nafter");
}

#[test]
fn trailing_table_is_flushed() {
    assert_eq!(render("| a | b |"), "  a │ b");
}
