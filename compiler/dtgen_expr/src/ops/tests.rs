use super::*;

#[test]
fn minus_enables_negation() {
    assert_eq!(OpSet::from_symbol("-"), Some(OpSet::SUB | OpSet::NEG));
    assert_eq!(OpSet::from_symbol("**"), None);
}

#[test]
fn parse_unions_symbols() {
    assert_eq!(
        OpSet::parse(&["+", "*", "=="]),
        Ok(OpSet::ADD | OpSet::MUL | OpSet::EQ)
    );
    assert_eq!(OpSet::parse(&["+", "<<"]), Err("<<".to_string()));
    assert_eq!(OpSet::parse::<&str>(&[]), Ok(OpSet::empty()));
}

#[test]
fn unlisted_categories_allow_everything() {
    let table = OperatorTable::permissive();
    assert!(table.allows(Category::Complex, OpSet::MOD));
    assert!(!table.is_restricted(Category::Complex));
}

#[test]
fn enabling_restricts_then_widens() {
    let mut table = OperatorTable::default();
    table.enable(Category::Integer, OpSet::ADD);
    assert!(table.allows(Category::Integer, OpSet::ADD));
    assert!(!table.allows(Category::Integer, OpSet::MUL));
    table.enable(Category::Integer, OpSet::MUL);
    assert!(table.allows(Category::Integer, OpSet::MUL));
    assert!(table.allows(Category::Float, OpSet::MUL));
}
