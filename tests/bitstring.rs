use anyhow::Result;
use ironfold::reductions::bit_string;

fn tokens(list: &str) -> Vec<String> {
    list.split(',').map(str::to_string).collect()
}

#[test]
fn renders_single_and_ranged_tokens() -> Result<()> {
    let spec = bit_string();
    assert_eq!(spec.reduce_seq(tokens("3"))?, "001");
    assert_eq!(spec.reduce_seq(tokens("1,3,5"))?, "10101");
    assert_eq!(spec.reduce_seq(tokens("1-3"))?, "111");
    assert_eq!(spec.reduce_seq(tokens("7,1-3,5"))?, "1110101");
    Ok(())
}

#[test]
fn decodes_a_dense_range_list_in_both_modes() -> Result<()> {
    let list = "22-24,9,42-44,11,4,46,14-17,5,2,38-40,33,50,48";
    let expected = "01011000101001111000011100000000100001110111010101";

    let spec = bit_string();
    assert_eq!(spec.reduce_seq(tokens(list))?, expected);
    for chunks in [2, 3, 8, 14] {
        assert_eq!(spec.reduce_par(tokens(list), None, Some(chunks))?, expected);
    }
    Ok(())
}

#[test]
fn token_order_is_meaningless() -> Result<()> {
    let spec = bit_string();
    let a = spec.reduce_seq(tokens("1-3,5"))?;
    let b = spec.reduce_seq(tokens("5,1-3"))?;
    assert_eq!(a, b);
    assert_eq!(a, "11101");
    Ok(())
}

#[test]
fn duplicate_coverage_collapses() -> Result<()> {
    assert_eq!(bit_string().reduce_seq(tokens("2,2,1-2"))?, "11");
    Ok(())
}

#[test]
fn inverted_ranges_cover_nothing() -> Result<()> {
    assert_eq!(bit_string().reduce_seq(tokens("5-3,2"))?, "01");
    Ok(())
}

#[test]
fn zero_tokens_finish_to_the_empty_string() -> Result<()> {
    let spec = bit_string();
    assert_eq!(spec.reduce_seq(Vec::new())?, "");
    assert_eq!(spec.reduce_par(Vec::new(), None, Some(4))?, "");
    Ok(())
}

#[test]
fn malformed_tokens_fail_the_reduction() {
    let spec = bit_string();
    assert!(spec.reduce_seq(tokens("1,banana,3")).is_err());
    assert!(spec.reduce_par(tokens("1,banana,3"), None, Some(3)).is_err());

    let err = spec.reduce_seq(tokens("0")).unwrap_err();
    assert!(format!("{err:#}").contains("1-based"));
}
