use ironfold::partition::split_chunks;

#[test]
fn chunks_cover_input_in_order() {
    let v: Vec<u32> = (0..103).collect();
    for n in [1, 2, 3, 7, 16, 103, 200] {
        let chunks = split_chunks(v.clone(), n);
        assert!(chunks.len() <= n, "too many chunks at n={n}");
        assert!(
            chunks.iter().all(|c| !c.is_empty()),
            "empty chunk at n={n}"
        );
        let rebuilt: Vec<u32> = chunks.into_iter().flatten().collect();
        assert_eq!(rebuilt, v, "coverage broken at n={n}");
    }
}

#[test]
fn small_inputs_produce_fewer_chunks() {
    let chunks = split_chunks(vec![1, 2, 3], 8);
    assert!(chunks.len() <= 3);
    assert_eq!(chunks.concat(), vec![1, 2, 3]);
}

#[test]
fn empty_input_is_one_empty_chunk() {
    let chunks = split_chunks(Vec::<u8>::new(), 4);
    assert_eq!(chunks, vec![Vec::<u8>::new()]);
}
