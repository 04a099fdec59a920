//! # Batch Planner Tests

use ragwright::ingest::batch::generate_batches;

#[test]
fn test_batches_cover_the_page_range_in_order() {
    for (total, batch_size) in [(1u32, 1u32), (7, 3), (30, 30), (95, 10), (1767, 30)] {
        let batches = generate_batches(total, batch_size, None);

        let concatenated: Vec<u32> = batches.iter().flatten().copied().collect();
        let expected: Vec<u32> = (1..=total).collect();
        assert_eq!(
            concatenated, expected,
            "batches for total={total}, batch_size={batch_size} must cover [1, {total}]"
        );

        for (index, batch) in batches.iter().enumerate() {
            assert!(batch.len() <= batch_size as usize);
            if index + 1 < batches.len() {
                assert_eq!(batch.len(), batch_size as usize);
            }
        }
    }
}

#[test]
fn test_known_batch_shape() {
    let batches = generate_batches(1767, 30, None);

    assert_eq!(batches.len(), 59);
    for batch in &batches[..58] {
        assert_eq!(batch.len(), 30);
    }
    assert_eq!(batches[58].len(), 27);
    assert_eq!(batches[0][0], 1);
    assert_eq!(*batches[58].last().unwrap(), 1767);
}

#[test]
fn test_zero_total_yields_no_batches() {
    assert!(generate_batches(0, 30, None).is_empty());
}

#[test]
fn test_limit_caps_the_page_range() {
    let batches = generate_batches(1767, 30, Some(45));

    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].len(), 30);
    assert_eq!(batches[1].len(), 15);
    assert_eq!(*batches[1].last().unwrap(), 45);
}

#[test]
fn test_limit_larger_than_total_is_ignored() {
    let batches = generate_batches(10, 4, Some(100));

    let concatenated: Vec<u32> = batches.iter().flatten().copied().collect();
    assert_eq!(concatenated, (1..=10).collect::<Vec<u32>>());
}

#[test]
fn test_evenly_divisible_total_has_full_final_batch() {
    let batches = generate_batches(60, 30, None);

    assert_eq!(batches.len(), 2);
    assert_eq!(batches[1].len(), 30);
}
