//! Property-based tests for partition, quickselect and quicksort, on heap
//! slices and on mapped files.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use searchbench::Error;
use searchbench::dataset;
use searchbench::external::{MappedBuffer, partition, select, sort, with_mapped};

fn arbitrary_words() -> impl Strategy<Value = Vec<u32>> {
    prop_oneof![
        prop::collection::vec(any::<u32>(), 1..400),
        // Heavy duplication.
        prop::collection::vec(0u32..4, 1..400),
    ]
}

/// A non-empty buffer with a valid closed sub-range.
fn words_and_range() -> impl Strategy<Value = (Vec<u32>, usize, usize)> {
    arbitrary_words().prop_flat_map(|words| {
        let len = words.len();
        (Just(words), 0..len).prop_flat_map(move |(words, low)| (Just(words), Just(low), low..len))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Everything up to the split is <= everything after it, and elements
    /// outside the range are untouched.
    #[test]
    fn partition_splits_range((words, low, high) in words_and_range(), seed in any::<u64>()) {
        let mut data = words.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        let p = partition(&mut data, low, high, &mut rng).unwrap();

        prop_assert!(p >= low && p <= high);
        if high > low {
            prop_assert!(p < high);
        }
        let left_max = data[low..=p].iter().max().copied().unwrap();
        if p < high {
            let right_min = data[p + 1..=high].iter().min().copied().unwrap();
            prop_assert!(left_max <= right_min);
        }
        prop_assert_eq!(&data[..low], &words[..low]);
        prop_assert_eq!(&data[high + 1..], &words[high + 1..]);

        let mut before = words[low..=high].to_vec();
        let mut after = data[low..=high].to_vec();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }

    /// select(0, n-1, k) is the k-th smallest of the original contents.
    #[test]
    fn select_matches_sorted_copy(words in arbitrary_words(), k_pct in 0.0..1.0f64, seed in any::<u64>()) {
        let mut sorted = words.clone();
        sorted.sort();
        let k = ((k_pct * words.len() as f64) as usize).min(words.len() - 1);
        let mut data = words.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        prop_assert_eq!(select(&mut data, 0, words.len() - 1, k, &mut rng).unwrap(), sorted[k]);
    }

    /// sort yields a non-decreasing permutation of the input.
    #[test]
    fn sort_is_sorted_permutation(words in arbitrary_words(), seed in any::<u64>()) {
        let mut expected = words.clone();
        expected.sort();
        let mut data = words.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        sort(&mut data, 0, words.len() - 1, &mut rng).unwrap();
        prop_assert_eq!(data, expected);
    }

    /// Out-of-range k is rejected, never read.
    #[test]
    fn select_rejects_k_outside_range((words, low, high) in words_and_range(), past in 1usize..10, seed in any::<u64>()) {
        let mut data = words.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        let result = select(&mut data, low, high, high + past, &mut rng);
        let rejected = matches!(result, Err(Error::IndexOutOfRange { .. }));
        prop_assert!(rejected);
        prop_assert_eq!(data, words);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    /// The same operations through a mapped file leave the file sorted.
    #[test]
    fn mapped_sort_persists(words in arbitrary_words(), seed in any::<u64>()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.bin");
        dataset::write(&path, words.iter().copied()).unwrap();

        let mut rng = StdRng::seed_from_u64(seed);
        with_mapped(&path, |view| {
            let high = view.len() - 1;
            return sort(view, 0, high, &mut rng);
        }).unwrap();

        let mut expected = words.clone();
        expected.sort();
        let buffer = MappedBuffer::open(&path).unwrap();
        prop_assert_eq!(buffer.as_slice(), &expected[..]);
    }

    #[test]
    fn mapped_select_matches(words in arbitrary_words(), k_pct in 0.0..1.0f64, seed in any::<u64>()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.bin");
        dataset::write(&path, words.iter().copied()).unwrap();

        let mut sorted = words.clone();
        sorted.sort();
        let k = ((k_pct * words.len() as f64) as usize).min(words.len() - 1);
        let mut rng = StdRng::seed_from_u64(seed);
        let got = with_mapped(&path, |view| {
            let high = view.len() - 1;
            return select(view, 0, high, k, &mut rng);
        }).unwrap();
        prop_assert_eq!(got, sorted[k]);
    }
}

#[test]
fn median_of_five_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("five.bin");
    dataset::write(&path, [9, 1, 7, 3, 5]).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let median = with_mapped(&path, |view| select(view, 0, 4, 2, &mut rng)).unwrap();
    assert_eq!(median, 5);
}

#[test]
fn all_duplicates_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dups.bin");
    dataset::write(&path, [3, 3, 3]).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    with_mapped(&path, |view| sort(view, 0, 2, &mut rng)).unwrap();
    assert_eq!(MappedBuffer::open(&path).unwrap().as_slice(), &[3, 3, 3]);
}
