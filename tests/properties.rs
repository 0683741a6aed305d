use std::future::Future;
use std::sync::Arc;

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use rangecat::{ArraySource, ByteSource, GroupedSource};

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to build runtime")
        .block_on(future)
}

/// Distinct contents per member so misrouted reads show up
fn member_bytes(index: usize, length: u8) -> Vec<u8> {
    (0..length as usize)
        .map(|j| (index * 37 + j * 3) as u8)
        .collect()
}

fn build(lengths: &[u8]) -> (Vec<Vec<u8>>, GroupedSource) {
    let contents: Vec<Vec<u8>> = lengths
        .iter()
        .enumerate()
        .map(|(i, &len)| member_bytes(i, len))
        .collect();
    let members = contents
        .iter()
        .map(|bytes| Arc::new(ArraySource::new(bytes.clone())) as Arc<dyn ByteSource>)
        .collect();
    (contents, GroupedSource::new(members).unwrap())
}

#[quickcheck]
fn prop_length_is_sum_of_members(lengths: Vec<u8>) -> TestResult {
    if lengths.is_empty() {
        return TestResult::discard();
    }
    let (_, grouped) = build(&lengths);
    let sum: u64 = lengths.iter().map(|&len| len as u64).sum();
    TestResult::from_bool(grouped.length() == sum)
}

#[quickcheck]
fn prop_member_edges_match_member_bytes(lengths: Vec<u8>) -> TestResult {
    if lengths.is_empty() {
        return TestResult::discard();
    }
    let (contents, grouped) = build(&lengths);

    block_on(async {
        let mut start = 0u64;
        for (i, bytes) in contents.iter().enumerate() {
            if grouped.member_start(i) != Some(start) {
                return TestResult::error(format!("member {i} does not start at {start}"));
            }
            if let (Some(&first), Some(&last)) = (bytes.first(), bytes.last()) {
                let end = start + bytes.len() as u64 - 1;
                if grouped.read_byte(start).await.unwrap() != Some(first) {
                    return TestResult::error(format!("first byte of member {i} at {start}"));
                }
                if grouped.read_byte(end).await.unwrap() != Some(last) {
                    return TestResult::error(format!("last byte of member {i} at {end}"));
                }
            }
            start += bytes.len() as u64;
        }
        TestResult::from_bool(grouped.read_byte(start).await.unwrap().is_none())
    })
}

#[quickcheck]
fn prop_range_read_is_concatenation(lengths: Vec<u8>, position: u16, len: u16) -> TestResult {
    if lengths.is_empty() {
        return TestResult::discard();
    }
    let (contents, grouped) = build(&lengths);
    let expected = contents.concat();
    let total = expected.len() as u64;
    let position = position as u64 % (total + 2);

    block_on(async {
        let mut out = vec![0u8; len as usize];
        let got = grouped.read_range(position, &mut out).await.unwrap();
        if position >= total {
            return TestResult::from_bool(got.is_none());
        }
        let n = (len as u64).min(total - position) as usize;
        let start = position as usize;
        TestResult::from_bool(got == Some(n) && out[..n] == expected[start..start + n])
    })
}
