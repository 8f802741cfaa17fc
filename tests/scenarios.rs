//! Reference push/pop/lookup scenarios

mod common;

use chunkpipe::{ChunkPipe, PipeConfig};
use common::*;
use test_case::test_case;

#[test]
fn two_pushes_then_range_and_get() {
    let pipe = ChunkPipe::new();
    pipe.push(vec![1, 2, 3]).push(vec![4, 5]);

    assert_eq!(pipe.range(), vec![1, 2, 3, 4, 5]);
    assert_eq!(pipe.get(3), Some(4));
    assert_eq!(pipe.get(10), None);
}

#[test]
fn pops_from_both_ends() {
    let pipe = ChunkPipe::new();
    pipe.push(vec![1, 2, 3, 4, 5]);

    assert_eq!(pipe.pop_front(), Some(1));
    assert_eq!(pipe.pop_front(), Some(2));
    assert_eq!(pipe.pop_end(), Some(5));
    assert_eq!(pipe.range(), vec![3, 4]);
}

#[test]
fn chunk_pop_empties_pipe() {
    let pipe = ChunkPipe::new();
    pipe.push(vec![1, 2, 3]);

    assert_eq!(pipe.pop_chunk_front(), Some(vec![1, 2, 3]));
    assert!(pipe.is_empty());
    assert_eq!(pipe.pop_front(), None);
    assert_drained(&pipe);
}

#[test]
fn empty_pipe_reports_not_found_everywhere() {
    let pipe = ChunkPipe::<i64>::new();
    assert_eq!(pipe.pop_front(), None);
    assert_eq!(pipe.pop_end(), None);
    assert_eq!(pipe.pop_chunk_front(), None);
    assert_eq!(pipe.pop_chunk_end(), None);
    assert_eq!(pipe.get(0), None);

    pipe.push(Vec::new());
    assert_drained(&pipe);
}

#[test_case(&[vec![1, 2, 3], vec![4, 5]], 0 => Some(1); "first element")]
#[test_case(&[vec![1, 2, 3], vec![4, 5]], 2 => Some(3); "end of first chunk")]
#[test_case(&[vec![1, 2, 3], vec![4, 5]], 3 => Some(4); "start of second chunk")]
#[test_case(&[vec![1, 2, 3], vec![4, 5]], 5 => None; "one past the end")]
#[test_case(&[vec![7]], usize::MAX => None; "far out of range")]
fn get_by_index(blocks: &[Vec<i32>], index: usize) -> Option<i32> {
    pipe_from_blocks(bulk_pipe(), blocks).get(index)
}

#[test_case(PipeConfig::default(); "coalescing")]
#[test_case(PipeConfig::bulk_only(); "bulk only")]
fn fifo_and_lifo_order(config: PipeConfig) {
    let blocks: Vec<Vec<u32>> = vec![vec![1, 2], (3..20).collect(), vec![20], vec![21, 22, 23]];

    let pipe = pipe_from_blocks(ChunkPipe::with_config(config.clone()).unwrap(), &blocks);
    assert_eq!(drain_front(&pipe), (1..=23).collect::<Vec<_>>());
    assert_drained(&pipe);

    let pipe = pipe_from_blocks(ChunkPipe::with_config(config).unwrap(), &blocks);
    assert_eq!(drain_end(&pipe), (1..=23).rev().collect::<Vec<_>>());
    assert_drained(&pipe);
}

#[test]
fn chunk_pops_return_whole_windows() {
    let pipe = pipe_from_blocks(bulk_pipe(), &[vec![1, 2, 3], vec![4], vec![5, 6]]);
    pipe.pop_front();
    pipe.pop_end();

    assert_eq!(pipe.pop_chunk_end(), Some(vec![5]));
    assert_eq!(pipe.pop_chunk_front(), Some(vec![2, 3]));
    assert_eq!(pipe.pop_chunk_front(), Some(vec![4]));
    assert_eq!(pipe.pop_chunk_end(), None);
    assert_drained(&pipe);
}

#[test]
fn small_appends_land_in_scratch_chunks() {
    let pipe = ChunkPipe::new();
    pipe.push((0..100).collect::<Vec<u16>>());
    for v in 100..120u16 {
        pipe.push(vec![v]);
    }

    let stats = pipe.stats();
    // 20 single pushes fill one 16-slot scratch chunk and start a second
    assert_eq!(stats.chunks, 3);
    assert_eq!(stats.scratch_chunks, 2);
    assert_eq!(pipe.range(), (0..120).collect::<Vec<_>>());
}

#[test]
fn small_append_refills_tail_after_pop_end() {
    let pipe = ChunkPipe::new();
    pipe.push(vec![1, 2, 3]);
    assert_eq!(pipe.pop_end(), Some(3));
    pipe.push(vec![9]);

    assert_eq!(pipe.chunk_count(), 1);
    assert_eq!(pipe.range(), vec![1, 2, 9]);
}

#[test]
fn bulk_push_keeps_callers_allocation() {
    let mut block = Vec::with_capacity(4096);
    block.extend(0..1000u32);
    let ptr = block.as_ptr();

    let pipe = ChunkPipe::new();
    pipe.push(block);
    assert_eq!(pipe.chunk_count(), 1);

    let back = pipe.pop_chunk_front().unwrap();
    assert_eq!(back.as_ptr(), ptr, "bulk push should not copy the block");
    assert_eq!(back.len(), 1000);
}

#[test]
fn range_values_visits_exactly_k() {
    let pipe = pipe_from_blocks(bulk_pipe::<u32>(), &[(0..5).collect(), (5..40).collect(), vec![40]]);

    for k in 1..=41usize {
        let mut visited = 0usize;
        pipe.range_values(|_| {
            visited += 1;
            visited < k
        });
        assert_eq!(visited, k, "predicate false at k={}", k);
    }
}

#[test]
fn index_grows_with_chunks_only() {
    let pipe = ChunkPipe::new();
    pipe.push((0..50).collect::<Vec<u8>>());
    pipe.push(vec![50]);
    pipe.push(vec![51, 52]);

    let summary = pipe.stats().index;
    assert_eq!(summary.nodes, 2);
    // Scratch chunk indexed at its size when linked
    assert_eq!(summary.sum, 51);

    pipe.pop_chunk_front();
    assert_eq!(pipe.stats().index.nodes, 2);
}
