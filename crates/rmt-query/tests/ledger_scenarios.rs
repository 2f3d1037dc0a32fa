//! End-to-end scenarios: receipts arrive in a ledger, the operator commits
//! them in batches, and readers query ranges and snapshots.
//!
//! Expected roots were computed independently with Python `hashlib`.

use std::sync::Arc;

use proptest::prelude::*;
use rmt_core::{CommitmentError, NodeHash, OperatorId};
use rmt_query::QueryRouter;
use rmt_state::{BatchRecorder, InMemoryLedger, ReceiptLedger, RecorderConfig, RecorderError};
use rmt_tree::verify_proof;

const LEAF_A: &str = "d15dea46efa109226939ed0cbce693a0fb323e832c397fa51faa8325bbd51b1b";
const LEAF_B: &str = "65b48b4722fcf72f0289890e40b8366a543200e3ac92aafb9d1b2d501e217857";
const LEAF_C: &str = "d2bbf4699e48404224a81652e9e8b72695d27f10c90ef0644c3f243d3e1fd071";
const LEAF_D: &str = "cc1844523d34ba4a5b78f78e32a19ca2d870931dae2ea1d716fd3e3d36e7c199";
const ROOT_1: &str = "9f8741a836b0aaec536cf2b76e6c187cc534d2736b28d3a0f373875fab31ed7b";
const ROOT_2: &str = "532df3c1ebbf30583982176d6a1c43104b83ef50787eba00739df5c69be7eb6c";
const ROOT_3: &str = "293af0230f52a6e45885593da0028917c3d64acbc25b3b9bf7ba6efe01d16a33";
const ROOT_4: &str = "16582f513ba031eff223b15baa22d75ac2666cb001b73f751ec82827529ac9a3";
/// `H(leaf C || leaf C)`, the right half of the three-receipt tree.
const PAIR_CC: &str = "bb2e6a52d049ddb3137e7a61d5f2009915f49b67fe1a8cc71eac3ab9e29d3a69";

/// Sequential receipts `amount = id`, target `AAAAAAAAA`.
const SEQ_ROOT_0_14: &str = "d845ee7efc84a13cb24b650c667d957d7f7fe8713b49dea0592e0ce888ecd492";
const SEQ_ROOT_0_15: &str = "d94fbad4cee7e97789139ba6f78bf4e6e662a3f4e8f96d674c54d7517d6cb54e";
const SEQ_ROOT_16_16: &str = "304d4fb8d54096ab731043e39d0b27d77cee6ae6d5d779f66787fd208ec92fb9";
const SEQ_LEAF_16: &str = "e82be8273656215412369f5e35ab037573facc10530f7b3eb0a563066a581e6c";

fn h(hex: &str) -> NodeHash {
    NodeHash::from_hex(hex).unwrap()
}

fn owner() -> OperatorId {
    OperatorId::new("owner")
}

fn lettered(n: usize) -> BatchRecorder<Arc<InMemoryLedger>> {
    let ledger = Arc::new(InMemoryLedger::new());
    for (i, target) in ["AAAAAAAAA", "BBBBBBBBB", "CCCCCCCCC", "DDDDDDDDD"]
        .iter()
        .take(n)
        .enumerate()
    {
        ledger.create_receipt(100_000 * (i as u128 + 1), *target);
    }
    BatchRecorder::new(RecorderConfig::new(owner()), ledger)
}

fn add_sequential(ledger: &InMemoryLedger, n: u64) {
    for _ in 0..n {
        let id = ledger.count();
        ledger.create_receipt(u128::from(id), "AAAAAAAAA");
    }
}

// ── Small trees ─────────────────────────────────────────────────────

#[test]
fn one_receipt_range_and_snapshot() {
    let mut rec = lettered(1);
    {
        let router = QueryRouter::new(&rec);
        let tree = router.range_tree(0, 0).unwrap();
        assert_eq!((tree.first_id, tree.count, tree.size), (0, 1, 3));
        assert_eq!(tree.nodes.len(), 3);
        assert_eq!(tree.root, tree.nodes[2]);
        assert_eq!(tree.root, h(ROOT_1));
        assert_eq!(tree.nodes[0], h(LEAF_A));
        assert_eq!(router.range_root(0, 0).unwrap(), tree.root);

        let proof = router.prove_range(0, 0, 0).unwrap();
        assert_eq!(proof.path_length, 1);
        assert_eq!(proof.siblings, vec![h(LEAF_A)]);
        assert_eq!(proof.positions, vec![false]);
        assert!(verify_proof(&h(LEAF_A), &proof, &tree.root));
    }

    rec.commit(&owner()).unwrap();
    let router = QueryRouter::new(&rec);
    let by_total = router.snapshot_by_total(1).unwrap();
    assert_eq!(by_total.batch_index, 0);
    assert_eq!((by_total.tree.first_id, by_total.tree.count, by_total.tree.size), (0, 1, 3));
    assert_eq!(router.snapshot_root(0).unwrap(), h(ROOT_1));

    let committed = router.prove_committed(0).unwrap();
    assert_eq!(committed.tree_index, 0);
    assert!(verify_proof(&h(LEAF_A), &committed.proof, &h(ROOT_1)));
}

#[test]
fn two_receipts_proofs_point_at_each_other() {
    let rec = lettered(2);
    let router = QueryRouter::new(&rec);
    let tree = router.range_tree(0, 1).unwrap();
    assert_eq!((tree.count, tree.size), (2, 3));
    assert_eq!(tree.nodes[..2], [h(LEAF_A), h(LEAF_B)]);
    assert_eq!(tree.root, h(ROOT_2));

    let p0 = router.prove_range(0, 0, 1).unwrap();
    assert_eq!(p0.siblings, vec![h(LEAF_B)]);
    assert_eq!(p0.positions, vec![false]);
    assert!(verify_proof(&h(LEAF_A), &p0, &tree.root));

    let p1 = router.prove_range(1, 0, 1).unwrap();
    assert_eq!(p1.siblings, vec![h(LEAF_A)]);
    assert_eq!(p1.positions, vec![true]);
    assert!(verify_proof(&h(LEAF_B), &p1, &tree.root));
}

#[test]
fn three_receipts_pad_with_last_leaf() {
    let rec = lettered(3);
    let router = QueryRouter::new(&rec);
    let tree = router.range_tree(0, 2).unwrap();
    assert_eq!((tree.count, tree.size), (3, 7));
    assert_eq!(tree.nodes.len(), 7);
    assert_eq!(tree.nodes[3], h(LEAF_C));
    assert_eq!(tree.nodes[4], h(ROOT_2));
    assert_eq!(tree.nodes[5], h(PAIR_CC));
    assert_eq!(tree.root, h(ROOT_3));

    let p0 = router.prove_range(0, 0, 2).unwrap();
    assert_eq!(p0.siblings, vec![h(LEAF_B), tree.nodes[5]]);
    assert_eq!(p0.positions, vec![false, false]);

    let p1 = router.prove_range(1, 0, 2).unwrap();
    assert_eq!(p1.siblings, vec![h(LEAF_A), tree.nodes[5]]);
    assert_eq!(p1.positions, vec![true, false]);

    let p2 = router.prove_range(2, 0, 2).unwrap();
    assert_eq!(p2.path_length, 2);
    assert_eq!(p2.siblings, vec![h(LEAF_C), tree.nodes[4]]);
    assert_eq!(p2.positions, vec![false, true]);

    for (leaf, proof) in [(LEAF_A, &p0), (LEAF_B, &p1), (LEAF_C, &p2)] {
        assert!(verify_proof(&h(leaf), proof, &tree.root));
    }
}

#[test]
fn four_receipts_fill_the_tree() {
    let rec = lettered(4);
    let router = QueryRouter::new(&rec);
    let tree = router.range_tree(0, 3).unwrap();
    assert_eq!((tree.count, tree.size), (4, 7));
    assert_eq!(tree.nodes[3], h(LEAF_D));
    assert_eq!(tree.root, h(ROOT_4));

    let p3 = router.prove_range(3, 0, 3).unwrap();
    assert_eq!(p3.siblings, vec![h(LEAF_C), h(ROOT_2)]);
    assert_eq!(p3.positions, vec![true, true]);
    assert!(verify_proof(&h(LEAF_D), &p3, &tree.root));
}

// ── Batch boundary walk ─────────────────────────────────────────────

#[test]
fn fifteen_sixteen_seventeen_walk() {
    let ledger = Arc::new(InMemoryLedger::new());
    let mut rec = BatchRecorder::new(RecorderConfig::new(owner()), ledger.clone());
    assert_eq!(rec.max_leaves(), 16);

    add_sequential(&ledger, 15);
    assert_eq!(rec.commit(&owner()).unwrap(), vec![0]);
    {
        let router = QueryRouter::new(&rec);
        let batch = router.snapshot_by_total(16).unwrap();
        assert_eq!(batch.batch_index, 0);
        assert_eq!((batch.tree.first_id, batch.tree.count), (0, 15));
        assert_eq!(batch.tree.root, h(SEQ_ROOT_0_14));
        assert_eq!(router.snapshot_root(0).unwrap(), h(SEQ_ROOT_0_14));
    }

    add_sequential(&ledger, 1);
    {
        let router = QueryRouter::new(&rec);
        let full = router.snapshot_by_total(16).unwrap();
        assert_eq!((full.tree.first_id, full.tree.count, full.tree.size), (0, 16, 31));
        assert_eq!(full.tree.root, h(SEQ_ROOT_0_15));

        let as_of_15 = router.snapshot_by_total(15).unwrap();
        assert_eq!(as_of_15.tree.count, 15);
        assert_eq!(as_of_15.tree.root, h(SEQ_ROOT_0_14));

        assert!(matches!(
            router.snapshot_by_total(17),
            Err(CommitmentError::NotFound(_))
        ));
    }

    add_sequential(&ledger, 1);
    assert_eq!(rec.commit(&owner()).unwrap(), vec![1, 2]);
    let router = QueryRouter::new(&rec);

    // The committed snapshot 0 stays as it was committed.
    assert_eq!(router.snapshot_root(0).unwrap(), h(SEQ_ROOT_0_14));
    let late = router.snapshot(1).unwrap();
    assert_eq!((late.tree.first_id, late.tree.count), (15, 1));

    let next = router.snapshot(2).unwrap();
    assert_eq!((next.tree.first_id, next.tree.count, next.tree.size), (16, 1, 3));
    assert_eq!(next.tree.root, h(SEQ_ROOT_16_16));

    // Batch 1 holds id 16, which was committed as snapshot 2.
    let by_total = router.snapshot_by_total(17).unwrap();
    assert_eq!(by_total.batch_index, 1);
    assert_eq!(by_total.tree.root, h(SEQ_ROOT_16_16));
    assert_eq!(rec.snapshot_containing(16).map(|s| s.tree_index), Some(2));
    assert_ne!(router.snapshot_root(by_total.batch_index).unwrap(), by_total.tree.root);

    let committed = router.prove_committed(16).unwrap();
    assert_eq!(committed.tree_index, 2);
    assert_eq!(committed.proof.path_length, 1);
    assert!(verify_proof(&h(SEQ_LEAF_16), &committed.proof, &h(SEQ_ROOT_16_16)));
}

#[test]
fn seventeen_receipts_two_commits() {
    let ledger = Arc::new(InMemoryLedger::new());
    let mut rec = BatchRecorder::new(RecorderConfig::new(owner()), ledger.clone());

    add_sequential(&ledger, 16);
    rec.commit(&owner()).unwrap();
    add_sequential(&ledger, 1);
    rec.commit(&owner()).unwrap();

    let router = QueryRouter::new(&rec);
    assert_eq!(router.snapshot_root(0).unwrap(), h(SEQ_ROOT_0_15));
    let s1 = router.snapshot(1).unwrap();
    assert_eq!((s1.tree.first_id, s1.tree.count, s1.tree.size), (16, 1, 3));

    let proof = router.prove_committed(16).unwrap();
    assert_eq!(proof.tree_index, 1);
    assert_eq!(proof.proof.path_length, 1);
    assert!(verify_proof(&h(SEQ_LEAF_16), &proof.proof, &s1.tree.root));

    for id in 0..16 {
        let p = router.prove_committed(id).unwrap();
        assert_eq!(p.tree_index, 0);
        assert_eq!(p.proof.path_length, 4);
        let leaf = ledger.receipt_at(id).unwrap().leaf_hash();
        assert!(verify_proof(&leaf, &p.proof, &h(SEQ_ROOT_0_15)));
    }
    assert!(router.prove_committed(17).is_err());
}

// ── Administration ──────────────────────────────────────────────────

#[test]
fn only_the_operator_mutates() {
    let ledger = Arc::new(InMemoryLedger::new());
    let mut rec = BatchRecorder::new(RecorderConfig::new(owner()), ledger.clone());
    let stranger = OperatorId::new("stranger");
    add_sequential(&ledger, 3);

    assert!(matches!(
        rec.commit(&stranger),
        Err(RecorderError::Commitment(CommitmentError::Unauthorized { .. }))
    ));
    assert!(rec.set_capacity(&stranger, 10).is_err());
    assert!(rec
        .replace_ledger(&stranger, Arc::new(InMemoryLedger::new()))
        .is_err());
    assert!(rec.transfer_operator(&stranger, stranger.clone()).is_err());
    assert!(rec.events().is_empty());

    assert_eq!(
        rec.set_capacity(&owner(), 11),
        Err(CommitmentError::LimitExceeded {
            requested: 11,
            max: 10
        })
    );
    rec.set_capacity(&owner(), 10).unwrap();
    assert_eq!(rec.max_leaves(), 1024);
}

#[test]
fn capacity_change_shifts_batch_lookup() {
    let ledger = Arc::new(InMemoryLedger::new());
    let mut rec = BatchRecorder::new(RecorderConfig::new(owner()), ledger.clone());
    add_sequential(&ledger, 10);
    rec.set_capacity(&owner(), 2).unwrap();

    let router = QueryRouter::new(&rec);
    let batch = router.snapshot_by_total(10).unwrap();
    assert_eq!(batch.batch_index, 2);
    assert_eq!((batch.tree.first_id, batch.tree.count), (8, 2));

    rec.commit(&owner()).unwrap();
    assert_eq!(rec.snapshots().len(), 3);
    assert_eq!(
        QueryRouter::new(&rec).snapshot(2).unwrap().tree,
        batch.tree
    );
}

// ── Properties ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn range_root_equals_range_tree_root(len in 1u64..40, a in 0u64..40, b in 0u64..40) {
        let ledger = InMemoryLedger::new();
        add_sequential(&ledger, len);
        let rec = BatchRecorder::new(RecorderConfig::new(owner()), ledger);
        let router = QueryRouter::new(&rec);
        let (start, end) = (a.min(b) % len, a.max(b) % len);
        prop_assume!(start <= end);

        let tree = router.range_tree(start, end).unwrap();
        prop_assert_eq!(router.range_root(start, end).unwrap(), tree.root);
        prop_assert_eq!(router.range_tree(start, end).unwrap(), tree.clone());

        for id in start..=end {
            let proof = router.prove_range(id, start, end).unwrap();
            let leaf = rec.ledger().receipt_at(id).unwrap().leaf_hash();
            prop_assert!(verify_proof(&leaf, &proof, &tree.root));
        }
    }

    #[test]
    fn every_committed_receipt_proves(len in 1u64..70, path_limit in 0u8..6) {
        let ledger = InMemoryLedger::new();
        add_sequential(&ledger, len);
        let config = RecorderConfig::new(owner()).with_path_limit(path_limit).unwrap();
        let mut rec = BatchRecorder::new(config, ledger);
        rec.commit(&owner()).unwrap();

        let router = QueryRouter::new(&rec);
        for id in 0..len {
            let committed = router.prove_committed(id).unwrap();
            prop_assert!(committed.proof.path_length <= u32::from(path_limit.max(1)));
            let root = router.snapshot_root(committed.tree_index).unwrap();
            let leaf = rec.ledger().receipt_at(id).unwrap().leaf_hash();
            prop_assert!(verify_proof(&leaf, &committed.proof, &root));
        }
    }
}
