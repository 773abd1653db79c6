//! Integration test: block ownership across containers.
//!
//! Handles are checked against the issuing container and the slot
//! generation. Misuse must fail without disturbing any container.

use proptest::prelude::*;
use spume_core::{StoreError, Vec3};
use spume_store::{BlockHandle, ParticlesContainer};

#[test]
fn single_particle_round_trip() {
    let mut c = ParticlesContainer::new(4, ["mass"], ["position"]).unwrap();
    let h = c.new_block().unwrap();
    assert_eq!(c.block(h).unwrap().active_amount(), 0);

    let block = c.block_mut(h).unwrap();
    block.float_buffer_mut("mass").unwrap()[0] = 3.0;
    block.vec3_buffer_mut("position").unwrap()[0] = Vec3::new(0.0, 1.0, 0.0);
    *block.active_amount_mut() = 1;

    let block = c.block(h).unwrap();
    assert_eq!(block.float_buffer("mass").unwrap()[0], 3.0);
    assert_eq!(block.vec3_buffer("position").unwrap()[0], Vec3::Y);
    assert_eq!(c.vec3_buffer_index("position").unwrap().index(), 0);
}

#[test]
fn handles_from_dropped_container_are_foreign() {
    let stale = {
        let mut old = ParticlesContainer::new(4, ["mass"], ["position"]).unwrap();
        old.new_block().unwrap()
    };
    let mut c = ParticlesContainer::new(4, ["mass"], ["position"]).unwrap();
    let live = c.new_block().unwrap();
    assert!(matches!(
        c.release_block(stale),
        Err(StoreError::ForeignBlock { .. })
    ));
    assert!(c.contains(live));
}

#[test]
fn foreign_block_mut_is_rejected() {
    let mut a = ParticlesContainer::new(2, ["mass"], ["position"]).unwrap();
    let mut b = ParticlesContainer::new(2, ["mass"], ["position"]).unwrap();
    let hb = b.new_block().unwrap();
    let _ = a.new_block().unwrap();
    assert!(matches!(
        a.block_mut(hb),
        Err(StoreError::ForeignBlock { .. })
    ));
}

#[derive(Clone, Debug)]
enum Op {
    Alloc,
    Release(usize),
    ReleaseStale(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Alloc),
        (0usize..16).prop_map(Op::Release),
        (0usize..16).prop_map(Op::ReleaseStale),
    ]
}

proptest! {
    #[test]
    fn live_set_tracks_alloc_and_release(ops in prop::collection::vec(arb_op(), 0..64)) {
        let mut c = ParticlesContainer::new(2, ["mass"], ["position"]).unwrap();
        let mut live: Vec<BlockHandle> = Vec::new();
        let mut dead: Vec<BlockHandle> = Vec::new();

        for op in ops {
            match op {
                Op::Alloc => live.push(c.new_block().unwrap()),
                Op::Release(i) if !live.is_empty() => {
                    let h = live.remove(i % live.len());
                    prop_assert!(c.release_block(h).is_ok());
                    dead.push(h);
                }
                Op::ReleaseStale(i) if !dead.is_empty() => {
                    let h = dead[i % dead.len()];
                    let is_stale = matches!(
                        c.release_block(h),
                        Err(StoreError::StaleBlock { .. })
                    );
                    prop_assert!(is_stale);
                }
                _ => {}
            }
            prop_assert_eq!(c.block_count(), live.len());
        }

        let mut expected = live.clone();
        expected.sort_by_key(|h| h.id());
        prop_assert_eq!(c.block_handles(), expected);
        for h in &dead {
            prop_assert!(!c.contains(*h));
        }
    }
}
