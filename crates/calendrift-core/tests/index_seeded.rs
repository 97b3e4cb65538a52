use calendrift_core::date::{day_key, parse_entry_date};
use calendrift_core::entry::{EntryPatch, RawEntry};
use calendrift_core::index::DerivedIndex;
use calendrift_core::store::JournalStore;
use calendrift_util::IdGenerator;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

const SEEDS: [u64; 5] = [
    0x5eed_c0de_u64,
    0x0000_0000_0000_0001_u64,
    0x0000_0000_0000_00ff_u64,
    0x0000_0000_00c0_ffee_u64,
    0x0123_4567_89ab_cdef_u64,
];

fn store_for(seed: u64) -> JournalStore {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&seed.to_le_bytes());
    JournalStore::with_id_generator(IdGenerator::with_seed(bytes))
}

/// Dates from a narrow range so that days collide often.
fn random_date(rng: &mut Xoshiro256StarStar) -> String {
    format!("{:02}/{:02}/2025", rng.gen_range(1..=6), rng.gen_range(8..=10))
}

fn random_raw(rng: &mut Xoshiro256StarStar, n: usize) -> RawEntry {
    RawEntry {
        rating: rng.gen_range(0..=10) as f64 / 2.0,
        date: random_date(rng),
        description: format!("entry {n}"),
        ..RawEntry::default()
    }
}

fn assert_consistent(store: &JournalStore, seed: u64) {
    let index = store.index();
    assert_eq!(index.len(), store.entries().len(), "length mismatch (seed={seed})");

    let dates: Vec<_> = index
        .sorted()
        .iter()
        .map(|e| parse_entry_date(&e.date).expect("stored dates resolve"))
        .collect();
    assert!(dates.windows(2).all(|w| w[0] <= w[1]), "not sorted (seed={seed})");

    for (pos, entry) in index.sorted().iter().enumerate() {
        assert_eq!(index.position_of(entry.id().as_str()), Some(pos), "id index (seed={seed})");
    }

    let mut covered = vec![false; index.len()];
    for (key, positions) in index.buckets() {
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "bucket order (seed={seed})");
        for &pos in positions {
            assert_eq!(day_key(dates[pos]), key, "bucket key (seed={seed})");
            assert!(!covered[pos], "position in two buckets (seed={seed})");
            covered[pos] = true;
        }
    }
    assert!(covered.into_iter().all(|c| c), "bucket coverage (seed={seed})");

    // Same-date entries keep their relative order from the entry list.
    let order = |id: &str| store.entries().iter().position(|e| e.id().as_str() == id);
    for w in index.sorted().windows(2) {
        if parse_entry_date(&w[0].date) == parse_entry_date(&w[1].date) {
            assert!(order(w[0].id().as_str()) < order(w[1].id().as_str()), "stability (seed={seed})");
        }
    }

    assert!(store.active_index() < store.len().max(1), "cursor (seed={seed})");
}

#[test]
fn seeded_mutation_sequences_keep_index_consistent() {
    for seed in SEEDS {
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
        let mut store = store_for(seed);
        for step in 0..200 {
            let ids: Vec<String> = store.entries().iter().map(|e| e.id().to_string()).collect();
            match rng.gen_range(0..10) {
                0..=4 => {
                    store.add(random_raw(&mut rng, step)).expect("generated dates resolve");
                }
                5..=6 if !ids.is_empty() => {
                    let id = &ids[rng.gen_range(0..ids.len())];
                    let patch = EntryPatch {
                        date: Some(random_date(&mut rng)),
                        ..EntryPatch::default()
                    };
                    assert_eq!(store.edit(id, patch), Ok(true));
                }
                7 if !ids.is_empty() => {
                    let id = &ids[rng.gen_range(0..ids.len())];
                    assert!(store.delete(id));
                }
                8 if !ids.is_empty() => {
                    let id = &ids[rng.gen_range(0..ids.len())];
                    assert!(store.open_by_id(id));
                    assert_eq!(store.active_entry().map(|e| e.id().as_str()), Some(id.as_str()));
                }
                _ => {
                    store.set_active_index(rng.gen_range(-5..300));
                }
            }
            assert_consistent(&store, seed);
        }
    }
}

#[test]
fn add_then_delete_restores_index() {
    for seed in SEEDS {
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
        let mut store = store_for(seed);
        for n in 0..30 {
            store.add(random_raw(&mut rng, n)).expect("generated dates resolve");
        }
        let before = store.index().clone();
        let id = store.add(random_raw(&mut rng, 99)).expect("generated dates resolve");
        assert_ne!(store.index(), &before);
        assert!(store.delete(id.as_str()));
        assert_eq!(store.index(), &before, "index differs after add+delete (seed={seed})");
        assert_eq!(store.index(), &DerivedIndex::build(store.entries()));
    }
}
