//! Ordering properties of the game list partition
//!
//! Exercises the partition engine over generated snapshots:
//! - exactly one status per well-formed record
//! - no record dropped or duplicated
//! - block precedence and in-block stability
//! - agreement between the insertion, concatenation and block formulations

use game_status::{
    classify, is_finished, is_opponents_turn, is_users_turn, partition, partition_blocks,
    partition_by_concat, records_from_json, Block, Field, GameRecord, GameView, RecordFilter,
    SchemaViolation,
};
use proptest::prelude::*;
use serde_json::json;

// =============================================================================
// Generators
// =============================================================================

/// Build a well-formed record whose ID is its index in the snapshot.
fn game(index: usize, archived: bool, outcome: u8, state: i64) -> GameRecord {
    GameRecord::builder()
        .set(Field::GameId, index.to_string())
        .set(Field::Archived, archived)
        .set(Field::State, state)
        .set(Field::UserWon, outcome == 2)
        .set(Field::UserLost, outcome == 3)
        .set(Field::Drawn, outcome == 4)
        .build()
}

prop_compose! {
    fn arb_snapshot()(
        specs in prop::collection::vec((any::<bool>(), 0u8..5, 0i64..2), 0..40)
    ) -> Vec<GameRecord> {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (archived, outcome, state))| game(i, archived, outcome, state))
            .collect()
    }
}

fn arb_view() -> impl Strategy<Value = GameView> {
    prop_oneof![
        Just(GameView::Active),
        Just(GameView::Archived),
        Just(GameView::All),
    ]
}

fn index_of(record: &GameRecord) -> usize {
    record.game_id().unwrap().parse().unwrap()
}

fn block_of(record: &GameRecord) -> Block {
    classify(record).unwrap().block()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn exactly_one_status_per_record(records in arb_snapshot()) {
        for record in &records {
            let hits = [
                is_users_turn(record).unwrap(),
                is_opponents_turn(record).unwrap(),
                is_finished(record).unwrap(),
            ];
            prop_assert_eq!(hits.iter().filter(|h| **h).count(), 1);
        }
    }

    #[test]
    fn no_record_dropped_or_duplicated(records in arb_snapshot(), view in arb_view()) {
        let ordered = partition(&records, view).unwrap();
        let expected = records.iter().filter(|r| view.matches(r).unwrap()).count();
        prop_assert_eq!(ordered.len(), expected);

        let mut seen: Vec<usize> = ordered.iter().map(|r| index_of(r)).collect();
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), expected);
    }

    #[test]
    fn blocks_appear_in_precedence_order(records in arb_snapshot(), view in arb_view()) {
        let ordered = partition(&records, view).unwrap();
        let blocks: Vec<Block> = ordered.iter().map(|r| block_of(r)).collect();
        prop_assert!(blocks.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn input_order_kept_within_block(records in arb_snapshot(), view in arb_view()) {
        let ordered = partition(&records, view).unwrap();
        for pair in ordered.windows(2) {
            if block_of(pair[0]) == block_of(pair[1]) {
                prop_assert!(index_of(pair[0]) < index_of(pair[1]));
            }
        }
    }

    #[test]
    fn insertion_equals_concatenation(records in arb_snapshot(), view in arb_view()) {
        let inserted = partition(&records, view).unwrap();
        let concatenated = partition_by_concat(&records, view).unwrap();
        let flattened = partition_blocks(&records, view).unwrap().flatten();
        prop_assert_eq!(&inserted, &concatenated);
        prop_assert_eq!(&inserted, &flattened);
    }

    #[test]
    fn filter_matching_nothing_yields_nothing(records in arb_snapshot()) {
        let none = |_: &GameRecord| -> Result<bool, SchemaViolation> { Ok(false) };
        prop_assert!(partition(&records, none).unwrap().is_empty());
    }
}

// =============================================================================
// Scenarios
// =============================================================================

fn row(id: &str, archived: u8, state: u8, won: u8, lost: u8, drawn: u8) -> serde_json::Value {
    json!({
        "game_id": id,
        "archived": archived,
        "state": state,
        "user_won": won,
        "user_lost": lost,
        "drawn": drawn,
    })
}

fn ids(records: &[&GameRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.game_id().unwrap().to_string())
        .collect()
}

#[test]
fn test_empty_snapshot() {
    assert!(partition(&[], GameView::All).unwrap().is_empty());
    assert!(partition_blocks(&[], GameView::Archived).unwrap().is_empty());
}

#[test]
fn test_archived_list_from_server_rows() {
    let records = records_from_json(&json!([
        row("A", 1, 0, 1, 0, 0),
        row("B", 1, 1, 0, 0, 0),
        row("C", 1, 0, 0, 0, 0),
        row("D", 1, 1, 0, 0, 0),
    ]))
    .unwrap();

    let ordered = partition(&records, GameView::Archived).unwrap();
    assert_eq!(ids(&ordered), vec!["B", "D", "C", "A"]);
}

#[test]
fn test_active_game_hidden_from_archive() {
    let records = records_from_json(&json!([
        row("X", 0, 0, 0, 0, 0),
        row("Y", 1, 1, 0, 0, 0),
    ]))
    .unwrap();

    let ordered = partition(&records, GameView::Archived).unwrap();
    assert_eq!(ids(&ordered), vec!["Y"]);
}

#[test]
fn test_missing_state_is_schema_violation() {
    let mut records = records_from_json(&json!([row("ok", 1, 1, 0, 0, 0)])).unwrap();
    records.push(
        GameRecord::builder()
            .set(Field::GameId, "no-state")
            .set(Field::Archived, true)
            .set(Field::UserWon, false)
            .set(Field::UserLost, false)
            .set(Field::Drawn, false)
            .build(),
    );

    for result in [
        partition(&records, GameView::Archived),
        partition_by_concat(&records, GameView::Archived),
    ] {
        assert_eq!(
            result,
            Err(SchemaViolation::MissingField { field: Field::State })
        );
    }
}

#[test]
fn test_two_outcomes_is_schema_violation() {
    let records = records_from_json(&json!([row("W", 0, 0, 1, 1, 0)])).unwrap();
    assert!(matches!(
        partition(&records, GameView::Active),
        Err(SchemaViolation::ConflictingOutcome { .. })
    ));
}
