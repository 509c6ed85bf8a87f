//! Property-based tests for the position assigner and reorder engine

use std::collections::HashSet;

use kanboard::shared::position::{is_contiguous, renumber};
use kanboard::shared::reorder::{reorder_cards, reorder_lists};
use kanboard::shared::{Card, DropLocation, List, Move};
use proptest::prelude::*;
use uuid::Uuid;

fn lists_for(board_id: Uuid, n: usize) -> Vec<List> {
    (0..n)
        .map(|i| List::new(format!("list {}", i), board_id, i as u32))
        .collect()
}

fn cards_for(list_id: Uuid, n: usize) -> Vec<Card> {
    (0..n)
        .map(|i| Card::new(format!("card {}", i), list_id, i as u32))
        .collect()
}

/// Length of a sequence plus a valid source and destination index in it
fn same_sequence_move() -> impl Strategy<Value = (usize, usize, usize)> {
    (1usize..12).prop_flat_map(|n| (Just(n), 0..n, 0..n))
}

/// Source length, source index, destination length, destination index
fn cross_list_move() -> impl Strategy<Value = (usize, usize, usize, usize)> {
    (1usize..12, 0usize..12).prop_flat_map(|(n_src, n_dst)| {
        (Just(n_src), 0..n_src, Just(n_dst), 0..=n_dst)
    })
}

proptest! {
    #[test]
    fn test_renumber_is_contiguous_and_idempotent(
        positions in prop::collection::vec(0u32..1000, 0..20)
    ) {
        let list_id = Uuid::new_v4();
        let cards: Vec<Card> = positions
            .iter()
            .map(|&position| Card::new("card", list_id, position))
            .collect();
        let ids: Vec<Uuid> = cards.iter().map(|card| card.id).collect();

        let once = renumber(cards);
        prop_assert!(is_contiguous(&once));
        prop_assert_eq!(once.iter().map(|card| card.id).collect::<Vec<_>>(), ids);

        let twice = renumber(once.clone());
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn test_list_reorder_keeps_every_list((n, from, to) in same_sequence_move()) {
        let board_id = Uuid::new_v4();
        let lists = lists_for(board_id, n);
        let moved = lists[from].id;

        let plan = reorder_lists(&lists, &Move::list(moved, board_id, from, to)).unwrap();

        prop_assert_eq!(plan.lists.len(), n);
        prop_assert!(is_contiguous(&plan.lists));
        prop_assert_eq!(plan.lists[to].id, moved);
        let before: HashSet<Uuid> = lists.iter().map(|list| list.id).collect();
        let after: HashSet<Uuid> = plan.lists.iter().map(|list| list.id).collect();
        prop_assert_eq!(before, after);

        // The batch names exactly the lists whose position changed
        for list in &plan.lists {
            let original = lists.iter().find(|l| l.id == list.id).unwrap();
            prop_assert_eq!(plan.batch.contains(list.id), original.position != list.position);
        }
        if from == to {
            prop_assert!(plan.batch.is_empty());
        }
    }

    #[test]
    fn test_same_list_batch_covers_the_list((n, from, to) in same_sequence_move()) {
        let list_id = Uuid::new_v4();
        let cards = cards_for(list_id, n);
        let mv = Move::card(
            cards[from].id,
            DropLocation::new(list_id, from),
            DropLocation::new(list_id, to),
        );

        let plan = reorder_cards(&mv, &cards, &[]).unwrap();

        prop_assert_eq!(plan.batch.len(), n);
        prop_assert!(plan.destination.is_none());
        prop_assert!(is_contiguous(&plan.source.cards));
        prop_assert_eq!(plan.source.cards[to].id, cards[from].id);
        prop_assert!(plan.batch.items.iter().all(|item| item.list_id == Some(list_id)));
    }

    #[test]
    fn test_cross_list_move_conserves_cards(
        (n_src, from, n_dst, to) in cross_list_move()
    ) {
        let (source_list, destination_list) = (Uuid::new_v4(), Uuid::new_v4());
        let source = cards_for(source_list, n_src);
        let destination = cards_for(destination_list, n_dst);
        let moved = source[from].id;
        let mv = Move::card(
            moved,
            DropLocation::new(source_list, from),
            DropLocation::new(destination_list, to),
        );

        let plan = reorder_cards(&mv, &source, &destination).unwrap();
        let receiving = plan.destination.as_ref().unwrap();

        prop_assert_eq!(plan.source.cards.len(), n_src - 1);
        prop_assert_eq!(receiving.cards.len(), n_dst + 1);
        prop_assert_eq!(plan.batch.len(), n_src + n_dst);
        prop_assert!(is_contiguous(&plan.source.cards));
        prop_assert!(is_contiguous(&receiving.cards));

        prop_assert_eq!(receiving.cards[to].id, moved);
        prop_assert_eq!(receiving.cards[to].list_id, destination_list);
        prop_assert_eq!(
            plan.batch.get(moved).and_then(|item| item.list_id),
            Some(destination_list)
        );
        prop_assert!(plan.source.cards.iter().all(|card| card.id != moved));
    }

    #[test]
    fn test_out_of_range_destination_is_rejected(n in 1usize..12, extra in 1usize..5) {
        let list_id = Uuid::new_v4();
        let cards = cards_for(list_id, n);
        let mv = Move::card(
            cards[0].id,
            DropLocation::new(list_id, 0),
            DropLocation::new(list_id, n - 1 + extra),
        );
        prop_assert!(reorder_cards(&mv, &cards, &[]).is_err());
    }
}
