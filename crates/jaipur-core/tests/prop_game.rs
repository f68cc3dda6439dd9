//! Property-based tests for the game engine.
//!
//! Each case plays a random game from a random seed, choosing actions by
//! index into the legal action list.

use proptest::prelude::*;

use jaipur_core::{check_invariants, CardCounts, GameAction, GameState, GoodType, JaipurParams};

/// Play one game, choosing each action with the next pick (wrapping around)
fn play_with_picks(game: &mut GameState, picks: &[usize]) {
    for i in 0..2_000 {
        if game.is_finished() {
            break;
        }
        let player = game.current_player();
        let actions = game.valid_actions(player);
        assert!(!actions.is_empty(), "current player has no legal action");
        let action = actions[picks[i % picks.len()] % actions.len()];
        game.play(player, action).unwrap();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every legal action applies cleanly and leaves the state consistent.
    #[test]
    fn prop_random_play_keeps_invariants(
        seed in any::<u64>(),
        picks in prop::collection::vec(any::<usize>(), 1..64),
    ) {
        let mut game = GameState::new_standard(seed);

        for i in 0..400 {
            if game.is_finished() {
                break;
            }
            let player = game.current_player();
            let actions = game.valid_actions(player);
            prop_assert!(!actions.is_empty());
            let action = actions[picks[i % picks.len()] % actions.len()];

            prop_assert!(game.play(player, action).is_ok(), "{} rejected", action);
            let violations = check_invariants(&game);
            prop_assert!(violations.is_empty(), "{:?} after {}", violations, action);
        }
    }

    /// Random games always finish with a player holding enough round wins.
    #[test]
    fn prop_games_finish(
        seed in any::<u64>(),
        picks in prop::collection::vec(any::<usize>(), 1..32),
    ) {
        let mut game = GameState::new_standard(seed);
        play_with_picks(&mut game, &picks);

        prop_assert!(game.is_finished());
        let winner = game.get_winner().unwrap();
        let needed = game.params().n_rounds_win_for_game_win;
        prop_assert!(game.get_player(winner).unwrap().rounds_won >= needed);
    }

    /// Illegal sales are rejected without touching the state.
    #[test]
    fn prop_bad_sell_is_atomic(
        seed in any::<u64>(),
        good_index in 0usize..GoodType::ALL.len(),
        extra in 1u32..10,
    ) {
        let mut game = GameState::new_standard(seed);
        let player = game.current_player();
        let good = GoodType::ALL[good_index];
        let held = game.get_player(player).unwrap().hand.get(good);
        let before = game.snapshot();

        prop_assert!(game.apply_action(player, GameAction::sell(good, held + extra)).is_err());
        prop_assert_eq!(game.snapshot(), before);
    }

    /// An exchange of unequal sizes is never accepted.
    #[test]
    fn prop_mismatched_exchange_rejected(
        seed in any::<u64>(),
        gave_camels in 0u32..6,
    ) {
        let mut game = GameState::new_standard(seed);
        let player = game.current_player();
        let take = game.market().without_camels();
        prop_assume!(take.total() >= 2);
        prop_assume!(gave_camels != take.total());

        let action = GameAction::exchange(take, CardCounts::single(GoodType::Camel, gave_camels));
        prop_assert!(game.apply_action(player, action).is_err());
    }

    /// Any valid parameter set yields a well-formed opening deal.
    #[test]
    fn prop_custom_deal_is_consistent(
        seed in any::<u64>(),
        market_size in 3u32..8,
        hand_start in 1u32..6,
        use_jade in any::<bool>(),
    ) {
        let params = JaipurParams {
            market_size,
            n_cards_in_hand_at_start: hand_start,
            use_jade_cards: use_jade,
            ..JaipurParams::default()
        };
        prop_assume!(params.validate().is_ok());

        let game = GameState::new(params, vec!["A".into(), "B".into()], seed).unwrap();
        prop_assert_eq!(game.market().total(), market_size);
        for p in game.players() {
            prop_assert_eq!(p.hand_size() + p.herd, hand_start);
        }
        prop_assert!(check_invariants(&game).is_empty());
    }
}
