use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use liars_dice::core::{Difficulty, GameConfig, PlayerId, SeatConfig};
use liars_dice::opponent::HeuristicOpponent;
use liars_dice::rules::Game;
use liars_dice::Phase;

fn heuristic_decision(c: &mut Criterion) {
    let mut group = c.benchmark_group("heuristic_decision");
    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        let mut game = Game::new(GameConfig::default().with_seed(42).with_difficulty(difficulty));
        game.start_game();
        game.place_bet(3, 4);
        let view = game.view_for(game.state().active_player_id());
        let mut opponent = HeuristicOpponent::seeded(7);

        group.bench_function(BenchmarkId::from_parameter(difficulty), |b| {
            b.iter(|| black_box(opponent.choose_action(black_box(&view), difficulty)))
        });
    }
    group.finish();
}

fn self_play_game(c: &mut Criterion) {
    let config = GameConfig::default()
        .with_seat(PlayerId::new(0), SeatConfig::automated("North"))
        .with_seed(1);

    c.bench_function("self_play_game", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let mut game = Game::new(config.clone().with_seed(seed));
            let mut opponent = HeuristicOpponent::seeded(seed);
            game.start_game();
            loop {
                match game.state().phase() {
                    Phase::Betting => {
                        let view = game.view_for(game.state().active_player_id());
                        game.apply(opponent.choose_action(&view, Difficulty::Medium));
                    }
                    Phase::Revealing => {
                        game.next_round();
                    }
                    _ => break,
                }
            }
            black_box(game.state().winner())
        })
    });
}

criterion_group!(benches, heuristic_decision, self_play_game);
criterion_main!(benches);
