use dining_philosophers::indicator::mock::MockIndicator;
use dining_philosophers::indicator::IndicatorState;
use dining_philosophers::lifecycle::{DiningTable, TableConfig};
use dining_philosophers::model::SeatId;
use dining_philosophers::philosopher::{SleepRange, Timing};
use std::sync::Arc;
use std::time::Duration;

fn seeded(seats: usize, seed: u64) -> TableConfig {
    TableConfig {
        seed: Some(seed),
        ..TableConfig::with_seats(seats)
    }
}

/// Five philosophers A0..A4, thirty simulated seconds, sleeps between one and eight seconds.
#[tokio::test(start_paused = true)]
async fn test_thirty_second_table() {
    let indicator = MockIndicator::new();
    let table = DiningTable::start(seeded(5, 7), Arc::new(indicator.clone())).unwrap();
    let forks = table.forks().clone();

    let names: Vec<_> = table.snapshot().seats.into_iter().map(|s| s.name).collect();
    assert_eq!(names, ["A0", "A1", "A2", "A3", "A4"]);

    tokio::time::sleep(Duration::from_secs(30)).await;
    let last = table.shutdown().await.expect("Failed to shutdown table");

    // Nothing held, nobody eating, and somebody ate.
    assert!(forks.all_free(), "holders after shutdown: {:?}", forks.holders());
    assert!(forks.is_balanced());
    assert!(!last.anyone_eating());
    assert!(last.total_meals() > 0);

    // Every meal switched its seat's indicator on exactly once, and off again.
    indicator.verify();
    for (i, seat) in last.seats.iter().enumerate() {
        assert_eq!(indicator.times_on(SeatId(i)) as u64, seat.meals, "{}", seat.name);
    }
}

/// Nobody starves: given enough time every seat gets at least one meal.
#[tokio::test(start_paused = true)]
async fn test_every_philosopher_eats() {
    let table = DiningTable::start(seeded(5, 11), Arc::new(MockIndicator::new())).unwrap();

    tokio::time::sleep(Duration::from_secs(600)).await;
    let last = table.shutdown().await.unwrap();

    for seat in &last.seats {
        assert!(seat.meals > 0, "{} never ate: {last}", seat.name);
    }
}

/// Deadlock freedom: the total meal count keeps growing window after window.
#[tokio::test(start_paused = true)]
async fn test_aggregate_progress_never_stalls() {
    let table = DiningTable::start(seeded(5, 23), Arc::new(MockIndicator::new())).unwrap();

    let mut previous = 0;
    for window in 0..10 {
        tokio::time::sleep(Duration::from_secs(60)).await;
        let total = table.snapshot().total_meals();
        assert!(total > previous, "no progress in window {window}: {total}");
        previous = total;
    }

    table.shutdown().await.unwrap();
}

/// Meal counters only go up, and eating seats really hold both of their forks.
#[tokio::test(start_paused = true)]
async fn test_counters_and_holders_stay_consistent() {
    let table = DiningTable::start(seeded(5, 3), Arc::new(MockIndicator::new())).unwrap();
    let forks = table.forks().clone();
    let n = table.seat_count();

    let mut previous = vec![0; n];
    for _ in 0..1_200 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let snapshot = table.snapshot();
        let holders = forks.holders();

        for (i, seat) in snapshot.seats.iter().enumerate() {
            assert!(seat.meals >= previous[i], "{} meal count went down", seat.name);
            previous[i] = seat.meals;

            if seat.eating {
                assert_eq!(holders[i], Some(SeatId(i)), "{} eats without left fork", seat.name);
                assert_eq!(holders[(i + 1) % n], Some(SeatId(i)), "{} eats without right fork", seat.name);

                let neighbour = &snapshot.seats[(i + 1) % n];
                assert!(!neighbour.eating, "{} and {} eat together", seat.name, neighbour.name);
            }
        }
    }

    table.shutdown().await.unwrap();
}

/// Shutdown finishes promptly and leaves every fork on the table.
#[tokio::test(start_paused = true)]
async fn test_clean_shutdown_within_grace_period() {
    let table = DiningTable::start(seeded(5, 99), Arc::new(MockIndicator::new())).unwrap();
    let forks = table.forks().clone();

    tokio::time::sleep(Duration::from_secs(45)).await;

    let last = tokio::time::timeout(Duration::from_secs(1), table.shutdown())
        .await
        .expect("shutdown took too long")
        .unwrap();

    assert!(forks.all_free());
    assert!(forks.is_balanced());
    assert!(!last.anyone_eating());
}

/// The reporting loop runs until its shutdown future resolves, then winds the table down.
#[tokio::test(start_paused = true)]
async fn test_run_until_stops_on_request() {
    let table = DiningTable::start(seeded(5, 5), Arc::new(MockIndicator::new())).unwrap();
    let forks = table.forks().clone();

    let last = table
        .run_until(tokio::time::sleep(Duration::from_secs(20)))
        .await
        .unwrap();

    assert_eq!(last.seats.len(), 5);
    assert!(forks.all_free());
    assert!(!last.anyone_eating());
}

/// A failing indicator is ignored; meals go on.
#[tokio::test(start_paused = true)]
async fn test_failing_indicator_is_ignored() {
    let indicator = MockIndicator::failing();
    let table = DiningTable::start(seeded(5, 8), Arc::new(indicator.clone())).unwrap();

    tokio::time::sleep(Duration::from_secs(60)).await;
    let last = table.shutdown().await.unwrap();

    assert!(last.total_meals() > 0);
    indicator.verify();
}

/// Four worker threads, millisecond sleeps and wall-clock time: philosophers really run
/// in parallel and fight over every fork.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_table_keeps_neighbours_apart() {
    let indicator = MockIndicator::new();
    let mut config = seeded(5, 17);
    config.timing = Timing {
        think: SleepRange::from_millis(0, 2),
        eat: SleepRange::from_millis(0, 2),
    };
    let table = DiningTable::start(config, Arc::new(indicator.clone())).unwrap();
    let forks = table.forks().clone();
    let n = table.seat_count();

    let mut previous = vec![0; n];
    let mut previous_total = 0;
    for window in 0..20 {
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(2)).await;
            for (i, seat) in table.snapshot().seats.iter().enumerate() {
                assert!(seat.meals >= previous[i], "{} meal count went down", seat.name);
                previous[i] = seat.meals;
            }
        }
        let total = table.snapshot().total_meals();
        assert!(total > previous_total, "no progress in window {window}: {total}");
        previous_total = total;
    }

    let last = tokio::time::timeout(Duration::from_secs(1), table.shutdown())
        .await
        .expect("shutdown took too long")
        .unwrap();

    assert!(forks.all_free(), "holders after shutdown: {:?}", forks.holders());
    assert!(forks.is_balanced());
    assert!(!last.anyone_eating());
    indicator.verify();
    for (i, seat) in last.seats.iter().enumerate() {
        assert_eq!(indicator.times_on(SeatId(i)) as u64, seat.meals, "{}", seat.name);
    }

    // The log is appended under a lock, and a seat switches off before it puts its forks
    // back, so replaying it shows every meal interval in a consistent order.
    let mut on = vec![false; n];
    for (seat, state) in indicator.transitions() {
        let i = seat.0;
        match state {
            IndicatorState::On => {
                let (left, right) = ((i + n - 1) % n, (i + 1) % n);
                assert!(!on[left], "{seat} and #{left} ate together");
                assert!(!on[right], "{seat} and #{right} ate together");
                on[i] = true;
            }
            IndicatorState::Off => on[i] = false,
        }
    }
}
