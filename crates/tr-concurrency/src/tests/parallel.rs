use crate::{parallel_for_each, parallel_map};

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::time::sleep;

#[tokio::test]
async fn given_one_failing_item_when_for_each_then_every_item_still_runs() {
    let seen = Mutex::new(Vec::new());
    let seen_ref = &seen;

    let results = parallel_for_each(vec![1, 2, 3], 3, move |item, _| async move {
        seen_ref.lock().unwrap().push(item);
        if item == 2 {
            Err(format!("item {item} failed"))
        } else {
            Ok(())
        }
    })
    .await;

    let mut seen = seen.into_inner().unwrap();
    seen.sort();
    assert_eq!(seen, vec![1, 2, 3]);

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert_eq!(results[1].error().map(String::as_str), Some("item 2 failed"));
    assert!(results[2].is_ok());
}

#[tokio::test(start_paused = true)]
async fn given_uneven_durations_when_mapping_then_results_follow_input_order() {
    let results = parallel_map(vec![30u64, 10, 20], 3, |delay, index| async move {
        sleep(Duration::from_millis(delay)).await;
        Ok::<_, String>((index, delay * 2))
    })
    .await;

    let values: Vec<(usize, u64)> = results
        .into_iter()
        .map(|result| result.outcome.unwrap())
        .collect();
    assert_eq!(values, vec![(0, 60), (1, 20), (2, 40)]);
}

#[tokio::test(start_paused = true)]
async fn given_worker_limit_when_mapping_then_in_flight_never_exceeds_it() {
    let in_flight = AtomicUsize::new(0);
    let peak = AtomicUsize::new(0);
    let (in_flight_ref, peak_ref) = (&in_flight, &peak);

    let results = parallel_map((0..20).collect(), 4, move |item: u32, _| async move {
        let now = in_flight_ref.fetch_add(1, Ordering::SeqCst) + 1;
        peak_ref.fetch_max(now, Ordering::SeqCst);
        sleep(Duration::from_millis(5)).await;
        in_flight_ref.fetch_sub(1, Ordering::SeqCst);
        Ok::<_, String>(item)
    })
    .await;

    assert_eq!(results.len(), 20);
    assert!(peak.load(Ordering::SeqCst) <= 4);
    assert_eq!(peak.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn given_zero_workers_when_mapping_then_runs_sequentially() {
    let results = parallel_map(vec!["a", "b"], 0, |item, _| async move {
        Ok::<_, String>(item.to_uppercase())
    })
    .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[1].outcome.as_deref(), Ok("B"));
}

#[tokio::test]
async fn given_no_items_when_mapping_then_empty() {
    let results = parallel_map(Vec::<u8>::new(), 5, |item, _| async move {
        Ok::<_, String>(item)
    })
    .await;
    assert!(results.is_empty());
}
